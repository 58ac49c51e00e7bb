//! Config files and state wiring

use leadbook_server::{connect_state, ConfigError, ServerConfig};
use leadbook_store::LeadStore;
use std::io::Write;

#[test]
fn config_file_is_read() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "bind = \"0.0.0.0:7000\"\nmax_connections = 2\n\n[generator]\ntemperature = 0.2"
    )
    .unwrap();

    let config = ServerConfig::from_file(file.path()).unwrap();
    assert_eq!(config.bind.port(), 7000);
    assert_eq!(config.max_connections, 2);
    assert!((config.generator.temperature - 0.2).abs() < f32::EPSILON);
}

#[test]
fn missing_config_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ServerConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[tokio::test]
async fn state_opens_a_fresh_database() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("fresh.db").display());
    let config = ServerConfig::default().with_database_url(url).with_body_limit(1024);

    let state = connect_state(&config).await.unwrap();
    assert_eq!(state.body_limit(), 1024);
    assert!(state.store().fetch_all().await.unwrap().is_empty());
    assert!(dir.path().join("fresh.db").exists());
}

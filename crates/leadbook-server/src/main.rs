//! `leadbook-server` binary

use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use leadbook_core::{demo_leads, Clock, SystemClock};
use leadbook_server::{bind, connect_state, init_logging, LogFormat, ServerConfig};
use leadbook_store::{LeadStore, SqliteLeadStore};
use std::net::SocketAddr;
use std::path::PathBuf;

fn cli() -> Command {
    let config_arg = Arg::new("config")
        .long("config")
        .short('c')
        .value_parser(value_parser!(PathBuf))
        .help("TOML configuration file");
    let database_arg = Arg::new("database-url")
        .long("database-url")
        .help("SQLite URL, e.g. sqlite://leadbook.db (overrides DATABASE_URL)");

    Command::new("leadbook-server")
        .version(leadbook_server::VERSION)
        .about("Lead store and message generation API")
        .subcommand_required(true)
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .global(true)
                .env("LEADBOOK_LOG_FORMAT")
                .default_value("text")
                .value_parser(["text", "json"])
                .help("Log output format"),
        )
        .subcommand(
            Command::new("serve")
                .about("Run the HTTP API")
                .arg(config_arg.clone())
                .arg(database_arg.clone())
                .arg(
                    Arg::new("bind")
                        .long("bind")
                        .short('b')
                        .value_parser(value_parser!(SocketAddr))
                        .help("Listen address (overrides LEADBOOK_BIND)"),
                ),
        )
        .subcommand(
            Command::new("seed")
                .about("Write the demo leads into the store")
                .arg(config_arg)
                .arg(database_arg)
                .arg(
                    Arg::new("force")
                        .long("force")
                        .action(ArgAction::SetTrue)
                        .help("Replace existing leads"),
                ),
        )
}

fn resolve_config(args: &ArgMatches) -> anyhow::Result<ServerConfig> {
    let path = args.get_one::<PathBuf>("config");
    let mut config = ServerConfig::load(path.map(PathBuf::as_path))?;
    if let Some(url) = args.get_one::<String>("database-url") {
        config = config.with_database_url(url.clone());
    }
    if let Ok(Some(addr)) = args.try_get_one::<SocketAddr>("bind") {
        config = config.with_bind(*addr);
    }
    config.validate()?;
    Ok(config)
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!(
        bind = %config.bind,
        database_url = %config.database_url,
        model = %config.generator.model,
        "starting leadbook server"
    );
    let state = connect_state(&config).await?;
    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "cannot listen for ctrl-c");
        }
        tracing::info!("shutdown requested");
    };
    let (_, server) = bind(state, config.bind, shutdown)?;
    server.await;
    tracing::info!("server stopped");
    Ok(())
}

async fn seed(config: ServerConfig, force: bool) -> anyhow::Result<()> {
    let store = SqliteLeadStore::connect_with(&config.database_url, config.max_connections)
        .await
        .with_context(|| format!("opening {}", config.database_url))?;

    let existing = store.fetch_all().await?;
    if !existing.is_empty() && !force {
        bail!(
            "store already holds {} leads; pass --force to replace them",
            existing.len()
        );
    }

    let leads = demo_leads(SystemClock.now());
    store.replace_all(&leads).await?;
    tracing::info!(count = leads.len(), replaced = existing.len(), "demo leads written");
    store.close().await;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    let format: LogFormat = matches
        .get_one::<String>("log-format")
        .map_or(Ok(LogFormat::default()), |raw| raw.parse())?;
    init_logging(format)?;

    match matches.subcommand() {
        Some(("serve", args)) => serve(resolve_config(args)?).await,
        Some(("seed", args)) => seed(resolve_config(args)?, args.get_flag("force")).await,
        _ => bail!("unknown command; see --help"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn serve_flags_parse() {
        let matches = cli()
            .try_get_matches_from([
                "leadbook-server",
                "--log-format",
                "json",
                "serve",
                "--bind",
                "0.0.0.0:9000",
                "--database-url",
                "sqlite::memory:",
            ])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "serve");
        assert_eq!(
            args.get_one::<SocketAddr>("bind").unwrap().port(),
            9000
        );
        assert_eq!(
            args.get_one::<String>("database-url").map(String::as_str),
            Some("sqlite::memory:")
        );
    }

    #[test]
    fn seed_has_force_flag() {
        let matches = cli()
            .try_get_matches_from(["leadbook-server", "seed", "--force"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert!(args.get_flag("force"));
        assert!(args.try_get_one::<SocketAddr>("bind").is_err());
    }

    #[test]
    fn default_bind_matches_config() {
        assert_eq!(
            ServerConfig::default().bind.to_string(),
            leadbook_server::config::DEFAULT_BIND
        );
    }
}

//! Session, HTTP clients and server over a real SQLite file

use leadbook_client::{connect, ClientConfig, MessageClient, SaveOutcome};
use leadbook_compose::draft_or_fallback;
use leadbook_core::{LeadDraft, LeadPatch, LeadStatus};
use leadbook_server::AppState;
use leadbook_store::{LeadStore, SqliteLeadStore};
use leadbook_test_utils::StubGenerator;
use pretty_assertions::assert_eq;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;

struct RunningServer {
    addr: SocketAddr,
    store: SqliteLeadStore,
    stop: oneshot::Sender<()>,
    task: tokio::task::JoinHandle<()>,
    _dir: tempfile::TempDir,
}

async fn start_server() -> RunningServer {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("leads.db").display());
    let store = SqliteLeadStore::connect(&url).await.unwrap();
    let state = AppState::new(
        Arc::new(store.clone()),
        Arc::new(StubGenerator::replying("Any news on the rollout?")),
    );

    let (stop, stopped) = oneshot::channel::<()>();
    let (addr, server) = leadbook_server::bind(state, ([127, 0, 0, 1], 0).into(), async {
        let _ = stopped.await;
    })
    .unwrap();
    RunningServer {
        addr,
        store,
        stop,
        task: tokio::spawn(server),
        _dir: dir,
    }
}

impl RunningServer {
    fn config(&self) -> ClientConfig {
        ClientConfig::new(format!("http://{}", self.addr))
    }

    async fn shutdown(self) {
        let _ = self.stop.send(());
        self.task.await.unwrap();
    }
}

#[tokio::test]
async fn edits_round_trip_through_the_api() {
    let server = start_server().await;

    let session = connect(&server.config()).unwrap();
    assert_eq!(session.load().await.unwrap(), 0);

    let ada = session
        .add_lead(LeadDraft::new("Ada Lovelace", "Analytical Engines").with_phone("+44 1"))
        .unwrap();
    let grace = session
        .add_lead(LeadDraft::new("Grace Hopper", "Navy Labs"))
        .unwrap();
    assert!(matches!(
        session.save().await.unwrap(),
        SaveOutcome::Saved { .. }
    ));
    assert_eq!(server.store.count().await.unwrap(), 2);

    session
        .update_lead(ada.id(), &LeadPatch::new().status(LeadStatus::Qualified))
        .unwrap();
    session.remove_lead(grace.id()).unwrap();
    session.save().await.unwrap();

    let fresh = connect(&server.config()).unwrap();
    fresh.load().await.unwrap();
    let leads = fresh.leads();
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0].id(), ada.id());
    assert_eq!(leads[0].status, LeadStatus::Qualified);
    assert!(!fresh.has_unsaved_changes());
    assert_eq!(server.store.fetch_all().await.unwrap(), leads);

    server.shutdown().await;
}

#[tokio::test]
async fn message_generation_through_the_api() {
    let server = start_server().await;
    let session = connect(&server.config()).unwrap();
    let lead = session
        .add_lead(LeadDraft::new("Ada Lovelace", "Analytical Engines"))
        .unwrap();

    let client = MessageClient::new(&server.config()).unwrap();
    let message = session.draft_message(&client, lead.id()).await.unwrap();
    assert_eq!(message.text, "Hi Ada, Any news on the rollout?");
    assert!(message.generated);

    let blank = draft_or_fallback(&client, &leadbook_compose::MessageRequest::new("", "")).await;
    assert!(!blank.generated);

    server.shutdown().await;
}

use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chanmux::{Command, LocalTransport, Ports, Session, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::load()?;
    let transport = LocalTransport::new(settings.hub_capacity);
    let session = Session::connect(&transport, &settings.endpoint, None, None)?;

    let (ports, mut host) = Ports::channel();
    tokio::spawn(session.register(ports));

    host.commands.send(Command::listen("room:lobby", "message"))?;
    host.commands.send(Command::send(
        "room:lobby",
        "message",
        Some(json!({ "body": "hello" })),
    ))?;

    if let Some(note) = host.events.recv().await {
        info!(topic = %note.topic, event = %note.event, payload = %note.payload, "received");
    }
    Ok(())
}

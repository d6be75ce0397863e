//! Follow an OctoPrint instance's push channel and log what happens.
//!
//! Run with:
//! OCTOPRINT_URL=http://octopi.local OCTOPRINT_API_KEY=... cargo run --example push_events

use futures::StreamExt;
use octoprint_client::push::PushMessage;
use octoprint_client::OctoPrintClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let client = OctoPrintClient::from_env()?;
    let login = client.auth().passive_login().await?;

    let mut session = client.push();
    session.open().await?;
    session.authenticate_login(&login).await?;
    session.set_throttle(2).await?;
    tracing::info!(session = session.session_id(), "push session open");

    let mut stream = session.subscribe();
    while let Some(message) = stream.next().await {
        match message? {
            PushMessage::Connected(info) => {
                tracing::info!(version = ?info.version, "connected");
            }
            PushMessage::Current(update) => {
                tracing::info!(
                    state = %update.state.text,
                    completion = ?update.progress.completion,
                    "state"
                );
            }
            PushMessage::Event(event) => {
                tracing::info!(event = %event.kind, payload = %event.payload, "event");
            }
            PushMessage::ReauthRequired(reauth) => {
                tracing::warn!(reason = %reauth.reason, "server requires a new login");
                break;
            }
            other => tracing::debug!(kind = other.kind(), "message"),
        }
    }

    Ok(())
}

//! OctoPrint's push channel.
//!
//! OctoPrint pushes state updates, events and plugin messages over SockJS.
//! [`PushSession`] speaks the XHR polling transport on top of the regular
//! HTTP client, so it shares its connection pool, proxy and API key.
//!
//! # Module Organization
//!
//! ```text
//! push/
//! ├── session - PushSession: open, poll, send, subscribe
//! ├── message - PushMessage and its payload types
//! └── stream  - PushStream fed by the polling task
//! ```
//!
//! # Examples
//!
//! ## Polling by hand
//!
//! ```ignore
//! use octoprint_client::push::{PushMessage, PushSession};
//!
//! let mut session = PushSession::new(&client);
//! session.open().await?;
//! for message in session.poll().await? {
//!     if let PushMessage::Current(update) = message {
//!         println!("{}", update.state.text);
//!     }
//! }
//! ```
//!
//! ## Streaming
//!
//! ```ignore
//! use futures::StreamExt;
//!
//! let login = client.auth().passive_login().await?;
//! let mut session = PushSession::new(&client);
//! session.open().await?;
//! session.authenticate_login(&login).await?;
//! session.set_throttle(2).await?;
//!
//! let mut stream = session.subscribe();
//! while let Some(message) = stream.next().await {
//!     println!("{:?}", message?);
//! }
//! ```

mod message;
mod session;
mod stream;

pub use message::{
    ConnectedInfo, PluginMessage, PushEvent, PushMessage, ReauthRequired, SafeMode,
    SlicingProgress, StateUpdate,
};
pub use session::PushSession;
pub use stream::PushStream;

use crate::client::OctoPrintClient;

impl OctoPrintClient {
    /// Start a new push session with random ids.
    pub fn push(&self) -> PushSession {
        PushSession::new(self)
    }
}

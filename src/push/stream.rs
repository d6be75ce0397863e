//! Stream of push messages fed by a background polling task.

use crate::error::Result;
use crate::push::PushMessage;
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;

/// Messages from a subscribed [`PushSession`](crate::push::PushSession).
///
/// Implements [`Stream`], so `StreamExt` combinators work on it. The stream
/// yields at most one error and then ends. Dropping it stops the polling
/// task.
///
/// ```ignore
/// use futures::StreamExt;
///
/// let mut stream = PushSession::new(&client).subscribe();
/// while let Some(message) = stream.next().await {
///     println!("{}", message?.kind());
/// }
/// ```
pub struct PushStream {
    receiver: ReceiverStream<Result<PushMessage>>,
    task: Option<JoinHandle<()>>,
}

impl PushStream {
    pub(crate) fn new(receiver: mpsc::Receiver<Result<PushMessage>>, task: JoinHandle<()>) -> Self {
        PushStream {
            receiver: ReceiverStream::new(receiver),
            task: Some(task),
        }
    }

    /// Receive the next message. `None` once the session ended.
    pub async fn recv(&mut self) -> Option<Result<PushMessage>> {
        futures::StreamExt::next(self).await
    }
}

impl Stream for PushStream {
    type Item = Result<PushMessage>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.receiver).poll_next(cx)
    }
}

impl Drop for PushStream {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OctoPrintError;
    use futures::StreamExt;
    use serde_json::json;

    #[tokio::test]
    async fn test_stream_delivers_in_order() {
        let (tx, rx) = mpsc::channel(4);
        let task = tokio::spawn(async move {
            let first = PushMessage::from_value(json!({"event": {"type": "Connected"}}));
            tx.send(first).await.ok();
            tx.send(Err(OctoPrintError::Push("gone".into()))).await.ok();
        });
        let mut stream = PushStream::new(rx, task);

        let first = stream.recv().await.unwrap().unwrap();
        assert_eq!(first.kind(), "event");
        assert!(stream.next().await.unwrap().is_err());
        assert!(stream.next().await.is_none());
    }
}

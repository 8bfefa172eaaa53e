//! Background ticker refresh
//!
//! Runs the ticker fetch on a tokio task and hands the outcome back to the
//! presentation loop over a channel. The loop owns every display mutation;
//! background tasks only send messages.

use log::{debug, info};
use tokio::sync::mpsc;

use crate::data::{TickerClient, TickerError, TickerSnapshot};

/// Owned result of one fetch, safe to move across the channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// 2xx response with a parseable body
    Success(TickerSnapshot),
    /// Server answered with a non-2xx status
    HttpStatus(u16),
    /// Connectivity, timeout or malformed body, with the cause as text
    Failed(String),
}

impl From<Result<TickerSnapshot, TickerError>> for FetchOutcome {
    fn from(result: Result<TickerSnapshot, TickerError>) -> Self {
        match result {
            Ok(snapshot) => FetchOutcome::Success(snapshot),
            Err(TickerError::Status(code)) => FetchOutcome::HttpStatus(code),
            Err(TickerError::Request(e)) => FetchOutcome::Failed(e.to_string()),
            Err(TickerError::Parse(e)) => FetchOutcome::Failed(e.to_string()),
        }
    }
}

/// Messages sent from background fetches to the presentation loop
#[derive(Debug, Clone)]
pub enum RefreshMessage {
    /// A fetch finished
    Completed {
        request_id: u64,
        outcome: FetchOutcome,
    },
}

/// Handle for starting fetches and receiving their outcomes
///
/// Requests are not de-duplicated: two requests in flight both complete and
/// both messages are delivered, in completion order.
pub struct RefreshHandle {
    client: TickerClient,
    sender: mpsc::Sender<RefreshMessage>,
    receiver: mpsc::Receiver<RefreshMessage>,
    next_id: u64,
}

impl RefreshHandle {
    /// Creates a RefreshHandle that fetches with the given client
    pub fn new(client: TickerClient) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        Self {
            client,
            sender,
            receiver,
            next_id: 1,
        }
    }

    /// Spawns one background fetch
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Returns
    /// The id carried by the matching `RefreshMessage::Completed`
    pub fn request(&mut self) -> u64 {
        let request_id = self.next_id;
        self.next_id += 1;

        let client = self.client.clone();
        let tx = self.sender.clone();

        info!("Refresh #{} started ({})", request_id, client.url());
        tokio::spawn(async move {
            let outcome = FetchOutcome::from(client.fetch().await);
            debug!("Refresh #{} finished: {:?}", request_id, outcome);
            let _ = tx
                .send(RefreshMessage::Completed {
                    request_id,
                    outcome,
                })
                .await;
        });

        request_id
    }

    /// Checks for a finished fetch without blocking
    ///
    /// # Returns
    /// * `Some(RefreshMessage)` if a message was available
    /// * `None` if no messages are pending
    pub fn try_recv(&mut self) -> Option<RefreshMessage> {
        self.receiver.try_recv().ok()
    }

    /// Waits for the next finished fetch
    pub async fn recv(&mut self) -> Option<RefreshMessage> {
        self.receiver.recv().await
    }
}

//! Background dataset fetches.
//!
//! One thread per fetch; the result comes back over a channel together with
//! the request ticket it was started under, so the dashboard can drop it if a
//! newer fetch has started in the meantime.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError, channel};
use std::thread::{self, JoinHandle};

use ev_query::TableGateway;
use ev_store::{GraphConfig, RequestTicket};
use tracing::debug;

use crate::charts::{self, Dataset};
use crate::config::AppConfig;

#[derive(Debug, Clone)]
pub enum FetchMessage {
    Complete {
        ticket: RequestTicket,
        dataset: Dataset,
    },
    Failed {
        ticket: RequestTicket,
        message: String,
    },
}

impl FetchMessage {
    pub fn ticket(&self) -> &RequestTicket {
        match self {
            FetchMessage::Complete { ticket, .. } | FetchMessage::Failed { ticket, .. } => ticket,
        }
    }
}

pub struct FetchWorker {
    ticket: RequestTicket,
    rx: Receiver<FetchMessage>,
    _handle: JoinHandle<()>,
}

impl FetchWorker {
    /// Fetch the dataset of `graph` on a new thread.
    ///
    /// `graph` is a copy taken when the fetch starts; later edits do not
    /// affect it.
    pub fn start<G>(gateway: Arc<G>, graph: GraphConfig, config: AppConfig, ticket: RequestTicket) -> Self
    where
        G: TableGateway + 'static,
    {
        let (tx, rx) = channel();
        let worker_ticket = ticket.clone();
        let handle = thread::spawn(move || {
            let message = match charts::fetch_dataset(&*gateway, &graph, &config) {
                Ok(dataset) => FetchMessage::Complete { ticket, dataset },
                Err(e) => FetchMessage::Failed {
                    ticket,
                    message: e.to_string(),
                },
            };
            if tx.send(message).is_err() {
                debug!(graph = %graph.id, "fetch result receiver dropped");
            }
        });

        Self {
            ticket: worker_ticket,
            rx,
            _handle: handle,
        }
    }

    pub fn ticket(&self) -> &RequestTicket {
        &self.ticket
    }

    /// Non-blocking check for the result.
    ///
    /// `Ok(None)` while the fetch is running. A worker that exits without
    /// sending reports an error.
    pub fn poll(&self) -> Result<Option<FetchMessage>, String> {
        match self.rx.try_recv() {
            Ok(message) => Ok(Some(message)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err("fetch worker exited without a result".to_string()),
        }
    }

    /// Block until the result arrives.
    pub fn wait(self) -> Result<FetchMessage, String> {
        self.rx
            .recv()
            .map_err(|_| "fetch worker exited without a result".to_string())
    }
}

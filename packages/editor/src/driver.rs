//! # Session Driver
//!
//! Runs an [`EditSession`] on its own tokio task so pending property edits
//! commit when their window elapses, without the caller polling
//! [`EditSession::flush_due`].
//!
//! All time comes from the tokio clock, which lets tests pause and advance
//! it. Dropping every [`SessionHandle`] stops the task and discards edits
//! that have not committed yet.

use crate::errors::EditorError;
use crate::mutations::Mutation;
use crate::session::EditSession;
use pagekit_blocks::BlockList;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, info};

type Reply<T> = oneshot::Sender<T>;

enum Request {
    Apply {
        mutation: Mutation,
        reply: Reply<Result<bool, EditorError>>,
    },
    Document {
        reply: Reply<(BlockList, u64)>,
    },
    Flush {
        reply: Reply<usize>,
    },
    Snapshot {
        reply: Reply<BlockList>,
    },
}

/// Cloneable handle to a session running on a tokio task
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Request>,
}

/// Move `session` onto a new task
///
/// Must be called from within a tokio runtime.
pub fn spawn(session: EditSession) -> (SessionHandle, JoinHandle<EditSession>) {
    let (tx, rx) = mpsc::channel(100);
    let task = tokio::spawn(run(session, rx));
    (SessionHandle { tx }, task)
}

impl SessionHandle {
    pub async fn apply(&self, mutation: Mutation) -> Result<bool, EditorError> {
        self.request(|reply| Request::Apply { mutation, reply }).await?
    }

    /// Committed document and its version
    pub async fn document(&self) -> Result<(BlockList, u64), EditorError> {
        self.request(|reply| Request::Document { reply }).await
    }

    /// Commit every pending edit now; returns the commit count
    pub async fn flush(&self) -> Result<usize, EditorError> {
        self.request(|reply| Request::Flush { reply }).await
    }

    /// Flush and return the document to persist
    pub async fn save_snapshot(&self) -> Result<BlockList, EditorError> {
        self.request(|reply| Request::Snapshot { reply }).await
    }

    async fn request<T>(&self, build: impl FnOnce(Reply<T>) -> Request) -> Result<T, EditorError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| EditorError::DriverStopped)?;
        rx.await.map_err(|_| EditorError::DriverStopped)
    }
}

async fn run(mut session: EditSession, mut rx: mpsc::Receiver<Request>) -> EditSession {
    info!(version = session.version(), "Session driver started");

    loop {
        let deadline = session.next_deadline().map(Instant::from_std);

        tokio::select! {
            request = rx.recv() => match request {
                Some(request) => handle(&mut session, request),
                None => break,
            },
            // Disabled branches are still constructed, hence the fallback
            _ = time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                let commits = session.flush_due(Instant::now().into_std());
                let version = session.version();
                debug!(commits, version, "Debounce window elapsed");
            }
        }
    }

    session.discard_pending();
    info!(version = session.version(), "Session driver stopped");
    session
}

fn handle(session: &mut EditSession, request: Request) {
    // A dropped reply receiver only means the caller stopped waiting
    match request {
        Request::Apply { mutation, reply } => {
            let result = session.apply_at(mutation, Instant::now().into_std());
            let _ = reply.send(result);
        }
        Request::Document { reply } => {
            let _ = reply.send((session.document().clone(), session.version()));
        }
        Request::Flush { reply } => {
            let _ = reply.send(session.flush());
        }
        Request::Snapshot { reply } => {
            let _ = reply.send(session.save_snapshot());
        }
    }
}

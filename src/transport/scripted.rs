//! In-memory [`Transport`] with scripted replies, for tests.
//!
//! Replies are queued per path. A deferred reply parks the call until the
//! test resolves it, which lets tests complete requests out of order.

use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::sync::oneshot;
use tokio::time::Instant;

use crate::error::{ArcaloadError, Result};

use super::{ApiRequest, ApiResponse, Transport};

/// What a scripted call resolves to
#[derive(Debug, Clone)]
pub enum Reply {
    Json(u16, Value),
    Fail(String),
}

impl Reply {
    pub fn ok(body: Value) -> Self {
        Reply::Json(200, body)
    }

    fn into_result(self) -> Result<ApiResponse> {
        match self {
            Reply::Json(status, body) => Ok(ApiResponse::new(status, body)),
            Reply::Fail(message) => Err(ArcaloadError::Transport(message)),
        }
    }
}

enum Scripted {
    Ready(Reply),
    Deferred(oneshot::Receiver<Reply>),
}

/// A recorded call and the (paused-clock) instant it was made
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub request: ApiRequest,
    pub at: Instant,
}

#[derive(Default)]
pub struct ScriptedTransport {
    calls: Mutex<Vec<RecordedCall>>,
    replies: Mutex<HashMap<String, VecDeque<Scripted>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an immediate reply for the next call to `path`
    pub fn reply(&self, path: &str, reply: Reply) {
        self.replies
            .lock()
            .entry(path.to_string())
            .or_default()
            .push_back(Scripted::Ready(reply));
    }

    /// Queue a reply for the next call to `path` that waits until the
    /// returned sender is used
    pub fn defer(&self, path: &str) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.replies
            .lock()
            .entry(path.to_string())
            .or_default()
            .push_back(Scripted::Deferred(rx));
        tx
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn calls_to(&self, path: &str) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.request.path == path)
            .cloned()
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let scripted = {
            let mut replies = self.replies.lock();
            replies
                .get_mut(&request.path)
                .and_then(|queue| queue.pop_front())
        };
        self.calls.lock().push(RecordedCall {
            request,
            at: Instant::now(),
        });

        // Unscripted paths answer with an empty JSON object
        let reply = match scripted {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Deferred(rx)) => rx
                .await
                .unwrap_or_else(|_| Reply::Fail("deferred reply dropped".to_string())),
            None => Reply::ok(json!({})),
        };
        reply.into_result()
    }
}

use crate::error::Result;
use crate::runware::Transport;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

type Responder = Box<dyn Fn(&Value) -> Result<String> + Send + Sync>;

/// In-memory transport: records every body and answers through `responder`.
pub(crate) struct MockTransport {
    bodies: Mutex<Vec<String>>,
    responder: Responder,
}

impl MockTransport {
    /// `responder` receives the first task of the decoded batch.
    pub(crate) fn new(responder: impl Fn(&Value) -> Result<String> + Send + Sync + 'static) -> Self {
        Self {
            bodies: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        }
    }

    pub(crate) fn replying(body: &str) -> Self {
        let body = body.to_string();
        Self::new(move |_| Ok(body.clone()))
    }

    pub(crate) fn bodies(&self) -> Vec<String> {
        self.bodies.lock().unwrap().clone()
    }

    pub(crate) fn calls(&self) -> usize {
        self.bodies.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(&self, body: String) -> Result<String> {
        let batch: Value = serde_json::from_str(&body).unwrap();
        self.bodies.lock().unwrap().push(body);
        (self.responder)(&batch[0])
    }
}

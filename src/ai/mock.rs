use super::SynthesisService;
use crate::models::SynthesisRequest;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted answer from the mock model.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    NoText,
    Failure(String),
}

#[derive(Clone)]
pub struct MockSynthesisClient {
    replies: Arc<Mutex<Vec<MockReply>>>,
    call_count: Arc<Mutex<usize>>,
    last_request: Arc<Mutex<Option<SynthesisRequest>>>,
    delay: Option<Duration>,
}

impl MockSynthesisClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            last_request: Arc::new(Mutex::new(None)),
            delay: None,
        }
    }

    pub fn with_reply(self, reply: MockReply) -> Self {
        self.replies.lock().unwrap().push(reply);
        self
    }

    pub fn with_text_response(self, text: impl Into<String>) -> Self {
        self.with_reply(MockReply::Text(text.into()))
    }

    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.with_reply(MockReply::Failure(message.into()))
    }

    /// Sleep before answering, to keep a call in flight.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn last_request(&self) -> Option<SynthesisRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

impl Default for MockSynthesisClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SynthesisService for MockSynthesisClient {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Option<String>> {
        let reply = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            *self.last_request.lock().unwrap() = Some(request.clone());

            let replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                MockReply::Text("int main() { return 0; }".to_string())
            } else {
                let index = (*count - 1) % replies.len();
                replies[index].clone()
            }
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match reply {
            MockReply::Text(text) => Ok(Some(text)),
            MockReply::NoText => Ok(None),
            MockReply::Failure(message) => Err(Error::SynthesisCall(message)),
        }
    }
}

//! Local fake models for testing purpose.

mod embedding;
mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bedrock_lab_model::{
    ErrorKind, ModelProvider, ModelProviderError, ModelRequest, ModelResponse,
};
use tokio::time::sleep;

pub use embedding::*;
pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Error {
    #[inline]
    pub fn message(&self) -> &'static str {
        self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Default)]
struct Script {
    responses: VecDeque<PresetResponse>,
    requests: Vec<ModelRequest>,
}

/// A local fake model for testing purpose.
///
/// Before sending requests, you need to queue the replies, which is how the
/// model should respond to each request, in order. If there are no enough
/// replies queued, an error will be returned. Every received request is
/// recorded and can be inspected later.
///
/// Clones share the same script, so a clone can be kept by the test while
/// another one is moved into the code under test.
///
/// # Note
///
/// This type is not optimized for production use, there are heavy memory
/// copies involved. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestModelProvider {
    script: Arc<Mutex<Script>>,
    delay: Option<Duration>,
}

impl TestModelProvider {
    #[inline]
    pub fn add_response(&mut self, preset: PresetResponse) {
        self.lock().responses.push_back(preset);
    }

    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns every request received so far.
    #[inline]
    pub fn requests(&self) -> Vec<ModelRequest> {
        self.lock().requests.clone()
    }

    #[inline]
    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        // A poisoned script only means another test thread panicked.
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn next_response(&self, req: &ModelRequest) -> Result<ModelResponse, Error> {
        let mut script = self.lock();
        script.requests.push(req.clone());

        if req.messages.is_empty() {
            return Err(Error {
                message: "empty request",
                kind: ErrorKind::InvalidRequest,
            });
        }

        let Some(mut preset) = script.responses.pop_front() else {
            return Err(Error {
                message: "no enough steps",
                kind: ErrorKind::RateLimitExceeded,
            });
        };
        if let Some(remaining) = preset.failures {
            // `Some(0)` stays forever, other counts go down to `None`.
            if remaining > 0 {
                preset.failures = (remaining > 1).then(|| remaining - 1);
            }
            script.responses.push_front(preset);
            return Err(Error {
                message: "preset failure",
                kind: ErrorKind::Other,
            });
        }

        Ok(ModelResponse {
            text: preset.text,
            finish_reason: Some(preset.finish_reason),
            usage: None,
        })
    }
}

impl ModelProvider for TestModelProvider {
    type Error = crate::Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelResponse, Self::Error>> + Send + 'static
    {
        let result = self.next_response(req);
        let delay = self.delay.unwrap_or(Duration::from_millis(1));
        async move {
            sleep(delay).await;
            result
        }
    }
}

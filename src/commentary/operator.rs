use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use super::gemini::{GeminiClient, prompt};
use super::{EventNotifier, GameEvent, OperatorMessage};

/// Shown when no API key was configured.
pub const FALLBACK_MISSING_KEY: &str = "API Key missing! I can't see your game! (>_<)";

/// Shown when the request failed for any reason.
pub const FALLBACK_INTERRUPTED: &str = "Signal interrupted... (x_x)";

/// Shown when the model answered with no text.
pub const FALLBACK_EMPTY: &str = "...";

/// Where operator replies come from.
#[derive(Debug)]
pub enum Backend {
    /// No credentials; every reaction is the missing-key message.
    Offline,
    Gemini(GeminiClient),
}

impl Backend {
    /// Produces the operator's line for one event. Never fails.
    pub async fn react_to(&self, event: GameEvent, score: u32, context: Option<&str>) -> String {
        let Self::Gemini(client) = self else {
            return FALLBACK_MISSING_KEY.to_owned();
        };

        match client.generate(&prompt(event, score, context)).await {
            Ok(text) if text.is_empty() => FALLBACK_EMPTY.to_owned(),
            Ok(text) => text,
            Err(error) => {
                warn!(%error, event = event.label(), "operator request failed");
                FALLBACK_INTERRUPTED.to_owned()
            }
        }
    }
}

/// Fire-and-forget dispatcher: each event becomes an independent task on
/// the runtime, and its reply is posted to the message channel.
#[derive(Debug)]
pub struct Operator {
    backend: Arc<Backend>,
    runtime: Handle,
    messages: UnboundedSender<OperatorMessage>,
    in_flight: Arc<AtomicUsize>,
}

impl Operator {
    /// Creates the operator and the receiving end the UI drains.
    #[must_use]
    pub fn new(backend: Backend, runtime: Handle) -> (Self, UnboundedReceiver<OperatorMessage>) {
        let (messages, receiver) = mpsc::unbounded_channel();
        let operator = Self {
            backend: Arc::new(backend),
            runtime,
            messages,
            in_flight: Arc::new(AtomicUsize::new(0)),
        };
        (operator, receiver)
    }

    /// Number of requests that have not produced a message yet.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }
}

impl EventNotifier for Operator {
    fn notify(&mut self, event: GameEvent, score: u32, context: Option<&str>) {
        let backend = Arc::clone(&self.backend);
        let messages = self.messages.clone();
        let in_flight = Arc::clone(&self.in_flight);
        let context = context.map(str::to_owned);

        in_flight.fetch_add(1, Ordering::AcqRel);
        debug!(event = event.label(), score, "dispatching operator request");

        self.runtime.spawn(async move {
            let text = backend.react_to(event, score, context.as_deref()).await;
            in_flight.fetch_sub(1, Ordering::AcqRel);
            // The UI may already be gone on shutdown.
            let _ = messages.send(OperatorMessage { event, text });
        });
    }
}

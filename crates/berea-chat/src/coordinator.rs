use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::StreamExt;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use berea_core::{Message, MessageId, Session};
use berea_llm::{GenerationProvider, TransportError};
use berea_scripture::extract_citations;

use crate::config::ChatConfig;
use crate::error::ChatError;
use crate::event::ChatEvent;
use crate::gate::{Unmetered, UsageGate};
use crate::generation::{Generation, GenerationState};

/// Streaming generation coordinator.
///
/// Owns at most one in-flight generation for its session. Each call to
/// [`start`](Self::start) supersedes any active generation (cancelling
/// it silently), appends the user turn plus an assistant placeholder,
/// and spawns a task that races chunk arrival against cancellation and
/// the wall-clock timeout. Events for a generation arrive on its own
/// channel, in order; a cancelled generation closes its channel without
/// a terminal event.
pub struct ChatCoordinator<P: GenerationProvider + 'static> {
    session: Arc<Mutex<Session>>,
    provider: Arc<P>,
    gate: Arc<dyn UsageGate>,
    config: ChatConfig,
    active: Option<ActiveGeneration>,
}

/// Handle to the single live generation, if any.
struct ActiveGeneration {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl<P: GenerationProvider + 'static> ChatCoordinator<P> {
    pub fn new(provider: P, config: ChatConfig) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::new())),
            provider: Arc::new(provider),
            gate: Arc::new(Unmetered),
            config,
            active: None,
        }
    }

    /// Replace the usage gate (defaults to [`Unmetered`])
    pub fn with_gate(mut self, gate: Arc<dyn UsageGate>) -> Self {
        self.gate = gate;
        self
    }

    /// Replace the session, e.g. one hydrated from saved state
    pub fn with_session(self, session: Session) -> Self {
        *self.session.lock() = session;
        self
    }

    /// Begin a generation for `query`.
    ///
    /// Any active generation is cancelled first and emits nothing after
    /// this call returns. A gate denial queues
    /// `Failed(RateLimitExceeded)` before returning, without touching
    /// the message store or opening a stream. An empty-after-trim query
    /// is ignored: the returned channel closes without events.
    pub async fn start(&mut self, query: &str) -> mpsc::UnboundedReceiver<ChatEvent> {
        self.supersede().await;

        let (events, rx) = mpsc::unbounded_channel();
        let query = query.trim();
        if query.is_empty() {
            debug!("ignoring empty query");
            return rx;
        }
        if !self.gate.can_send() {
            warn!("usage gate denied generation");
            let _ = events.send(ChatEvent::Failed(ChatError::RateLimitExceeded));
            return rx;
        }

        // The context window is derived after the user turn lands and
        // before the placeholder does, so the query is always the last
        // outbound message.
        let (context, placeholder_id) = {
            let mut session = self.session.lock();
            session.add_message(Message::user(query));
            let context = session
                .history_window(self.config.history_window_limit)
                .to_vec();
            let placeholder_id = session.add_message(Message::assistant_placeholder());
            (context, placeholder_id)
        };

        let cancel = CancellationToken::new();
        let task = GenerationTask {
            provider: Arc::clone(&self.provider),
            session: Arc::clone(&self.session),
            gate: Arc::clone(&self.gate),
            timeout: self.config.timeout,
            context,
            placeholder_id,
            cancel: cancel.clone(),
            events,
        };
        let generation = Generation::new(query);
        let handle = tokio::spawn(task.run(generation));
        self.active = Some(ActiveGeneration { cancel, handle });
        rx
    }

    /// Request cancellation of the active generation, if any.
    ///
    /// Silent and idempotent: no event is emitted, and calling this with
    /// no live generation (or an already-terminal one) does nothing. The
    /// placeholder message keeps whatever content had streamed in.
    pub fn cancel(&mut self) {
        if let Some(active) = &self.active {
            debug!("cancellation requested");
            active.cancel.cancel();
        }
    }

    /// Cancel any active generation and empty the message store.
    pub async fn clear(&mut self) {
        self.supersede().await;
        self.session.lock().clear();
        debug!("session cleared");
    }

    /// Whether a generation is currently live
    pub fn is_generating(&self) -> bool {
        self.active
            .as_ref()
            .map(|active| !active.handle.is_finished())
            .unwrap_or(false)
    }

    /// Snapshot of the conversation log
    pub fn messages(&self) -> Vec<Message> {
        self.session.lock().messages.clone()
    }

    /// Shared handle to the session
    pub fn session(&self) -> Arc<Mutex<Session>> {
        Arc::clone(&self.session)
    }

    /// Cancel the active generation and wait for its task to wind down,
    /// so a superseded generation can emit nothing once `start` returns.
    async fn supersede(&mut self) {
        if let Some(previous) = self.active.take() {
            previous.cancel.cancel();
            if previous.handle.await.is_err() {
                warn!("superseded generation task panicked");
            }
        }
    }
}

/// Everything one spawned generation needs; dropped (closing the event
/// channel) when the task ends.
struct GenerationTask<P> {
    provider: Arc<P>,
    session: Arc<Mutex<Session>>,
    gate: Arc<dyn UsageGate>,
    timeout: Duration,
    context: Vec<Message>,
    placeholder_id: MessageId,
    cancel: CancellationToken,
    events: mpsc::UnboundedSender<ChatEvent>,
}

impl<P: GenerationProvider> GenerationTask<P> {
    async fn run(self, mut generation: Generation) {
        generation.started_at = Instant::now();
        let opened = tokio::select! {
            _ = self.cancel.cancelled() => {
                generation.state = GenerationState::Cancelled;
                debug!("generation cancelled before stream opened");
                return;
            }
            opened = self.provider.open_stream(&self.context) => opened,
        };
        let mut stream = match opened {
            Ok(stream) => stream,
            Err(raw) => return self.fail(&mut generation, &raw),
        };

        generation.state = GenerationState::Streaming;
        debug!(query = %generation.query, "streaming started");

        loop {
            let item = tokio::select! {
                _ = self.cancel.cancelled() => {
                    generation.state = GenerationState::Cancelled;
                    debug!("generation cancelled mid-stream");
                    return;
                }
                item = stream.next() => item,
            };
            match item {
                Some(Ok(chunk)) => {
                    // Timeout is only observed at chunk boundaries, so
                    // detection latency is bounded by chunk cadence.
                    if generation.elapsed() > self.timeout {
                        let raw = TransportError::Timeout {
                            elapsed_secs: generation.elapsed().as_secs(),
                        };
                        return self.fail(&mut generation, &raw);
                    }
                    generation.push_chunk(&chunk);
                    self.session.lock().append_content(&self.placeholder_id, &chunk);
                    let _ = self.events.send(ChatEvent::Chunk(chunk));
                }
                Some(Err(raw)) => return self.fail(&mut generation, &raw),
                None => break,
            }
        }

        self.finalize(generation);
    }

    /// Classify and report a failure, unless cancellation already won.
    fn fail(&self, generation: &mut Generation, raw: &TransportError) {
        if self.cancel.is_cancelled() {
            generation.state = GenerationState::Cancelled;
            return;
        }
        let classified = ChatError::classify(raw);
        warn!(%raw, %classified, "generation failed");
        generation.state = GenerationState::Failed(classified.clone());
        let _ = self.events.send(ChatEvent::Failed(classified));
    }

    fn finalize(&self, mut generation: Generation) {
        if self.cancel.is_cancelled() {
            generation.state = GenerationState::Cancelled;
            return;
        }
        if generation.buffer.trim().is_empty() {
            warn!("stream ended with an empty response");
            generation.state = GenerationState::Failed(ChatError::InvalidResponse);
            let _ = self.events.send(ChatEvent::Failed(ChatError::InvalidResponse));
            return;
        }

        let citations = extract_citations(&generation.buffer);
        let finalized = {
            let mut session = self.session.lock();
            session.set_citations(&self.placeholder_id, citations);
            session.message(&self.placeholder_id).cloned()
        };
        let Some(message) = finalized else {
            // The store was cleared while we were finishing; treat it
            // like cancellation and report nothing.
            generation.state = GenerationState::Cancelled;
            return;
        };

        self.gate.record_usage();
        generation.state = GenerationState::Completed;
        debug!(
            chars = generation.buffer.len(),
            citations = message.citations.len(),
            "generation completed"
        );
        let _ = self.events.send(ChatEvent::Complete(message));
    }
}

use std::time::{Duration, Instant};

use recommender_core::{
    update, AppState, Document, ErrorKind, Msg, PipelineView, ServiceError, StageState,
};
use recommender_engine::EngineHandle;
use recommender_logging::rec_debug;

use super::effects::EffectRunner;

type Observer = Box<dyn FnMut(&PipelineView)>;

/// Owns the pipeline state and drives it with user actions and engine completions.
///
/// Observers receive a fresh [`PipelineView`] after every transition that
/// changed something.
pub struct Orchestrator {
    state: AppState,
    runner: EffectRunner,
    observers: Vec<Observer>,
}

impl Orchestrator {
    pub fn new(state: AppState, engine: EngineHandle) -> Self {
        Self {
            state,
            runner: EffectRunner::new(engine),
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&PipelineView) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn snapshot(&self) -> PipelineView {
        self.state.view()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Starts analysis of `document`.
    ///
    /// A document rejected by the local policy never reaches the network and
    /// comes back as the returned error; the analyze stage shows it too.
    pub fn submit_document(&mut self, document: Document) -> Result<(), ServiceError> {
        self.dispatch(Msg::DocumentSubmitted(document));
        match self.state.analyze() {
            StageState::Failed(err) if err.kind() == ErrorKind::Validation => Err(err.clone()),
            _ => Ok(()),
        }
    }

    /// Returns whether a keyword request was started.
    pub fn request_recommendations(&mut self) -> bool {
        if !self.state.can_request_recommendations() {
            rec_debug!("Recommendations are not available right now");
            return false;
        }
        self.dispatch(Msg::RecommendationsRequested);
        true
    }

    /// Waits up to `timeout` for one engine completion and applies it.
    pub fn pump(&mut self, timeout: Duration) -> bool {
        match self.runner.next_msg(timeout) {
            Some(msg) => {
                self.dispatch(msg);
                true
            }
            None => false,
        }
    }

    /// Applies completions until no stage is in flight.
    ///
    /// Returns `false` if `timeout` passed first.
    pub fn run_until_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.state.is_any_in_flight() {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            self.pump(deadline - now);
        }
        // Stale completions may still be queued; drain them without waiting.
        while let Some(msg) = self.runner.try_next_msg() {
            self.dispatch(msg);
        }
        true
    }

    fn dispatch(&mut self, msg: Msg) {
        let mut pending = vec![msg];
        while let Some(msg) = pending.pop() {
            let state = std::mem::take(&mut self.state);
            let (mut state, effects) = update(state, msg);
            let view = state.view();
            let was_dirty = state.consume_dirty();
            self.state = state;

            if was_dirty {
                for observer in &mut self.observers {
                    observer(&view);
                }
            }

            pending.extend(self.runner.execute(effects));
        }
    }
}

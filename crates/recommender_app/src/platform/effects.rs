use std::time::Duration;

use recommender_core::{Effect, Msg, ServiceError, Stage};
use recommender_engine::{EngineEvent, EngineHandle};
use recommender_logging::{rec_debug, rec_error};

/// Hands effects to the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    /// Starts every effect.
    ///
    /// Returns failure messages for effects the engine refused, so the
    /// affected stage still settles.
    pub fn execute(&self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut failures = Vec::new();
        for effect in effects {
            let stage = effect.stage();
            let seq = effect.seq();
            rec_debug!("Starting {} request {}", stage, seq);

            let sent = match effect {
                Effect::AnalyzeDocument { seq, document } => self.engine.analyze(seq, document),
                Effect::ExtractKeywords { seq, summary } => {
                    self.engine.extract_keywords(seq, summary)
                }
                Effect::FetchJobs { seq, keywords } => self.engine.fetch_jobs(seq, keywords),
            };

            if let Err(err) = sent {
                rec_error!("Could not start {} request {}: {}", stage, seq, err);
                let error = ServiceError::unreachable(err.to_string());
                failures.push(match stage {
                    Stage::Analyze => Msg::AnalysisCompleted {
                        seq,
                        result: Err(error),
                    },
                    Stage::ExtractKeywords => Msg::KeywordsCompleted {
                        seq,
                        result: Err(error),
                    },
                    Stage::FetchJobs => Msg::JobsCompleted {
                        seq,
                        result: Err(error),
                    },
                });
            }
        }
        failures
    }

    pub fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(event_to_msg)
    }

    pub fn try_next_msg(&self) -> Option<Msg> {
        self.engine.try_recv().map(event_to_msg)
    }
}

fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::AnalysisCompleted { seq, result } => Msg::AnalysisCompleted { seq, result },
        EngineEvent::KeywordsCompleted { seq, result } => Msg::KeywordsCompleted { seq, result },
        EngineEvent::JobsCompleted { seq, result } => Msg::JobsCompleted { seq, result },
    }
}

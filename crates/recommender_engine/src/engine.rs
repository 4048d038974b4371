use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use recommender_core::{Document, KeywordSet, RequestSeq};
use recommender_logging::rec_debug;

use crate::gateway::{Gateway, ReqwestGateway};
use crate::{EngineError, EngineEvent, GatewaySettings};

enum EngineCommand {
    Analyze { seq: RequestSeq, document: Document },
    ExtractKeywords { seq: RequestSeq, summary: String },
    FetchJobs { seq: RequestSeq, keywords: KeywordSet },
}

/// Runs gateway calls on a background tokio runtime.
///
/// Commands return immediately; completions arrive in issue-independent order
/// through [`EngineHandle::try_recv`] or [`EngineHandle::recv_timeout`]. Nothing
/// is ever cancelled, so callers must drop stale completions themselves.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: GatewaySettings) -> Result<Self, EngineError> {
        let gateway = ReqwestGateway::new(settings)?;
        Self::with_gateway(Arc::new(gateway))
    }

    pub fn with_gateway(gateway: Arc<dyn Gateway>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("recommender-io")
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("recommender-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let gateway = gateway.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(gateway.as_ref(), command, event_tx).await;
                    });
                }
                rec_debug!("Engine command channel closed");
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn analyze(&self, seq: RequestSeq, document: Document) -> Result<(), EngineError> {
        self.send(EngineCommand::Analyze { seq, document })
    }

    pub fn extract_keywords(&self, seq: RequestSeq, summary: String) -> Result<(), EngineError> {
        self.send(EngineCommand::ExtractKeywords { seq, summary })
    }

    pub fn fetch_jobs(&self, seq: RequestSeq, keywords: KeywordSet) -> Result<(), EngineError> {
        self.send(EngineCommand::FetchJobs { seq, keywords })
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) -> Result<(), EngineError> {
        self.cmd_tx.send(command).map_err(|_| EngineError::Stopped)
    }
}

async fn handle_command(
    gateway: &dyn Gateway,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::Analyze { seq, document } => EngineEvent::AnalysisCompleted {
            seq,
            result: gateway.analyze_document(&document).await,
        },
        EngineCommand::ExtractKeywords { seq, summary } => EngineEvent::KeywordsCompleted {
            seq,
            result: gateway.extract_keywords(&summary).await,
        },
        EngineCommand::FetchJobs { seq, keywords } => EngineEvent::JobsCompleted {
            seq,
            result: gateway.fetch_jobs(&keywords).await,
        },
    };
    // The receiver is gone only when the app is shutting down.
    let _ = event_tx.send(event);
}

//! Recommender core: pure pipeline state machine, domain model and result aggregation.
mod aggregate;
mod document;
mod effect;
mod error;
mod model;
mod msg;
mod stage;
mod state;
mod update;
mod view_model;

pub use aggregate::{aggregate, AggregateOptions, JobGroup, JobListing, Layout};
pub use document::{Document, DocumentPolicy, DEFAULT_MAX_DOCUMENT_BYTES};
pub use effect::Effect;
pub use error::{ErrorKind, ServiceError};
pub use model::{Analysis, JobCollection, JobPosting, KeywordSet, SourceGroup};
pub use msg::Msg;
pub use stage::{RequestSeq, Stage, StageState};
pub use state::AppState;
pub use update::update;
pub use view_model::{PipelineView, StageView};

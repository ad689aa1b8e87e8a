//! Document processing pipeline: requirement matching, the job registry,
//! and the orchestrator that sequences scan → extract → match → price.

mod document;
mod error;
mod jobs;
mod matcher;
mod orchestrator;

pub use document::{
    DEMO_PREFIX, DocumentReader, DocumentText, MIN_TEXT_CHARS, PlainTextReader, demo_requirements,
    is_demo_document,
};
pub use error::PipelineError;
pub use jobs::{InMemoryJobStore, JobStore};
pub use matcher::{ACCEPT_THRESHOLD, Matcher, TOP_K};
pub use orchestrator::{
    Orchestrator, PROGRESS_DONE, PROGRESS_INTAKE, PROGRESS_MATCHED, ResultFetch,
};

pub mod catalog;
pub mod job;
pub mod pricing;
pub mod quote;
pub mod requirement;
pub mod scan;
pub mod scoring;
pub mod specmatch;

pub use catalog::{CandidateMatch, CatalogEntry, Category, Recommendation, seed_entries};
pub use job::{Job, JobStatus};
pub use pricing::{CommercialSummary, Pricing, RateCard};
pub use quote::{LineItem, QuoteResult};
pub use requirement::Requirement;
pub use scan::{Opportunity, ScanReport, TenderNotice};
pub use scoring::{StrategicAnalysis, WinProbability, score_from_distance};
pub use specmatch::{SpecCheck, SpecStatus, compare_specs};

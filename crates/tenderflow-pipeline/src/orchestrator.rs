//! Job orchestration: queued → processing → {completed | failed}.
//!
//! One tokio task per submitted document. The pipeline inside a job is
//! strictly sequential; jobs are independent of each other, and a slow
//! model or catalog call stalls only its own job.

use std::sync::Arc;

use tracing::{info, warn};

use tenderflow_ai::RequirementSource;
use tenderflow_core::{
    JobStatus, LineItem, QuoteResult, RateCard, StrategicAnalysis, pricing::price_quote,
};
use tenderflow_store::ProductIndex;

use crate::document::{DocumentReader, demo_document_text, demo_requirements, is_demo_document};
use crate::jobs::JobStore;
use crate::matcher::Matcher;
use crate::{MIN_TEXT_CHARS, PipelineError};

/// Progress checkpoints. Coarse milestones, not fine-grained progress.
pub const PROGRESS_INTAKE: u8 = 10;
pub const PROGRESS_MATCHED: u8 = 50;
pub const PROGRESS_DONE: u8 = 100;

const EMPTY_DOCUMENT_SUMMARY: &str =
    "Error: document appears empty or is a scanned image. OCR is required but not supported.";

/// Result-fetch outcome. Always well-formed: polling a job can never panic
/// or surface a malformed payload.
#[derive(Debug)]
pub enum ResultFetch {
    Ready(QuoteResult),
    Pending { status: JobStatus, progress: u8 },
    Failed(String),
    NotFound,
}

/// Everything the technical stage produces before pricing.
struct TechnicalOutput {
    summary: String,
    raw_text_snippet: String,
    analysis: StrategicAnalysis,
    line_items: Vec<LineItem>,
}

#[derive(Clone)]
pub struct Orchestrator {
    reader: Arc<dyn DocumentReader>,
    source: Arc<RequirementSource>,
    matcher: Matcher,
    jobs: Arc<dyn JobStore>,
    rates: RateCard,
}

impl Orchestrator {
    pub fn new(
        reader: Arc<dyn DocumentReader>,
        source: Arc<RequirementSource>,
        index: Arc<dyn ProductIndex>,
        jobs: Arc<dyn JobStore>,
    ) -> Self {
        Self {
            reader,
            source,
            matcher: Matcher::new(index),
            jobs,
            rates: RateCard::default(),
        }
    }

    /// Register a job and spawn its processing task. Returns the job id;
    /// the job is `Queued` at progress 0 until the task picks it up.
    pub fn submit(&self, filename: Option<String>, bytes: Vec<u8>) -> String {
        let job = self.jobs.create(filename);
        let id = job.id.clone();
        info!(job_id = %id, bytes = bytes.len(), "job submitted");

        let orchestrator = self.clone();
        let job_id = id.clone();
        tokio::spawn(async move {
            orchestrator.run_job(job_id, bytes).await;
        });

        id
    }

    /// Current `(status, progress)` for polling, if the job exists.
    pub fn status(&self, id: &str) -> Option<(JobStatus, u8)> {
        self.jobs.get(id).map(|job| (job.status, job.progress))
    }

    /// Fetch a job's final output, or where it currently stands.
    pub fn result(&self, id: &str) -> ResultFetch {
        let Some(job) = self.jobs.get(id) else {
            return ResultFetch::NotFound;
        };
        match (job.status, job.result) {
            (JobStatus::Failed, _) => {
                ResultFetch::Failed(job.message.unwrap_or_else(|| "job failed".to_string()))
            }
            (JobStatus::Completed, Some(result)) => ResultFetch::Ready(result),
            (JobStatus::Completed, None) => {
                ResultFetch::Failed("completed job is missing its result".to_string())
            }
            (status, _) => ResultFetch::Pending {
                status,
                progress: job.progress,
            },
        }
    }

    /// Run the pipeline synchronously, outside the job registry (CLI path).
    pub async fn process_document(&self, bytes: &[u8]) -> Result<QuoteResult, PipelineError> {
        let technical = self.analyze(bytes).await?;
        Ok(self.price(technical))
    }

    async fn run_job(&self, job_id: String, bytes: Vec<u8>) {
        let _ = self.jobs.update(
            &job_id,
            Box::new(|job| {
                job.status = JobStatus::Processing;
                job.progress = PROGRESS_INTAKE;
            }),
        );

        let outcome: Result<QuoteResult, PipelineError> = async {
            let technical = self.analyze(&bytes).await?;
            self.jobs
                .update(&job_id, Box::new(|job| job.progress = PROGRESS_MATCHED))?;
            Ok(self.price(technical))
        }
        .await;

        match outcome {
            Ok(result) => {
                info!(job_id = %job_id, items = result.line_items.len(), "job completed");
                let _ = self.jobs.update(
                    &job_id,
                    Box::new(move |job| {
                        job.status = JobStatus::Completed;
                        job.progress = PROGRESS_DONE;
                        job.result = Some(result);
                    }),
                );
            }
            Err(e) => {
                warn!(job_id = %job_id, error = %e, "job failed");
                let message = e.to_string();
                let _ = self.jobs.update(
                    &job_id,
                    Box::new(move |job| {
                        job.status = JobStatus::Failed;
                        job.message = Some(message);
                    }),
                );
            }
        }
    }

    /// Intake, extraction, matching, and strategic scoring.
    async fn analyze(&self, bytes: &[u8]) -> Result<TechnicalOutput, PipelineError> {
        let demo = is_demo_document(bytes);
        let document = if demo {
            demo_document_text(bytes)
        } else {
            self.reader.read(bytes)?
        };

        // Empty or scanned documents complete with an explanatory summary
        // and a zero-value quote instead of failing the job.
        if document.text.trim().chars().count() < MIN_TEXT_CHARS {
            warn!("document text below extraction floor; producing empty quote");
            return Ok(TechnicalOutput {
                summary: EMPTY_DOCUMENT_SUMMARY.to_string(),
                raw_text_snippet: "EMPTY_TEXT".to_string(),
                analysis: StrategicAnalysis::assess(&[]),
                line_items: Vec::new(),
            });
        }

        let requirements = if demo {
            demo_requirements()
        } else {
            self.source.extract(&document.text).await
        };

        let mut line_items = Vec::with_capacity(requirements.len());
        for requirement in &requirements {
            line_items.push(self.matcher.match_requirement(requirement).await);
        }

        let scores: Vec<u8> = line_items
            .iter()
            .map(|item| item.recommendation.match_score)
            .collect();

        let snippet: String = document.text.chars().take(200).collect();
        Ok(TechnicalOutput {
            summary: format!("Analyzed {} line items from RFP.", line_items.len()),
            raw_text_snippet: format!("{snippet}..."),
            analysis: StrategicAnalysis::assess(&scores),
            line_items,
        })
    }

    fn price(&self, technical: TechnicalOutput) -> QuoteResult {
        price_quote(
            technical.summary,
            technical.raw_text_snippet,
            technical.analysis,
            technical.line_items,
            &self.rates,
        )
    }
}

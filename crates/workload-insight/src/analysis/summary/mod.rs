mod client;
mod generator;
mod prompt;
mod stats;

pub use client::{GeneratorSetupError, HttpTextGenerator};
pub use generator::{GenerationFailure, GenerationOutcome, TextGenerator};
pub use prompt::build_prompt;
pub use stats::MemberStats;

use super::domain::TimesheetDataset;
use crate::config::SummaryConfig;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Text used for a member whose summary could not be generated.
pub const FALLBACK_SUMMARY: &str = "unable to generate summary, please retry later";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberSummary {
    pub name: String,
    pub content: String,
}

/// Produces one narrative summary per member. Never fails as a whole: each
/// member's failure is replaced by [`FALLBACK_SUMMARY`].
#[derive(Debug, Clone)]
pub struct SummaryPipeline {
    generator: Arc<dyn TextGenerator>,
    call_timeout: Duration,
    max_concurrency: usize,
}

impl SummaryPipeline {
    pub fn new(generator: Arc<dyn TextGenerator>, settings: &SummaryConfig) -> Self {
        Self::with_limits(
            generator,
            settings.request_timeout,
            settings.max_concurrency,
        )
    }

    pub fn with_limits(
        generator: Arc<dyn TextGenerator>,
        call_timeout: Duration,
        max_concurrency: usize,
    ) -> Self {
        Self {
            generator,
            call_timeout,
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub async fn summarize(&self, dataset: &TimesheetDataset) -> Vec<MemberSummary> {
        let members = MemberStats::partition(dataset);
        debug!(members = members.len(), "generating member summaries");

        stream::iter(members)
            .map(|stats| async move {
                let prompt = build_prompt(&stats);
                let outcome =
                    match tokio::time::timeout(self.call_timeout, self.generator.generate(&prompt))
                        .await
                    {
                        Ok(outcome) => outcome,
                        Err(_) => {
                            GenerationOutcome::Failed(GenerationFailure::TimedOut(self.call_timeout))
                        }
                    };

                let content = match outcome.into_text() {
                    Ok(text) => text,
                    Err(failure) => {
                        warn!(member = %stats.name, error = %failure, "summary generation failed");
                        FALLBACK_SUMMARY.to_string()
                    }
                };

                MemberSummary {
                    name: stats.name,
                    content,
                }
            })
            .buffered(self.max_concurrency)
            .collect()
            .await
    }
}

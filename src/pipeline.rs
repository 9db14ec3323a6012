use serde::Serialize;

use crate::extract::{self, NormalizedText};
use crate::models::{EnrichedPosting, JobDetails, Merged, RawPosting};

/// What to write for a field the extractor did not find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhenAbsent {
    Omit,
    Sentinel,
}

/// Per-field merge rules for absent values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergePolicy {
    pub summary: WhenAbsent,
    pub essential_functions: WhenAbsent,
    pub education: WhenAbsent,
    pub experience: WhenAbsent,
}

impl Default for MergePolicy {
    /// Education and experience get the sentinel; summary and the function
    /// list stay empty.
    fn default() -> Self {
        Self {
            summary: WhenAbsent::Omit,
            essential_functions: WhenAbsent::Omit,
            education: WhenAbsent::Sentinel,
            experience: WhenAbsent::Sentinel,
        }
    }
}

impl MergePolicy {
    /// Sentinel for every field.
    pub fn uniform() -> Self {
        Self {
            summary: WhenAbsent::Sentinel,
            essential_functions: WhenAbsent::Sentinel,
            education: WhenAbsent::Sentinel,
            experience: WhenAbsent::Sentinel,
        }
    }

    fn merge(&self, posting: RawPosting, details: JobDetails) -> EnrichedPosting {
        EnrichedPosting {
            posting,
            summary: merge_field(details.summary, self.summary),
            essential_functions: merge_field(details.essential_functions, self.essential_functions),
            education: merge_field(details.education, self.education),
            experience: merge_field(details.experience, self.experience),
        }
    }
}

fn merge_field<T>(value: Option<T>, when_absent: WhenAbsent) -> Merged<T> {
    match (value, when_absent) {
        (Some(v), _) => Merged::Value(v),
        (None, WhenAbsent::Sentinel) => Merged::NotSpecified,
        (None, WhenAbsent::Omit) => Merged::Omitted,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingDescription,
    NoSummary,
}

/// Result of running one posting through the pipeline.
#[derive(Debug, Clone)]
pub enum PostingOutcome {
    Success(EnrichedPosting),
    /// Kept, but the description had to be used without markup stripping.
    Degraded(EnrichedPosting),
    Skipped(SkipReason),
}

impl PostingOutcome {
    pub fn posting(&self) -> Option<&EnrichedPosting> {
        match self {
            PostingOutcome::Success(p) | PostingOutcome::Degraded(p) => Some(p),
            PostingOutcome::Skipped(_) => None,
        }
    }
}

/// Outcomes in input order.
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    pub outcomes: Vec<PostingOutcome>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub success: usize,
    pub degraded: usize,
    pub missing_description: usize,
    pub no_summary: usize,
}

impl PipelineReport {
    pub fn kept(&self) -> impl Iterator<Item = &EnrichedPosting> {
        self.outcomes.iter().filter_map(PostingOutcome::posting)
    }

    pub fn into_kept(self) -> Vec<EnrichedPosting> {
        self.outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                PostingOutcome::Success(p) | PostingOutcome::Degraded(p) => Some(p),
                PostingOutcome::Skipped(_) => None,
            })
            .collect()
    }

    pub fn counts(&self) -> OutcomeCounts {
        let mut counts = OutcomeCounts::default();
        for outcome in &self.outcomes {
            match outcome {
                PostingOutcome::Success(_) => counts.success += 1,
                PostingOutcome::Degraded(_) => counts.degraded += 1,
                PostingOutcome::Skipped(SkipReason::MissingDescription) => {
                    counts.missing_description += 1
                }
                PostingOutcome::Skipped(SkipReason::NoSummary) => counts.no_summary += 1,
            }
        }
        counts
    }
}

/// Runs each collected posting through normalize, extract and the gate.
#[derive(Debug, Clone, Default)]
pub struct PostingPipeline {
    policy: MergePolicy,
}

impl PostingPipeline {
    pub fn new(policy: MergePolicy) -> Self {
        Self { policy }
    }

    pub fn process(&self, postings: Vec<RawPosting>) -> PipelineReport {
        let total = postings.len();
        let outcomes = postings
            .into_iter()
            .enumerate()
            .map(|(index, posting)| {
                tracing::debug!(
                    "Processing job {}/{total}: {} at {}",
                    index + 1,
                    posting.display_title(),
                    posting.display_company()
                );
                self.process_one(posting)
            })
            .collect();
        PipelineReport { outcomes }
    }

    pub fn process_one(&self, posting: RawPosting) -> PostingOutcome {
        let Some(body) = posting.body() else {
            return PostingOutcome::Skipped(SkipReason::MissingDescription);
        };

        let NormalizedText { text, degraded } = extract::normalize(body);
        let details = extract::extract(&text);

        if !extract::accept(&details) {
            tracing::debug!(
                nothing_extracted = details.is_empty(),
                "No summary found for '{}'",
                posting.display_title()
            );
            return PostingOutcome::Skipped(SkipReason::NoSummary);
        }

        let enriched = self.policy.merge(posting, details);
        if degraded {
            tracing::warn!(
                "Kept '{}' from unparsed description",
                enriched.posting.display_title()
            );
            PostingOutcome::Degraded(enriched)
        } else {
            PostingOutcome::Success(enriched)
        }
    }
}

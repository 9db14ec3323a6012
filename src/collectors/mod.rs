// Job sources and the paging loop that drains them.

pub mod batch;
pub mod jobspy;
#[cfg(test)]
pub mod testing;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::SourceError;
use crate::models::RawPosting;

pub use batch::{BatchCollector, CollectorSettings, StopReason};
pub use jobspy::JobSpyHttp;

/// Where and what to search, fixed for the lifetime of a collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchSettings {
    pub sites: Vec<String>,
    pub location: String,
    pub country: String,
    pub hours_old: u32,
    /// Ask the source for full descriptions where it has to fetch them separately.
    pub fetch_full_description: bool,
}

/// One search run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub search_term: String,
    pub google_search_term: Option<String>,
}

impl SearchQuery {
    pub fn new(search_term: impl Into<String>) -> Self {
        Self {
            search_term: search_term.into(),
            google_search_term: None,
        }
    }
}

/// A single page request as sent to a job source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub site_name: Vec<String>,
    pub search_term: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_search_term: Option<String>,
    pub location: String,
    pub results_wanted: u32,
    pub hours_old: u32,
    pub offset: u32,
    pub country_indeed: String,
    pub linkedin_fetch_description: bool,
}

/// Trait that all job sources implement.
/// Each call returns one page of postings; an empty page means the source
/// has nothing more for this search.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Human-readable name for logs.
    fn name(&self) -> &str;

    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<RawPosting>, SourceError>;
}

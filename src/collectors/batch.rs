use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::collectors::{JobSource, PageRequest, SearchQuery, SearchSettings};
use crate::models::RawPosting;

/// Paging behaviour of a collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorSettings {
    /// Postings requested per call, whatever the remaining target.
    pub page_size: u32,
    /// Wait between consecutive page requests.
    pub pacing: Duration,
    /// Consecutive failed pages tolerated before giving up.
    pub max_page_faults: u32,
    pub max_pages: Option<u32>,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            page_size: 25,
            pacing: Duration::from_secs(2),
            max_page_faults: 3,
            max_pages: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    TargetReached,
    /// The source returned an empty page.
    Exhausted,
    FaultLimit,
    PageLimit,
}

#[derive(Debug, Clone)]
pub struct CollectionReport {
    pub postings: Vec<RawPosting>,
    pub pages_requested: u32,
    pub page_faults: u32,
    pub stop: StopReason,
}

/// Loop state. `count` always mirrors `postings.len()`.
#[derive(Debug, Default)]
struct CollectionState {
    offset: u32,
    postings: Vec<RawPosting>,
    count: usize,
}

impl CollectionState {
    fn absorb(&mut self, page: Vec<RawPosting>) {
        self.postings.extend(page);
        self.count = self.postings.len();
    }
}

/// Pages through a job source until the target is met or the source runs dry.
///
/// A huge target (the usual "fetch everything" setting) is never reached in
/// practice; the empty-page rule is what ends those runs.
pub struct BatchCollector {
    source: Arc<dyn JobSource>,
    search: SearchSettings,
    settings: CollectorSettings,
}

impl BatchCollector {
    pub fn new(
        source: Arc<dyn JobSource>,
        search: SearchSettings,
        settings: CollectorSettings,
    ) -> Self {
        Self {
            source,
            search,
            settings,
        }
    }

    fn page_request(&self, query: &SearchQuery, offset: u32) -> PageRequest {
        PageRequest {
            site_name: self.search.sites.clone(),
            search_term: query.search_term.clone(),
            google_search_term: query.google_search_term.clone(),
            location: self.search.location.clone(),
            results_wanted: self.settings.page_size,
            hours_old: self.search.hours_old,
            offset,
            country_indeed: self.search.country.clone(),
            linkedin_fetch_description: self.search.fetch_full_description,
        }
    }

    pub async fn collect(&self, query: &SearchQuery, target: usize) -> CollectionReport {
        let mut state = CollectionState::default();
        let mut pages_requested = 0u32;
        let mut page_faults = 0u32;
        let mut consecutive_faults = 0u32;

        let stop = loop {
            if state.count >= target {
                break StopReason::TargetReached;
            }
            if self
                .settings
                .max_pages
                .is_some_and(|max| pages_requested >= max)
            {
                break StopReason::PageLimit;
            }

            tracing::info!("Fetching batch starting at offset {}...", state.offset);
            let request = self.page_request(query, state.offset);
            pages_requested += 1;

            match self.source.fetch_page(&request).await {
                Ok(page) if page.is_empty() => {
                    tracing::info!("No more results found");
                    break StopReason::Exhausted;
                }
                Ok(page) => {
                    consecutive_faults = 0;
                    state.absorb(page);
                    tracing::info!("Total jobs collected: {}", state.count);
                }
                Err(e) => {
                    page_faults += 1;
                    consecutive_faults += 1;
                    tracing::warn!(
                        "Error scraping batch at offset {} from {}: {e}",
                        state.offset,
                        self.source.name()
                    );
                    if consecutive_faults >= self.settings.max_page_faults {
                        break StopReason::FaultLimit;
                    }
                }
            }

            state.offset = state.offset.saturating_add(self.settings.page_size);
            if state.count < target {
                tokio::time::sleep(self.settings.pacing).await;
            }
        };

        CollectionReport {
            postings: state.postings,
            pages_requested,
            page_faults,
            stop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::testing::{ScriptedSource, page_of};
    use crate::error::SourceError;

    fn search() -> SearchSettings {
        SearchSettings {
            sites: vec!["indeed".into(), "linkedin".into()],
            location: "United States".into(),
            country: "USA".into(),
            hours_old: 720,
            fetch_full_description: true,
        }
    }

    fn collector(source: Arc<ScriptedSource>, settings: CollectorSettings) -> BatchCollector {
        BatchCollector::new(source, search(), settings)
    }

    #[tokio::test(start_paused = true)]
    async fn full_pages_stop_after_ceil_target_over_page_size() {
        let source = Arc::new(ScriptedSource::endless(25));
        let report = collector(source.clone(), CollectorSettings::default())
            .collect(&SearchQuery::new("Specialist"), 60)
            .await;

        assert_eq!(report.stop, StopReason::TargetReached);
        assert_eq!(report.pages_requested, 3);
        // the source over-delivers; nothing is trimmed
        assert_eq!(report.postings.len(), 75);
        assert_eq!(source.offsets(), vec![0, 25, 50]);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_page_ends_collection_early() {
        let source = Arc::new(ScriptedSource::new(vec![
            Ok(page_of(0, 25)),
            Ok(page_of(25, 25)),
            Ok(Vec::new()),
        ]));
        let report = collector(source.clone(), CollectorSettings::default())
            .collect(&SearchQuery::new("Specialist"), 100_000)
            .await;

        assert_eq!(report.stop, StopReason::Exhausted);
        assert_eq!(report.pages_requested, 3);
        assert_eq!(report.postings.len(), 50);
    }

    #[tokio::test(start_paused = true)]
    async fn short_pages_still_advance_by_page_size() {
        let source = Arc::new(ScriptedSource::new(vec![
            Ok(page_of(0, 3)),
            Ok(page_of(3, 7)),
            Ok(Vec::new()),
        ]));
        let report = collector(source.clone(), CollectorSettings::default())
            .collect(&SearchQuery::new("nurse"), 500)
            .await;

        assert_eq!(source.offsets(), vec![0, 25, 50]);
        assert_eq!(report.postings.len(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_page_counts_as_empty_and_moves_on_with_pacing() {
        let source = Arc::new(ScriptedSource::new(vec![
            Ok(page_of(0, 25)),
            Err(SourceError::RateLimited),
            Ok(page_of(50, 25)),
            Ok(Vec::new()),
        ]));
        let started = tokio::time::Instant::now();
        let report = collector(source.clone(), CollectorSettings::default())
            .collect(&SearchQuery::new("Specialist"), 1_000)
            .await;

        assert_eq!(report.stop, StopReason::Exhausted);
        assert_eq!(report.page_faults, 1);
        assert_eq!(report.postings.len(), 50);
        assert_eq!(source.offsets(), vec![0, 25, 50, 75]);
        // three pauses: after page 0, after the failure, after page 2
        assert_eq!(started.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn source_failing_every_call_terminates() {
        let source = Arc::new(ScriptedSource::failing());
        let report = collector(source.clone(), CollectorSettings::default())
            .collect(&SearchQuery::new("Specialist"), 100_000)
            .await;

        assert_eq!(report.stop, StopReason::FaultLimit);
        assert_eq!(report.pages_requested, 3);
        assert_eq!(report.page_faults, 3);
        assert!(report.postings.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn earlier_pages_survive_a_fault_limit() {
        let source = Arc::new(ScriptedSource::new(vec![
            Ok(page_of(0, 25)),
            Err(SourceError::Decode("truncated body".into())),
        ]));
        let settings = CollectorSettings {
            max_page_faults: 1,
            ..Default::default()
        };
        let report = collector(source, settings)
            .collect(&SearchQuery::new("Specialist"), 1_000)
            .await;

        assert_eq!(report.stop, StopReason::FaultLimit);
        assert_eq!(report.postings.len(), 25);
    }

    #[tokio::test(start_paused = true)]
    async fn page_cap_applies_when_configured() {
        let source = Arc::new(ScriptedSource::endless(10));
        let settings = CollectorSettings {
            max_pages: Some(2),
            ..Default::default()
        };
        let report = collector(source, settings)
            .collect(&SearchQuery::new("Specialist"), 100_000)
            .await;

        assert_eq!(report.stop, StopReason::PageLimit);
        assert_eq!(report.pages_requested, 2);
        assert_eq!(report.postings.len(), 20);
    }

    #[tokio::test(start_paused = true)]
    async fn offset_saturates_instead_of_overflowing() {
        let source = Arc::new(ScriptedSource::new(vec![
            Ok(page_of(0, 1)),
            Ok(page_of(1, 1)),
            Ok(Vec::new()),
        ]));
        let settings = CollectorSettings {
            page_size: u32::MAX,
            ..Default::default()
        };
        let report = collector(source.clone(), settings)
            .collect(&SearchQuery::new("Specialist"), 100)
            .await;

        assert_eq!(report.stop, StopReason::Exhausted);
        assert_eq!(report.postings.len(), 2);
        assert_eq!(source.offsets(), vec![0, u32::MAX, u32::MAX]);
    }

    #[tokio::test(start_paused = true)]
    async fn request_carries_search_settings() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(Vec::new())]));
        let query = SearchQuery {
            search_term: "Specialist".into(),
            google_search_term: Some("Specialist jobs near Nashville, TN".into()),
        };
        collector(source.clone(), CollectorSettings::default())
            .collect(&query, 10)
            .await;

        let requests = source.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.results_wanted, 25);
        assert_eq!(request.hours_old, 720);
        assert_eq!(request.country_indeed, "USA");
        assert_eq!(request.site_name, vec!["indeed", "linkedin"]);
        assert!(request.linkedin_fetch_description);
        assert_eq!(
            request.google_search_term.as_deref(),
            Some("Specialist jobs near Nashville, TN")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn zero_target_makes_no_requests() {
        let source = Arc::new(ScriptedSource::endless(25));
        let report = collector(source.clone(), CollectorSettings::default())
            .collect(&SearchQuery::new("Specialist"), 0)
            .await;

        assert_eq!(report.stop, StopReason::TargetReached);
        assert!(source.requests().is_empty());
    }
}

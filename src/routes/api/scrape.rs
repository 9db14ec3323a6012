use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use crate::collectors::{SearchQuery, SearchSettings};
use crate::error::AppError;
use crate::harvest::Harvester;
use crate::models::EnrichedPosting;

/// Body of a scrape request. Anything left out falls back to the server's
/// configured search settings.
#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    #[serde(default)]
    pub site_name: Option<Vec<String>>,
    pub search_term: String,
    #[serde(default)]
    pub google_search_term: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub results_wanted: usize,
    #[serde(default)]
    pub hours_old: Option<u32>,
    #[serde(default)]
    pub country_indeed: Option<String>,
}

impl ScrapeRequest {
    fn search_settings(&self, defaults: &SearchSettings) -> SearchSettings {
        SearchSettings {
            sites: self
                .site_name
                .clone()
                .unwrap_or_else(|| defaults.sites.clone()),
            location: self
                .location
                .clone()
                .unwrap_or_else(|| defaults.location.clone()),
            country: self
                .country_indeed
                .clone()
                .unwrap_or_else(|| defaults.country.clone()),
            hours_old: self.hours_old.unwrap_or(defaults.hours_old),
            fetch_full_description: defaults.fetch_full_description,
        }
    }
}

/// POST /api/v1/scrape-jobs
///
/// Runs a full collection and extraction for the requested search and
/// returns the kept postings. An empty result is a 404.
pub async fn scrape_jobs(
    State(harvester): State<Harvester>,
    Json(input): Json<ScrapeRequest>,
) -> Result<Json<Vec<EnrichedPosting>>, AppError> {
    if input.search_term.trim().is_empty() {
        return Err(AppError::BadRequest("search_term is required".to_string()));
    }
    if input.site_name.as_ref().is_some_and(Vec::is_empty) {
        return Err(AppError::BadRequest("site_name must not be empty".to_string()));
    }

    let harvester = Harvester {
        search: input.search_settings(&harvester.search),
        ..harvester
    };
    let query = SearchQuery {
        search_term: input.search_term,
        google_search_term: input.google_search_term,
    };

    let report = harvester.run(&query, input.results_wanted).await?;
    Ok(Json(report.postings))
}

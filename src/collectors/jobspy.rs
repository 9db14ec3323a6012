use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::collectors::{JobSource, PageRequest};
use crate::error::SourceError;
use crate::models::RawPosting;

const USER_AGENT: &str = concat!("jobharvest/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Client for a JobSpy-compatible search service.
///
/// Each page request is POSTed as JSON; the service answers with either a
/// bare array of postings or an object holding them under `jobs`.
pub struct JobSpyHttp {
    client: reqwest::Client,
    endpoint: String,
}

impl JobSpyHttp {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl JobSource for JobSpyHttp {
    fn name(&self) -> &str {
        "jobspy"
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<RawPosting>, SourceError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimited);
        }
        // Some deployments answer "nothing found" with 404.
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !resp.status().is_success() {
            return Err(SourceError::Status(resp.status()));
        }

        let data: Value = resp
            .json()
            .await
            .map_err(|e| SourceError::Decode(format!("Failed to parse response: {e}")))?;

        parse_results(data)
    }
}

/// Turn a response body into postings, skipping entries that are not job objects.
fn parse_results(data: Value) -> Result<Vec<RawPosting>, SourceError> {
    let results = match data {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("jobs") {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => Vec::new(),
            Some(_) => return Err(SourceError::Decode("'jobs' is not an array".to_string())),
        },
        _ => return Err(SourceError::Decode("Unexpected response shape".to_string())),
    };

    let mut postings = Vec::with_capacity(results.len());
    for raw in results {
        match serde_json::from_value::<RawPosting>(raw) {
            Ok(posting) => postings.push(posting),
            Err(e) => tracing::warn!("Skipping malformed posting: {e}"),
        }
    }
    Ok(postings)
}

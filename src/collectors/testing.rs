//! In-memory job source for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::collectors::{JobSource, PageRequest};
use crate::error::SourceError;
use crate::models::RawPosting;

enum Script {
    Pages(Mutex<VecDeque<Result<Vec<RawPosting>, SourceError>>>),
    /// Every call returns a full page of this size.
    Endless(usize),
    Failing,
}

/// Replays canned pages and records every request it receives.
pub struct ScriptedSource {
    script: Script,
    requests: Mutex<Vec<PageRequest>>,
}

impl ScriptedSource {
    /// Returns the given pages in order, then empty pages.
    pub fn new(pages: Vec<Result<Vec<RawPosting>, SourceError>>) -> Self {
        Self::with_script(Script::Pages(Mutex::new(pages.into())))
    }

    pub fn endless(page_len: usize) -> Self {
        Self::with_script(Script::Endless(page_len))
    }

    pub fn failing() -> Self {
        Self::with_script(Script::Failing)
    }

    fn with_script(script: Script) -> Self {
        Self {
            script,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn offsets(&self) -> Vec<u32> {
        self.requests().iter().map(|r| r.offset).collect()
    }
}

#[async_trait]
impl JobSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<RawPosting>, SourceError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.script {
            Script::Pages(pages) => pages.lock().unwrap().pop_front().unwrap_or(Ok(Vec::new())),
            Script::Endless(len) => Ok(page_of(request.offset as usize, *len)),
            Script::Failing => Err(SourceError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE)),
        }
    }
}

/// `len` postings numbered from `start`, each with a short description.
pub fn page_of(start: usize, len: usize) -> Vec<RawPosting> {
    (start..start + len)
        .map(|n| RawPosting {
            id: Some(format!("job-{n}")),
            site: Some("indeed".to_string()),
            title: Some(format!("Specialist {n}")),
            company: Some("Acme".to_string()),
            location: Some("Nashville, TN".to_string()),
            description: Some(format!(
                "<p>Specialist {n} supports our operations team.</p><p>Experience: {} years</p>",
                n % 5
            )),
            ..Default::default()
        })
        .collect()
}

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::collectors::{CollectorSettings, SearchSettings};
use crate::pipeline::MergePolicy;

#[derive(Parser, Debug, Clone)]
#[command(name = "jobharvest", about = "Collect job postings and extract structured details")]
pub struct Config {
    /// Endpoint of the JobSpy-compatible search service
    #[arg(long, env = "JOBSPY_URL", default_value = "http://127.0.0.1:8000/api/v1/search_jobs")]
    pub source_url: String,

    /// Job boards to search
    #[arg(
        long,
        env = "JOB_SITES",
        value_delimiter = ',',
        default_value = "indeed,linkedin,zip_recruiter"
    )]
    pub sites: Vec<String>,

    #[arg(long, env = "JOB_LOCATION", default_value = "United States")]
    pub location: String,

    /// Country passed to boards that need one (Indeed, Glassdoor)
    #[arg(long, env = "JOB_COUNTRY", default_value = "USA")]
    pub country: String,

    /// Only postings newer than this many hours
    #[arg(long, env = "HOURS_OLD", default_value = "720")]
    pub hours_old: u32,

    /// Postings requested per page
    #[arg(long, env = "PAGE_SIZE", default_value = "25", value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub page_size: u32,

    /// Delay between page requests in milliseconds
    #[arg(long, env = "PACING_MS", default_value = "2000")]
    pub pacing_ms: u64,

    /// Consecutive failed pages before collection stops
    #[arg(long, env = "MAX_PAGE_FAULTS", default_value = "3")]
    pub max_page_faults: u32,

    /// Hard cap on page requests per run
    #[arg(long, env = "MAX_PAGES")]
    pub max_pages: Option<u32>,

    /// Write "Not specified" for every missing field, not just education and experience
    #[arg(long, env = "SENTINEL_ALL")]
    pub sentinel_all: bool,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Collect postings for a search term and write them to CSV
    Scrape {
        #[arg(long)]
        search_term: String,

        /// Search string for Google Jobs, if it is among the sites
        #[arg(long)]
        google_search_term: Option<String>,

        /// Stop once this many postings are collected
        #[arg(long, env = "RESULTS_WANTED", default_value = "100000")]
        results_wanted: usize,

        #[arg(long, short, default_value = "enhanced_jobs.csv")]
        output: PathBuf,
    },
    /// Serve the scrape endpoint over HTTP
    Serve {
        /// Listen address
        #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
        listen_addr: String,
    },
}

impl Config {
    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            sites: self.sites.clone(),
            location: self.location.clone(),
            country: self.country.clone(),
            hours_old: self.hours_old,
            fetch_full_description: true,
        }
    }

    pub fn collector_settings(&self) -> CollectorSettings {
        CollectorSettings {
            page_size: self.page_size,
            pacing: Duration::from_millis(self.pacing_ms),
            max_page_faults: self.max_page_faults,
            max_pages: self.max_pages,
        }
    }

    pub fn merge_policy(&self) -> MergePolicy {
        if self.sentinel_all {
            MergePolicy::uniform()
        } else {
            MergePolicy::default()
        }
    }
}

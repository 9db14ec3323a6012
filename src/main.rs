mod collectors;
mod config;
mod error;
mod export;
mod extract;
mod harvest;
mod models;
mod pipeline;
mod routes;

use std::sync::Arc;

use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::collectors::{JobSpyHttp, SearchQuery};
use crate::config::{Command, Config};
use crate::error::AppError;
use crate::harvest::Harvester;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("jobharvest=info,tower_http=info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_tracing(config.log_json);

    let source = JobSpyHttp::new(&config.source_url)?;
    let harvester = Harvester {
        source: Arc::new(source),
        search: config.search_settings(),
        collector: config.collector_settings(),
        policy: config.merge_policy(),
    };

    match config.command {
        Command::Scrape {
            search_term,
            google_search_term,
            results_wanted,
            output,
        } => {
            let query = SearchQuery {
                google_search_term,
                ..SearchQuery::new(search_term)
            };
            match harvester.run(&query, results_wanted).await {
                Ok(report) => {
                    export::write_csv(&output, &report.postings)?;
                    tracing::info!(
                        run_id = %report.run_id,
                        "Jobs saved to: {}",
                        output.display()
                    );
                }
                Err(AppError::NoResults) => {
                    tracing::warn!("No jobs found matching criteria");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::Serve { listen_addr } => {
            let app = routes::router(harvester)
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive());

            let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
            tracing::info!("Listening on {listen_addr}");
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

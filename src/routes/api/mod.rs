pub mod scrape;

use axum::Router;
use axum::routing::post;

use crate::harvest::Harvester;

pub fn router(harvester: Harvester) -> Router {
    let api = Router::new()
        .route("/scrape-jobs", post(scrape::scrape_jobs))
        .with_state(harvester);

    Router::new().nest("/api/v1", api)
}

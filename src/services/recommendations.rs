use std::sync::Arc;

use tokio::sync::RwLock;

use crate::services::{
    controller::{FetchTicket, ViewController},
    providers::RecommendationSource,
};

/// Runs one fetch and hands the result to the controller
///
/// The controller lock is only taken once the source has answered, so intents
/// keep flowing while the fetch is pending. Returns whether the result was
/// applied (false when a newer fetch superseded this one).
pub async fn load_recommendations(
    controller: Arc<RwLock<ViewController>>,
    source: Arc<dyn RecommendationSource>,
    ticket: FetchTicket,
) -> bool {
    tracing::info!(
        source = source.name(),
        generation = ticket.generation(),
        "Fetching recommendations"
    );

    let result = source.fetch_recommendations().await;

    controller.write().await.fetch_complete(ticket, result)
}

use std::time::Duration;

use crate::{error::FetchError, models::Recommendation, services::providers::RecommendationSource};

/// In-memory source returning a fixed collection after a simulated delay
#[derive(Debug, Clone)]
pub struct StaticSource {
    delay: Duration,
    records: Vec<Recommendation>,
}

impl StaticSource {
    /// Serves the built-in six-record collection
    pub fn new(delay: Duration) -> Self {
        Self::with_records(delay, mock_recommendations())
    }

    pub fn with_records(delay: Duration, records: Vec<Recommendation>) -> Self {
        Self { delay, records }
    }
}

#[async_trait::async_trait]
impl RecommendationSource for StaticSource {
    async fn fetch_recommendations(&self) -> Result<Vec<Recommendation>, FetchError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        tracing::debug!(count = self.records.len(), "Serving static recommendations");

        Ok(self.records.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Built-in collection
pub fn mock_recommendations() -> Vec<Recommendation> {
    #[allow(clippy::too_many_arguments)]
    fn record(
        id: &str,
        title: &str,
        description: &str,
        category: &str,
        rating: f64,
        image: &str,
        timestamp: &str,
        trending: bool,
    ) -> Recommendation {
        Recommendation {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            rating,
            image_url: Some(format!(
                "https://images.pexels.com/photos/{image}/pexels-photo-{image}.jpeg"
            )),
            timestamp: timestamp.to_string(),
            trending,
        }
    }

    vec![
        record(
            "1",
            "Machine Learning Fundamentals",
            "Un cours complet sur les bases du machine learning et ses applications pratiques.",
            "Education",
            4.8,
            "8386440",
            "2024-03-15T10:00:00Z",
            true,
        ),
        record(
            "2",
            "Intelligence Artificielle Avancée",
            "Découvrez les dernières avancées en IA et leurs impacts sur l'industrie.",
            "Technologie",
            4.5,
            "8386434",
            "2024-03-14T15:30:00Z",
            true,
        ),
        record(
            "3",
            "Data Science en Pratique",
            "Applications concrètes de la data science dans différents secteurs.",
            "Science",
            4.7,
            "669615",
            "2024-03-13T09:15:00Z",
            false,
        ),
        record(
            "4",
            "Cybersécurité pour Débutants",
            "Apprenez les bases de la sécurité informatique et protégez vos données.",
            "Technologie",
            4.6,
            "5380642",
            "2024-03-12T14:20:00Z",
            false,
        ),
        record(
            "5",
            "Développement Web Full Stack",
            "Formation complète sur le développement web moderne.",
            "Education",
            4.9,
            "574071",
            "2024-03-11T08:45:00Z",
            true,
        ),
        record(
            "6",
            "Marketing Digital Avancé",
            "Stratégies et techniques pour réussir votre présence en ligne.",
            "Marketing",
            4.4,
            "905163",
            "2024-03-10T11:30:00Z",
            false,
        ),
    ]
}

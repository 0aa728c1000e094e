use chrono::Locale;
use serde::Serialize;

use crate::models::Recommendation;

/// Seconds between the entrance animations of consecutive cards
const CARD_STAGGER_SECS: f64 = 0.1;

/// One grid entry
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CardView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub trending: bool,
    /// Long French date, e.g. "15 mars 2024"; absent when the timestamp is malformed
    pub date_label: Option<String>,
    pub animation_delay_secs: f64,
}

impl CardView {
    pub fn new(rec: &Recommendation, index: usize) -> Self {
        Self {
            id: rec.id.clone(),
            title: rec.title.clone(),
            description: rec.description.clone(),
            category: rec.category.clone(),
            rating: rec.rating,
            image_url: rec.image_url.clone(),
            trending: rec.trending,
            date_label: date_label(rec),
            animation_delay_secs: index as f64 * CARD_STAGGER_SECS,
        }
    }
}

pub fn date_label(rec: &Recommendation) -> Option<String> {
    rec.created_at()
        .map(|dt| dt.format_localized("%-d %B %Y", Locale::fr_FR).to_string())
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GridView {
    pub cards: Vec<CardView>,
}

impl GridView {
    pub fn new(recs: &[&Recommendation]) -> Self {
        Self {
            cards: recs
                .iter()
                .enumerate()
                .map(|(index, rec)| CardView::new(rec, index))
                .collect(),
        }
    }
}

/// Detail overlay for the selected record
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DetailView {
    #[serde(flatten)]
    pub card: CardView,
    /// Likes need a signed-in user
    pub can_like: bool,
}

impl DetailView {
    pub fn new(rec: &Recommendation, signed_in: bool) -> Self {
        Self {
            card: CardView::new(rec, 0),
            can_like: signed_in,
        }
    }
}

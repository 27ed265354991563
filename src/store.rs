//! In-memory prediction store.
//!
//! Owns the ordered prediction collection behind a single `RwLock`. Index 0
//! is the most recent record. Every mutation takes the write guard once and
//! finishes without awaiting, so readers never see a half-applied change.

use rust_decimal_macros::dec;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::PrognosisError;
use crate::types::{normalize_sport, Prediction, PredictionInput, PredictionPage};

pub struct PredictionStore {
    predictions: RwLock<Vec<Prediction>>,
}

impl PredictionStore {
    /// Store seeded with the given records, kept in the given order.
    pub fn new(seed: Vec<Prediction>) -> Self {
        Self {
            predictions: RwLock::new(seed),
        }
    }

    /// Store seeded with the four demo predictions, one per sport.
    pub fn seeded() -> Self {
        Self::new(sample_predictions())
    }

    /// Page of predictions, optionally filtered by sport (case-insensitive).
    ///
    /// `total` is the size of the filtered set before truncation.
    pub async fn list(&self, sport: Option<&str>, limit: usize) -> PredictionPage {
        let wanted = sport.map(normalize_sport);
        let predictions = self.predictions.read().await;
        let matching: Vec<&Prediction> = predictions
            .iter()
            .filter(|p| wanted.as_ref().map_or(true, |s| &p.sport == s))
            .collect();
        let total = matching.len();
        let page: Vec<Prediction> = matching.into_iter().take(limit).cloned().collect();

        debug!(sport = ?sport, limit, total, returned = page.len(), "Listed predictions");
        PredictionPage { predictions: page, total }
    }

    pub async fn get(&self, id: &str) -> Result<Prediction, PrognosisError> {
        let predictions = self.predictions.read().await;
        predictions
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    /// Assign a fresh id and insert at the front.
    pub async fn create(&self, input: PredictionInput) -> Prediction {
        let mut predictions = self.predictions.write().await;
        let mut id = Uuid::new_v4().to_string();
        while predictions.iter().any(|p| p.id == id) {
            id = Uuid::new_v4().to_string();
        }
        let prediction = Prediction::from_input(id, input);
        predictions.insert(0, prediction.clone());

        info!(id = %prediction.id, prediction = %prediction, count = predictions.len(), "Prediction created");
        prediction
    }

    /// Replace every field except the id; position is unchanged.
    pub async fn update(&self, id: &str, input: PredictionInput) -> Result<Prediction, PrognosisError> {
        let mut predictions = self.predictions.write().await;
        let slot = predictions
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found(id))?;
        *slot = Prediction::from_input(slot.id.clone(), input);

        info!(id, sport = %slot.sport, status = %slot.status, "Prediction updated");
        Ok(slot.clone())
    }

    /// Detach a record and hand it back.
    pub async fn delete(&self, id: &str) -> Result<Prediction, PrognosisError> {
        let mut predictions = self.predictions.write().await;
        let index = predictions
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| not_found(id))?;
        let removed = predictions.remove(index);

        info!(id, sport = %removed.sport, count = predictions.len(), "Prediction deleted");
        Ok(removed)
    }

    /// First `n` records in collection order.
    pub async fn recent(&self, n: usize) -> Vec<Prediction> {
        self.predictions.read().await.iter().take(n).cloned().collect()
    }

    /// First `n` records for one sport, in collection order.
    pub async fn recent_for_sport(&self, sport: &str, n: usize) -> Vec<Prediction> {
        let wanted = normalize_sport(sport);
        self.predictions
            .read()
            .await
            .iter()
            .filter(|p| p.sport == wanted)
            .take(n)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.predictions.read().await.len()
    }
}

fn not_found(id: &str) -> PrognosisError {
    PrognosisError::PredictionNotFound { id: id.to_string() }
}

/// Demo fixtures, newest first. Ids are generated per process.
pub fn sample_predictions() -> Vec<Prediction> {
    [
        PredictionInput::new("baseball", "Yankees vs Red Sox", "Yankees победа", 85, dec!(2.1), "won", "2025-03-10")
            .with_result("Yankees 7-4 Red Sox"),
        PredictionInput::new("football", "Chiefs vs Bills", "Тотал больше 48.5", 78, dec!(1.9), "won", "2025-03-09")
            .with_result("Chiefs 31-24 Bills (55 очков)"),
        PredictionInput::new("hockey", "Rangers vs Bruins", "Rangers победа в основное время", 72, dec!(2.3), "lost", "2025-03-08")
            .with_result("Rangers 2-3 Bruins"),
        PredictionInput::new("esports", "Navi vs Astralis (CS:GO)", "Navi победа 2-0", 82, dec!(2.5), "won", "2025-03-07")
            .with_result("Navi 2-0 Astralis"),
    ]
    .into_iter()
    .map(|input| Prediction::from_input(Uuid::new_v4().to_string(), input))
    .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

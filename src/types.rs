//! Shared types for the prognosis service.
//!
//! Request bodies, stored records and response envelopes. Every body that
//! crosses the HTTP boundary has an explicit struct here so the store never
//! sees loosely-typed JSON.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PrognosisError;
use crate::stats::SportStats;

// ---------------------------------------------------------------------------
// Prediction
// ---------------------------------------------------------------------------

/// One forecast for one sporting event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Server-generated, immutable after creation.
    pub id: String,
    /// Lower-cased sport label, e.g. "hockey".
    pub sport: String,
    #[serde(rename = "match")]
    pub match_label: String,
    pub prediction: String,
    /// Confidence percentage (0–100).
    pub confidence: u8,
    pub odds: Decimal,
    /// Free-form: "won" | "lost" | "pending" as observed.
    pub status: String,
    pub date: String,
    /// Outcome description, present once the event concludes.
    pub result: Option<String>,
}

impl Prediction {
    /// Build a stored record from a validated payload under the given id.
    pub fn from_input(id: String, input: PredictionInput) -> Self {
        Prediction {
            id,
            sport: normalize_sport(&input.sport),
            match_label: input.match_label,
            prediction: input.prediction,
            confidence: input.confidence,
            odds: input.odds,
            status: input.status,
            date: input.date,
            result: input.result,
        }
    }
}

/// Canonical form of a sport label: trimmed and lower-cased. Unicode-aware,
/// so "ХОККЕЙ" and "хоккей" compare equal.
pub fn normalize_sport(sport: &str) -> String {
    sport.trim().to_lowercase()
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} ({}% @ {}, {})",
            self.sport, self.match_label, self.prediction, self.confidence, self.odds, self.status,
        )
    }
}

/// Body of create/update requests.
///
/// There is no `id` field: serde drops one sent by the client, the store
/// assigns ids.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionInput {
    pub sport: String,
    #[serde(rename = "match")]
    pub match_label: String,
    pub prediction: String,
    pub confidence: u8,
    pub odds: Decimal,
    pub status: String,
    pub date: String,
    #[serde(default)]
    pub result: Option<String>,
}

impl PredictionInput {
    /// Convenience constructor used by fixtures and tests.
    pub fn new(
        sport: &str,
        match_label: &str,
        prediction: &str,
        confidence: u8,
        odds: Decimal,
        status: &str,
        date: &str,
    ) -> Self {
        PredictionInput {
            sport: sport.to_string(),
            match_label: match_label.to_string(),
            prediction: prediction.to_string(),
            confidence,
            odds,
            status: status.to_string(),
            date: date.to_string(),
            result: None,
        }
    }

    pub fn with_result(mut self, result: &str) -> Self {
        self.result = Some(result.to_string());
        self
    }

    /// Check field ranges the type system can't express.
    pub fn validate(&self) -> Result<(), PrognosisError> {
        let required = [
            ("sport", &self.sport),
            ("match", &self.match_label),
            ("prediction", &self.prediction),
            ("status", &self.status),
            ("date", &self.date),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(PrognosisError::Validation(format!("{field} must not be empty")));
        }
        if self.confidence > 100 {
            return Err(PrognosisError::Validation(format!(
                "confidence must be between 0 and 100, got {}",
                self.confidence
            )));
        }
        if self.odds <= Decimal::ZERO {
            return Err(PrognosisError::Validation(format!(
                "odds must be positive, got {}",
                self.odds
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

/// `GET /api/predictions`: `total` counts every match, not just the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionPage {
    pub predictions: Vec<Prediction>,
    pub total: usize,
}

/// Mutation responses: create, update and delete all echo the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionEnvelope {
    pub message: String,
    pub prediction: Prediction,
}

impl PredictionEnvelope {
    pub fn created(prediction: Prediction) -> Self {
        Self { message: "Prediction created".into(), prediction }
    }

    pub fn updated(prediction: Prediction) -> Self {
        Self { message: "Prediction updated".into(), prediction }
    }

    pub fn deleted(prediction: Prediction) -> Self {
        Self { message: "Prediction deleted".into(), prediction }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SportStatsResponse {
    /// Echoes the path segment as the caller wrote it.
    pub sport: String,
    pub stats: SportStats,
    pub recent_predictions: Vec<Prediction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramDigest {
    pub stats_message: String,
    pub recent_predictions: Vec<Prediction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootInfo {
    pub message: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// Error body shared by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

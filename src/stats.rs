//! Aggregate statistics snapshot.
//!
//! The snapshot is configuration, not a view over the live prediction
//! collection: it is fixed at startup (compiled-in sample or the `[stats]`
//! table of `config.toml`) and never written afterwards.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::normalize_sport;

/// Per-sport figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportStats {
    pub predictions: u64,
    /// Hit rate, percent.
    pub accuracy: Decimal,
    /// Return on stake, percent.
    pub profit: Decimal,
}

/// Global figures returned by `GET /api/stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_predictions: u64,
    /// Overall success rate, percent.
    pub success_rate: Decimal,
    pub active_bettors: u64,
    pub monthly_wins: u64,
    pub sports_stats: BTreeMap<String, SportStats>,
}

impl StatsSnapshot {
    /// The demo figures the service ships with.
    pub fn sample() -> Self {
        let sports_stats = [
            ("baseball", 312, dec!(82.1), dec!(15.4)),
            ("football", 428, dec!(76.3), dec!(12.8)),
            ("hockey", 285, dec!(79.8), dec!(18.2)),
            ("esports", 222, dec!(74.9), dec!(9.6)),
        ]
        .into_iter()
        .map(|(sport, predictions, accuracy, profit)| {
            (sport.to_string(), SportStats { predictions, accuracy, profit })
        })
        .collect();

        StatsSnapshot {
            total_predictions: 1247,
            success_rate: dec!(78.5),
            active_bettors: 5892,
            monthly_wins: 342,
            sports_stats,
        }
    }

    /// Look up a sport's figures, ignoring case (Unicode-aware).
    pub fn sport(&self, name: &str) -> Option<&SportStats> {
        let name = normalize_sport(name);
        self.sports_stats
            .iter()
            .find(|(key, _)| normalize_sport(key) == name)
            .map(|(_, stats)| stats)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

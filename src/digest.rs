//! Telegram digest rendering.
//!
//! The message layout is consumed verbatim by the Telegram bot, including
//! the leading newline and the trailing indentation, so keep it byte-stable.

use rust_decimal::Decimal;
use std::fmt::Write;

use crate::stats::StatsSnapshot;

/// Predictions shipped alongside the digest text.
pub const DIGEST_RECENT_COUNT: usize = 3;

/// Sport lines, in display order: (snapshot key, emoji, label).
const SPORT_LINES: &[(&str, &str, &str)] = &[
    ("baseball", "⚾", "Бейсбол"),
    ("football", "🏈", "Футбол"),
    ("hockey", "🏒", "Хоккей"),
    ("esports", "🎮", "Киберспорт"),
];

const TRAILER: &str = "        ";

/// Render the snapshot as a Telegram-ready markdown block.
///
/// Sports missing from the snapshot are left out.
pub fn render_stats_message(stats: &StatsSnapshot) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str("📊 **Актуальная статистика**\n\n");
    let _ = writeln!(out, "🎯 Всего прогнозов: {}", stats.total_predictions);
    let _ = writeln!(out, "✅ Проходимость: {}%", percent(stats.success_rate));
    let _ = writeln!(out, "👥 Активных подписчиков: {}", stats.active_bettors);
    let _ = writeln!(out, "🏆 Побед в месяц: {}", stats.monthly_wins);
    out.push_str("\n📈 **По видам спорта:**\n");

    for (key, emoji, label) in SPORT_LINES {
        if let Some(sport) = stats.sport(key) {
            let _ = writeln!(out, "{emoji} {label}: {}%", percent(sport.accuracy));
        }
    }

    out.push_str(TRAILER);
    out
}

/// Float-style percentage: trailing zeros dropped, at least one decimal
/// place kept (`80` -> `80.0`, `82.10` -> `82.1`).
fn percent(value: Decimal) -> String {
    let value = value.normalize();
    if value.scale() == 0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Analytics data models — serialisable types returned by the analytics
//! endpoints.

use serde::{Deserialize, Serialize};

// ─── Current Score ────────────────────────────────────────────────────────────

/// Snapshot returned by `GET /api/analytics/score`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentScore {
    /// Sum of `annoyance_level` over all active items (status != fixed).
    pub current_score: i64,

    /// Number of active items.
    pub active_count: u64,

    /// Active items whose daily encounter limit is met or exceeded today.
    pub items_over_limit: u64,

    /// Total encounters recorded today across all active items.
    pub total_encounters_today: i64,
}

// ─── Trend ────────────────────────────────────────────────────────────────────

/// One day in the friction trend returned by `GET /api/analytics/trend`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    /// ISO 8601 calendar date, e.g. `"2026-08-07"`.
    pub date: String,

    /// The friction score of the set of items active on that day.
    pub score: i64,
}

// ─── Category Breakdown ───────────────────────────────────────────────────────

/// Per-category score sums returned by `GET /api/analytics/by-category`.
/// Every category is always present, zero when empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub home: i64,
    pub work: i64,
    pub digital: i64,
    pub health: i64,
    pub other: i64,
}

// ─── Tests ────────────────────────────────────────────────────────────────────

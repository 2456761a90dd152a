//! Bi-temporal point-in-time filtering.
//!
//! Facts carry a real-world validity interval (`valid_at` / `invalid_at`).
//! A point-in-time query keeps only the facts whose interval covers the
//! reference instant; entity nodes carry no interval and always pass.
//!
//! The filter is a pure function over an already-ranked result sequence:
//! order is preserved, nothing is re-scored, and applying it twice with the
//! same instant is a no-op.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::graph::{FactResult, SearchResult};

/// Parse a reference-time string into a UTC instant.
///
/// Accepted formats, attempted in order:
/// 1. RFC 3339 / ISO 8601 with offset or trailing `Z`: `"2024-01-15T10:30:00Z"`
/// 2. ISO 8601 without timezone (assumed UTC), with or without sub-seconds
/// 3. Date only (midnight UTC): `"2024-01-15"`
///
/// Returns `None` for empty or unrecognised input.
pub fn parse_reference_time(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&ndt));
    }

    if let Ok(nd) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return nd
            .and_hms_opt(0, 0, 0)
            .map(|ndt| Utc.from_utc_datetime(&ndt));
    }

    None
}

/// Whether `fact` was true in the real world at instant `at`.
///
/// Valid iff `valid_at <= at` and (`invalid_at` is absent or `invalid_at > at`).
///
/// A fact with no `valid_at` at all is treated as valid at every instant.
/// This permissive default mirrors the ingestion side, where extraction may
/// not recover a start date for a fact; it is deliberate, if debatable, and
/// pinned by `fact_without_valid_at_passes_at_any_instant` below.
pub fn is_valid_at(fact: &FactResult, at: DateTime<Utc>) -> bool {
    match fact.valid_at {
        Some(valid_at) => valid_at <= at && fact.invalid_at.map_or(true, |inv| inv > at),
        None => true,
    }
}

/// Keep the results that existed at instant `at`, preserving relevance order.
///
/// Nodes always pass; facts pass per [`is_valid_at`].
pub fn filter_point_in_time(results: Vec<SearchResult>, at: DateTime<Utc>) -> Vec<SearchResult> {
    results
        .into_iter()
        .filter(|item| match item {
            SearchResult::Node(_) => true,
            SearchResult::Fact(fact) => is_valid_at(fact, at),
        })
        .collect()
}

//! Recency scoring from publication dates

use crate::config::RecencyBands;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Maps a publication date to a recency score via age bands
///
/// Dates are ISO 8601. A timestamp without an offset, or a bare date, is
/// read as UTC. Publication dates in the future count as fresh.
///
/// # Examples
///
/// ```
/// use verity_evaluator::RecencyScorer;
/// use chrono::{TimeZone, Utc};
///
/// let now = Utc.with_ymd_and_hms(2025, 3, 31, 12, 0, 0).unwrap();
/// let scorer = RecencyScorer::default().at(now);
///
/// assert_eq!(scorer.score(Some("2025-03-28")), 1.0);
/// assert_eq!(scorer.score(Some("2025-03-10T09:00:00Z")), 0.8);
/// assert_eq!(scorer.score(Some("2024-01-01")), 0.2);
/// assert_eq!(scorer.score(Some("last Tuesday")), 0.0);
/// assert_eq!(scorer.score(None), 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecencyScorer {
    bands: RecencyBands,
    now: Option<DateTime<Utc>>,
}

impl RecencyScorer {
    /// Scorer with custom bands, measured against the wall clock
    pub fn new(bands: RecencyBands) -> Self {
        Self { bands, now: None }
    }

    /// Pin "now" to a fixed instant
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Active bands
    pub fn bands(&self) -> &RecencyBands {
        &self.bands
    }

    /// Score a publication date
    pub fn score(&self, published_date: Option<&str>) -> f64 {
        let Some(published) = published_date.and_then(parse_date) else {
            return self.bands.undated_score;
        };

        let now = self.now.unwrap_or_else(Utc::now);
        self.score_age((now - published).num_days())
    }

    /// Score an age in whole days
    pub fn score_age(&self, days_old: i64) -> f64 {
        let bands = &self.bands;
        if days_old <= bands.fresh_days {
            bands.fresh_score
        } else if days_old <= bands.recent_days {
            bands.recent_score
        } else if days_old <= bands.aging_days {
            bands.aging_score
        } else {
            bands.stale_score
        }
    }
}

/// Parse an ISO 8601 date or timestamp
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> RecencyScorer {
        let now = Utc.with_ymd_and_hms(2025, 6, 30, 0, 0, 0).unwrap();
        RecencyScorer::default().at(now)
    }

    #[test]
    fn test_band_edges() {
        let s = scorer();
        assert_eq!(s.score_age(0), 1.0);
        assert_eq!(s.score_age(7), 1.0);
        assert_eq!(s.score_age(8), 0.8);
        assert_eq!(s.score_age(30), 0.8);
        assert_eq!(s.score_age(31), 0.5);
        assert_eq!(s.score_age(180), 0.5);
        assert_eq!(s.score_age(181), 0.2);
    }

    #[test]
    fn test_future_date_is_fresh() {
        assert_eq!(scorer().score(Some("2025-07-15")), 1.0);
    }

    #[test]
    fn test_offset_timestamp() {
        // 2025-06-22T23:30-05:00 is 2025-06-23T04:30Z, under seven days before "now"
        assert_eq!(scorer().score(Some("2025-06-22T23:30:00-05:00")), 1.0);
    }

    #[test]
    fn test_naive_timestamp_variants() {
        let s = scorer();
        assert_eq!(s.score(Some("2025-06-01T10:00:00")), 0.8);
        assert_eq!(s.score(Some("2025-06-01 10:00:00.250")), 0.8);
        assert_eq!(s.score(Some("2025-02-01T10:00")), 0.5);
    }

    #[test]
    fn test_unparseable_scores_undated() {
        let s = scorer();
        assert_eq!(s.score(Some("")), 0.0);
        assert_eq!(s.score(Some("June 1st")), 0.0);
        assert_eq!(s.score(Some("2025-13-01")), 0.0);
    }

    #[test]
    fn test_custom_undated_score() {
        let bands = RecencyBands {
            undated_score: 0.3,
            ..Default::default()
        };
        let s = RecencyScorer::new(bands);
        assert_eq!(s.score(None), 0.3);
    }
}

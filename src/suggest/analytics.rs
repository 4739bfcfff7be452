//! Search analytics recording and aggregation.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One recorded search. Append-only; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsRecord {
    pub query: String,
    pub results_count: usize,
    pub user_id: Option<i64>,
    pub session_id: String,
    pub ip_address: String,
    pub user_agent: String,
    /// Wall-clock search duration in seconds.
    pub search_time: f64,
    pub timestamp: DateTime<Utc>,
    pub zero_results: bool,
}

/// Aggregation window for trending and summary views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Today,
    Week,
    Month,
    All,
}

impl Timeframe {
    /// Parse a wire name, defaulting to a week.
    pub fn parse(name: &str) -> Timeframe {
        match name {
            "today" => Timeframe::Today,
            "month" => Timeframe::Month,
            "all" => Timeframe::All,
            _ => Timeframe::Week,
        }
    }

    /// The cutoff instant for this window, or `None` for all time.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Timeframe::Today => Some(
                now.date_naive()
                    .and_hms_opt(0, 0, 0)
                    .map(|naive| naive.and_utc())
                    .unwrap_or(now),
            ),
            Timeframe::Week => Some(now - Duration::days(7)),
            Timeframe::Month => Some(now - Duration::days(30)),
            Timeframe::All => None,
        }
    }
}

/// One row of the trending view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingEntry {
    pub query: String,
    pub searches: u64,
    pub avg_results: f64,
    pub zero_result_searches: u64,
}

/// Aggregated analytics for a timeframe.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_searches: u64,
    pub unique_searches: u64,
    pub zero_result_searches: u64,
    pub avg_results: f64,
    /// Share of searches that found nothing, 0–100.
    pub zero_result_rate: f64,
    pub popular_searches: Vec<TrendingEntry>,
}

/// Append-only storage for analytics records.
///
/// The persistence collaborator may not provide this store at all; the
/// recorder treats its absence as a silent no-op, never an error.
pub trait AnalyticsStore: Send + Sync + std::fmt::Debug {
    /// Append one record.
    fn append(&self, record: AnalyticsRecord) -> Result<()>;

    /// All records at or after the cutoff, oldest first. `None` means all
    /// records.
    fn records_since(&self, cutoff: Option<DateTime<Utc>>) -> Result<Vec<AnalyticsRecord>>;
}

/// In-memory analytics store.
#[derive(Debug, Default)]
pub struct MemoryAnalyticsStore {
    records: RwLock<Vec<AnalyticsRecord>>,
}

impl MemoryAnalyticsStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl AnalyticsStore for MemoryAnalyticsStore {
    fn append(&self, record: AnalyticsRecord) -> Result<()> {
        self.records.write().push(record);
        Ok(())
    }

    fn records_since(&self, cutoff: Option<DateTime<Utc>>) -> Result<Vec<AnalyticsRecord>> {
        let records = self.records.read();
        Ok(match cutoff {
            Some(cutoff) => records
                .iter()
                .filter(|record| record.timestamp >= cutoff)
                .cloned()
                .collect(),
            None => records.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(query: &str, days_ago: i64) -> AnalyticsRecord {
        AnalyticsRecord {
            query: query.to_string(),
            results_count: 3,
            user_id: None,
            session_id: "s".to_string(),
            ip_address: String::new(),
            user_agent: String::new(),
            search_time: 0.01,
            timestamp: Utc::now() - Duration::days(days_ago),
            zero_results: false,
        }
    }

    #[test]
    fn test_append_and_filter_by_cutoff() {
        let store = MemoryAnalyticsStore::new();
        store.append(record("old", 40)).unwrap();
        store.append(record("recent", 2)).unwrap();

        let all = store.records_since(None).unwrap();
        assert_eq!(all.len(), 2);

        let cutoff = Timeframe::Week.cutoff(Utc::now());
        let recent = store.records_since(cutoff).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].query, "recent");
    }

    #[test]
    fn test_timeframe_parsing() {
        assert_eq!(Timeframe::parse("today"), Timeframe::Today);
        assert_eq!(Timeframe::parse("month"), Timeframe::Month);
        assert_eq!(Timeframe::parse("all"), Timeframe::All);
        assert_eq!(Timeframe::parse("anything"), Timeframe::Week);
    }

    #[test]
    fn test_all_timeframe_has_no_cutoff() {
        assert!(Timeframe::All.cutoff(Utc::now()).is_none());
        assert!(Timeframe::Month.cutoff(Utc::now()).is_some());
    }
}

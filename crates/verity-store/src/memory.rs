//! In-memory ledger, the default per-session store

use crate::StoreError;
use std::collections::HashSet;
use verity_domain::traits::{AssessmentQuery, AssessmentStore};
use verity_domain::{AssessmentRecord, ClaimId};

/// Vec-backed implementation of AssessmentStore
///
/// Each session owns its own instance; nothing is shared between sessions.
///
/// # Examples
///
/// ```
/// use verity_store::MemoryStore;
/// use verity_domain::traits::AssessmentStore;
///
/// let store = MemoryStore::new();
/// assert!(store.is_empty().unwrap());
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: Vec<AssessmentRecord>,
    keys: HashSet<(String, ClaimId, u32)>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow every record in insertion order
    pub fn records(&self) -> &[AssessmentRecord] {
        &self.records
    }
}

impl AssessmentStore for MemoryStore {
    type Error = StoreError;

    fn append(&mut self, record: AssessmentRecord) -> Result<(), Self::Error> {
        let key = record.key();
        if self.keys.contains(&key) {
            let (domain, claim_id, round) = key;
            return Err(StoreError::Duplicate {
                domain,
                claim_id,
                round,
            });
        }

        self.keys.insert(key);
        self.records.push(record);
        Ok(())
    }

    fn query(&self, query: &AssessmentQuery) -> Result<Vec<AssessmentRecord>, Self::Error> {
        let matching = self.records.iter().filter(|r| query.matches(r)).cloned();

        Ok(match query.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        })
    }

    fn len(&self) -> Result<usize, Self::Error> {
        Ok(self.records.len())
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        self.records.clear();
        self.keys.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_domain::{Bias, SourceAssessment, Stance};

    fn record(claim_id: ClaimId, domain: &str, round: u32) -> AssessmentRecord {
        AssessmentRecord::new(
            round,
            SourceAssessment {
                domain: domain.to_string(),
                claim_id,
                credibility_score: 0.8,
                bias: Bias::default(),
                recency_score: 1.0,
                stance: Stance::Supports,
                reasoning: "fine".to_string(),
            },
        )
    }

    #[test]
    fn test_append_and_query() {
        let mut store = MemoryStore::new();
        let claim = ClaimId::from_value(1);

        store.append(record(claim, "a.com", 0)).unwrap();
        store.append(record(claim, "b.com", 0)).unwrap();

        assert_eq!(store.len().unwrap(), 2);
        assert_eq!(store.records_for_claim(claim).unwrap().len(), 2);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut store = MemoryStore::new();
        let claim = ClaimId::from_value(1);

        store.append(record(claim, "a.com", 0)).unwrap();
        let err = store.append(record(claim, "a.com", 0)).unwrap_err();

        assert!(err.is_duplicate());
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_same_pair_in_later_round_coexists() {
        let mut store = MemoryStore::new();
        let claim = ClaimId::from_value(1);

        store.append(record(claim, "a.com", 0)).unwrap();
        store.append(record(claim, "a.com", 1)).unwrap();

        let records = store.records_for_claim(claim).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].round, 0);
        assert_eq!(records[1].round, 1);
    }

    #[test]
    fn test_query_limit() {
        let mut store = MemoryStore::new();
        let claim = ClaimId::from_value(1);
        for i in 0..5 {
            store.append(record(claim, &format!("s{}.com", i), 0)).unwrap();
        }

        let query = AssessmentQuery {
            limit: Some(3),
            ..Default::default()
        };
        assert_eq!(store.query(&query).unwrap().len(), 3);
    }

    #[test]
    fn test_reset() {
        let mut store = MemoryStore::new();
        let claim = ClaimId::from_value(1);
        store.append(record(claim, "a.com", 0)).unwrap();

        store.reset().unwrap();

        assert!(store.is_empty().unwrap());
        store.append(record(claim, "a.com", 0)).unwrap();
    }
}

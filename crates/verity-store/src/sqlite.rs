//! SQLite-backed ledger
//!
//! Persists every assessment of a session so the numeric path can be
//! replayed and audited after the fact.

use crate::StoreError;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use verity_domain::traits::{AssessmentQuery, AssessmentStore};
use verity_domain::{AssessmentRecord, Bias, BiasLabel, ClaimId, SourceAssessment, Stance};

/// SQLite-based implementation of AssessmentStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. A session owns its store and
/// appends from a single task.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a ledger at the given path
    ///
    /// Use `:memory:` for an in-memory database.
    ///
    /// # Examples
    ///
    /// ```
    /// use verity_store::SqliteStore;
    ///
    /// let store = SqliteStore::new(":memory:").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(include_str!("schema.sql"))?;
        Ok(())
    }

    fn claim_id_to_bytes(id: ClaimId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    fn bytes_to_claim_id(bytes: &[u8]) -> Result<ClaimId, StoreError> {
        let arr: [u8; 16] = bytes.try_into().map_err(|_| {
            StoreError::InvalidData(format!("Expected 16 bytes for ClaimId, got {}", bytes.len()))
        })?;
        Ok(ClaimId::from_value(u128::from_be_bytes(arr)))
    }

    fn bias_columns(bias: &Bias) -> (Option<&'static str>, Option<f64>) {
        match bias {
            Bias::Label(label) => (Some(label.as_str()), None),
            Bias::Score(score) => (None, Some(*score)),
        }
    }

    fn bias_from_columns(label: Option<String>, score: Option<f64>) -> Result<Bias, StoreError> {
        match (label, score) {
            (Some(label), None) => BiasLabel::parse(&label)
                .map(Bias::Label)
                .ok_or_else(|| StoreError::InvalidData(format!("Unknown bias label: {}", label))),
            (None, Some(score)) => Ok(Bias::Score(score)),
            _ => Err(StoreError::InvalidData(
                "Exactly one of bias_label and bias_score must be set".to_string(),
            )),
        }
    }

    fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
        Ok(RawRow {
            claim_id: row.get(0)?,
            domain: row.get(1)?,
            round: row.get(2)?,
            credibility: row.get(3)?,
            bias_label: row.get(4)?,
            bias_score: row.get(5)?,
            recency: row.get(6)?,
            stance: row.get(7)?,
            reasoning: row.get(8)?,
        })
    }
}

/// Column values before domain conversion
struct RawRow {
    claim_id: Vec<u8>,
    domain: String,
    round: i64,
    credibility: f64,
    bias_label: Option<String>,
    bias_score: Option<f64>,
    recency: f64,
    stance: String,
    reasoning: String,
}

impl RawRow {
    fn into_record(self) -> Result<AssessmentRecord, StoreError> {
        let claim_id = SqliteStore::bytes_to_claim_id(&self.claim_id)?;
        let bias = SqliteStore::bias_from_columns(self.bias_label, self.bias_score)?;
        let stance = Stance::parse(&self.stance)
            .ok_or_else(|| StoreError::InvalidData(format!("Unknown stance: {}", self.stance)))?;
        let round = u32::try_from(self.round)
            .map_err(|_| StoreError::InvalidData(format!("Invalid round: {}", self.round)))?;

        Ok(AssessmentRecord::new(
            round,
            SourceAssessment {
                domain: self.domain,
                claim_id,
                credibility_score: self.credibility,
                bias,
                recency_score: self.recency,
                stance,
                reasoning: self.reasoning,
            },
        ))
    }
}

impl AssessmentStore for SqliteStore {
    type Error = StoreError;

    fn append(&mut self, record: AssessmentRecord) -> Result<(), Self::Error> {
        let a = &record.assessment;
        let id_bytes = Self::claim_id_to_bytes(a.claim_id);

        let exists: bool = self
            .conn
            .query_row(
                "SELECT 1 FROM assessments WHERE domain = ?1 AND claim_id = ?2 AND round = ?3",
                params![&a.domain, &id_bytes, record.round],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);

        if exists {
            return Err(StoreError::Duplicate {
                domain: a.domain.clone(),
                claim_id: a.claim_id,
                round: record.round,
            });
        }

        let (bias_label, bias_score) = Self::bias_columns(&a.bias);
        self.conn.execute(
            "INSERT INTO assessments
             (claim_id, domain, round, credibility, bias_label, bias_score, recency, stance, reasoning)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                &id_bytes,
                &a.domain,
                record.round,
                a.credibility_score,
                bias_label,
                bias_score,
                a.recency_score,
                a.stance.as_str(),
                &a.reasoning,
            ],
        )?;

        Ok(())
    }

    fn query(&self, query: &AssessmentQuery) -> Result<Vec<AssessmentRecord>, Self::Error> {
        let mut sql = String::from(
            "SELECT claim_id, domain, round, credibility, bias_label, bias_score, recency, stance, reasoning
             FROM assessments WHERE 1=1",
        );
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(claim_id) = query.claim_id {
            sql.push_str(" AND claim_id = ?");
            params.push(Box::new(Self::claim_id_to_bytes(claim_id)));
        }

        if let Some(domain) = &query.domain {
            sql.push_str(" AND domain = ?");
            params.push(Box::new(domain.clone()));
        }

        if let Some(round) = query.round {
            sql.push_str(" AND round = ?");
            params.push(Box::new(round));
        }

        sql.push_str(" ORDER BY seq");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            params.push(Box::new(limit as i64));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let rows = stmt
            .query_map(&param_refs[..], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(RawRow::into_record).collect()
    }

    fn len(&self) -> Result<usize, Self::Error> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM assessments", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        self.conn.execute("DELETE FROM assessments", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bias_columns_round_trip_label() {
        let (label, score) = SqliteStore::bias_columns(&Bias::Label(BiasLabel::Mixed));
        let bias = SqliteStore::bias_from_columns(label.map(str::to_string), score).unwrap();
        assert_eq!(bias, Bias::Label(BiasLabel::Mixed));
    }

    #[test]
    fn test_bias_columns_reject_both_set() {
        let result = SqliteStore::bias_from_columns(Some("left".to_string()), Some(0.3));
        assert!(matches!(result, Err(StoreError::InvalidData(_))));
    }

    #[test]
    fn test_bad_claim_id_bytes() {
        assert!(SqliteStore::bytes_to_claim_id(&[1, 2, 3]).is_err());
    }
}

//! Progress ledger: externally owned per-subtopic completion records.
//!
//! The ledger is never assumed complete or in sync with the curriculum.
//! It may hold records for subtopics that no longer exist and lack records
//! for subtopics that do.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Status field as stored by the progress service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    #[default]
    NotStarted,
    Completed,
}

/// One learner's progress on one subtopic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub sub_topic_id: String,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default)]
    pub learn_completed: bool,
    #[serde(default)]
    pub quiz_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz_best_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProgressRecord {
    /// Record with no completion signal
    pub fn new(sub_topic_id: impl Into<String>) -> Self {
        Self {
            sub_topic_id: sub_topic_id.into(),
            status: RecordStatus::NotStarted,
            learn_completed: false,
            quiz_completed: false,
            quiz_best_score: None,
            updated_at: None,
        }
    }

    /// Record marked completed through the status field
    pub fn completed(sub_topic_id: impl Into<String>) -> Self {
        Self {
            status: RecordStatus::Completed,
            ..Self::new(sub_topic_id)
        }
    }

    pub fn with_learn_completed(mut self) -> Self {
        self.learn_completed = true;
        self
    }

    pub fn with_quiz_completed(mut self, best_score: Option<f64>) -> Self {
        self.quiz_completed = true;
        self.quiz_best_score = best_score;
        self
    }

    /// Any completeness signal.
    ///
    /// The progress service does not keep `status` and the two flags in
    /// agreement, so either source counts.
    pub fn is_complete(&self) -> bool {
        self.status == RecordStatus::Completed || (self.learn_completed && self.quiz_completed)
    }

    /// Some activity recorded but not complete
    pub fn is_in_progress(&self) -> bool {
        !self.is_complete() && (self.learn_completed || self.quiz_completed)
    }

    /// No signal at all; indistinguishable from a missing record
    pub fn is_blank(&self) -> bool {
        !self.is_complete() && !self.is_in_progress()
    }
}

/// Ledger document: a bare array or `{ "records": [...] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum LedgerDocument {
    Records(Vec<ProgressRecord>),
    Wrapped { records: Vec<ProgressRecord> },
}

/// Ordered collection of progress records with an id index.
///
/// Record order is preserved as received. When an id repeats, lookups see
/// the last occurrence; [`len`](Self::len) still counts every record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<ProgressRecord>", into = "Vec<ProgressRecord>")]
pub struct ProgressLedger {
    records: Vec<ProgressRecord>,
    index: HashMap<String, usize>,
}

impl ProgressLedger {
    pub fn new(records: Vec<ProgressRecord>) -> Self {
        let index = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.sub_topic_id.clone(), i))
            .collect();
        Self { records, index }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a ledger document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is neither an array of records nor an
    /// object with a `records` array.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let records = match serde_json::from_str::<LedgerDocument>(json)? {
            LedgerDocument::Records(records) => records,
            LedgerDocument::Wrapped { records } => records,
        };
        Ok(Self::new(records))
    }

    pub fn get(&self, sub_topic_id: &str) -> Option<&ProgressRecord> {
        self.index.get(sub_topic_id).map(|&i| &self.records[i])
    }

    pub fn records(&self) -> &[ProgressRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records satisfying the any-signal completeness rule
    pub fn completed_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_complete()).count()
    }

    /// Append or replace a record, returning the ledger it produces.
    pub fn upsert(&self, record: ProgressRecord) -> Self {
        let mut records = self.records.clone();
        match self.index.get(&record.sub_topic_id) {
            Some(&i) => records[i] = record,
            None => records.push(record),
        }
        Self::new(records)
    }
}

impl From<Vec<ProgressRecord>> for ProgressLedger {
    fn from(records: Vec<ProgressRecord>) -> Self {
        Self::new(records)
    }
}

impl From<ProgressLedger> for Vec<ProgressRecord> {
    fn from(ledger: ProgressLedger) -> Self {
        ledger.records
    }
}

impl FromIterator<ProgressRecord> for ProgressLedger {
    fn from_iter<I: IntoIterator<Item = ProgressRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

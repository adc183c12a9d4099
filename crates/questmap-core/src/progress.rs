//! Overall completion across a curriculum.
//!
//! The ledger and the tree disagree in steady state: the ledger can hold
//! rows for subtopics that were removed, and a freshly generated tree has
//! subtopics with no rows yet. [`ReconciliationPolicy`] decides which count
//! is the denominator.

use serde::{Deserialize, Serialize};

use crate::curriculum::CurriculumTree;
use crate::ledger::ProgressLedger;

/// How the ledger's record count is reconciled with the tree's size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationPolicy {
    /// `total = max(ledger records, tree subtopics)`; every complete record
    /// counts, orphan rows included
    #[default]
    LedgerMax,
    /// `total = tree subtopics`; only complete records for subtopics in the
    /// tree count
    TreeAuthoritative,
}

/// Overall completion counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateProgress {
    pub completed: usize,
    pub total: usize,
    /// Rounded percentage in `0..=100`
    pub percent: u8,
}

impl AggregateProgress {
    pub fn new(completed: usize, total: usize) -> Self {
        let completed = completed.min(total);
        Self {
            completed,
            total,
            percent: percent_of(completed, total),
        }
    }

    pub fn remaining(&self) -> usize {
        self.total - self.completed
    }
}

/// `round(part / whole * 100)`, 0 when `whole` is 0
pub fn percent_of(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let pct = (part as f64 / whole as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Aggregate with the default [`ReconciliationPolicy::LedgerMax`] rule.
pub fn aggregate(tree: &CurriculumTree, ledger: &ProgressLedger) -> AggregateProgress {
    aggregate_with(tree, ledger, ReconciliationPolicy::default())
}

pub fn aggregate_with(
    tree: &CurriculumTree,
    ledger: &ProgressLedger,
    policy: ReconciliationPolicy,
) -> AggregateProgress {
    let tree_total = tree.subtopic_count();
    if ledger.is_empty() {
        return AggregateProgress::new(0, tree_total);
    }

    let (completed, total) = match policy {
        ReconciliationPolicy::LedgerMax => (ledger.completed_count(), ledger.len().max(tree_total)),
        ReconciliationPolicy::TreeAuthoritative => {
            let completed = tree
                .subtopics()
                .filter(|s| {
                    ledger
                        .get(&s.subtopic.id)
                        .is_some_and(|r| r.is_complete())
                })
                .count();
            (completed, tree_total)
        }
    };

    tracing::debug!(
        ?policy,
        completed,
        total,
        ledger_records = ledger.len(),
        tree_total,
        "aggregated progress"
    );

    AggregateProgress::new(completed, total)
}

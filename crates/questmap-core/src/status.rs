//! Learning status resolution.
//!
//! Resolves each subtopic to a [`DerivedStatus`] from the ledger, rolls
//! subtopics up into topic and module completion ratios, and applies the
//! sequential unlock chain between modules:
//!
//! - a module with no subtopics counts as fully complete
//! - module `0` is always open
//! - module `i` opens only once module `i - 1` is fully complete
//!
//! Statuses are recomputed on every call and never stored.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::curriculum::{CurriculumTree, Module};
use crate::ledger::{ProgressLedger, ProgressRecord};

/// Discrete learning status of a subtopic, topic or module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedStatus {
    Locked,
    Available,
    Current,
    Completed,
}

impl DerivedStatus {
    /// Anything but `locked`
    pub fn is_accessible(&self) -> bool {
        !matches!(self, Self::Locked)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::Available => "available",
            Self::Current => "current",
            Self::Completed => "completed",
        }
    }

    /// Status of a roll-up from its completed/total counts.
    ///
    /// `0 of 0` is complete. With nothing completed the gate decides
    /// between `available` and `locked`.
    pub fn from_counts(completed: usize, total: usize, gate_open: bool) -> Self {
        if completed >= total {
            Self::Completed
        } else if completed > 0 {
            Self::Current
        } else if gate_open {
            Self::Available
        } else {
            Self::Locked
        }
    }
}

impl std::fmt::Display for DerivedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subtopic id → status, in curriculum document order.
pub type StatusMap = IndexMap<String, DerivedStatus>;

/// Status carried by a ledger record on its own, if it carries any signal.
fn record_signal(record: &ProgressRecord) -> Option<DerivedStatus> {
    if record.is_complete() {
        Some(DerivedStatus::Completed)
    } else if record.is_in_progress() {
        Some(DerivedStatus::Current)
    } else {
        None
    }
}

/// Ledger-only resolution for callers without a curriculum.
///
/// Never yields `locked`: an id with no record, or a blank record, is
/// treated as not yet visited.
pub fn resolve_subtopic_status(ledger: &ProgressLedger, sub_topic_id: &str) -> DerivedStatus {
    ledger
        .get(sub_topic_id)
        .and_then(record_signal)
        .unwrap_or(DerivedStatus::Available)
}

fn ratio(completed: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        completed as f64 / total as f64
    }
}

/// Completion roll-up of one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicProgress {
    pub index: usize,
    pub title: String,
    pub completed: usize,
    pub total: usize,
    /// Completion ratio in `0.0..=1.0`
    pub progress: f64,
    pub status: DerivedStatus,
}

/// Completion roll-up of one module, with its topics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleProgress {
    pub index: usize,
    pub title: String,
    pub completed: usize,
    pub total: usize,
    /// Completion ratio in `0.0..=1.0`
    pub progress: f64,
    pub status: DerivedStatus,
    pub topics: Vec<TopicProgress>,
}

impl ModuleProgress {
    pub fn is_finished(&self) -> bool {
        self.completed >= self.total
    }
}

fn count_completed<'a>(
    ledger: &ProgressLedger,
    subtopics: impl Iterator<Item = &'a crate::curriculum::Subtopic>,
) -> (usize, usize) {
    subtopics.fold((0, 0), |(completed, total), s| {
        let done = ledger.get(&s.id).is_some_and(ProgressRecord::is_complete);
        (completed + usize::from(done), total + 1)
    })
}

fn roll_up_module(
    index: usize,
    module: &Module,
    ledger: &ProgressLedger,
    gate_open: bool,
) -> ModuleProgress {
    let (completed, total) = count_completed(ledger, module.subtopics());

    // Topics chain the same way inside an open module; display only.
    let mut topics: Vec<TopicProgress> = Vec::with_capacity(module.topics.len());
    for (topic_index, topic) in module.topics.iter().enumerate() {
        let topic_gate = gate_open
            && topics
                .last()
                .map_or(true, |prev| prev.completed >= prev.total);
        let (done, count) = count_completed(ledger, topic.subtopics.iter());
        topics.push(TopicProgress {
            index: topic_index,
            title: topic.title.clone(),
            completed: done,
            total: count,
            progress: ratio(done, count),
            status: DerivedStatus::from_counts(done, count, topic_gate),
        });
    }

    ModuleProgress {
        index,
        title: module.title.clone(),
        completed,
        total,
        progress: ratio(completed, total),
        status: DerivedStatus::from_counts(completed, total, gate_open),
        topics,
    }
}

/// Roll up every module of the tree, applying the unlock chain.
pub fn resolve_modules(tree: &CurriculumTree, ledger: &ProgressLedger) -> Vec<ModuleProgress> {
    let mut modules: Vec<ModuleProgress> = Vec::with_capacity(tree.modules().len());
    for (index, module) in tree.modules().iter().enumerate() {
        let gate_open = modules.last().map_or(true, ModuleProgress::is_finished);
        modules.push(roll_up_module(index, module, ledger, gate_open));
    }
    modules
}

/// Tree-aware status resolution over one curriculum and one ledger.
pub struct StatusResolver<'a> {
    tree: &'a CurriculumTree,
    ledger: &'a ProgressLedger,
    modules: Vec<ModuleProgress>,
}

impl<'a> StatusResolver<'a> {
    pub fn new(tree: &'a CurriculumTree, ledger: &'a ProgressLedger) -> Self {
        let modules = resolve_modules(tree, ledger);

        let orphans = ledger
            .records()
            .iter()
            .filter(|r| !tree.contains(&r.sub_topic_id))
            .count();
        if orphans > 0 {
            tracing::warn!(orphans, "ledger holds records outside the curriculum");
        }

        Self {
            tree,
            ledger,
            modules,
        }
    }

    pub fn tree(&self) -> &'a CurriculumTree {
        self.tree
    }

    pub fn ledger(&self) -> &'a ProgressLedger {
        self.ledger
    }

    pub fn modules(&self) -> &[ModuleProgress] {
        &self.modules
    }

    pub fn into_modules(self) -> Vec<ModuleProgress> {
        self.modules
    }

    pub fn module_status(&self, module_index: usize) -> Option<DerivedStatus> {
        self.modules.get(module_index).map(|m| m.status)
    }

    /// Status of one subtopic.
    ///
    /// Ledger signals win over the module gate. Without a signal the
    /// subtopic is `locked` when its module is locked and `available`
    /// otherwise, including ids the tree does not know.
    pub fn subtopic_status(&self, sub_topic_id: &str) -> DerivedStatus {
        if let Some(status) = self.ledger.get(sub_topic_id).and_then(record_signal) {
            return status;
        }

        match self.tree.locate(sub_topic_id) {
            Some(location) if self.module_status(location.module_index) == Some(DerivedStatus::Locked) => {
                DerivedStatus::Locked
            }
            _ => DerivedStatus::Available,
        }
    }

    /// Statuses of one module's subtopics in document order
    pub fn module_subtopic_statuses(&self, module_index: usize) -> Vec<(String, DerivedStatus)> {
        self.tree
            .modules()
            .get(module_index)
            .map(|module| {
                module
                    .subtopics()
                    .map(|s| (s.id.clone(), self.subtopic_status(&s.id)))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn status_map(&self) -> StatusMap {
        self.tree
            .subtopics()
            .map(|s| (s.subtopic.id.clone(), self.subtopic_status(&s.subtopic.id)))
            .collect()
    }
}

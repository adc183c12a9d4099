//! Shared derivation engine.
//!
//! Every view (day plan, module list, quest map, practice picker) derives
//! from the same curriculum and ledger through this type, so two views can
//! never disagree on a subtopic's status.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::curriculum::CurriculumTree;
use crate::error::Result;
use crate::events::Event;
use crate::layout::{self, QuestMap};
use crate::ledger::ProgressLedger;
use crate::pacing::{self, DayBlock};
use crate::progress::{self, AggregateProgress};
use crate::review::{self, ReviewEntry, ReviewItem};
use crate::status::{ModuleProgress, StatusMap, StatusResolver};

/// Everything derived from one curriculum and one ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Derivation {
    pub statuses: StatusMap,
    pub modules: Vec<ModuleProgress>,
    pub progress: AggregateProgress,
    pub days: Vec<DayBlock>,
    pub current_day: Option<u32>,
    pub map: QuestMap,
}

/// One validated curriculum plus the parameters its views use.
#[derive(Debug, Clone)]
pub struct CurriculumEngine {
    tree: CurriculumTree,
    config: EngineConfig,
}

impl CurriculumEngine {
    /// Create an engine with default config
    pub fn new(tree: CurriculumTree) -> Self {
        Self::with_config(tree, EngineConfig::default())
    }

    /// Create with custom config
    pub fn with_config(tree: CurriculumTree, config: EngineConfig) -> Self {
        Self { tree, config }
    }

    /// Parse and validate a curriculum document.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or an invalid tree.
    pub fn from_json(json: &str, config: EngineConfig) -> Result<Self> {
        Ok(Self::with_config(CurriculumTree::from_json(json)?, config))
    }

    pub fn tree(&self) -> &CurriculumTree {
        &self.tree
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Swap in a new curriculum, returning the event to publish.
    pub fn replace_tree(&mut self, tree: CurriculumTree) -> Event {
        self.tree = tree;
        Event::CurriculumReplaced {
            subtopics: self.tree.subtopic_count(),
            at: Utc::now(),
        }
    }

    pub fn resolver<'a>(&'a self, ledger: &'a ProgressLedger) -> StatusResolver<'a> {
        StatusResolver::new(&self.tree, ledger)
    }

    pub fn status_map(&self, ledger: &ProgressLedger) -> StatusMap {
        self.resolver(ledger).status_map()
    }

    pub fn modules(&self, ledger: &ProgressLedger) -> Vec<ModuleProgress> {
        self.resolver(ledger).into_modules()
    }

    pub fn aggregate(&self, ledger: &ProgressLedger) -> AggregateProgress {
        progress::aggregate_with(&self.tree, ledger, self.config.progress.reconciliation)
    }

    pub fn plan(&self, ledger: &ProgressLedger, today: NaiveDate) -> Vec<DayBlock> {
        pacing::partition_into_days(&self.resolver(ledger), &self.config.pacing, today)
    }

    pub fn quest_map(&self, ledger: &ProgressLedger) -> QuestMap {
        layout::layout(&self.resolver(ledger), &self.config.layout)
    }

    pub fn review_queue(&self, now: DateTime<Utc>, entries: &[ReviewEntry]) -> Vec<ReviewItem> {
        review::build_review_queue(now, entries, &self.config.review)
    }

    /// Derive every view at once, resolving statuses a single time.
    pub fn derive(&self, ledger: &ProgressLedger, today: NaiveDate) -> Derivation {
        let resolver = self.resolver(ledger);
        let days = pacing::partition_into_days(&resolver, &self.config.pacing, today);
        let map = layout::layout(&resolver, &self.config.layout);

        let derivation = Derivation {
            statuses: resolver.status_map(),
            progress: self.aggregate(ledger),
            current_day: pacing::current_day(&days),
            days,
            map,
            modules: resolver.into_modules(),
        };

        tracing::debug!(
            subtopics = derivation.statuses.len(),
            percent = derivation.progress.percent,
            days = derivation.days.len(),
            "derived curriculum views"
        );
        derivation
    }
}

//! # Questmap Core Library
//!
//! This library is the derivation engine behind a personalized curriculum
//! viewer. It takes a static curriculum (modules → topics → subtopics) and a
//! sparse, externally owned progress ledger, and derives everything the
//! views show. Every derivation is a pure function of its inputs; the
//! library owns no network access and no learner storage.
//!
//! ## Architecture
//!
//! - **Curriculum**: validated, immutable tree with a subtopic index
//! - **Ledger**: per-subtopic progress records, tolerated stale or partial
//! - **Status**: subtopic statuses, module/topic roll-ups, unlock chain
//! - **Progress**: overall completion with ledger/tree reconciliation
//! - **Pacing**: fixed-size day blocks with synthetic dates
//! - **Layout**: quest map nodes, checkpoints, edges, current position
//! - **Review**: spaced-repetition urgency bands and queue ordering
//!
//! ## Key Components
//!
//! - [`CurriculumEngine`]: one entry point deriving every view
//! - [`StatusResolver`]: single source of truth for learning status
//! - [`EngineConfig`]: TOML configuration of the derivations
//! - [`EventBus`]: notifies views that their inputs changed

pub mod config;
pub mod curriculum;
pub mod engine;
pub mod error;
pub mod events;
pub mod layout;
pub mod ledger;
pub mod pacing;
pub mod progress;
pub mod review;
pub mod status;

pub use config::{data_dir, EngineConfig, ProgressConfig};
pub use curriculum::{CurriculumTree, Module, RawCurriculum, Subtopic, Topic};
pub use engine::{CurriculumEngine, Derivation};
pub use error::{ConfigError, CoreError, InvalidTreeError, Result};
pub use events::{Event, EventBus};
pub use layout::{GraphEdge, GraphNode, LayoutConfig, NodeKind, Point, PositionMarker, QuestMap};
pub use ledger::{ProgressLedger, ProgressRecord, RecordStatus};
pub use pacing::{DayBlock, PacingConfig, PlannedSubtopic, Priority};
pub use progress::{aggregate, AggregateProgress, ReconciliationPolicy};
pub use review::{
    build_review_queue, classify, ReviewConfig, ReviewEntry, ReviewItem, ReviewSummary,
    Urgency, UrgencyBand,
};
pub use status::{
    resolve_subtopic_status, DerivedStatus, ModuleProgress, StatusMap, StatusResolver,
    TopicProgress,
};

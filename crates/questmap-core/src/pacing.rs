//! Day-by-day study plan.
//!
//! Subtopics are taken in document order and cut into fixed-size blocks,
//! one per day starting today. The dates are a projection for display and
//! do not follow the learner's real pace.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::progress::percent_of;
use crate::status::{DerivedStatus, StatusResolver};

/// Pacing parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Subtopics per day block
    #[serde(default = "default_subtopics_per_day")]
    pub subtopics_per_day: usize,
    /// Estimate used when a subtopic carries none
    #[serde(default = "default_minutes_per_subtopic")]
    pub minutes_per_subtopic: u32,
}

fn default_subtopics_per_day() -> usize {
    3
}
fn default_minutes_per_subtopic() -> u32 {
    30
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            subtopics_per_day: default_subtopics_per_day(),
            minutes_per_subtopic: default_minutes_per_subtopic(),
        }
    }
}

/// Display priority of a planned subtopic, by day position only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// `high` for day 1, `medium` for day 2, `low` afterwards
    pub fn for_day(day: u32) -> Self {
        match day {
            0 | 1 => Self::High,
            2 => Self::Medium,
            _ => Self::Low,
        }
    }
}

/// A subtopic placed on a day, with its context and resolved status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedSubtopic {
    pub id: String,
    pub title: String,
    pub module_index: usize,
    pub module_title: String,
    pub topic_title: String,
    pub status: DerivedStatus,
    pub priority: Priority,
    pub estimated_minutes: u32,
    pub has_learn: bool,
    pub has_quiz: bool,
    pub has_code_challenge: bool,
}

/// One day of the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayBlock {
    /// 1-based day number
    pub day: u32,
    pub date: NaiveDate,
    pub topics: Vec<PlannedSubtopic>,
    pub total_minutes: u64,
    /// Completed share of this block in `0.0..=100.0`
    pub completion_rate: f64,
}

impl DayBlock {
    pub fn is_complete(&self) -> bool {
        self.topics.iter().all(|t| t.status == DerivedStatus::Completed)
    }
}

/// Partition the resolver's tree into day blocks starting at `today`.
///
/// A block size of zero is treated as one. An empty tree yields no blocks.
pub fn partition_into_days(
    resolver: &StatusResolver<'_>,
    config: &PacingConfig,
    today: NaiveDate,
) -> Vec<DayBlock> {
    let per_day = if config.subtopics_per_day == 0 {
        tracing::warn!("subtopics_per_day is 0, planning one subtopic per day");
        1
    } else {
        config.subtopics_per_day
    };

    let planned: Vec<_> = resolver.tree().subtopics().collect();

    let days: Vec<DayBlock> = planned
        .chunks(per_day)
        .enumerate()
        .map(|(block_index, chunk)| {
            let day = u32::try_from(block_index + 1).unwrap_or(u32::MAX);
            let topics: Vec<PlannedSubtopic> = chunk
                .iter()
                .map(|s| PlannedSubtopic {
                    id: s.subtopic.id.clone(),
                    title: s.subtopic.title.clone(),
                    module_index: s.location.module_index,
                    module_title: s.module.title.clone(),
                    topic_title: s.topic.title.clone(),
                    status: resolver.subtopic_status(&s.subtopic.id),
                    priority: Priority::for_day(day),
                    estimated_minutes: s
                        .subtopic
                        .estimated_minutes
                        .unwrap_or(config.minutes_per_subtopic),
                    has_learn: s.subtopic.has_learn,
                    has_quiz: s.subtopic.has_quiz,
                    has_code_challenge: s.subtopic.has_code_challenge,
                })
                .collect();

            let completed = topics
                .iter()
                .filter(|t| t.status == DerivedStatus::Completed)
                .count();

            DayBlock {
                day,
                date: today
                    .checked_add_days(Days::new(block_index as u64))
                    .unwrap_or(NaiveDate::MAX),
                total_minutes: topics.iter().map(|t| u64::from(t.estimated_minutes)).sum(),
                completion_rate: completion_rate(completed, topics.len()),
                topics,
            }
        })
        .collect();

    tracing::debug!(subtopics = planned.len(), per_day, days = days.len(), "partitioned study plan");
    days
}

fn completion_rate(completed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64 * 100.0
    }
}

/// First day not fully completed, if any
pub fn current_day(days: &[DayBlock]) -> Option<u32> {
    days.iter().find(|d| !d.is_complete()).map(|d| d.day)
}

/// Rounded completion rate of a whole plan
pub fn plan_percent(days: &[DayBlock]) -> u8 {
    let total: usize = days.iter().map(|d| d.topics.len()).sum();
    let completed = days
        .iter()
        .flat_map(|d| d.topics.iter())
        .filter(|t| t.status == DerivedStatus::Completed)
        .count();
    percent_of(completed, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curriculum::{CurriculumTree, Module, Subtopic, Topic};
    use crate::ledger::{ProgressLedger, ProgressRecord};

    fn tree_with(counts: &[usize]) -> CurriculumTree {
        let modules = counts
            .iter()
            .enumerate()
            .map(|(m, &n)| {
                Module::new(
                    format!("Module {}", m + 1),
                    vec![Topic::new(
                        "T",
                        (1..=n).map(|i| Subtopic::new(format!("m{}-{i}", m + 1), format!("S{i}"))).collect(),
                    )],
                )
            })
            .collect();
        CurriculumTree::new(modules).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 30).unwrap()
    }

    #[test]
    fn blocks_follow_document_order_with_short_tail() {
        let tree = tree_with(&[3, 4]);
        let ledger = ProgressLedger::empty();
        let resolver = StatusResolver::new(&tree, &ledger);
        let days = partition_into_days(&resolver, &PacingConfig::default(), today());

        assert_eq!(days.len(), 3);
        let sizes: Vec<_> = days.iter().map(|d| d.topics.len()).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
        assert_eq!(days[1].topics[0].id, "m2-1");
        assert_eq!(days[2].topics[0].id, "m2-4");
    }

    #[test]
    fn dates_count_up_from_today_across_month_end() {
        let tree = tree_with(&[7]);
        let ledger = ProgressLedger::empty();
        let resolver = StatusResolver::new(&tree, &ledger);
        let days = partition_into_days(&resolver, &PacingConfig::default(), today());

        let dates: Vec<_> = days.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, vec!["2026-03-30", "2026-03-31", "2026-04-01"]);
        assert_eq!(days.iter().map(|d| d.day).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn priority_and_minutes_per_block() {
        let mut tree_modules = tree_with(&[7]).modules().to_vec();
        tree_modules[0].topics[0].subtopics[0].estimated_minutes = Some(45);
        let tree = CurriculumTree::new(tree_modules).unwrap();
        let ledger = ProgressLedger::empty();
        let resolver = StatusResolver::new(&tree, &ledger);
        let days = partition_into_days(&resolver, &PacingConfig::default(), today());

        assert!(days[0].topics.iter().all(|t| t.priority == Priority::High));
        assert!(days[1].topics.iter().all(|t| t.priority == Priority::Medium));
        assert_eq!(days[2].topics[0].priority, Priority::Low);
        assert_eq!(days[0].total_minutes, 45 + 30 + 30);
        assert_eq!(days[2].total_minutes, 30);
    }

    #[test]
    fn huge_estimates_do_not_overflow_block_minutes() {
        let tree = CurriculumTree::new(vec![Module::new(
            "Capstone",
            vec![Topic::new(
                "Projects",
                vec![
                    Subtopic::new("p1", "Compiler").with_estimated_minutes(4_000_000_000),
                    Subtopic::new("p2", "Kernel")
                        .with_estimated_minutes(u32::MAX)
                        .with_code_challenge(),
                ],
            )],
        )])
        .unwrap();
        let ledger = ProgressLedger::empty();
        let resolver = StatusResolver::new(&tree, &ledger);
        let days = partition_into_days(&resolver, &PacingConfig::default(), today());

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].total_minutes, 4_000_000_000 + u64::from(u32::MAX));
        assert!(days[0].topics[1].has_code_challenge);
        assert!(!days[0].topics[0].has_code_challenge);
    }

    #[test]
    fn completion_rate_counts_resolved_completions() {
        let tree = tree_with(&[3, 3]);
        let ledger = ProgressLedger::new(vec![
            ProgressRecord::completed("m1-1"),
            ProgressRecord::new("m1-2").with_learn_completed(),
        ]);
        let resolver = StatusResolver::new(&tree, &ledger);
        let days = partition_into_days(&resolver, &PacingConfig::default(), today());

        assert!((days[0].completion_rate - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(days[0].topics[1].status, DerivedStatus::Current);
        assert_eq!(days[1].completion_rate, 0.0);
        assert_eq!(days[1].topics[0].status, DerivedStatus::Locked);
        assert_eq!(current_day(&days), Some(1));
        assert_eq!(plan_percent(&days), 17);
    }

    #[test]
    fn zero_block_size_is_clamped() {
        let tree = tree_with(&[2]);
        let ledger = ProgressLedger::empty();
        let resolver = StatusResolver::new(&tree, &ledger);
        let config = PacingConfig {
            subtopics_per_day: 0,
            ..PacingConfig::default()
        };
        assert_eq!(partition_into_days(&resolver, &config, today()).len(), 2);
    }

    #[test]
    fn empty_tree_has_no_plan() {
        let tree = tree_with(&[0, 0]);
        let ledger = ProgressLedger::empty();
        let resolver = StatusResolver::new(&tree, &ledger);
        let days = partition_into_days(&resolver, &PacingConfig::default(), today());
        assert!(days.is_empty());
        assert_eq!(current_day(&days), None);
    }

    #[test]
    fn date_serializes_as_iso_day() {
        let tree = tree_with(&[1]);
        let ledger = ProgressLedger::empty();
        let resolver = StatusResolver::new(&tree, &ledger);
        let days = partition_into_days(&resolver, &PacingConfig::default(), today());
        let json = serde_json::to_value(&days[0]).unwrap();
        assert_eq!(json["date"], "2026-03-30");
        assert_eq!(json["topics"][0]["priority"], "high");
    }
}

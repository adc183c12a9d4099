//! Spaced-repetition review urgency.
//!
//! Urgency depends only on `now - next_review_date`, rounded up to whole
//! days: positive is overdue, zero is due today, negative is due soon.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Review window parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Due-soon items within this many days are flagged `within_window`
    #[serde(default = "default_window_days")]
    pub window_days: i64,
}

fn default_window_days() -> i64 {
    7
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyBand {
    Overdue,
    DueToday,
    DueSoon,
}

impl UrgencyBand {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Overdue => "Overdue",
            Self::DueToday => "Due today",
            Self::DueSoon => "Due soon",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Urgency {
    /// `ceil((now - review_date) / 1 day)`
    pub days_delta: i64,
    pub band: UrgencyBand,
}

/// Classify one review date against `now`.
pub fn classify(now: DateTime<Utc>, review_date: DateTime<Utc>) -> Urgency {
    let elapsed_ms = (now - review_date).num_milliseconds();
    // Integer division truncates toward zero, which is already the ceiling
    // for negative values.
    let days_delta = if elapsed_ms > 0 && elapsed_ms % MS_PER_DAY != 0 {
        elapsed_ms / MS_PER_DAY + 1
    } else {
        elapsed_ms / MS_PER_DAY
    };

    let band = match days_delta {
        d if d > 0 => UrgencyBand::Overdue,
        0 => UrgencyBand::DueToday,
        _ => UrgencyBand::DueSoon,
    };

    Urgency { days_delta, band }
}

/// A subtopic scheduled for review, as supplied by the review service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewEntry {
    pub sub_topic_id: String,
    pub title: String,
    #[serde(default)]
    pub module_title: String,
    #[serde(default)]
    pub topic_title: String,
    #[serde(default)]
    pub subject: String,
    pub next_review_date: DateTime<Utc>,
}

/// A review entry with its urgency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub sub_topic_id: String,
    pub title: String,
    pub module_title: String,
    pub topic_title: String,
    pub subject: String,
    pub next_review_date: DateTime<Utc>,
    pub days_delta: i64,
    pub band: UrgencyBand,
    pub within_window: bool,
}

/// Item counts per band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub overdue: usize,
    pub due_today: usize,
    pub due_soon: usize,
}

impl ReviewSummary {
    pub fn of(items: &[ReviewItem]) -> Self {
        items.iter().fold(Self::default(), |mut summary, item| {
            match item.band {
                UrgencyBand::Overdue => summary.overdue += 1,
                UrgencyBand::DueToday => summary.due_today += 1,
                UrgencyBand::DueSoon => summary.due_soon += 1,
            }
            summary
        })
    }

    /// Items needing attention now
    pub fn actionable(&self) -> usize {
        self.overdue + self.due_today
    }
}

/// Classify every entry and order them most overdue first.
///
/// Ties on the review date are broken by sub-topic id.
pub fn build_review_queue(
    now: DateTime<Utc>,
    entries: &[ReviewEntry],
    config: &ReviewConfig,
) -> Vec<ReviewItem> {
    let mut items: Vec<ReviewItem> = entries
        .iter()
        .map(|entry| {
            let urgency = classify(now, entry.next_review_date);
            ReviewItem {
                sub_topic_id: entry.sub_topic_id.clone(),
                title: entry.title.clone(),
                module_title: entry.module_title.clone(),
                topic_title: entry.topic_title.clone(),
                subject: entry.subject.clone(),
                next_review_date: entry.next_review_date,
                days_delta: urgency.days_delta,
                band: urgency.band,
                within_window: urgency.band != UrgencyBand::DueSoon
                    || -urgency.days_delta <= config.window_days,
            }
        })
        .collect();

    items.sort_by(|a, b| {
        a.next_review_date
            .cmp(&b.next_review_date)
            .then_with(|| a.sub_topic_id.cmp(&b.sub_topic_id))
    });
    items
}

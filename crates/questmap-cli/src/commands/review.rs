//! Review queue command.

use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use questmap_core::{build_review_queue, EngineConfig, ReviewEntry, ReviewItem, ReviewSummary};

use super::print_json;

#[derive(Args)]
pub struct ReviewArgs {
    /// JSON array of review entries
    #[arg(long)]
    pub queue: PathBuf,
    /// Reference time, RFC 3339 (default: now)
    #[arg(long)]
    pub now: Option<DateTime<Utc>>,
    /// Days ahead counted as within the review window (default from config)
    #[arg(long)]
    pub window: Option<i64>,
    /// Only print counts per urgency band
    #[arg(long)]
    pub summary: bool,
}

#[derive(Serialize)]
struct LabeledItem<'a> {
    #[serde(flatten)]
    item: &'a ReviewItem,
    label: &'static str,
}

#[derive(Serialize)]
struct ReviewOutput<'a> {
    summary: ReviewSummary,
    items: Vec<LabeledItem<'a>>,
}

pub fn run(args: ReviewArgs) -> Result<(), Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(&args.queue)
        .map_err(|e| format!("cannot read {}: {e}", args.queue.display()))?;
    let entries: Vec<ReviewEntry> = serde_json::from_str(&content)?;

    let mut config = EngineConfig::load_or_default().review;
    if let Some(window) = args.window {
        if window < 0 {
            return Err("--window must not be negative".into());
        }
        config.window_days = window;
    }

    let items = build_review_queue(args.now.unwrap_or_else(Utc::now), &entries, &config);
    let summary = ReviewSummary::of(&items);
    tracing::debug!(items = items.len(), actionable = summary.actionable(), "built review queue");

    if args.summary {
        print_json(&summary)
    } else {
        print_json(&ReviewOutput {
            summary,
            items: items
                .iter()
                .map(|item| LabeledItem {
                    item,
                    label: item.band.label(),
                })
                .collect(),
        })
    }
}

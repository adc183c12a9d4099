//! Derivation commands over a curriculum and a ledger.

use chrono::{Local, NaiveDate};
use clap::{Args, ValueEnum};
use serde::Serialize;

use questmap_core::pacing;
use questmap_core::{CurriculumEngine, EngineConfig, ProgressLedger, ReconciliationPolicy};

use super::inputs::{Inputs, TreeArg};
use super::print_json;

#[derive(Args)]
pub struct StatusArgs {
    #[command(flatten)]
    pub inputs: Inputs,
    /// Print module and topic roll-ups instead of per-subtopic statuses
    #[arg(long)]
    pub modules: bool,
    /// Drop locked subtopics from the status map
    #[arg(long, conflicts_with = "modules")]
    pub accessible: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    /// Denominator is the larger of ledger records and tree subtopics
    LedgerMax,
    /// Denominator is the tree's subtopic count
    TreeAuthoritative,
}

impl From<PolicyArg> for ReconciliationPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::LedgerMax => ReconciliationPolicy::LedgerMax,
            PolicyArg::TreeAuthoritative => ReconciliationPolicy::TreeAuthoritative,
        }
    }
}

#[derive(Args)]
pub struct ProgressArgs {
    #[command(flatten)]
    pub inputs: Inputs,
    /// Override the configured reconciliation policy
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,
}

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub inputs: Inputs,
    /// Subtopics per day (default from config)
    #[arg(long)]
    pub per_day: Option<usize>,
    /// First day of the plan, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub start: Option<NaiveDate>,
    /// Only print this day number
    #[arg(long)]
    pub day: Option<u32>,
}

#[derive(Args)]
pub struct MapArgs {
    #[command(flatten)]
    pub inputs: Inputs,
    /// Override the configured node spacing
    #[arg(long)]
    pub spacing: Option<f64>,
    /// Print edges as SVG path data
    #[arg(long)]
    pub svg: bool,
}

#[derive(Args)]
pub struct DeriveArgs {
    #[command(flatten)]
    pub inputs: Inputs,
    /// First day of the plan, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub start: Option<NaiveDate>,
}

#[derive(Serialize)]
struct TreeSummary<'a> {
    title: Option<&'a str>,
    subject: Option<&'a str>,
    modules: usize,
    topics: usize,
    subtopics: usize,
}

#[derive(Serialize)]
struct PlanOutput<'a> {
    current_day: Option<u32>,
    percent: u8,
    days: &'a [pacing::DayBlock],
}

#[derive(Serialize)]
struct SvgEdge<'a> {
    from: &'a str,
    to: &'a str,
    d: String,
}

fn load_engine(
    inputs: &Inputs,
    config: EngineConfig,
) -> Result<(CurriculumEngine, ProgressLedger), Box<dyn std::error::Error>> {
    let (tree, ledger) = inputs.load()?;
    Ok((CurriculumEngine::with_config(tree, config), ledger))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn validate(arg: TreeArg) -> Result<(), Box<dyn std::error::Error>> {
    let tree = arg.load()?;
    print_json(&TreeSummary {
        title: tree.title.as_deref(),
        subject: tree.subject.as_deref(),
        modules: tree.modules().len(),
        topics: tree.modules().iter().map(|m| m.topics.len()).sum(),
        subtopics: tree.subtopic_count(),
    })
}

pub fn status(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (engine, ledger) = load_engine(&args.inputs, EngineConfig::load_or_default())?;
    if args.modules {
        print_json(&engine.modules(&ledger))
    } else {
        let mut map = engine.status_map(&ledger);
        if args.accessible {
            map.retain(|_, status| status.is_accessible());
        }
        print_json(&map)
    }
}

pub fn progress(args: ProgressArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = EngineConfig::load_or_default();
    if let Some(policy) = args.policy {
        config.progress.reconciliation = policy.into();
    }
    let (engine, ledger) = load_engine(&args.inputs, config)?;
    print_json(&engine.aggregate(&ledger))
}

pub fn plan(args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = EngineConfig::load_or_default();
    if let Some(per_day) = args.per_day {
        if per_day == 0 {
            return Err("--per-day must be at least 1".into());
        }
        config.pacing.subtopics_per_day = per_day;
    }
    let (engine, ledger) = load_engine(&args.inputs, config)?;
    let days = engine.plan(&ledger, args.start.unwrap_or_else(today));

    match args.day {
        Some(day) => {
            let block = days
                .iter()
                .find(|d| d.day == day)
                .ok_or_else(|| format!("plan has {} days, no day {day}", days.len()))?;
            print_json(block)
        }
        None => print_json(&PlanOutput {
            current_day: pacing::current_day(&days),
            percent: pacing::plan_percent(&days),
            days: &days,
        }),
    }
}

pub fn map(args: MapArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = EngineConfig::load_or_default();
    if let Some(spacing) = args.spacing {
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err("--spacing must be a positive number".into());
        }
        config.layout.spacing = spacing;
    }
    let (engine, ledger) = load_engine(&args.inputs, config)?;
    let map = engine.quest_map(&ledger);

    if args.svg {
        let edges: Vec<SvgEdge<'_>> = map
            .edges
            .iter()
            .map(|e| SvgEdge {
                from: &e.from,
                to: &e.to,
                d: e.path.to_svg(),
            })
            .collect();
        print_json(&edges)
    } else {
        print_json(&map)
    }
}

pub fn derive(args: DeriveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (engine, ledger) = load_engine(&args.inputs, EngineConfig::load_or_default())?;
    print_json(&engine.derive(&ledger, args.start.unwrap_or_else(today)))
}

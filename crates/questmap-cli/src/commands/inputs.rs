//! Loading curriculum and ledger documents from disk.

use clap::Args;
use std::path::{Path, PathBuf};

use questmap_core::{CurriculumTree, ProgressLedger};

#[derive(Args, Debug, Clone)]
pub struct TreeArg {
    /// Curriculum JSON file
    #[arg(long)]
    pub tree: PathBuf,
}

impl TreeArg {
    pub fn load(&self) -> Result<CurriculumTree, Box<dyn std::error::Error>> {
        load_tree(&self.tree)
    }
}

#[derive(Args, Debug, Clone)]
pub struct Inputs {
    #[command(flatten)]
    pub tree: TreeArg,
    /// Progress ledger JSON file (omit for an empty ledger)
    #[arg(long)]
    pub ledger: Option<PathBuf>,
}

impl Inputs {
    pub fn load(&self) -> Result<(CurriculumTree, ProgressLedger), Box<dyn std::error::Error>> {
        let tree = self.tree.load()?;
        let ledger = match &self.ledger {
            Some(path) => load_ledger(path)?,
            None => ProgressLedger::empty(),
        };
        Ok((tree, ledger))
    }
}

fn read(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()).into())
}

pub fn load_tree(path: &Path) -> Result<CurriculumTree, Box<dyn std::error::Error>> {
    let tree = CurriculumTree::from_json(&read(path)?)?;
    tracing::debug!(path = %path.display(), subtopics = tree.subtopic_count(), "loaded curriculum");
    Ok(tree)
}

pub fn load_ledger(path: &Path) -> Result<ProgressLedger, Box<dyn std::error::Error>> {
    let ledger = ProgressLedger::from_json(&read(path)?)?;
    tracing::debug!(path = %path.display(), records = ledger.len(), "loaded ledger");
    Ok(ledger)
}

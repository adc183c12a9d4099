//! Quest map layout.
//!
//! Module nodes sit on one horizontal line, `spacing` apart. A checkpoint
//! node sits halfway between each pair of neighbours and mirrors the status
//! of the module before it. Edges join consecutive nodes with a quadratic
//! curve; the curve shape is a rendering aid, only node positions and edge
//! order are meaningful.

use serde::{Deserialize, Serialize};

use crate::ledger::ProgressLedger;
use crate::status::{DerivedStatus, StatusResolver};

/// Layout parameters in map units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_start_x")]
    pub start_x: f64,
    #[serde(default = "default_baseline_y")]
    pub baseline_y: f64,
    /// Distance between two module nodes
    #[serde(default = "default_spacing")]
    pub spacing: f64,
    /// Vertical offset of edge control points
    #[serde(default = "default_curve_offset")]
    pub curve_offset: f64,
}

fn default_start_x() -> f64 {
    120.0
}
fn default_baseline_y() -> f64 {
    300.0
}
fn default_spacing() -> f64 {
    260.0
}
fn default_curve_offset() -> f64 {
    60.0
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            start_x: default_start_x(),
            baseline_y: default_baseline_y(),
            spacing: default_spacing(),
            curve_offset: default_curve_offset(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Module,
    Checkpoint,
}

/// Progress dot shown on a module node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtopicDot {
    pub id: String,
    pub status: DerivedStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    pub title: String,
    /// Module this node belongs to; for checkpoints, the module before it
    pub module_index: usize,
    pub status: DerivedStatus,
    pub position: Point,
    /// Module completion ratio in `0.0..=1.0`
    pub progress: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtopics: Option<Vec<SubtopicDot>>,
}

/// Quadratic curve from `start` to `end` bent through `control`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePath {
    pub start: Point,
    pub control: Point,
    pub end: Point,
}

impl CurvePath {
    /// SVG path data, `M x y Q cx cy x y`
    pub fn to_svg(&self) -> String {
        format!(
            "M {} {} Q {} {} {} {}",
            self.start.x, self.start.y, self.control.x, self.control.y, self.end.x, self.end.y
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub path: CurvePath,
}

/// Where the learner currently is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionMarker {
    pub sub_topic_id: String,
    /// Module node holding the subtopic; `None` for ids the tree lacks
    pub node_id: Option<String>,
    pub position: Option<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestMap {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub current_position: Option<PositionMarker>,
    /// Horizontal extent covered by the nodes, padded by `start_x` on both sides
    pub width: f64,
}

impl QuestMap {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

pub fn module_node_id(module_index: usize) -> String {
    format!("module-{module_index}")
}

pub fn checkpoint_node_id(module_index: usize) -> String {
    format!("checkpoint-{module_index}")
}

/// Sub-topic id of the learner's position.
///
/// First record that is not complete, else the last record; `None` for an
/// empty ledger.
pub fn current_position_id(ledger: &ProgressLedger) -> Option<&str> {
    let records = ledger.records();
    records
        .iter()
        .find(|r| !r.is_complete())
        .or_else(|| records.last())
        .map(|r| r.sub_topic_id.as_str())
}

/// Lay out the resolver's tree as a quest map.
pub fn layout(resolver: &StatusResolver<'_>, config: &LayoutConfig) -> QuestMap {
    let modules = resolver.modules();
    let mut nodes: Vec<GraphNode> = Vec::with_capacity(modules.len() * 2);

    for (i, module) in modules.iter().enumerate() {
        let position = Point::new(config.start_x + i as f64 * config.spacing, config.baseline_y);

        let dots = resolver
            .module_subtopic_statuses(i)
            .into_iter()
            .map(|(id, status)| SubtopicDot { id, status })
            .collect();

        nodes.push(GraphNode {
            id: module_node_id(i),
            kind: NodeKind::Module,
            title: module.title.clone(),
            module_index: i,
            status: module.status,
            position,
            progress: module.progress,
            subtopics: Some(dots),
        });

        if i + 1 < modules.len() {
            nodes.push(GraphNode {
                id: checkpoint_node_id(i),
                kind: NodeKind::Checkpoint,
                title: format!("Checkpoint {}", i + 1),
                module_index: i,
                status: module.status,
                position: Point::new(position.x + config.spacing / 2.0, config.baseline_y),
                progress: module.progress,
                subtopics: None,
            });
        }
    }

    let edges = nodes
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let (from, to) = (&pair[0], &pair[1]);
            let mid = from.position.midpoint(&to.position);
            // Alternate up and down so the trail reads as a path.
            let offset = if i % 2 == 0 { -config.curve_offset } else { config.curve_offset };
            GraphEdge {
                from: from.id.clone(),
                to: to.id.clone(),
                path: CurvePath {
                    start: from.position,
                    control: Point::new(mid.x, mid.y + offset),
                    end: to.position,
                },
            }
        })
        .collect();

    let current_position = current_position_id(resolver.ledger()).map(|id| {
        let node = resolver
            .tree()
            .locate(id)
            .and_then(|loc| nodes.iter().find(|n| n.kind == NodeKind::Module && n.module_index == loc.module_index));
        PositionMarker {
            sub_topic_id: id.to_string(),
            node_id: node.map(|n| n.id.clone()),
            position: node.map(|n| n.position),
        }
    });

    let width = match nodes.last() {
        Some(last) => last.position.x + config.start_x,
        None => 0.0,
    };

    tracing::debug!(nodes = nodes.len(), "laid out quest map");

    QuestMap {
        nodes,
        edges,
        current_position,
        width,
    }
}

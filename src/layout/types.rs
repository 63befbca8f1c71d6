use crate::graph::Direction;
use crate::ir::NodeRecord;

use super::levels::LevelAssignment;
use super::paths::PathCommand;

#[derive(Debug, Clone)]
pub struct NodeLayout {
    pub index: usize,
    pub id: i64,
    pub label: String,
    pub record: NodeRecord,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl NodeLayout {
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

#[derive(Debug, Clone)]
pub struct LinkLayout {
    /// Position of the link in the graph's link list.
    pub index: usize,
    /// `None` for the TOP link.
    pub from: Option<i64>,
    pub to: i64,
    pub rargname: String,
    pub post: String,
    pub label: String,
    pub is_top: bool,
    pub direction: Direction,
    pub level: i32,
    pub path: Vec<PathCommand>,
    pub label_anchor: (f32, f32),
    pub arrow: bool,
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub nodes: Vec<NodeLayout>,
    pub links: Vec<LinkLayout>,
    pub levels: LevelAssignment,
    pub surface: Option<String>,
    /// Top and bottom edge of the node row.
    pub line_top: f32,
    pub line_bottom: f32,
    pub width: f32,
    pub height: f32,
}

impl Layout {
    pub fn node(&self, node_id: i64) -> Option<&NodeLayout> {
        self.nodes.iter().find(|node| node.id == node_id)
    }
}

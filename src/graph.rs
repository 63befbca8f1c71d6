use crate::config::{LayoutConfig, NodeOrder};
use crate::error::{DmrsError, Result};
use crate::ir::{Document, LinkRecord, NodeRecord};
use crate::text_metrics::text_width;
use crate::theme::Theme;
use std::collections::HashMap;
use tracing::debug;

/// Side of the node line an arc is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Direction {
    Above,
    Below,
}

impl Direction {
    /// `+1` above the line, `-1` below it.
    pub fn sign(self) -> i32 {
        match self {
            Direction::Above => 1,
            Direction::Below => -1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GraphNode {
    pub index: usize,
    pub id: i64,
    pub label: String,
    pub record: NodeRecord,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone)]
pub struct GraphLink {
    /// `None` for the TOP link.
    pub source: Option<usize>,
    pub target: usize,
    pub is_top: bool,
    pub direction: Direction,
    pub span: usize,
    /// Lane assigned by [`crate::layout::assign_levels`].
    pub level: Option<i32>,
    pub rargname: String,
    pub post: String,
}

impl GraphLink {
    /// Equality link with no argument role; drawn without an arrowhead.
    pub fn is_bare_eq(&self) -> bool {
        self.rargname.is_empty() && self.post == "EQ"
    }

    pub fn is_eq(&self) -> bool {
        self.post == "EQ"
    }

    pub fn is_handle(&self) -> bool {
        self.post.eq_ignore_ascii_case("H") || self.post.eq_ignore_ascii_case("HEQ")
    }

    pub fn is_argument(&self) -> bool {
        !self.is_top && !self.rargname.is_empty()
    }

    /// Gap indices `[min, max)` the arc crosses; empty for TOP links and self loops.
    pub fn gaps(&self) -> std::ops::Range<usize> {
        match self.source {
            Some(source) => source.min(self.target)..source.max(self.target),
            None => 0..0,
        }
    }

    pub fn label(&self) -> String {
        if self.is_top {
            "TOP".to_string()
        } else if self.rargname.is_empty() {
            self.post.clone()
        } else {
            format!("{}/{}", self.rargname, self.post)
        }
    }
}

/// Bare equalities and handle links are routed below the node line.
pub fn link_direction(rargname: &str, post: &str) -> Direction {
    if (rargname.is_empty() && post == "EQ") || post.eq_ignore_ascii_case("H") {
        Direction::Below
    } else {
        Direction::Above
    }
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
    pub surface: Option<String>,
    /// Node id of the TOP link's target.
    pub top: Option<i64>,
    /// Node id named by the document's `index` attribute.
    pub index: Option<i64>,
    index_of: HashMap<i64, usize>,
}

impl Graph {
    pub fn index_of(&self, node_id: i64) -> Option<usize> {
        self.index_of.get(&node_id).copied()
    }

    pub fn top_link(&self) -> Option<&GraphLink> {
        self.links.iter().find(|link| link.is_top)
    }

    /// Non-TOP links leaving the node at `index`.
    pub fn outgoing(&self, index: usize) -> impl Iterator<Item = &GraphLink> {
        self.links
            .iter()
            .filter(move |link| link.source == Some(index))
    }

    pub fn incoming(&self, index: usize) -> impl Iterator<Item = &GraphLink> {
        self.links
            .iter()
            .filter(move |link| !link.is_top && link.target == index)
    }
}

pub fn build_graph(doc: &Document, theme: &Theme, config: &LayoutConfig) -> Result<Graph> {
    let mut records: Vec<&NodeRecord> = doc.nodes.iter().collect();
    if config.node_order == NodeOrder::Surface {
        records.sort_by_key(|node| match node.span() {
            Some((cfrom, cto)) => (0, cfrom, cto),
            None => (1, 0, 0),
        });
    }

    let line_height = theme.font_size * config.label_line_height;
    let mut index_of = HashMap::with_capacity(records.len());
    let mut nodes = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        if index_of.insert(record.node_id, index).is_some() {
            return Err(DmrsError::DuplicateNode {
                node_id: record.node_id,
            });
        }
        let label = record.label();
        let label_width = text_width(
            &label,
            theme.font_size,
            &theme.font_family,
            config.fast_text_metrics,
        );
        nodes.push(GraphNode {
            index,
            id: record.node_id,
            width: (label_width + config.node_padding_x * 2.0).max(config.min_node_width),
            height: line_height + config.node_padding_y * 2.0,
            label,
            record: record.clone(),
        });
    }

    let links = doc
        .links
        .iter()
        .map(|link| resolve_link(link, &index_of))
        .collect::<Result<Vec<_>>>()?;

    debug!(nodes = nodes.len(), links = links.len(), "built graph");
    Ok(Graph {
        nodes,
        links,
        surface: doc.surface.clone(),
        top: doc.top(),
        index: doc.index,
        index_of,
    })
}

fn resolve_link(link: &LinkRecord, index_of: &HashMap<i64, usize>) -> Result<GraphLink> {
    let missing = |id: i64| DmrsError::MissingReference {
        from: link.from,
        to: link.to,
        missing: id,
    };
    let target = *index_of.get(&link.to).ok_or_else(|| missing(link.to))?;

    if link.is_top() {
        return Ok(GraphLink {
            source: None,
            target,
            is_top: true,
            direction: Direction::Above,
            span: 0,
            level: None,
            rargname: link.rargname.clone(),
            post: link.post.clone(),
        });
    }

    let source = *index_of.get(&link.from).ok_or_else(|| missing(link.from))?;
    Ok(GraphLink {
        source: Some(source),
        target,
        is_top: false,
        direction: link_direction(&link.rargname, &link.post),
        span: source.abs_diff(target),
        level: None,
        rargname: link.rargname.clone(),
        post: link.post.clone(),
    })
}

mod levels;
mod paths;
pub(crate) mod types;
pub use levels::{LaneOccupancy, LevelAssignment, assign_levels, compute_levels, processing_order};
pub use paths::{ArcGeometry, NodeLine, PathCommand, arc_geometry, lane_distance, path_to_svg, top_geometry};
pub use types::*;

use crate::config::LayoutConfig;
use crate::graph::Graph;
use crate::theme::Theme;
use tracing::debug;

pub fn compute_layout(graph: &Graph, theme: &Theme, config: &LayoutConfig) -> Layout {
    let levels = compute_levels(&graph.links, graph.nodes.len());
    let has_top = graph.top_link().is_some();
    let top_extent = if has_top {
        levels.top_link_level()
    } else {
        levels.max_top_level
    };
    let label_room = theme.link_font_size + config.label_offset;

    let line_top = config.margin
        + if top_extent > 0 {
            lane_distance(top_extent, config) + label_room
        } else {
            0.0
        };
    let row_height = graph
        .nodes
        .iter()
        .map(|node| node.height)
        .fold(0.0f32, f32::max);
    let line_bottom = line_top + row_height;

    let mut nodes = Vec::with_capacity(graph.nodes.len());
    let mut cursor = config.margin;
    for node in &graph.nodes {
        nodes.push(NodeLayout {
            index: node.index,
            id: node.id,
            label: node.label.clone(),
            record: node.record.clone(),
            x: cursor,
            y: line_top + (row_height - node.height) / 2.0,
            width: node.width,
            height: node.height,
        });
        cursor += node.width + config.node_spacing;
    }
    let width = if nodes.is_empty() {
        config.margin * 2.0
    } else {
        cursor - config.node_spacing + config.margin
    };

    let line = NodeLine {
        top: line_top,
        bottom: line_bottom,
    };
    let mut links = Vec::with_capacity(graph.links.len());
    for (idx, link) in graph.links.iter().enumerate() {
        let target = &nodes[link.target];
        let (level, geometry) = match link.source {
            None => {
                let level = levels.top_link_level();
                (level, top_geometry(target.center_x(), level, line, config))
            }
            Some(source_idx) => {
                let level = levels.level_of(idx).unwrap_or(link.direction.sign());
                let (start_x, end_x) = if source_idx == link.target {
                    (
                        target.center_x() - config.endpoint_nudge,
                        target.center_x() + config.endpoint_nudge,
                    )
                } else {
                    let source_x = nodes[source_idx].center_x();
                    let toward = if target.center_x() > source_x { 1.0 } else { -1.0 };
                    (source_x + config.endpoint_nudge * toward, target.center_x())
                };
                (
                    level,
                    arc_geometry(start_x, end_x, level, link.direction, line, config),
                )
            }
        };
        links.push(LinkLayout {
            index: idx,
            from: link.source.map(|source| nodes[source].id),
            to: target.id,
            rargname: link.rargname.clone(),
            post: link.post.clone(),
            label: link.label(),
            is_top: link.is_top,
            direction: link.direction,
            level,
            path: geometry.path,
            label_anchor: geometry.label_anchor,
            arrow: !link.is_bare_eq(),
        });
    }

    let below = if levels.max_bottom_level < 0 {
        lane_distance(levels.max_bottom_level, config) + label_room
    } else {
        0.0
    };
    let height = line_bottom + below + config.margin;

    debug!(
        nodes = nodes.len(),
        links = links.len(),
        max_top_level = levels.max_top_level,
        max_bottom_level = levels.max_bottom_level,
        width,
        height,
        "computed layout"
    );

    Layout {
        nodes,
        links,
        levels,
        surface: graph.surface.clone(),
        line_top,
        line_bottom,
        width,
        height,
    }
}

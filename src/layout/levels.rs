use std::collections::HashSet;
use std::ops::Range;

use crate::graph::{Graph, GraphLink};
use tracing::trace;

/// Occupied lanes per gap between consecutive nodes; entry `i` covers the
/// gap between node `i` and node `i + 1`.
#[derive(Debug, Clone, Default)]
pub struct LaneOccupancy {
    gaps: Vec<HashSet<i32>>,
}

impl LaneOccupancy {
    pub fn new(node_count: usize) -> Self {
        Self {
            gaps: vec![HashSet::new(); node_count.saturating_sub(1)],
        }
    }

    pub fn gap_count(&self) -> usize {
        self.gaps.len()
    }

    pub fn is_free(&self, gaps: Range<usize>, level: i32) -> bool {
        self.gaps[gaps].iter().all(|occupied| !occupied.contains(&level))
    }

    pub fn occupy(&mut self, gaps: Range<usize>, level: i32) {
        for occupied in &mut self.gaps[gaps] {
            occupied.insert(level);
        }
    }

    pub fn occupied(&self, gap: usize) -> Option<&HashSet<i32>> {
        self.gaps.get(gap)
    }
}

/// Result of one level-assignment pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
pub struct LevelAssignment {
    /// Signed lane per link, parallel to the graph's links; `None` for TOP links.
    pub levels: Vec<Option<i32>>,
    /// Largest lane used above the node line (0 if none).
    pub max_top_level: i32,
    /// Most negative lane used below the node line (0 if none).
    pub max_bottom_level: i32,
}

impl LevelAssignment {
    /// Lane of the TOP arc, clear of every other arc above the line.
    pub fn top_link_level(&self) -> i32 {
        self.max_top_level + 1
    }

    pub fn level_of(&self, link: usize) -> Option<i32> {
        self.levels.get(link).copied().flatten()
    }
}

/// Non-TOP link indices, shortest span first; equal spans keep document order.
pub fn processing_order(links: &[GraphLink]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..links.len()).filter(|&idx| !links[idx].is_top).collect();
    order.sort_by_key(|&idx| links[idx].span);
    order
}

pub fn compute_levels(links: &[GraphLink], node_count: usize) -> LevelAssignment {
    let mut occupancy = LaneOccupancy::new(node_count);
    let mut result = LevelAssignment {
        levels: vec![None; links.len()],
        max_top_level: 0,
        max_bottom_level: 0,
    };

    for idx in processing_order(links) {
        let link = &links[idx];
        let step = link.direction.sign();
        let gaps = link.gaps();
        let mut level = step;
        while !occupancy.is_free(gaps.clone(), level) {
            level += step;
        }
        occupancy.occupy(gaps, level);
        trace!(link = idx, span = link.span, level, "placed arc");

        if step > 0 {
            result.max_top_level = result.max_top_level.max(level);
        } else {
            result.max_bottom_level = result.max_bottom_level.min(level);
        }
        result.levels[idx] = Some(level);
    }

    result
}

/// Assigns `level` on every non-TOP link of `graph`, replacing any previous
/// assignment, and returns the pass's extents.
pub fn assign_levels(graph: &mut Graph) -> LevelAssignment {
    let assignment = compute_levels(&graph.links, graph.nodes.len());
    for (link, level) in graph.links.iter_mut().zip(&assignment.levels) {
        link.level = *level;
    }
    assignment
}

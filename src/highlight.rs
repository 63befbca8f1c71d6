use crate::graph::Graph;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Hover/click state of the diagram. A pinned selection ignores hover.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    pub selected_node_id: Option<i64>,
    pub pinned: bool,
}

impl SelectionState {
    pub fn hover(self, node_id: i64) -> Self {
        if self.pinned {
            return self;
        }
        Self {
            selected_node_id: Some(node_id),
            pinned: false,
        }
    }

    pub fn leave(self) -> Self {
        if self.pinned {
            return self;
        }
        Self::default()
    }

    /// Clicking pins a node; clicking the pinned node again releases it.
    pub fn click(self, node_id: i64) -> Self {
        if self.pinned && self.selected_node_id == Some(node_id) {
            return Self::default();
        }
        Self {
            selected_node_id: Some(node_id),
            pinned: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightSets {
    pub selected: i64,
    pub outbound: BTreeSet<i64>,
    pub inbound: BTreeSet<i64>,
    /// Nodes sharing a label with the selection through EQ links, itself included.
    pub label_set: BTreeSet<i64>,
    pub scope: BTreeSet<i64>,
}

impl HighlightSets {
    pub fn involves(&self, node_id: i64) -> bool {
        node_id == self.selected
            || self.outbound.contains(&node_id)
            || self.inbound.contains(&node_id)
            || self.label_set.contains(&node_id)
            || self.scope.contains(&node_id)
    }
}

pub fn highlight_for_state(graph: &Graph, state: SelectionState) -> Option<HighlightSets> {
    highlight_sets(graph, state.selected_node_id?)
}

/// `None` when `node_id` is not in the graph.
pub fn highlight_sets(graph: &Graph, node_id: i64) -> Option<HighlightSets> {
    let index = graph.index_of(node_id)?;
    let id_of = |idx: usize| graph.nodes[idx].id;

    let outbound = graph
        .outgoing(index)
        .filter(|link| link.is_argument())
        .map(|link| id_of(link.target))
        .collect();
    let inbound = graph
        .incoming(index)
        .filter(|link| link.is_argument())
        .filter_map(|link| link.source.map(id_of))
        .collect();
    let scope = graph
        .outgoing(index)
        .filter(|link| link.is_handle())
        .map(|link| id_of(link.target))
        .collect();

    let mut label_set = BTreeSet::from([index]);
    loop {
        let before = label_set.len();
        for link in graph.links.iter().filter(|link| link.is_eq()) {
            let Some(source) = link.source else {
                continue;
            };
            if label_set.contains(&source) || label_set.contains(&link.target) {
                label_set.insert(source);
                label_set.insert(link.target);
            }
        }
        if label_set.len() == before {
            break;
        }
    }

    Some(HighlightSets {
        selected: node_id,
        outbound,
        inbound,
        label_set: label_set.into_iter().map(id_of).collect(),
        scope,
    })
}

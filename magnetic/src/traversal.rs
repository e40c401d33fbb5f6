// Copyright 2025 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Non-visual navigation between selected nodes.
//!
//! Assistive technologies step through the *selected* nodes of a picker in
//! label order. Traversal stops at either end rather than cycling, so a
//! screen reader can announce that there is nothing further.

use alloc::vec::Vec;

use crate::node::{Node, NodeId, Phase};

/// Search direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Toward later labels.
    Forward,
    /// Toward earlier labels.
    Backward,
}

/// Returns the next selected node after `current` in label order.
///
/// - Nodes are ordered by label text (unlabeled nodes sort first); equal
///   labels keep their traversal order. Removing nodes are skipped.
/// - With no `current`, or one that is no longer present, the search starts
///   from the respective end.
/// - Returns `None` when nothing is selected or when no selected node lies
///   beyond `current` in `direction`.
pub fn next_selected<'a, I>(nodes: I, current: Option<NodeId>, direction: Direction) -> Option<NodeId>
where
    I: IntoIterator<Item = (NodeId, &'a Node)>,
{
    let mut ordered: Vec<(NodeId, &Node)> = nodes
        .into_iter()
        .filter(|(_, node)| node.phase() == Phase::Live)
        .collect();
    if !ordered.iter().any(|(_, node)| node.is_selected()) {
        return None;
    }
    ordered.sort_by(|(_, a), (_, b)| a.text().unwrap_or("").cmp(b.text().unwrap_or("")));

    let position = current.and_then(|id| ordered.iter().position(|(candidate, _)| *candidate == id));
    let found = match direction {
        Direction::Forward => {
            let from = position.map_or(0, |index| index + 1);
            ordered[from..].iter().find(|(_, node)| node.is_selected())
        }
        Direction::Backward => {
            let until = position.unwrap_or(ordered.len());
            ordered[..until].iter().rev().find(|(_, node)| node.is_selected())
        }
    };
    found.map(|(id, _)| *id)
}

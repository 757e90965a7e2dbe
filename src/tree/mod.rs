//! Branching move history.
//!
//! The active line is an owned `Vec<TreeNode>` from the root to the furthest
//! explored position; each node owns its side variations as separate vectors.
//! Forking moves a tail out of the line and into the fork node, swapping moves
//! it back, so no two places ever share a node.

use serde::{Deserialize, Serialize};

use crate::board::{MoveInput, MoveRecord, Position, START_FEN};
use crate::error::Result;
use crate::eval::EvalResult;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub fen: String,
    /// Move that produced this node; `None` for the root.
    #[serde(rename = "move", default)]
    pub mv: Option<MoveRecord>,
    /// Superseded continuations from this node, each non-empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variations: Vec<Vec<TreeNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<EvalResult>,
}

impl TreeNode {
    pub fn root(fen: String) -> Self {
        Self { fen, mv: None, variations: Vec::new(), analysis: None }
    }

    fn from_move(record: MoveRecord) -> Self {
        Self { fen: record.fen.clone(), mv: Some(record), variations: Vec::new(), analysis: None }
    }

    fn drop_empty_variations(&mut self) {
        self.variations.retain(|v| !v.is_empty());
        for v in &mut self.variations {
            for n in v.iter_mut() { n.drop_empty_variations(); }
        }
    }
}

/// How an accepted move changed the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    /// Played at the end of the line.
    Appended,
    /// Matched the existing next move; only the index moved.
    Advanced,
    /// Diverged from the line; the old tail became a variation.
    Forked,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MoveTree {
    line: Vec<TreeNode>,
    index: usize,
}

impl Default for MoveTree {
    fn default() -> Self { Self { line: vec![TreeNode::root(START_FEN.to_string())], index: 0 } }
}

impl MoveTree {
    pub fn new() -> Self { Self::default() }

    /// Fresh single-root tree; the FEN is validated and stored in canonical form.
    pub fn from_fen(fen: &str) -> Result<Self> {
        let pos = Position::from_fen(fen)?;
        Ok(Self { line: vec![TreeNode::root(pos.fen())], index: 0 })
    }

    /// Rebuilds a tree from a stored line. `None` for an empty line; the index is clamped.
    pub fn from_line(mut line: Vec<TreeNode>, index: usize) -> Option<Self> {
        if line.is_empty() { return None; }
        for n in &mut line { n.drop_empty_variations(); }
        let index = index.min(line.len() - 1);
        Some(Self { line, index })
    }

    pub fn line(&self) -> &[TreeNode] { &self.line }
    pub fn len(&self) -> usize { self.line.len() }
    pub fn index(&self) -> usize { self.index }
    pub fn last_index(&self) -> usize { self.line.len() - 1 }
    pub fn current(&self) -> &TreeNode { &self.line[self.index] }
    pub fn node(&self, index: usize) -> Option<&TreeNode> { self.line.get(index) }
    pub fn root_fen(&self) -> &str { &self.line[0].fen }

    pub fn position(&self) -> Result<Position> { Position::from_fen(&self.current().fen) }

    /// Validates `input` against the current node and records it.
    /// `None` means the move was illegal and nothing changed.
    pub fn apply_move(&mut self, input: &MoveInput) -> Option<Applied> {
        let mut pos = self.position().ok()?;
        let record = pos.play(input)?;
        if self.index == self.last_index() {
            self.line.push(TreeNode::from_move(record));
            self.index = self.last_index();
            return Some(Applied::Appended);
        }
        let known = self.line[self.index + 1].mv.as_ref().is_some_and(|m| m.same_move(&record));
        if known {
            self.index += 1;
            return Some(Applied::Advanced);
        }
        let tail = self.line.split_off(self.index + 1);
        if !tail.is_empty() { self.line[self.index].variations.push(tail); }
        self.line.push(TreeNode::from_move(record));
        self.index = self.last_index();
        Some(Applied::Forked)
    }

    /// Applies moves in order, stopping at the first illegal one. Returns how many were applied.
    pub fn play_sequence<I>(&mut self, moves: I) -> usize
    where
        I: IntoIterator,
        I::Item: Into<MoveInput>,
    {
        let mut applied = 0;
        for m in moves {
            if self.apply_move(&m.into()).is_none() { break; }
            applied += 1;
        }
        applied
    }

    pub fn jump_to(&mut self, index: usize) -> bool {
        if index >= self.line.len() { return false; }
        self.index = index;
        true
    }

    /// Exchanges the tail after `node_index` with one of that node's variations and
    /// moves onto the first node of the new tail. With no tail to store back, the
    /// variation is promoted and leaves the list. `false` (and no change) if there is
    /// no such variation.
    pub fn swap_variation(&mut self, node_index: usize, variation_index: usize) -> bool {
        match self.line.get(node_index) {
            Some(n) if variation_index < n.variations.len() => {}
            _ => return false,
        }
        let tail = self.line.split_off(node_index + 1);
        let incoming = if tail.is_empty() {
            self.line[node_index].variations.remove(variation_index)
        } else {
            std::mem::replace(&mut self.line[node_index].variations[variation_index], tail)
        };
        self.line.extend(incoming);
        self.index = (node_index + 1).min(self.last_index());
        true
    }

    /// Stores `result` on node `index` if that node still holds `fen`.
    pub fn attach(&mut self, index: usize, fen: &str, result: EvalResult) -> bool {
        match self.line.get_mut(index) {
            Some(n) if n.fen == fen => { n.analysis = Some(result); true }
            _ => false,
        }
    }

    /// First node on the active line holding `fen`.
    pub fn find(&self, fen: &str) -> Option<usize> { self.line.iter().position(|n| n.fen == fen) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_stored_lines() {
        let mut root = TreeNode::root(START_FEN.to_string());
        root.variations.push(Vec::new());
        let tree = MoveTree::from_line(vec![root], 7).unwrap();
        assert_eq!(tree.index(), 0);
        assert!(tree.current().variations.is_empty());
        assert!(MoveTree::from_line(Vec::new(), 0).is_none());
    }
}

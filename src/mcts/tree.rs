//! Arena-based MCTS tree.
//!
//! Uses a flat `Vec<MCTSNode>` with index-based references. With the
//! transposition backend several edges may share one child, so the arena
//! is in general a DAG rooted at node 0.

use serde::{Deserialize, Serialize};

use super::node::{MCTSNode, NodeId};

/// Arena-based MCTS tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSTree<S> {
    nodes: Vec<MCTSNode<S>>,
}

impl<S> Default for MCTSTree<S> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<S> MCTSTree<S> {
    /// Create a tree holding only `root`.
    pub fn new(root: MCTSNode<S>) -> Self {
        let mut tree = Self {
            nodes: Vec::with_capacity(1024),
        };
        tree.nodes.push(root);
        tree
    }

    /// The root node ID (always 0).
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &MCTSNode<S> {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MCTSNode<S> {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a new node, returning its ID.
    pub fn alloc(&mut self, node: MCTSNode<S>) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node and start over from `root`.
    pub fn reset(&mut self, root: MCTSNode<S>) {
        self.nodes.clear();
        self.nodes.push(root);
    }

    /// Get the root node.
    ///
    /// Panics on a tree that was never given a root.
    #[must_use]
    pub fn root_node(&self) -> &MCTSNode<S> {
        self.get(self.root())
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &MCTSNode<S>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }

    /// Number of edges pointing at each node.
    ///
    /// More than one means the node was reached by different move orders.
    #[must_use]
    pub fn in_degrees(&self) -> Vec<u32> {
        let mut degrees = vec![0u32; self.nodes.len()];
        for edge in self.nodes.iter().flat_map(|n| n.edges.iter()) {
            if edge.is_expanded() {
                degrees[edge.child.0 as usize] += 1;
            }
        }
        degrees
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Action, Team};
    use crate::mcts::node::Edge;
    use crate::rules::GameResult;

    fn node(depth: u16) -> MCTSNode<()> {
        MCTSNode::new((), Team::Red, depth, None)
    }

    #[test]
    fn test_tree_new() {
        let tree = MCTSTree::new(node(0));
        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
        assert_eq!(tree.root(), NodeId::new(0));
        assert!(MCTSTree::<()>::default().is_empty());
    }

    #[test]
    fn test_tree_alloc() {
        let mut tree = MCTSTree::new(node(0));
        let child_id = tree.alloc(MCTSNode::new((), Team::Blue, 1, None));

        assert_eq!(child_id, NodeId::new(1));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get(child_id).to_move, Team::Blue);
    }

    #[test]
    fn test_tree_reset() {
        let mut tree = MCTSTree::new(node(0));
        tree.alloc(node(1));
        tree.alloc(node(2));
        assert_eq!(tree.len(), 3);

        tree.reset(MCTSNode::new((), Team::Blue, 0, None));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root_node().to_move, Team::Blue);
    }

    #[test]
    fn test_in_degrees_count_shared_children() {
        let mut tree = MCTSTree::new(node(0));
        let root = tree.root();
        for team in Team::ALL {
            tree.get_mut(root).edges.push(Edge::new(Action::turn_end(team)));
        }
        tree.get_mut(root).edges.push(Edge::new(Action::resign(Team::Red)));

        let child = tree.alloc(MCTSNode::new((), Team::Blue, 1, Some(GameResult::Draw)));
        tree.get_mut(root).edges[0].child = child;
        tree.get_mut(root).edges[1].child = child;

        assert_eq!(tree.in_degrees(), vec![0, 2]);
    }

    #[test]
    fn test_tree_iter() {
        let mut tree = MCTSTree::new(node(0));
        tree.alloc(node(1));

        let nodes: Vec<_> = tree.iter().collect();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].0, NodeId::new(1));
    }
}

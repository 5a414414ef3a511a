//! MCTS node and edge structures.
//!
//! Uses arena-based allocation with index references (NodeId). Statistics
//! live on nodes rather than edges so that the transposition backend can
//! point several edges at one node and share what it has learned.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Action, Team};
use crate::rules::GameResult;

/// Index into the MCTSTree node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// Edge representing an action from a parent node to a child.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Edge {
    pub action: Action,

    /// Child node (NONE until the edge is first followed).
    pub child: NodeId,
}

impl Edge {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            child: NodeId::NONE,
        }
    }

    #[must_use]
    pub fn is_expanded(&self) -> bool {
        !self.child.is_none()
    }
}

/// A node in the MCTS tree.
///
/// `S` is whatever the search backend keeps per node: a full board, a
/// transposition key, or nothing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSNode<S> {
    /// Backend state for this node.
    pub state: S,

    /// Team to move at this node.
    pub to_move: Team,

    /// Depth at which the node was first reached (root = 0).
    pub depth: u16,

    pub visits: u32,

    /// Sum of rewards backed up through this node, for the searching team.
    pub total_reward: f64,

    /// Running mean of the rewards.
    pub value: f64,

    /// Set once the outgoing edges have been generated.
    pub expanded: bool,

    /// Game result if the node is terminal.
    pub terminal: Option<GameResult>,

    /// Outgoing edges.
    /// SmallVec optimizes for small branching factors near the end of a turn.
    pub edges: SmallVec<[Edge; 8]>,
}

impl<S> MCTSNode<S> {
    pub fn new(state: S, to_move: Team, depth: u16, terminal: Option<GameResult>) -> Self {
        Self {
            state,
            to_move,
            depth,
            visits: 0,
            total_reward: 0.0,
            value: 0.0,
            expanded: false,
            terminal,
            edges: SmallVec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.terminal.is_some()
    }

    /// Record one reward: `value += (reward - value) / visits`.
    pub fn update(&mut self, reward: f64) {
        self.visits += 1;
        self.total_reward += reward;
        self.value += (reward - self.value) / f64::from(self.visits);
    }
}

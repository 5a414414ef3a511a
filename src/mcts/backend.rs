//! State management strategies for the search.
//!
//! All three backends run the same algorithm and differ only in where the
//! board for a node comes from:
//!
//! - [`CloneBackend`]: every node owns a board, cloned from its parent.
//! - [`TranspositionBackend`]: nodes hold a [`StateKey`]; boards live in a
//!   table keyed by it, and an edge reaching a known key links to the
//!   existing node instead of allocating one. Both tables are cleared at
//!   the start of every decision.
//! - [`UndoBackend`]: nodes hold nothing. One board is shared by the whole
//!   tree; descending applies actions in place through an [`UndoLog`] and
//!   every iteration ends by unwinding to the root.

use rustc_hash::FxHashMap;

use crate::core::{Action, Board, SearchError, StateKey};
use crate::rules::{apply, UndoLog};

use super::node::NodeId;

/// Result of following an edge.
#[derive(Debug)]
pub enum Descent<S> {
    /// The edge already had a child.
    Known,
    /// A new node is needed, holding this state.
    New(S),
    /// The edge reaches a state that already has a node.
    Shared(NodeId),
}

/// Where a search keeps the board of each node.
pub trait SearchBackend {
    /// Per-node state.
    type NodeState;

    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Start a decision from `board`, returning the root's state.
    fn begin(&mut self, board: &Board) -> Self::NodeState;

    /// Follow `action` from the node holding `parent`.
    ///
    /// `known` is true when the edge already has a child node.
    fn descend(
        &mut self,
        parent: &Self::NodeState,
        action: &Action,
        known: bool,
    ) -> Result<Descent<Self::NodeState>, SearchError>;

    /// A node was allocated for `state`.
    fn register(&mut self, _state: &Self::NodeState, _id: NodeId) {}

    /// Board of the node holding `state`.
    ///
    /// For the undo backend this is the shared board, which only matches
    /// the node the current iteration stands on.
    fn board<'a>(&'a self, state: &'a Self::NodeState) -> Option<&'a Board>;

    fn board_mut<'a>(&'a mut self, state: &'a mut Self::NodeState) -> Option<&'a mut Board>;

    /// Return to the root at the end of an iteration.
    fn rewind(&mut self) -> Result<(), SearchError> {
        Ok(())
    }
}

/// Every node owns a full board.
#[derive(Clone, Debug, Default)]
pub struct CloneBackend;

impl CloneBackend {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SearchBackend for CloneBackend {
    type NodeState = Board;

    fn name(&self) -> &'static str {
        "clone"
    }

    fn begin(&mut self, board: &Board) -> Board {
        board.clone()
    }

    fn descend(&mut self, parent: &Board, action: &Action, known: bool) -> Result<Descent<Board>, SearchError> {
        if known {
            return Ok(Descent::Known);
        }
        let mut board = parent.clone();
        apply(&mut board, action)?;
        Ok(Descent::New(board))
    }

    fn board<'a>(&'a self, state: &'a Board) -> Option<&'a Board> {
        Some(state)
    }

    fn board_mut<'a>(&'a mut self, state: &'a mut Board) -> Option<&'a mut Board> {
        Some(state)
    }
}

/// Nodes keyed by canonical state; identical positions share one node.
#[derive(Clone, Debug, Default)]
pub struct TranspositionBackend {
    nodes: FxHashMap<StateKey, NodeId>,
    boards: FxHashMap<StateKey, Board>,
}

impl TranspositionBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Distinct positions stored for the current decision.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    /// Node registered for `key`, if any.
    #[must_use]
    pub fn lookup(&self, key: &StateKey) -> Option<NodeId> {
        self.nodes.get(key).copied()
    }
}

impl SearchBackend for TranspositionBackend {
    type NodeState = StateKey;

    fn name(&self) -> &'static str {
        "transposition"
    }

    fn begin(&mut self, board: &Board) -> StateKey {
        self.nodes.clear();
        self.boards.clear();
        let key = board.state_key();
        self.boards.insert(key.clone(), board.clone());
        key
    }

    fn descend(&mut self, parent: &StateKey, action: &Action, known: bool) -> Result<Descent<StateKey>, SearchError> {
        if known {
            return Ok(Descent::Known);
        }
        let mut board = self
            .boards
            .get(parent)
            .cloned()
            .ok_or(SearchError::MissingState(u32::MAX))?;
        apply(&mut board, action)?;
        let key = board.state_key();
        if let Some(&id) = self.nodes.get(&key) {
            return Ok(Descent::Shared(id));
        }
        self.boards.insert(key.clone(), board);
        Ok(Descent::New(key))
    }

    fn register(&mut self, state: &StateKey, id: NodeId) {
        self.nodes.insert(state.clone(), id);
    }

    fn board<'a>(&'a self, state: &'a StateKey) -> Option<&'a Board> {
        self.boards.get(state)
    }

    fn board_mut<'a>(&'a mut self, state: &'a mut StateKey) -> Option<&'a mut Board> {
        self.boards.get_mut(state)
    }
}

/// One shared board, mutated in place and restored from an undo log.
#[derive(Clone, Debug, Default)]
pub struct UndoBackend {
    board: Option<Board>,
    log: UndoLog,
}

impl UndoBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Actions applied since the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.log.depth()
    }
}

impl SearchBackend for UndoBackend {
    type NodeState = ();

    fn name(&self) -> &'static str {
        "undo"
    }

    fn begin(&mut self, board: &Board) {
        self.board = Some(board.clone());
        self.log = UndoLog::new();
    }

    fn descend(&mut self, _parent: &(), action: &Action, known: bool) -> Result<Descent<()>, SearchError> {
        let board = self.board.as_mut().ok_or(SearchError::MissingState(0))?;
        self.log.apply(board, action)?;
        Ok(if known { Descent::Known } else { Descent::New(()) })
    }

    fn board<'a>(&'a self, _state: &'a ()) -> Option<&'a Board> {
        self.board.as_ref()
    }

    fn board_mut<'a>(&'a mut self, _state: &'a mut ()) -> Option<&'a mut Board> {
        self.board.as_mut()
    }

    fn rewind(&mut self) -> Result<(), SearchError> {
        if let Some(board) = self.board.as_mut() {
            self.log.unwind(board)?;
        }
        Ok(())
    }
}

//! Applying actions in place, and taking them back.
//!
//! [`apply`] mutates a board and returns an [`UndoRecord`] holding exactly
//! what is needed to reverse it: snapshots of the actor and target before
//! the action, the ids whose acted flag a turn end or turn pass flipped, and
//! the previous turn bookkeeping. [`undo`] restores the board to a state
//! structurally equal to the one before `apply`, destroyed units included.
//!
//! ## Turn passing
//!
//! After any action, if the acting team is on move and has no unacted units
//! left, its units are re-enabled, the turn counter advances and the
//! opponent is on move. A resignation never passes the turn.
//!
//! ## Undo log
//!
//! [`UndoLog`] is the stack used by the in-place search backend and by
//! rollouts: apply pushes, unwinding pops in reverse order.

use smallvec::SmallVec;

use crate::core::{Action, Board, Damage, IllegalAction, Pos, Team, UndoError, Unit, UnitId};

use super::damage::resolve_damage;

/// Bookkeeping for a turn handed to the opponent.
#[derive(Clone, Debug, PartialEq, Eq)]
struct TurnPass {
    team: Team,
    re_enabled: SmallVec<[UnitId; 8]>,
    prev_turn_count: u32,
}

/// Everything needed to reverse one [`apply`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndoRecord {
    action: Action,
    actor: Option<Unit>,
    target: Option<Unit>,
    damage: Option<Damage>,
    finished: SmallVec<[UnitId; 8]>,
    turn_pass: Option<TurnPass>,
    prev_resigned: Option<Team>,
}

impl UndoRecord {
    #[must_use]
    pub fn action(&self) -> &Action {
        &self.action
    }

    /// Damage resolved by an attack.
    #[must_use]
    pub fn damage(&self) -> Option<Damage> {
        self.damage
    }

    /// Whether the attack destroyed its target.
    #[must_use]
    pub fn killed_target(&self) -> bool {
        matches!((self.target, self.damage), (Some(t), Some(d)) if d.dealt >= t.hp)
    }

    /// Whether the counter-attack destroyed the actor.
    #[must_use]
    pub fn killed_actor(&self) -> bool {
        matches!((self.actor, self.damage), (Some(a), Some(d)) if d.counter >= a.hp)
    }

    /// Whether this action ended the acting team's turn.
    #[must_use]
    pub fn passed_turn(&self) -> bool {
        self.turn_pass.is_some()
    }
}

fn check_destination(board: &Board, id: UnitId, to: Pos) -> Result<(), IllegalAction> {
    if !board.in_bounds(to) {
        return Err(IllegalAction::OutOfBounds(to));
    }
    if board.unit_at(to).map_or(false, |other| other.id != id) {
        return Err(IllegalAction::DestinationOccupied(to));
    }
    Ok(())
}

/// Apply `action` to `board`.
///
/// Only the existence of referenced units and a free destination are
/// checked here; run [`validate`](super::validate) first for anything that
/// did not come from [`legal_actions`](super::legal_actions).
pub fn apply(board: &mut Board, action: &Action) -> Result<UndoRecord, IllegalAction> {
    let mut record = UndoRecord {
        action: *action,
        actor: None,
        target: None,
        damage: None,
        finished: SmallVec::new(),
        turn_pass: None,
        prev_resigned: board.resigned(),
    };

    match *action {
        Action::Move { unit, to, .. } => {
            let actor = *board.unit(unit).ok_or(IllegalAction::UnknownUnit(unit))?;
            check_destination(board, unit, to)?;
            record.actor = Some(actor);

            board.move_unit(unit, to);
            board.set_acted(unit, true);
        }
        Action::Attack { unit, to, target, .. } => {
            let actor = *board.unit(unit).ok_or(IllegalAction::UnknownUnit(unit))?;
            let defender = *board.unit(target).ok_or(IllegalAction::UnknownTarget(target))?;
            check_destination(board, unit, to)?;
            record.actor = Some(actor);
            record.target = Some(defender);

            board.move_unit(unit, to);
            let damage = resolve_damage(board, &actor, &defender, to);
            record.damage = Some(damage);

            let target_hp = defender.hp - damage.dealt;
            if target_hp == 0 {
                board.remove_unit(target);
            } else {
                board.set_hp(target, target_hp);
            }

            let actor_hp = actor.hp - damage.counter;
            if actor_hp == 0 {
                board.remove_unit(unit);
            } else {
                board.set_hp(unit, actor_hp);
                board.set_acted(unit, true);
            }
        }
        Action::TurnEnd { team } => {
            record.finished = board.set_team_acted(team, true);
        }
        Action::Resign { team } => {
            board.set_resigned(Some(team));
            return Ok(record);
        }
    }

    let team = action.team();
    if team == board.to_move() && !board.has_unacted(team) {
        let prev_turn_count = board.turn_count();
        let re_enabled = board.set_team_acted(team, false);
        board.set_turn_count(prev_turn_count + 1);
        board.set_to_move(team.opponent());
        record.turn_pass = Some(TurnPass {
            team,
            re_enabled,
            prev_turn_count,
        });
    }

    Ok(record)
}

/// Take one unit off the board for restoration, checking it is the one the
/// record refers to.
fn lift(board: &mut Board, snapshot: &Unit) -> Result<(), UndoError> {
    match board.unit(snapshot.id) {
        None => Ok(()),
        Some(current) if current.kind == snapshot.kind && current.team == snapshot.team => {
            board.remove_unit(snapshot.id);
            Ok(())
        }
        Some(_) => Err(UndoError::UnitMismatch(snapshot.id)),
    }
}

/// Reverse `record` on `board`. Records must be undone newest first.
pub fn undo(board: &mut Board, record: &UndoRecord) -> Result<(), UndoError> {
    if let Some(pass) = &record.turn_pass {
        for &id in &pass.re_enabled {
            board.set_acted(id, true);
        }
        board.set_turn_count(pass.prev_turn_count);
        board.set_to_move(pass.team);
    }

    match record.action {
        Action::Move { .. } | Action::Attack { .. } => {
            let units = [record.actor, record.target];
            for snapshot in units.iter().flatten() {
                lift(board, snapshot)?;
            }
            for snapshot in units.iter().flatten() {
                board.restore_unit(*snapshot)?;
            }
        }
        Action::TurnEnd { .. } => {
            for &id in &record.finished {
                board.set_acted(id, false);
            }
        }
        Action::Resign { .. } => {}
    }

    board.set_resigned(record.prev_resigned);
    Ok(())
}

/// Stack of applied actions that can be unwound in order.
#[derive(Clone, Debug, Default)]
pub struct UndoLog {
    records: Vec<UndoRecord>,
}

impl UndoLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `action` and keep its record.
    pub fn apply(&mut self, board: &mut Board, action: &Action) -> Result<&UndoRecord, IllegalAction> {
        let record = apply(board, action)?;
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Keep a record produced elsewhere.
    pub fn push(&mut self, record: UndoRecord) {
        self.records.push(record);
    }

    /// Undo the newest record.
    pub fn undo_last(&mut self, board: &mut Board) -> Result<UndoRecord, UndoError> {
        let record = self.records.pop().ok_or(UndoError::EmptyLog)?;
        undo(board, &record)?;
        Ok(record)
    }

    /// Undo until only `depth` records remain.
    pub fn unwind_to(&mut self, board: &mut Board, depth: usize) -> Result<(), UndoError> {
        while self.records.len() > depth {
            self.undo_last(board)?;
        }
        Ok(())
    }

    /// Undo everything.
    pub fn unwind(&mut self, board: &mut Board) -> Result<(), UndoError> {
        self.unwind_to(board, 0)
    }

    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.records.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[UndoRecord] {
        &self.records
    }
}

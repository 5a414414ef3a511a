//! Legal action enumeration and validation.
//!
//! [`legal_actions`] generates candidate actions for one unit; [`validate`]
//! re-checks every precondition of an arbitrary action independently of how
//! it was produced. Everything a planner generates passes `validate`, and the
//! game loop calls `validate` on every action a player proposes.

use crate::core::{Action, Board, IllegalAction, Pos, Team, Unit, UnitId};

use super::damage::resolve_damage;
use super::range::{attack_options, reachable_cells};

/// Candidate actions for one unit.
///
/// One attack per enemy it can damage, standing on the option cell with the
/// most defense stars for the attacker (ties prefer staying put, then row-major
/// order), followed by one move per reachable cell, the own cell included.
/// Empty if the unit is gone, belongs to the team not on move, or has acted.
#[must_use]
pub fn legal_actions(board: &Board, id: UnitId) -> Vec<Action> {
    let Some(unit) = board.unit(id) else {
        return Vec::new();
    };
    if unit.acted || unit.team != board.to_move() {
        return Vec::new();
    }

    let mut actions = Vec::new();
    let options = attack_options(board, unit);

    let mut targets: Vec<UnitId> = options.iter().map(|(target, _)| *target).collect();
    targets.dedup();
    for target_id in targets {
        let Some(target) = board.unit(target_id) else { continue };
        let Some(cell) = best_attack_cell(board, unit, options.iter().filter(|(t, _)| *t == target_id).map(|(_, c)| *c))
        else {
            continue;
        };
        if resolve_damage(board, unit, target, cell).dealt > 0 {
            actions.push(Action::attack(unit.team, unit.id, cell, target_id));
        }
    }

    actions.extend(
        reachable_cells(board, unit)
            .iter()
            .map(|to| Action::move_to(unit.team, unit.id, to)),
    );
    actions
}

fn best_attack_cell(board: &Board, unit: &Unit, cells: impl Iterator<Item = Pos>) -> Option<Pos> {
    // higher stars first, then the own cell, then row-major order
    cells.min_by_key(|cell| {
        (
            std::cmp::Reverse(board.stars_at(unit.kind, *cell)),
            *cell != unit.pos,
            cell.y,
            cell.x,
        )
    })
}

/// Candidate actions for every unacted unit of `team`, in id order.
///
/// Empty when `team` is not on move.
#[must_use]
pub fn team_actions(board: &Board, team: Team) -> Vec<Action> {
    if team != board.to_move() {
        return Vec::new();
    }
    let ids: Vec<UnitId> = board.unacted_units(team).map(|u| u.id).collect();
    ids.into_iter().flat_map(|id| legal_actions(board, id)).collect()
}

/// Check every precondition of `action` for `team` on `board`.
pub fn validate(board: &Board, team: Team, action: &Action) -> Result<(), IllegalAction> {
    if action.team() != team || team != board.to_move() {
        return Err(IllegalAction::NotYourTurn {
            team: action.team(),
            to_move: board.to_move(),
        });
    }

    let (id, to, target) = match *action {
        Action::TurnEnd { .. } | Action::Resign { .. } => return Ok(()),
        Action::Move { unit, to, .. } => (unit, to, None),
        Action::Attack { unit, to, target, .. } => (unit, to, Some(target)),
    };

    let unit = board.unit(id).ok_or(IllegalAction::UnknownUnit(id))?;
    if unit.team != team {
        return Err(IllegalAction::WrongTeam { unit: id, team });
    }
    if unit.acted {
        return Err(IllegalAction::AlreadyActed(id));
    }
    if !board.in_bounds(to) {
        return Err(IllegalAction::OutOfBounds(to));
    }
    if board.unit_at(to).map_or(false, |other| other.id != id) {
        return Err(IllegalAction::DestinationOccupied(to));
    }
    if !reachable_cells(board, unit).contains(to) {
        return Err(IllegalAction::Unreachable { unit: id, to });
    }

    let Some(target_id) = target else {
        return Ok(());
    };
    let target = board.unit(target_id).ok_or(IllegalAction::UnknownTarget(target_id))?;
    if !target.is_enemy_of(unit) {
        return Err(IllegalAction::NotAnEnemy(target_id));
    }

    let spec = unit.spec();
    let in_range = if spec.is_direct {
        to.is_adjacent(target.pos)
    } else {
        let dist = unit.pos.distance(target.pos);
        to == unit.pos && dist >= spec.min_range && dist <= spec.max_range
    };
    if !in_range {
        return Err(IllegalAction::OutOfRange {
            unit: id,
            target: target_id,
            from: to,
        });
    }
    Ok(())
}

/// Boolean form of [`validate`].
#[inline]
#[must_use]
pub fn is_legal(board: &Board, team: Team, action: &Action) -> bool {
    validate(board, team, action).is_ok()
}

//! Actions: one unit's move or attack, or a team-wide turn end or resignation.
//!
//! Actions are plain values. They are produced by the rules engine or by a
//! player, validated by `rules::validate`, and applied by `rules::apply`,
//! which reports the resolved damage in its undo record rather than
//! writing it back into the action.

use serde::{Deserialize, Serialize};

use super::grid::Pos;
use super::team::Team;
use super::unit::UnitId;

/// Discriminant of an [`Action`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Resign,
    MoveOnly,
    MoveAndAttack,
    TurnEnd,
}

/// A single decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Move `unit` to `to` (possibly its own cell) and finish its action.
    Move { team: Team, unit: UnitId, to: Pos },
    /// Move `unit` to `to`, then attack `target` from there.
    Attack {
        team: Team,
        unit: UnitId,
        to: Pos,
        target: UnitId,
    },
    /// Finish every remaining unit of `team` for this turn.
    TurnEnd { team: Team },
    /// Concede the game.
    Resign { team: Team },
}

impl Action {
    #[must_use]
    pub const fn move_to(team: Team, unit: UnitId, to: Pos) -> Self {
        Action::Move { team, unit, to }
    }

    #[must_use]
    pub const fn attack(team: Team, unit: UnitId, to: Pos, target: UnitId) -> Self {
        Action::Attack {
            team,
            unit,
            to,
            target,
        }
    }

    #[must_use]
    pub const fn turn_end(team: Team) -> Self {
        Action::TurnEnd { team }
    }

    #[must_use]
    pub const fn resign(team: Team) -> Self {
        Action::Resign { team }
    }

    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        match self {
            Action::Move { .. } => ActionKind::MoveOnly,
            Action::Attack { .. } => ActionKind::MoveAndAttack,
            Action::TurnEnd { .. } => ActionKind::TurnEnd,
            Action::Resign { .. } => ActionKind::Resign,
        }
    }

    /// The acting team.
    #[must_use]
    pub const fn team(&self) -> Team {
        match *self {
            Action::Move { team, .. }
            | Action::Attack { team, .. }
            | Action::TurnEnd { team }
            | Action::Resign { team } => team,
        }
    }

    /// The acting unit, if this is a unit action.
    #[must_use]
    pub const fn unit(&self) -> Option<UnitId> {
        match *self {
            Action::Move { unit, .. } | Action::Attack { unit, .. } => Some(unit),
            _ => None,
        }
    }

    /// Destination cell, if this is a unit action.
    #[must_use]
    pub const fn destination(&self) -> Option<Pos> {
        match *self {
            Action::Move { to, .. } | Action::Attack { to, .. } => Some(to),
            _ => None,
        }
    }

    /// Attack target, if any.
    #[must_use]
    pub const fn target(&self) -> Option<UnitId> {
        match *self {
            Action::Attack { target, .. } => Some(target),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_attack(&self) -> bool {
        matches!(self, Action::Attack { .. })
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Move { team, unit, to } => write!(f, "{team} {unit} move {to}"),
            Action::Attack {
                team,
                unit,
                to,
                target,
            } => write!(f, "{team} {unit} move {to} attack {target}"),
            Action::TurnEnd { team } => write!(f, "{team} turn end"),
            Action::Resign { team } => write!(f, "{team} resigns"),
        }
    }
}

/// Damage resolved for one attack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Damage {
    /// Damage dealt to the target.
    pub dealt: u8,
    /// Counter-attack damage dealt back to the attacker.
    pub counter: u8,
}

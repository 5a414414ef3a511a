//! Rule-based agent.
//!
//! Attacks first: every (attacker, target, standing cell) triple is scored
//! as damage dealt weighted by the target's value minus counter damage
//! weighted by the attacker's value, where a target is worth more the more
//! it threatens units that have already acted. Without a worthwhile attack,
//! a random unacted unit moves toward good matchups or strong terrain.

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::core::{Action, Board, GameError, GameRng, Pos, Team, Unit, UnitId};
use crate::game::Player;
use crate::rules::{attack_options, reachable_cells, resolve_damage};

/// Attacks scoring at or below this are not taken.
const MIN_ATTACK_VALUE: i64 = -20;
/// Base worth of an own unit, added to its hp.
const BASE_VALUE_OF_MINE: i64 = 10;
/// Base worth of an enemy, added to its threat.
const BASE_VALUE_OF_ENEMY: i64 = 10;

#[derive(Clone, Debug)]
pub struct HeuristicPlayer {
    rng: GameRng,
}

impl HeuristicPlayer {
    pub fn new(seed: u64) -> Self {
        Self { rng: GameRng::new(seed) }
    }
}

/// Most damage `enemy` could deal to one of the already acted units of the
/// other team.
pub fn threat(board: &Board, enemy: &Unit) -> u32 {
    attack_options(board, enemy)
        .into_iter()
        .filter_map(|(target, cell)| {
            let victim = board.unit(target).filter(|v| v.acted)?;
            Some(u32::from(resolve_damage(board, enemy, victim, cell).dealt))
        })
        .max()
        .unwrap_or(0)
}

/// Score of attacking `target` from `cell`, or `None` if it deals nothing.
pub fn attack_value(board: &Board, unit: &Unit, target: &Unit, cell: Pos, target_threat: u32) -> Option<i64> {
    let damage = resolve_damage(board, unit, target, cell);
    if damage.dealt == 0 {
        return None;
    }
    let enemy_value = BASE_VALUE_OF_ENEMY + i64::from(target_threat);
    let my_value = BASE_VALUE_OF_MINE + i64::from(unit.hp);
    Some(i64::from(damage.dealt) * enemy_value - i64::from(damage.counter) * my_value)
}

fn best_attack(board: &Board, team: Team) -> Option<(Action, i64)> {
    let threats: FxHashMap<UnitId, u32> = board
        .team_units(team.opponent())
        .map(|enemy| (enemy.id, threat(board, enemy)))
        .collect();

    let mut best: Option<(Action, i64)> = None;
    let mut best_value = MIN_ATTACK_VALUE;
    for unit in board.unacted_units(team) {
        for (target_id, cell) in attack_options(board, unit) {
            let Some(target) = board.unit(target_id) else {
                continue;
            };
            let threat = threats.get(&target_id).copied().unwrap_or(0);
            let Some(value) = attack_value(board, unit, target, cell, threat) else {
                continue;
            };
            if value > best_value {
                best_value = value;
                best = Some((Action::attack(team, unit.id, cell, target_id), value));
            }
        }
    }
    best
}

/// Destination for `unit` favouring defense stars and nearby enemies it hits
/// hard. Scanned column by column; the first best cell wins.
fn best_move(board: &Board, unit: &Unit) -> Pos {
    let reachable = reachable_cells(board, unit);
    let enemies: Vec<&Unit> = board.team_units(unit.team.opponent()).collect();
    let mut best = unit.pos;
    let mut best_score = i64::MIN;
    for x in 0..board.width() {
        for y in 0..board.height() {
            let pos = Pos::new(x, y);
            if !reachable.contains(pos) {
                continue;
            }
            let defense = i64::from(board.stars_at(unit.kind, pos));
            for enemy in &enemies {
                let effect = i64::from(unit.kind.attack_power(enemy.kind));
                let dist = i64::from(pos.distance(enemy.pos));
                let score = defense * 5 + effect / (dist + 5);
                if score > best_score {
                    best_score = score;
                    best = pos;
                }
            }
        }
    }
    best
}

impl Player for HeuristicPlayer {
    fn name(&self) -> &str {
        "Heuristic"
    }

    fn make_action(&mut self, board: &Board, team: Team, _turn_start: bool, _game_start: bool) -> Result<Action, GameError> {
        if let Some((action, value)) = best_attack(board, team) {
            trace!(%action, value, "heuristic attack");
            return Ok(action);
        }

        let movers: Vec<&Unit> = board.unacted_units(team).collect();
        let Some(unit) = self.rng.choose(movers.as_slice()) else {
            return Ok(Action::turn_end(team));
        };
        Ok(Action::move_to(team, unit.id, best_move(board, unit)))
    }
}

//! Movement and attack ranges.
//!
//! ## Reachability
//!
//! Reachable cells come from a bucketed cost-relaxation search over the
//! remaining movement budget. Buckets are drained from the largest budget
//! down; every step costs at least one point, so a cell is final once its
//! bucket is drained (Dijkstra with integer costs). Enemy cells block.
//! Friendly cells can be passed through but are not valid destinations.
//! The unit's own cell is always reachable.

use crate::core::{Board, CellSet, Pos, Unit, UnitId};

/// Every cell `unit` can end its move on this turn.
#[must_use]
pub fn reachable_cells(board: &Board, unit: &Unit) -> CellSet {
    let (width, height) = (board.width(), board.height());
    let index = |p: Pos| usize::from(p.y) * usize::from(width) + usize::from(p.x);

    let movement = unit.spec().movement as usize;
    let mut best: Vec<Option<usize>> = vec![None; usize::from(width) * usize::from(height)];
    let mut buckets: Vec<Vec<Pos>> = vec![Vec::new(); movement + 1];

    best[index(unit.pos)] = Some(movement);
    buckets[movement].push(unit.pos);

    for budget in (0..=movement).rev() {
        let frontier = std::mem::take(&mut buckets[budget]);
        for pos in frontier {
            if best[index(pos)] != Some(budget) {
                continue;
            }
            for next in pos.neighbors(width, height) {
                let Some(cost) = unit.kind.move_cost(board.terrain_at(next)) else {
                    continue;
                };
                if board.unit_at(next).map_or(false, |other| other.is_enemy_of(unit)) {
                    continue;
                }
                let Some(remaining) = budget.checked_sub(cost as usize) else {
                    continue;
                };
                if best[index(next)].map_or(true, |b| b < remaining) {
                    best[index(next)] = Some(remaining);
                    buckets[remaining].push(next);
                }
            }
        }
    }

    let mut cells = CellSet::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let pos = Pos::new(x, y);
            if best[index(pos)].is_none() {
                continue;
            }
            match board.unit_at(pos) {
                Some(other) if other.id != unit.id => {}
                _ => cells.insert(pos),
            }
        }
    }
    cells
}

/// Cells `unit` could strike this turn.
///
/// Melee units threaten every cell next to a reachable cell that is not
/// held by a friend. Ranged units threaten the ring between their minimum
/// and maximum range around their current position.
#[must_use]
pub fn attackable_cells(board: &Board, unit: &Unit, reachable: &CellSet) -> CellSet {
    let (width, height) = (board.width(), board.height());
    let mut cells = CellSet::new(width, height);
    let spec = unit.spec();

    if spec.is_direct {
        for from in reachable.iter() {
            for pos in from.neighbors(width, height) {
                match board.unit_at(pos) {
                    Some(other) if !other.is_enemy_of(unit) => {}
                    _ => cells.insert(pos),
                }
            }
        }
    } else {
        for y in 0..height {
            for x in 0..width {
                let pos = Pos::new(x, y);
                let dist = unit.pos.distance(pos);
                if dist >= spec.min_range && dist <= spec.max_range {
                    cells.insert(pos);
                }
            }
        }
    }
    cells
}

/// Every concrete `(target, standing cell)` pair for `unit`.
///
/// Melee units get one entry per reachable cell next to each enemy; ranged
/// units fire from where they stand. Acted flags and turn order are not
/// consulted, so this also serves threat estimation for enemy units.
#[must_use]
pub fn attack_options(board: &Board, unit: &Unit) -> Vec<(UnitId, Pos)> {
    let spec = unit.spec();
    let enemies = board.units().filter(|other| other.is_enemy_of(unit));

    if spec.is_direct {
        let reachable = reachable_cells(board, unit);
        enemies
            .flat_map(|enemy| {
                enemy
                    .pos
                    .neighbors(board.width(), board.height())
                    .filter(|cell| reachable.contains(*cell))
                    .map(move |cell| (enemy.id, cell))
                    .collect::<Vec<_>>()
            })
            .collect()
    } else {
        enemies
            .filter(|enemy| {
                let dist = unit.pos.distance(enemy.pos);
                dist >= spec.min_range && dist <= spec.max_range
            })
            .map(|enemy| (enemy.id, unit.pos))
            .collect()
    }
}

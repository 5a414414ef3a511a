//! The game board: terrain grid, unit registry and turn bookkeeping.
//!
//! ## Ownership
//!
//! The board owns every unit. Units live in dense slots indexed by
//! [`UnitId`]; a destroyed unit leaves its slot vacant. A second index maps
//! cells to unit ids, and per-team alive counters are kept alongside. All
//! three are updated together by the mutators below, which are crate-private
//! so that only the rules engine changes a board during play.
//!
//! ## Cloning
//!
//! Grids and slots are `im::Vector`s, so `Clone` is O(1) and copy-on-write.
//! A clone is fully independent: nothing mutable is shared.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::error::{MapError, UndoError};
use super::grid::Pos;
use super::spec::UnitType;
use super::team::{Team, TeamPair};
use super::terrain::Terrain;
use super::unit::{Unit, UnitId, MAX_HP};

/// Board state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    width: u8,
    height: u8,
    terrain: Vector<Terrain>,
    units: Vector<Option<Unit>>,
    cells: Vector<Option<UnitId>>,
    alive: TeamPair<u16>,
    turn_count: u32,
    turn_limit: u32,
    hp_threshold: u32,
    to_move: Team,
    resigned: Option<Team>,
}

impl Board {
    /// Default turn limit for boards built in code.
    pub const DEFAULT_TURN_LIMIT: u32 = 30;

    /// An all-plain board.
    pub fn new(width: usize, height: usize) -> Result<Self, MapError> {
        Self::with_terrain(width, height, vec![Terrain::Plain; width * height])
    }

    /// A board with explicit terrain in row-major order (`y * width + x`).
    pub fn with_terrain(width: usize, height: usize, terrain: Vec<Terrain>) -> Result<Self, MapError> {
        if width == 0 || height == 0 || width > usize::from(u8::MAX) || height > usize::from(u8::MAX) {
            return Err(MapError::InvalidSize { width, height });
        }
        if terrain.len() != width * height {
            return Err(MapError::RowCount {
                expected: width * height,
                found: terrain.len(),
            });
        }
        Ok(Self {
            width: width as u8,
            height: height as u8,
            terrain: terrain.into_iter().collect(),
            units: Vector::new(),
            cells: std::iter::repeat(None).take(width * height).collect(),
            alive: TeamPair::splat(0),
            turn_count: 0,
            turn_limit: Self::DEFAULT_TURN_LIMIT,
            hp_threshold: 0,
            to_move: Team::Red,
            resigned: None,
        })
    }

    /// Set the turn limit.
    #[must_use]
    pub fn with_turn_limit(mut self, limit: u32) -> Self {
        self.turn_limit = limit;
        self
    }

    /// Set the HP margin under which a turn-limit finish is a draw.
    #[must_use]
    pub fn with_hp_threshold(mut self, threshold: u32) -> Self {
        self.hp_threshold = threshold;
        self
    }

    /// Place a new unit. Ids are handed out sequentially.
    pub fn spawn_unit(&mut self, kind: UnitType, team: Team, pos: Pos, hp: u8) -> Result<UnitId, MapError> {
        if !self.in_bounds(pos) {
            return Err(MapError::UnitOutOfBounds(pos));
        }
        if hp == 0 || hp > MAX_HP {
            return Err(MapError::InvalidHp(hp));
        }
        if self.unit_at(pos).is_some() {
            return Err(MapError::CellOccupied(pos));
        }
        let id = u16::try_from(self.units.len()).map_err(|_| MapError::TooManyUnits)?;
        let id = UnitId::new(id);
        self.units.push_back(Some(Unit {
            id,
            kind,
            team,
            pos,
            hp,
            acted: false,
        }));
        let cell = self.cell_index(pos);
        self.cells.set(cell, Some(id));
        self.alive[team] += 1;
        Ok(id)
    }

    /// Choose which team moves next. Setup only.
    pub fn set_to_move(&mut self, team: Team) {
        self.to_move = team;
    }

    // =========================================================================
    // Queries
    // =========================================================================

    #[inline]
    #[must_use]
    pub fn width(&self) -> u8 {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u8 {
        self.height
    }

    #[inline]
    #[must_use]
    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    #[inline]
    fn cell_index(&self, pos: Pos) -> usize {
        usize::from(pos.y) * usize::from(self.width) + usize::from(pos.x)
    }

    /// Terrain at `pos`; outside the grid counts as barrier.
    #[inline]
    #[must_use]
    pub fn terrain_at(&self, pos: Pos) -> Terrain {
        if self.in_bounds(pos) {
            self.terrain[self.cell_index(pos)]
        } else {
            Terrain::Barrier
        }
    }

    /// Defense stars a unit of `kind` would enjoy at `pos`.
    #[inline]
    #[must_use]
    pub fn stars_at(&self, kind: UnitType, pos: Pos) -> u32 {
        if kind.spec().is_air {
            0
        } else {
            self.terrain_at(pos).stars()
        }
    }

    /// Defense stars of `unit` where it stands.
    #[inline]
    #[must_use]
    pub fn defense_stars(&self, unit: &Unit) -> u32 {
        self.stars_at(unit.kind, unit.pos)
    }

    #[inline]
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id.index()).and_then(Option::as_ref)
    }

    #[inline]
    #[must_use]
    pub fn unit_at(&self, pos: Pos) -> Option<&Unit> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.cells[self.cell_index(pos)].and_then(|id| self.unit(id))
    }

    /// Number of unit slots, including vacant ones.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.units.len()
    }

    /// Living units in id order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> + '_ {
        self.units.iter().filter_map(Option::as_ref)
    }

    pub fn team_units(&self, team: Team) -> impl Iterator<Item = &Unit> + '_ {
        self.units().filter(move |u| u.team == team)
    }

    /// Units of `team` that have not acted this turn.
    pub fn unacted_units(&self, team: Team) -> impl Iterator<Item = &Unit> + '_ {
        self.team_units(team).filter(|u| !u.acted)
    }

    #[must_use]
    pub fn has_unacted(&self, team: Team) -> bool {
        self.unacted_units(team).next().is_some()
    }

    #[inline]
    #[must_use]
    pub fn alive_count(&self, team: Team) -> usize {
        usize::from(self.alive[team])
    }

    #[must_use]
    pub fn total_hp(&self, team: Team) -> u32 {
        self.team_units(team).map(|u| u32::from(u.hp)).sum()
    }

    #[inline]
    #[must_use]
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    #[inline]
    #[must_use]
    pub fn turn_limit(&self) -> u32 {
        self.turn_limit
    }

    #[inline]
    #[must_use]
    pub fn hp_threshold(&self) -> u32 {
        self.hp_threshold
    }

    /// The team whose turn it is.
    #[inline]
    #[must_use]
    pub fn to_move(&self) -> Team {
        self.to_move
    }

    /// The team that resigned, if any.
    #[inline]
    #[must_use]
    pub fn resigned(&self) -> Option<Team> {
        self.resigned
    }

    /// Whether the slots, cell index and alive counters agree.
    ///
    /// Safe to call on a board of any shape, including one decoded from
    /// untrusted bytes.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let cell_count = usize::from(self.width) * usize::from(self.height);
        if cell_count == 0 || self.terrain.len() != cell_count || self.cells.len() != cell_count {
            return false;
        }
        let mut alive = TeamPair::splat(0usize);
        for (slot, unit) in self.units.iter().enumerate() {
            let Some(unit) = unit else { continue };
            if unit.id.index() != slot || !self.in_bounds(unit.pos) || unit.hp == 0 || unit.hp > MAX_HP {
                return false;
            }
            if self.cells[self.cell_index(unit.pos)] != Some(unit.id) {
                return false;
            }
            alive[unit.team] += 1;
        }
        let occupied = self.cells.iter().filter(|c| c.is_some()).count();
        alive[Team::Red] == usize::from(self.alive[Team::Red])
            && alive[Team::Blue] == usize::from(self.alive[Team::Blue])
            && occupied == alive[Team::Red] + alive[Team::Blue]
    }

    /// Reject a decoded board whose grid, slots or counters disagree.
    pub fn check_snapshot(&self) -> Result<(), MapError> {
        if self.width == 0 || self.height == 0 {
            return Err(MapError::InvalidSize {
                width: usize::from(self.width),
                height: usize::from(self.height),
            });
        }
        let expected = usize::from(self.width) * usize::from(self.height);
        for found in [self.terrain.len(), self.cells.len()] {
            if found != expected {
                return Err(MapError::RowCount { expected, found });
            }
        }
        if let Some(unit) = self.units().find(|u| u.hp == 0 || u.hp > MAX_HP) {
            return Err(MapError::InvalidHp(unit.hp));
        }
        if !self.is_consistent() {
            return Err(MapError::MalformedRecord("inconsistent board snapshot".to_string()));
        }
        Ok(())
    }

    /// Canonical key of the position for transposition lookups.
    ///
    /// Unit ids are left out, so the same formation reached through a
    /// different move order maps to the same key.
    #[must_use]
    pub fn state_key(&self) -> StateKey {
        let mut units: SmallVec<[UnitKey; 16]> = self
            .units()
            .map(|u| UnitKey {
                team: u.team,
                kind: u.kind,
                x: u.pos.x,
                y: u.pos.y,
                hp: u.hp,
                acted: u.acted,
            })
            .collect();
        units.sort_unstable();
        StateKey {
            turn_count: self.turn_count,
            to_move: self.to_move,
            units,
        }
    }

    /// Serialize to a compact binary snapshot.
    pub fn to_bytes(&self) -> Result<Vec<u8>, MapError> {
        Ok(bincode::serialize(self)?)
    }

    /// Restore from [`Board::to_bytes`] output.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MapError> {
        let board: Board = bincode::deserialize(bytes)?;
        board.check_snapshot()?;
        Ok(board)
    }

    // =========================================================================
    // Crate-private mutators (used by the rules engine)
    // =========================================================================

    pub(crate) fn move_unit(&mut self, id: UnitId, to: Pos) {
        let Some(from) = self.unit(id).map(|u| u.pos) else { return };
        if from == to {
            return;
        }
        let (from_cell, to_cell) = (self.cell_index(from), self.cell_index(to));
        self.cells.set(from_cell, None);
        self.cells.set(to_cell, Some(id));
        if let Some(Some(unit)) = self.units.get_mut(id.index()) {
            unit.pos = to;
        }
    }

    pub(crate) fn set_hp(&mut self, id: UnitId, hp: u8) {
        if let Some(Some(unit)) = self.units.get_mut(id.index()) {
            unit.hp = hp;
        }
    }

    pub(crate) fn set_acted(&mut self, id: UnitId, acted: bool) {
        if let Some(Some(unit)) = self.units.get_mut(id.index()) {
            unit.acted = acted;
        }
    }

    /// Mark every unit of `team` as acted or not, returning the ids flipped.
    pub(crate) fn set_team_acted(&mut self, team: Team, acted: bool) -> SmallVec<[UnitId; 8]> {
        let ids: SmallVec<[UnitId; 8]> = self
            .team_units(team)
            .filter(|u| u.acted != acted)
            .map(|u| u.id)
            .collect();
        for &id in &ids {
            self.set_acted(id, acted);
        }
        ids
    }

    /// Take a unit off the board, leaving its slot vacant.
    pub(crate) fn remove_unit(&mut self, id: UnitId) -> Option<Unit> {
        let unit = self.units.get_mut(id.index())?.take()?;
        let cell = self.cell_index(unit.pos);
        if self.cells[cell] == Some(id) {
            self.cells.set(cell, None);
        }
        self.alive[unit.team] -= 1;
        Some(unit)
    }

    /// Put a previously removed unit back into its slot and cell.
    pub(crate) fn restore_unit(&mut self, unit: Unit) -> Result<(), UndoError> {
        match self.units.get(unit.id.index()) {
            None => return Err(UndoError::UnitMismatch(unit.id)),
            Some(Some(_)) => return Err(UndoError::SlotOccupied(unit.id)),
            Some(None) => {}
        }
        if !self.in_bounds(unit.pos) {
            return Err(UndoError::UnitMismatch(unit.id));
        }
        let cell = self.cell_index(unit.pos);
        if self.cells[cell].is_some() {
            return Err(UndoError::CellOccupied(unit.pos));
        }
        self.units.set(unit.id.index(), Some(unit));
        self.cells.set(cell, Some(unit.id));
        self.alive[unit.team] += 1;
        Ok(())
    }

    pub(crate) fn set_turn_count(&mut self, turn: u32) {
        self.turn_count = turn;
    }

    pub(crate) fn set_resigned(&mut self, team: Option<Team>) {
        self.resigned = team;
    }
}

impl std::fmt::Display for Board {
    /// Grid with one 4-character cell per square: team mark, unit mark and
    /// two-digit hp, `####` for barriers, blanks otherwise.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "turn {}/{} | {} to move",
            self.turn_count, self.turn_limit, self.to_move
        )?;
        write!(f, "   ")?;
        for x in 0..self.width {
            write!(f, "{x:>4} ")?;
        }
        writeln!(f)?;
        for y in 0..self.height {
            write!(f, "{y:>2} |")?;
            for x in 0..self.width {
                let pos = Pos::new(x, y);
                match self.unit_at(pos) {
                    Some(u) => write!(f, "{}{}{:02}|", u.team.mark(), u.spec().mark, u.hp)?,
                    None if self.terrain_at(pos) == Terrain::Barrier => write!(f, "####|")?,
                    None => write!(f, "    |")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// One unit inside a [`StateKey`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitKey {
    pub team: Team,
    pub kind: UnitType,
    pub x: u8,
    pub y: u8,
    pub hp: u8,
    pub acted: bool,
}

/// Canonical position key: sorted unit tuples plus turn bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StateKey {
    pub turn_count: u32,
    pub to_move: Team,
    pub units: SmallVec<[UnitKey; 16]>,
}

//! The board model: grid, wall table and entity registries.
//!
//! `Board` owns every entity of a session. It enforces structural integrity
//! only (bounds, one hazard per cell, one floor POI per cell); game rules live
//! in the `walls`, `hazards` and `poi` modules, which get crate-private
//! mutable access.
//!
//! ## Storage
//!
//! - Walls are stored once in a table indexed by `WallId`. A key index maps
//!   *both* names of each wall to the same id, so a wall is reachable from
//!   either side without duplication.
//! - Hazards, POIs and crew use `im` ordered maps. Iteration order is
//!   deterministic and cloning a board for a checkpoint is O(1).

use std::sync::Arc;

use im::{OrdMap, Vector};
use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

use super::entity::{Crew, Hazard, PoiFate, PointOfInterest, RetiredPoi};
use crate::core::{
    BoardConfig, CellPos, ConfigError, CrewId, Direction, GameCounters, HazardState, PoiId,
    ReplayError, WallId, WallKey, WallMask, DEFAULT_EGG_COUNTDOWN,
};
use crate::walls::{WallKind, WallSegment};

/// Complete board state for one replay session.
#[derive(Clone, Debug)]
pub struct Board {
    rows: i32,
    cols: i32,
    /// Row-major masks as configured. Only used at build time and for queries.
    masks: Arc<Vec<WallMask>>,
    /// Wall table, indexed by `WallId`.
    walls: Vector<WallSegment>,
    /// Both names of every wall -> its id. Immutable after build.
    wall_index: Arc<FxHashMap<WallKey, WallId>>,
    /// Exit cells. Immutable after build.
    exits: Arc<FxHashSet<CellPos>>,
    hazards: OrdMap<CellPos, Hazard>,
    pois: OrdMap<PoiId, PointOfInterest>,
    /// Floor index: cell -> POI lying there.
    floor: OrdMap<CellPos, PoiId>,
    retired: OrdMap<PoiId, RetiredPoi>,
    crew: OrdMap<CrewId, Crew>,
    counters: GameCounters,
}

impl Board {
    /// Build a board from its configuration.
    ///
    /// ## Errors
    ///
    /// `ConfigError` if the grid is empty, the mask count is wrong, anything
    /// references a cell outside the grid, ids repeat, or two hazards / two
    /// POIs share a cell.
    pub fn build(config: &BoardConfig) -> Result<Self, ConfigError> {
        let expected = match config.rows.checked_mul(config.cols) {
            Some(cells) if config.rows > 0 && config.cols > 0 => cells as usize,
            _ => {
                return Err(ConfigError::InvalidDimensions {
                    rows: config.rows,
                    cols: config.cols,
                })
            }
        };
        if config.cells.len() != expected {
            return Err(ConfigError::CellCount {
                expected,
                actual: config.cells.len(),
            });
        }

        let mut board = Self {
            rows: config.rows,
            cols: config.cols,
            masks: Arc::new(config.cells.clone()),
            walls: Vector::new(),
            wall_index: Arc::new(FxHashMap::default()),
            exits: Arc::new(FxHashSet::default()),
            hazards: OrdMap::new(),
            pois: OrdMap::new(),
            floor: OrdMap::new(),
            retired: OrdMap::new(),
            crew: OrdMap::new(),
            counters: GameCounters::new(),
        };

        board.build_walls(config)?;
        board.place_entities(config)?;

        debug!(
            "built {}x{} board: {} walls, {} crew, {} POIs, {} hazards",
            board.rows,
            board.cols,
            board.walls.len(),
            board.crew.len(),
            board.pois.len(),
            board.hazards.len()
        );
        Ok(board)
    }

    fn build_walls(&mut self, config: &BoardConfig) -> Result<(), ConfigError> {
        let mut exits = FxHashSet::default();
        let mut suppressed = FxHashSet::default();
        for exit in &config.exits {
            self.require_in_bounds("exit", exit.pos())?;
            exits.insert(exit.pos());
            suppressed.insert(exit.key().canonical());
        }

        let mut specials = FxHashMap::default();
        for entry in &config.special_walls {
            let key = entry.key();
            self.require_in_bounds("special wall", key.cell())?;
            if entry.health.is_some_and(|h| h > entry.kind.max_health()) {
                return Err(ConfigError::InvalidHealth(key));
            }
            if specials.insert(key.canonical(), entry).is_some() {
                return Err(ConfigError::DuplicateSpecialWall(key.canonical()));
            }
        }

        let mut table = WallTable::default();
        for row in 1..=self.rows {
            for col in 1..=self.cols {
                let pos = CellPos::new(row, col);
                let mask = self.masks[pos.index(self.cols)];
                for direction in Direction::ALL {
                    if !mask.has(direction) {
                        continue;
                    }
                    let key = WallKey::new(pos, direction);
                    let canonical = key.canonical();
                    if table.index.contains_key(&key) {
                        continue;
                    }
                    if let Some(entry) = specials.remove(&canonical) {
                        table.add(key, entry.kind, entry.health, entry.open);
                    } else if !suppressed.contains(&canonical) {
                        let kind = if self.contains(pos.step(direction)) {
                            WallKind::Wood
                        } else {
                            WallKind::Exterior
                        };
                        table.add(key, kind, None, false);
                    }
                }
            }
        }

        // Special walls on positions no mask mentioned, in config order.
        for entry in &config.special_walls {
            let key = entry.key();
            if specials.remove(&key.canonical()).is_some() {
                table.add(key, entry.kind, entry.health, entry.open);
            }
        }

        self.walls = table.walls;
        self.wall_index = Arc::new(table.index);
        self.exits = Arc::new(exits);
        Ok(())
    }

    fn place_entities(&mut self, config: &BoardConfig) -> Result<(), ConfigError> {
        for entry in &config.crew {
            self.require_in_bounds("crew", entry.pos())?;
            if self.crew.contains_key(&entry.id) {
                return Err(ConfigError::DuplicateCrew(entry.id));
            }
            self.crew.insert(entry.id, Crew::new(entry.id, entry.pos()));
        }

        for entry in &config.pois {
            self.require_in_bounds("POI", entry.pos())?;
            if self.pois.contains_key(&entry.id) {
                return Err(ConfigError::DuplicatePoi(entry.id));
            }
            if self.floor.contains_key(&entry.pos()) {
                return Err(ConfigError::PoiCellTaken(entry.pos()));
            }
            self.pois
                .insert(entry.id, PointOfInterest::new(entry.id, entry.pos(), entry.kind));
            self.floor.insert(entry.pos(), entry.id);
        }

        for entry in &config.hazards {
            let pos = entry.pos();
            self.require_in_bounds("hazard", pos)?;
            let hazard = match entry.state {
                HazardState::Egg => Hazard::Egg {
                    pos,
                    turns_until_hatch: entry.turns_until_hatch.unwrap_or(DEFAULT_EGG_COUNTDOWN).max(1),
                },
                HazardState::Spider => Hazard::Spider { pos },
            };
            self.insert_hazard(hazard)
                .map_err(|_| ConfigError::Occupied(pos))?;
        }
        Ok(())
    }

    fn require_in_bounds(&self, what: &'static str, pos: CellPos) -> Result<(), ConfigError> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(ConfigError::OutOfBounds { what, pos })
        }
    }

    // === Grid ===

    #[must_use]
    pub fn rows(&self) -> i32 {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> i32 {
        self.cols
    }

    /// Is `pos` inside the grid?
    #[must_use]
    pub fn contains(&self, pos: CellPos) -> bool {
        pos.row >= 1 && pos.row <= self.rows && pos.col >= 1 && pos.col <= self.cols
    }

    /// Configured wall mask of a cell.
    #[must_use]
    pub fn mask_at(&self, pos: CellPos) -> Option<WallMask> {
        self.contains(pos).then(|| self.masks[pos.index(self.cols)])
    }

    /// Is `pos` an exit cell?
    #[must_use]
    pub fn is_exit(&self, pos: CellPos) -> bool {
        self.exits.contains(&pos)
    }

    /// Address the same wall from the other side.
    #[must_use]
    pub fn opposite(&self, row: i32, col: i32, direction: Direction) -> (i32, i32, Direction) {
        crate::core::opposite(row, col, direction)
    }

    // === Walls ===

    /// Id of the wall named by `key`, from either side.
    #[must_use]
    pub fn wall_id_at(&self, key: WallKey) -> Option<WallId> {
        self.wall_index.get(&key).copied()
    }

    /// The wall on side `direction` of cell `pos`.
    #[must_use]
    pub fn wall_at(&self, pos: CellPos, direction: Direction) -> Option<&WallSegment> {
        self.wall_by_key(WallKey::new(pos, direction))
    }

    #[must_use]
    pub fn wall_by_key(&self, key: WallKey) -> Option<&WallSegment> {
        self.wall_id_at(key).and_then(|id| self.wall(id))
    }

    #[must_use]
    pub fn wall(&self, id: WallId) -> Option<&WallSegment> {
        self.walls.get(id.index())
    }

    /// All wall segments, in id order.
    pub fn walls(&self) -> impl Iterator<Item = &WallSegment> {
        self.walls.iter()
    }

    /// Can something cross from `pos` towards `direction`? True when there is
    /// no wall, the wall is destroyed, or it is an open door. The grid edge is
    /// not considered here.
    #[must_use]
    pub fn is_passable(&self, pos: CellPos, direction: Direction) -> bool {
        self.wall_at(pos, direction).map_or(true, WallSegment::is_passable)
    }

    pub(crate) fn wall_mut(&mut self, id: WallId) -> Option<&mut WallSegment> {
        self.walls.get_mut(id.index())
    }

    // === Hazards ===

    #[must_use]
    pub fn hazard_at(&self, pos: CellPos) -> Option<&Hazard> {
        self.hazards.get(&pos)
    }

    /// All hazards, ordered by position.
    pub fn hazards(&self) -> impl Iterator<Item = &Hazard> {
        self.hazards.values()
    }

    #[must_use]
    pub fn hazard_count(&self) -> usize {
        self.hazards.len()
    }

    /// Place a hazard on an empty cell.
    pub(crate) fn insert_hazard(&mut self, hazard: Hazard) -> Result<(), ReplayError> {
        let pos = hazard.pos();
        if !self.contains(pos) {
            return Err(ReplayError::OutOfBounds(pos));
        }
        if self.hazards.contains_key(&pos) {
            return Err(ReplayError::Occupied(pos));
        }
        self.hazards.insert(pos, hazard);
        Ok(())
    }

    pub(crate) fn hazard_mut(&mut self, pos: CellPos) -> Option<&mut Hazard> {
        self.hazards.get_mut(&pos)
    }

    pub(crate) fn remove_hazard(&mut self, pos: CellPos) -> Option<Hazard> {
        self.hazards.remove(&pos)
    }

    // === Points of interest ===

    /// The POI lying on the floor of `pos`, if any. Carried POIs are not on
    /// the floor.
    #[must_use]
    pub fn poi_at(&self, pos: CellPos) -> Option<&PointOfInterest> {
        self.floor.get(&pos).and_then(|id| self.pois.get(id))
    }

    /// A POI still in play (on the floor or carried).
    #[must_use]
    pub fn poi(&self, id: PoiId) -> Option<&PointOfInterest> {
        self.pois.get(&id)
    }

    /// A POI that has left the board.
    #[must_use]
    pub fn retired_poi(&self, id: PoiId) -> Option<&RetiredPoi> {
        self.retired.get(&id)
    }

    /// POIs still in play, ordered by id.
    pub fn pois(&self) -> impl Iterator<Item = &PointOfInterest> {
        self.pois.values()
    }

    pub(crate) fn poi_mut(&mut self, id: PoiId) -> Option<&mut PointOfInterest> {
        self.pois.get_mut(&id)
    }

    /// Take a POI off the floor index (it stays in play).
    pub(crate) fn lift_poi(&mut self, id: PoiId) {
        if let Some(poi) = self.pois.get(&id) {
            if self.floor.get(&poi.pos) == Some(&id) {
                self.floor.remove(&poi.pos);
            }
        }
    }

    /// Remove a POI from play, remembering how it left.
    pub(crate) fn retire_poi(&mut self, id: PoiId, fate: PoiFate) -> Option<PointOfInterest> {
        self.lift_poi(id);
        let poi = self.pois.remove(&id)?;
        self.retired.insert(id, RetiredPoi { poi, fate });
        Some(poi)
    }

    // === Crew ===

    #[must_use]
    pub fn crew_by_id(&self, id: CrewId) -> Option<&Crew> {
        self.crew.get(&id)
    }

    /// All crew, ordered by id.
    pub fn crew(&self) -> impl Iterator<Item = &Crew> {
        self.crew.values()
    }

    pub(crate) fn crew_mut(&mut self, id: CrewId) -> Option<&mut Crew> {
        self.crew.get_mut(&id)
    }

    // === Counters ===

    #[must_use]
    pub fn counters(&self) -> &GameCounters {
        &self.counters
    }

    pub(crate) fn counters_mut(&mut self) -> &mut GameCounters {
        &mut self.counters
    }
}

/// Wall table under construction.
#[derive(Default)]
struct WallTable {
    walls: Vector<WallSegment>,
    index: FxHashMap<WallKey, WallId>,
}

impl WallTable {
    fn add(&mut self, key: WallKey, kind: WallKind, health: Option<u8>, open: bool) {
        let id = WallId(self.walls.len() as u32);
        let mut segment = WallSegment::new(id, key, kind).with_open(open);
        if let Some(health) = health {
            segment = segment.with_health(health);
        }
        self.walls.push_back(segment);
        self.index.insert(key, id);
        self.index.insert(key.opposite(), id);
    }
}

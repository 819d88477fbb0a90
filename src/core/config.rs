//! Board and replay configuration.
//!
//! The initial board is described by a static document consumed once by
//! `Board::build`:
//! - `BoardConfig`: grid size, per-cell wall masks, special walls, exits and
//!   the initial crew / POI / hazard placements
//! - `ReplayConfig`: knobs for the replay itself (egg incubation, outcome
//!   thresholds, reconciliation)
//!
//! Both can be loaded from JSON or assembled with the `with_*` builders.
//!
//! ```
//! use rescue_replay::core::{BoardConfig, CellPos, CrewId, WallMask};
//!
//! let config = BoardConfig::open(6, 8)
//!     .with_mask(CellPos::new(2, 3), WallMask::parse("1000").unwrap())
//!     .with_crew(CrewId::new(1), CellPos::new(1, 1));
//!
//! assert_eq!(config.cells.len(), 48);
//! assert_eq!(config.crew.len(), 1);
//! ```

use serde::{Deserialize, Serialize};

use super::coords::{CellPos, Direction, WallKey};
use super::error::ConfigError;
use super::ids::{CrewId, PoiId};
use crate::board::PoiKind;
use crate::rules::ThresholdRules;
use crate::walls::WallKind;

/// Four-bit wall presence mask of one cell (`N W S E`, most significant first).
///
/// Serialized as the four-character string used by the scenario documents,
/// e.g. `"1100"` = walls to the north and west.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WallMask(u8);

impl WallMask {
    /// No walls.
    pub const EMPTY: WallMask = WallMask(0);
    /// Walls on all four sides.
    pub const ALL: WallMask = WallMask(0b1111);

    /// Parse a `NWSE` mask string.
    pub fn parse(encoded: &str) -> Result<Self, ConfigError> {
        if encoded.len() != 4 {
            return Err(ConfigError::InvalidMask(encoded.to_string()));
        }
        let mut mask = 0u8;
        for (ch, direction) in encoded.chars().zip(Direction::ALL) {
            match ch {
                '1' => mask |= direction.mask_bit(),
                '0' => {}
                _ => return Err(ConfigError::InvalidMask(encoded.to_string())),
            }
        }
        Ok(Self(mask))
    }

    /// Build a mask from a list of walled directions.
    #[must_use]
    pub fn from_directions(directions: &[Direction]) -> Self {
        Self(directions.iter().fold(0, |acc, d| acc | d.mask_bit()))
    }

    /// Is there a wall in `direction`?
    #[must_use]
    pub const fn has(self, direction: Direction) -> bool {
        self.0 & direction.mask_bit() != 0
    }

    /// Raw bit pattern.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl TryFrom<String> for WallMask {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WallMask> for String {
    fn from(mask: WallMask) -> Self {
        Direction::ALL
            .iter()
            .map(|&d| if mask.has(d) { '1' } else { '0' })
            .collect()
    }
}

/// Override for one wall position: doors, concrete, pre-damaged walls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialWallSpec {
    pub row: i32,
    pub col: i32,
    pub direction: Direction,
    pub kind: WallKind,
    /// Starting hit points. Defaults to the kind's maximum.
    #[serde(default)]
    pub health: Option<u8>,
    /// Doors only: starts open.
    #[serde(default)]
    pub open: bool,
}

impl SpecialWallSpec {
    /// The wall position this entry overrides.
    #[must_use]
    pub fn key(&self) -> WallKey {
        WallKey::new(CellPos::new(self.row, self.col), self.direction)
    }
}

/// An exit: crew carrying a victim drop it off here. No wall stands at
/// an exit position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitSpec {
    pub row: i32,
    pub col: i32,
    pub direction: Direction,
}

impl ExitSpec {
    #[must_use]
    pub fn pos(&self) -> CellPos {
        CellPos::new(self.row, self.col)
    }

    #[must_use]
    pub fn key(&self) -> WallKey {
        WallKey::new(self.pos(), self.direction)
    }
}

/// Initial crew placement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewSpec {
    pub id: CrewId,
    pub row: i32,
    pub col: i32,
}

impl CrewSpec {
    #[must_use]
    pub fn pos(&self) -> CellPos {
        CellPos::new(self.row, self.col)
    }
}

/// Initial POI placement. The kind is hidden from replay consumers until
/// the POI is revealed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoiSpec {
    pub id: PoiId,
    pub row: i32,
    pub col: i32,
    pub kind: PoiKind,
}

impl PoiSpec {
    #[must_use]
    pub fn pos(&self) -> CellPos {
        CellPos::new(self.row, self.col)
    }
}

/// Initial hazard kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardState {
    Egg,
    Spider,
}

/// Initial hazard placement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardSpec {
    pub row: i32,
    pub col: i32,
    pub state: HazardState,
    /// Eggs only. Defaults to `DEFAULT_EGG_COUNTDOWN`.
    #[serde(default)]
    pub turns_until_hatch: Option<u32>,
}

impl HazardSpec {
    #[must_use]
    pub fn pos(&self) -> CellPos {
        CellPos::new(self.row, self.col)
    }
}

/// Countdown given to eggs when nothing else is specified.
pub const DEFAULT_EGG_COUNTDOWN: u32 = 1;

/// Static description of the initial board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardConfig {
    pub rows: i32,
    pub cols: i32,
    /// Row-major wall masks, `rows * cols` entries.
    pub cells: Vec<WallMask>,
    #[serde(default)]
    pub special_walls: Vec<SpecialWallSpec>,
    #[serde(default)]
    pub exits: Vec<ExitSpec>,
    #[serde(default)]
    pub crew: Vec<CrewSpec>,
    #[serde(default)]
    pub pois: Vec<PoiSpec>,
    #[serde(default)]
    pub hazards: Vec<HazardSpec>,
}

impl BoardConfig {
    /// A `rows x cols` grid with no walls and nothing placed.
    ///
    /// Dimensions are validated by `Board::build`, not here.
    #[must_use]
    pub fn open(rows: i32, cols: i32) -> Self {
        let count = match rows.checked_mul(cols) {
            Some(cells) if rows > 0 && cols > 0 => cells as usize,
            _ => 0,
        };
        Self {
            rows,
            cols,
            cells: vec![WallMask::EMPTY; count],
            special_walls: Vec::new(),
            exits: Vec::new(),
            crew: Vec::new(),
            pois: Vec::new(),
            hazards: Vec::new(),
        }
    }

    /// Parse a board document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the wall mask of one cell. Out-of-grid positions are ignored here
    /// and have no effect on the built board.
    #[must_use]
    pub fn with_mask(mut self, pos: CellPos, mask: WallMask) -> Self {
        if pos.row >= 1 && pos.row <= self.rows && pos.col >= 1 && pos.col <= self.cols {
            let idx = pos.index(self.cols);
            if let Some(slot) = self.cells.get_mut(idx) {
                *slot = mask;
            }
        }
        self
    }

    /// Add a special wall override.
    #[must_use]
    pub fn with_special_wall(mut self, key: WallKey, kind: WallKind, health: Option<u8>) -> Self {
        self.special_walls.push(SpecialWallSpec {
            row: key.row,
            col: key.col,
            direction: key.direction,
            kind,
            health,
            open: false,
        });
        self
    }

    /// Add a closed door.
    #[must_use]
    pub fn with_door(self, key: WallKey) -> Self {
        self.with_special_wall(key, WallKind::Door, None)
    }

    /// Add an exit.
    #[must_use]
    pub fn with_exit(mut self, key: WallKey) -> Self {
        self.exits.push(ExitSpec {
            row: key.row,
            col: key.col,
            direction: key.direction,
        });
        self
    }

    /// Place a crew member.
    #[must_use]
    pub fn with_crew(mut self, id: CrewId, pos: CellPos) -> Self {
        self.crew.push(CrewSpec { id, row: pos.row, col: pos.col });
        self
    }

    /// Place a point of interest.
    #[must_use]
    pub fn with_poi(mut self, id: PoiId, pos: CellPos, kind: PoiKind) -> Self {
        self.pois.push(PoiSpec { id, row: pos.row, col: pos.col, kind });
        self
    }

    /// Place an egg.
    #[must_use]
    pub fn with_egg(mut self, pos: CellPos, turns_until_hatch: u32) -> Self {
        self.hazards.push(HazardSpec {
            row: pos.row,
            col: pos.col,
            state: HazardState::Egg,
            turns_until_hatch: Some(turns_until_hatch),
        });
        self
    }

    /// Place a spider.
    #[must_use]
    pub fn with_spider(mut self, pos: CellPos) -> Self {
        self.hazards.push(HazardSpec {
            row: pos.row,
            col: pos.col,
            state: HazardState::Spider,
            turns_until_hatch: None,
        });
        self
    }
}

/// Replay behaviour knobs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReplayConfig {
    /// Countdown given to eggs spawned by dice rolls.
    pub egg_countdown: u32,
    /// Thresholds used to annotate turn summaries with an outcome.
    pub rules: ThresholdRules,
    /// Compare recorded states, changes and counters with engine results.
    pub reconcile: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            egg_countdown: DEFAULT_EGG_COUNTDOWN,
            rules: ThresholdRules::default(),
            reconcile: true,
        }
    }
}

impl ReplayConfig {
    /// Default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the egg countdown. Zero is treated as one.
    #[must_use]
    pub fn with_egg_countdown(mut self, countdown: u32) -> Self {
        self.egg_countdown = countdown.max(1);
        self
    }

    /// Set the outcome thresholds.
    #[must_use]
    pub fn with_rules(mut self, rules: ThresholdRules) -> Self {
        self.rules = rules;
        self
    }

    /// Disable reconciliation diagnostics.
    #[must_use]
    pub fn without_reconcile(mut self) -> Self {
        self.reconcile = false;
        self
    }
}

//! Hazard lifecycle and explosions.
//!
//! ```text
//!   Egg(n) --tick--> Egg(n-1) --(n = 0)--> Spider --explode / attack--> removed
//! ```
//!
//! ## Explosions
//!
//! An explosion is a single ring. The spider is removed, then each of the four
//! neighbours is visited in `N W S E` order:
//!
//! - neighbour outside the grid: skipped
//! - a standing wall in between: one point of damage to that wall
//! - nothing in between (no wall, destroyed wall, open door): a spider spawns
//!   in the neighbour, unless the cell is already occupied
//!
//! Spiders spawned by the blast do not explode in turn. Conflicts met along
//! the way (occupied neighbour, undamageable wall) are collected in the report
//! and the blast carries on.

use log::debug;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::{Board, Hazard};
use crate::core::{CellPos, Lookup, ReplayError, WallKey};
use crate::walls::{WallStateMachine, WallTransition};

/// Result of an egg tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickOutcome {
    pub before: Hazard,
    pub after: Hazard,
    /// The egg turned into a spider on this tick.
    pub hatched: bool,
}

/// Everything an explosion changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExplosionReport {
    /// Cell of the exploded spider.
    pub origin: CellPos,
    /// Walls damaged by the blast.
    pub walls: SmallVec<[WallTransition; 4]>,
    /// Cells where a new spider appeared.
    pub spawned: SmallVec<[CellPos; 4]>,
    /// Neighbours the blast could not affect.
    pub conflicts: Vec<ReplayError>,
}

impl ExplosionReport {
    fn new(origin: CellPos) -> Self {
        Self {
            origin,
            walls: SmallVec::new(),
            spawned: SmallVec::new(),
            conflicts: Vec::new(),
        }
    }

    /// Walls destroyed (not merely damaged) by the blast.
    pub fn destroyed_walls(&self) -> impl Iterator<Item = &WallTransition> {
        self.walls.iter().filter(|t| t.destroyed)
    }
}

/// Spawns, incubates, removes and explodes hazards.
pub struct HazardEngine;

impl HazardEngine {
    /// Place an egg with the given countdown (at least one tick).
    pub fn spawn_egg(board: &mut Board, pos: CellPos, countdown: u32) -> Result<Hazard, ReplayError> {
        let egg = Hazard::Egg {
            pos,
            turns_until_hatch: countdown.max(1),
        };
        board.insert_hazard(egg)?;
        debug!("egg spawned at {}", pos);
        Ok(egg)
    }

    /// Place a spider directly.
    pub fn spawn_spider(board: &mut Board, pos: CellPos) -> Result<Hazard, ReplayError> {
        let spider = Hazard::Spider { pos };
        board.insert_hazard(spider)?;
        debug!("spider spawned at {}", pos);
        Ok(spider)
    }

    /// Advance the egg at `pos` by one tick; it hatches in place when the
    /// countdown reaches zero.
    pub fn tick(board: &mut Board, pos: CellPos) -> Result<TickOutcome, ReplayError> {
        let hazard = board
            .hazard_mut(pos)
            .ok_or(ReplayError::NotFound(Lookup::Egg(pos)))?;
        let before = *hazard;

        let Hazard::Egg { turns_until_hatch, .. } = &mut *hazard else {
            return Err(ReplayError::NotFound(Lookup::Egg(pos)));
        };
        *turns_until_hatch = turns_until_hatch.saturating_sub(1);
        let hatched = *turns_until_hatch == 0;
        if hatched {
            *hazard = Hazard::Spider { pos };
            debug!("egg at {} hatched", pos);
        }

        Ok(TickOutcome {
            before,
            after: *hazard,
            hatched,
        })
    }

    /// Remove whatever hazard stands at `pos` (crew attack).
    pub fn remove(board: &mut Board, pos: CellPos) -> Result<Hazard, ReplayError> {
        let removed = board
            .remove_hazard(pos)
            .ok_or(ReplayError::NotFound(Lookup::Hazard(pos)))?;
        debug!("{} at {} removed", removed.label(), pos);
        Ok(removed)
    }

    /// Explode the spider at `pos`.
    ///
    /// Fails only when no spider stands at `pos`; in that case the board is
    /// unchanged.
    pub fn explode(board: &mut Board, pos: CellPos) -> Result<ExplosionReport, ReplayError> {
        match board.hazard_at(pos) {
            Some(hazard) if hazard.is_spider() => {}
            _ => return Err(ReplayError::NotFound(Lookup::Spider(pos))),
        }
        board.remove_hazard(pos);

        let mut report = ExplosionReport::new(pos);
        for (direction, neighbour) in pos.neighbors() {
            if !board.contains(neighbour) {
                continue;
            }

            if !board.is_passable(pos, direction) {
                match WallStateMachine::damage_at(board, WallKey::new(pos, direction), 1) {
                    Ok(transition) => report.walls.push(transition),
                    Err(conflict) => report.conflicts.push(conflict),
                }
                continue;
            }

            match Self::spawn_spider(board, neighbour) {
                Ok(_) => report.spawned.push(neighbour),
                Err(conflict) => {
                    debug!("explosion at {} skipped {}: {}", pos, neighbour, conflict);
                    report.conflicts.push(conflict);
                }
            }
        }

        debug!(
            "explosion at {}: {} walls hit, {} spiders spawned",
            pos,
            report.walls.len(),
            report.spawned.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BoardConfig, Direction, WallMask};
    use crate::walls::WallKind;

    fn board(config: BoardConfig) -> Board {
        Board::build(&config).unwrap()
    }

    #[test]
    fn test_spawn_egg_occupied() {
        let pos = CellPos::new(2, 2);
        let mut board = board(BoardConfig::open(3, 3));
        HazardEngine::spawn_egg(&mut board, pos, 1).unwrap();
        assert_eq!(
            HazardEngine::spawn_egg(&mut board, pos, 1),
            Err(ReplayError::Occupied(pos))
        );
        assert_eq!(
            HazardEngine::spawn_spider(&mut board, pos),
            Err(ReplayError::Occupied(pos))
        );
        assert_eq!(board.hazard_count(), 1);
    }

    #[test]
    fn test_egg_hatches_after_one_tick() {
        let pos = CellPos::new(1, 1);
        let mut board = board(BoardConfig::open(2, 2).with_egg(pos, 1));

        let outcome = HazardEngine::tick(&mut board, pos).unwrap();
        assert!(outcome.hatched);
        assert_eq!(outcome.after, Hazard::Spider { pos });
        assert_eq!(board.hazard_at(pos), Some(&Hazard::Spider { pos }));
    }

    #[test]
    fn test_egg_counts_down() {
        let pos = CellPos::new(1, 1);
        let mut board = board(BoardConfig::open(2, 2).with_egg(pos, 2));

        let first = HazardEngine::tick(&mut board, pos).unwrap();
        assert!(!first.hatched);
        assert_eq!(first.after, Hazard::Egg { pos, turns_until_hatch: 1 });
        assert!(HazardEngine::tick(&mut board, pos).unwrap().hatched);
    }

    #[test]
    fn test_tick_requires_egg() {
        let pos = CellPos::new(1, 1);
        let mut board = board(BoardConfig::open(2, 2).with_spider(pos));
        assert_eq!(
            HazardEngine::tick(&mut board, pos),
            Err(ReplayError::NotFound(Lookup::Egg(pos)))
        );
        assert_eq!(board.hazard_at(pos), Some(&Hazard::Spider { pos }));
    }

    #[test]
    fn test_remove() {
        let pos = CellPos::new(1, 2);
        let mut board = board(BoardConfig::open(2, 2).with_egg(pos, 3));
        assert!(HazardEngine::remove(&mut board, pos).unwrap().is_egg());
        assert!(matches!(
            HazardEngine::remove(&mut board, pos),
            Err(ReplayError::NotFound(Lookup::Hazard(_)))
        ));
    }

    #[test]
    fn test_explosion_open_ring() {
        let origin = CellPos::new(2, 2);
        let mut board = board(BoardConfig::open(3, 3).with_spider(origin));

        let report = HazardEngine::explode(&mut board, origin).unwrap();
        assert_eq!(report.spawned.len(), 4);
        assert!(report.walls.is_empty());
        assert!(board.hazard_at(origin).is_none());
        assert_eq!(board.hazard_count(), 4);
    }

    #[test]
    fn test_explosion_walled_in() {
        let origin = CellPos::new(2, 2);
        let config = BoardConfig::open(3, 3)
            .with_mask(origin, WallMask::ALL)
            .with_spider(origin);
        let mut board = board(config);

        let report = HazardEngine::explode(&mut board, origin).unwrap();
        assert!(report.spawned.is_empty());
        assert_eq!(report.walls.len(), 4);
        assert_eq!(board.hazard_count(), 0);
        for direction in Direction::ALL {
            assert_eq!(board.wall_at(origin, direction).unwrap().current_health(), 1);
        }
        assert_eq!(board.counters().building_damage, 4);
    }

    #[test]
    fn test_explosion_skips_occupied_and_out_of_grid() {
        let origin = CellPos::new(1, 1);
        let config = BoardConfig::open(2, 2)
            .with_spider(origin)
            .with_egg(CellPos::new(1, 2), 1);
        let mut board = board(config);

        let report = HazardEngine::explode(&mut board, origin).unwrap();
        assert_eq!(report.spawned.as_slice(), &[CellPos::new(2, 1)]);
        assert_eq!(report.conflicts, vec![ReplayError::Occupied(CellPos::new(1, 2))]);
        // The egg is untouched.
        assert!(board.hazard_at(CellPos::new(1, 2)).unwrap().is_egg());
    }

    #[test]
    fn test_explosion_through_destroyed_wall_and_at_closed_door() {
        let origin = CellPos::new(1, 2);
        let east = WallKey::new(origin, Direction::East);
        let west = WallKey::new(origin, Direction::West);
        let config = BoardConfig::open(1, 3)
            .with_special_wall(east, WallKind::Wood, Some(0))
            .with_door(west)
            .with_spider(origin);
        let mut board = board(config);

        let report = HazardEngine::explode(&mut board, origin).unwrap();
        assert_eq!(report.spawned.as_slice(), &[CellPos::new(1, 3)]);
        assert!(report.walls.is_empty());
        assert!(matches!(report.conflicts.as_slice(), [ReplayError::ImmutableWall(_)]));
    }

    #[test]
    fn test_explode_without_spider() {
        let pos = CellPos::new(1, 1);
        let mut board = board(BoardConfig::open(2, 2).with_egg(pos, 1));
        assert_eq!(
            HazardEngine::explode(&mut board, pos),
            Err(ReplayError::NotFound(Lookup::Spider(pos)))
        );
        assert!(board.hazard_at(pos).is_some());
    }
}

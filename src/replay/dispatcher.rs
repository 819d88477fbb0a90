//! Action dispatcher: applies one sub-event to the board.
//!
//! Every sub-event maps to exactly one handler. A handler either applies its
//! mutation and records the matching effects, or fails without touching the
//! board; failures become diagnostics on the batch and the replay moves on.
//!
//! ## Dice rolls
//!
//! | outcome     | empty cell     | egg                      | spider                |
//! |-------------|----------------|--------------------------|-----------------------|
//! | `egg`       | spawn egg      | `Occupied`               | `Occupied`            |
//! | `spider`    | spawn spider   | tick (hatch at zero)     | `Occupied`            |
//! | `explosion` | `NotFound`     | `NotFound`               | explode               |
//!
//! Whenever a spider appears on a cell, a victim lying there is lost.

use log::{debug, error, warn};

use super::action::{normalize, ActionKind};
use super::log::{CrewAction, DiceEvent, DiceOutcome, ResultingChanges, SubEvent};
use crate::board::{Board, Hazard};
use crate::core::{CellPos, Lookup, ReplayConfig, ReplayError, Severity, WallKey};
use crate::effects::{Effect, EffectBatch, EffectKind, Subject};
use crate::hazards::HazardEngine;
use crate::poi::PoiTracker;
use crate::walls::WallStateMachine;

/// Maps sub-events to board mutations.
#[derive(Clone, Debug)]
pub struct ActionDispatcher {
    egg_countdown: u32,
    reconcile: bool,
}

impl Default for ActionDispatcher {
    fn default() -> Self {
        Self::new(&ReplayConfig::default())
    }
}

impl ActionDispatcher {
    #[must_use]
    pub fn new(config: &ReplayConfig) -> Self {
        Self {
            egg_countdown: config.egg_countdown.max(1),
            reconcile: config.reconcile,
        }
    }

    /// Apply one sub-event and return what it changed.
    pub fn dispatch(&self, board: &mut Board, event: &SubEvent) -> EffectBatch {
        let mut batch = EffectBatch::new();
        let result = match event {
            SubEvent::Dice(dice) => self.apply_dice(board, dice, &mut batch),
            SubEvent::Action(action) => self.apply_action(board, action, &mut batch),
        };
        if let Err(err) = result {
            batch.diagnose(err);
        }

        for diagnostic in batch.diagnostics() {
            match diagnostic.severity {
                Severity::Warning => warn!("{}", diagnostic.error),
                Severity::Error => error!("{}", diagnostic.error),
            }
        }
        debug!(
            "sub-event applied: {} effects, {} diagnostics",
            batch.len(),
            batch.diagnostics().len()
        );
        batch
    }

    // === Dice ===

    fn apply_dice(&self, board: &mut Board, dice: &DiceEvent, batch: &mut EffectBatch) -> Result<(), ReplayError> {
        let pos = dice.pos();
        if !board.contains(pos) {
            return Err(ReplayError::OutOfBounds(pos));
        }
        if self.reconcile {
            if let Some(recorded) = &dice.previous_state {
                Self::check_previous_state(board, pos, recorded, batch);
            }
        }

        let first_new = batch.len();
        match dice.new_state {
            DiceOutcome::Egg => {
                let egg = HazardEngine::spawn_egg(board, pos, self.egg_countdown)?;
                batch.push(Effect::hazard_spawned(egg));
            }
            DiceOutcome::Spider => match board.hazard_at(pos).copied() {
                Some(Hazard::Egg { .. }) => {
                    let tick = HazardEngine::tick(board, pos)?;
                    if tick.hatched {
                        batch.push(Effect::hazard_changed(EffectKind::HazardHatched, tick.before, tick.after));
                        Self::spider_landed(board, pos, batch);
                    } else {
                        batch.push(Effect::hazard_changed(EffectKind::EggIncubated, tick.before, tick.after));
                    }
                }
                Some(Hazard::Spider { .. }) => return Err(ReplayError::Occupied(pos)),
                None => {
                    let spider = HazardEngine::spawn_spider(board, pos)?;
                    batch.push(Effect::hazard_spawned(spider));
                    Self::spider_landed(board, pos, batch);
                }
            },
            DiceOutcome::Explosion => {
                let report = HazardEngine::explode(board, pos)?;
                batch.push(Effect::hazard_gone(EffectKind::Explosion, Hazard::Spider { pos }));
                for transition in &report.walls {
                    batch.push(Effect::wall(transition));
                }
                for &cell in &report.spawned {
                    batch.push(Effect::hazard_spawned(Hazard::Spider { pos: cell }));
                    Self::spider_landed(board, cell, batch);
                }
                for conflict in report.conflicts {
                    batch.diagnose(conflict);
                }
            }
            DiceOutcome::Unknown => return Err(ReplayError::UnknownDiceOutcome(pos)),
        }

        if self.reconcile {
            if let Some(recorded) = &dice.resulting_changes {
                let effects = batch.effects()[first_new..].to_vec();
                Self::check_changes(board, pos, recorded, &effects, batch);
            }
        }
        Ok(())
    }

    /// A spider appeared on `pos`: a victim lying there is lost.
    fn spider_landed(board: &mut Board, pos: CellPos, batch: &mut EffectBatch) {
        let Some(id) = PoiTracker::victim_at(board, pos) else {
            return;
        };
        let Some(before) = board.poi(id).map(|poi| poi.snapshot()) else {
            return;
        };
        match PoiTracker::lose_victim(board, id) {
            Ok(_) => batch.push(Effect::poi(EffectKind::VictimLost, id, before, None)),
            Err(err) => batch.diagnose(err),
        }
    }

    fn check_previous_state(board: &Board, pos: CellPos, recorded: &str, batch: &mut EffectBatch) {
        let actual = board.hazard_at(pos).map_or("empty", Hazard::label);
        let normalized = normalize(recorded.trim());
        let normalized = match normalized.as_str() {
            "" | "none" | "empty" | "vacio" | "vacia" => "empty",
            "egg" | "huevo" => "egg",
            "spider" | "arana" => "spider",
            other => other,
        };
        if normalized != actual {
            batch.diagnose(ReplayError::StateDrift {
                pos,
                recorded: recorded.to_string(),
                actual: actual.to_string(),
            });
        }
    }

    fn check_changes(
        board: &Board,
        pos: CellPos,
        recorded: &ResultingChanges,
        effects: &[Effect],
        batch: &mut EffectBatch,
    ) {
        let mut walls = Vec::new();
        let mut spawned = Vec::new();
        let mut removed = Vec::new();
        for effect in effects {
            match (effect.kind, effect.subject) {
                (EffectKind::WallDamaged | EffectKind::WallDestroyed, Subject::Wall(id)) => {
                    if let Some(wall) = board.wall(id) {
                        walls.push(wall.key);
                    }
                }
                (EffectKind::HazardSpawned | EffectKind::HazardHatched, Subject::Hazard(cell)) => {
                    spawned.push(cell)
                }
                (EffectKind::Explosion | EffectKind::HazardRemoved, Subject::Hazard(cell)) => {
                    removed.push(cell)
                }
                _ => {}
            }
        }

        let recorded_walls: Vec<WallKey> = recorded.walls_damaged.iter().map(|k| k.canonical()).collect();
        let checks = [
            ("wallsDamaged", render(&recorded_walls), render(&walls)),
            ("hazardsSpawned", render(&recorded.hazards_spawned), render(&spawned)),
            ("hazardsRemoved", render(&recorded.hazards_removed), render(&removed)),
        ];
        for (field, expected, actual) in checks {
            if expected != actual {
                batch.diagnose(ReplayError::StateDrift {
                    pos,
                    recorded: format!("{}={}", field, expected),
                    actual: format!("{}={}", field, actual),
                });
            }
        }
    }

    // === Crew actions ===

    fn apply_action(&self, board: &mut Board, action: &CrewAction, batch: &mut EffectBatch) -> Result<(), ReplayError> {
        let crew = board
            .crew_by_id(action.crew_id)
            .copied()
            .ok_or(ReplayError::NotFound(Lookup::Crew(action.crew_id)))?;
        if self.reconcile {
            if let Some(from) = action.from.filter(|from| *from != crew.pos) {
                batch.diagnose(ReplayError::StateDrift {
                    pos: from,
                    recorded: format!("{} at {}", crew.id, from),
                    actual: format!("{} at {}", crew.id, crew.pos),
                });
            }
        }

        match &action.kind {
            ActionKind::Move => {
                let to = require(action.to, &action.kind, "to")?;
                Self::move_crew(board, action, to, batch)
            }
            ActionKind::AttackWall | ActionKind::BreakWall => {
                let key = require(action.wall, &action.kind, "wall")?;
                let amount = action.kind.wall_damage().unwrap_or(1);
                let transition = WallStateMachine::damage_at(board, key, amount)?;
                batch.push(Effect::wall(&transition));
                Ok(())
            }
            ActionKind::OpenDoor => {
                let key = require(action.wall, &action.kind, "wall")?;
                let transition = WallStateMachine::open_door_at(board, key)?;
                batch.push(Effect::wall(&transition));
                Ok(())
            }
            ActionKind::RevealPoi => Self::reveal(board, action, batch),
            ActionKind::PickUpVictim => Self::pick_up(board, action, crew.pos, batch),
            ActionKind::DropOffVictim => {
                let id = crew.carrying.ok_or(ReplayError::NotCarrying(crew.id))?;
                let before = board
                    .poi(id)
                    .map(|poi| poi.snapshot())
                    .ok_or(ReplayError::NotFound(Lookup::Poi(id)))?;
                PoiTracker::drop_off_at_exit(board, crew.id)?;
                batch.push(Effect::poi(EffectKind::VictimRescued, id, before, None));
                Ok(())
            }
            ActionKind::AttackHazard | ActionKind::Extinguish => {
                let target = action
                    .target_cell
                    .or(action.to)
                    .ok_or(ReplayError::MissingField {
                        action: action.kind.name(),
                        field: "targetCell",
                    })?;
                let removed = HazardEngine::remove(board, target)?;
                batch.push(Effect::hazard_gone(EffectKind::HazardRemoved, removed));
                Ok(())
            }
            ActionKind::Unknown(name) => Err(ReplayError::UnknownAction(name.clone())),
        }
    }

    fn move_crew(board: &mut Board, action: &CrewAction, to: CellPos, batch: &mut EffectBatch) -> Result<(), ReplayError> {
        let id = action.crew_id;
        let before = board
            .crew_by_id(id)
            .copied()
            .ok_or(ReplayError::NotFound(Lookup::Crew(id)))?;
        if !board.contains(to) {
            return Err(ReplayError::OutOfBounds(to));
        }
        let direction = before.pos.direction_to(to).ok_or(ReplayError::NotAdjacent {
            crew: id,
            from: before.pos,
            to,
        })?;
        if !board.is_passable(before.pos, direction) {
            return Err(ReplayError::Blocked {
                crew: id,
                wall: WallKey::new(before.pos, direction).canonical(),
            });
        }

        let Some(crew) = board.crew_mut(id) else {
            return Err(ReplayError::NotFound(Lookup::Crew(id)));
        };
        crew.pos = to;
        let after = *crew;
        if let Some(carried) = after.carrying.and_then(|poi| board.poi_mut(poi)) {
            carried.pos = to;
        }
        batch.push(Effect::crew(EffectKind::CrewMoved, before, after));
        Ok(())
    }

    fn reveal(board: &mut Board, action: &CrewAction, batch: &mut EffectBatch) -> Result<(), ReplayError> {
        let id = match (action.poi_id, action.target_cell) {
            (Some(id), _) => id,
            (None, Some(cell)) => board
                .poi_at(cell)
                .map(|poi| poi.id)
                .ok_or(ReplayError::NotFound(Lookup::PoiAt(cell)))?,
            (None, None) => {
                return Err(ReplayError::MissingField {
                    action: action.kind.name(),
                    field: "poiId",
                })
            }
        };

        let before = board.poi(id).map(|poi| poi.snapshot());
        let result = PoiTracker::reveal(board, id)?;
        let Some(before) = before else {
            return Ok(());
        };
        let revealed = board
            .poi(id)
            .or_else(|| board.retired_poi(id).map(|retired| &retired.poi))
            .map(|poi| poi.snapshot());
        batch.push(Effect::poi(EffectKind::PoiRevealed, id, before, revealed));
        if let (true, Some(revealed)) = (result.dismissed, revealed) {
            batch.push(Effect::poi(EffectKind::PoiDismissed, id, revealed, None));
        }
        Ok(())
    }

    fn pick_up(board: &mut Board, action: &CrewAction, crew_pos: CellPos, batch: &mut EffectBatch) -> Result<(), ReplayError> {
        let id = match action.poi_id {
            Some(id) => id,
            None => {
                let cell = action.target_cell.unwrap_or(crew_pos);
                board
                    .poi_at(cell)
                    .map(|poi| poi.id)
                    .ok_or(ReplayError::NotFound(Lookup::PoiAt(cell)))?
            }
        };
        let before = board
            .poi(id)
            .map(|poi| poi.snapshot())
            .ok_or(ReplayError::NotFound(Lookup::Poi(id)))?;
        PoiTracker::pick_up(board, id, action.crew_id)?;
        let after = board.poi(id).map(|poi| poi.snapshot());
        batch.push(Effect::poi(EffectKind::VictimPickedUp, id, before, after));
        Ok(())
    }
}

fn require<T>(value: Option<T>, kind: &ActionKind, field: &'static str) -> Result<T, ReplayError> {
    value.ok_or(ReplayError::MissingField {
        action: kind.name(),
        field,
    })
}

/// Order-insensitive rendering of a list of positions for drift messages.
fn render<T: Ord + Copy + std::fmt::Display>(items: &[T]) -> String {
    let mut sorted = items.to_vec();
    sorted.sort_unstable();
    let parts: Vec<String> = sorted.iter().map(ToString::to_string).collect();
    format!("[{}]", parts.join(", "))
}

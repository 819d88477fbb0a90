//! Point-of-interest lifecycle.
//!
//! ```text
//!   hidden --reveal--> Victim --pick up--> carried --drop off--> rescued
//!                 \        \                  \
//!                  \        `------- lose -----`--> lost
//!                   `--> FalseAlarm (dismissed on reveal)
//! ```
//!
//! Every POI that leaves play is kept in the board's retired table, so a
//! repeated operation on it reports the proper conflict.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::board::{Board, PoiFate, PoiKind, PointOfInterest};
use crate::core::{CellPos, CrewId, Lookup, PoiId, ReplayError};

/// Result of a successful reveal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealResult {
    pub poi: PoiId,
    pub kind: PoiKind,
    /// False alarms leave the board as soon as they are revealed.
    pub dismissed: bool,
}

/// Reveals, carries, rescues and loses points of interest.
pub struct PoiTracker;

impl PoiTracker {
    /// Reveal a POI and return its kind.
    ///
    /// A false alarm is dismissed on the spot and counted in
    /// `false_alarms`.
    pub fn reveal(board: &mut Board, id: PoiId) -> Result<RevealResult, ReplayError> {
        if let Some(retired) = board.retired_poi(id) {
            return Err(if retired.poi.revealed {
                ReplayError::AlreadyRevealed(id)
            } else {
                ReplayError::NotFound(Lookup::Poi(id))
            });
        }

        let poi = board
            .poi_mut(id)
            .ok_or(ReplayError::NotFound(Lookup::Poi(id)))?;
        if poi.revealed {
            return Err(ReplayError::AlreadyRevealed(id));
        }
        poi.revealed = true;
        let kind = poi.hidden_kind();
        debug!("{} revealed as {:?}", id, kind);

        let dismissed = kind == PoiKind::FalseAlarm;
        if dismissed {
            board.retire_poi(id, PoiFate::Dismissed);
            board.counters_mut().false_alarms += 1;
        }

        Ok(RevealResult { poi: id, kind, dismissed })
    }

    /// Reveal whatever POI lies on the floor of `pos`.
    pub fn reveal_at(board: &mut Board, pos: CellPos) -> Result<RevealResult, ReplayError> {
        let id = board
            .poi_at(pos)
            .map(|poi| poi.id)
            .ok_or(ReplayError::NotFound(Lookup::PoiAt(pos)))?;
        Self::reveal(board, id)
    }

    /// Have `crew` pick up a revealed victim.
    pub fn pick_up(board: &mut Board, id: PoiId, crew: CrewId) -> Result<(), ReplayError> {
        let carrier = board
            .crew_by_id(crew)
            .ok_or(ReplayError::NotFound(Lookup::Crew(crew)))?;
        let carrier_pos = carrier.pos;
        let already = carrier.carrying;

        let poi = board.poi(id).ok_or(ReplayError::NotFound(Lookup::Poi(id)))?;
        if !poi.revealed {
            return Err(ReplayError::NotRevealed(id));
        }
        if poi.hidden_kind() != PoiKind::Victim {
            return Err(ReplayError::NotAVictim(id));
        }
        if let Some(holder) = poi.carried_by {
            return Err(ReplayError::AlreadyCarried { poi: id, carrier: holder });
        }
        if let Some(held) = already {
            return Err(ReplayError::AlreadyCarrying { crew, poi: held });
        }

        board.lift_poi(id);
        if let Some(poi) = board.poi_mut(id) {
            poi.carried_by = Some(crew);
            poi.pos = carrier_pos;
        }
        if let Some(carrier) = board.crew_mut(crew) {
            carrier.carrying = Some(id);
        }
        debug!("{} picked up {}", crew, id);
        Ok(())
    }

    /// Drop the victim carried by `crew` at an exit: it is rescued.
    pub fn drop_off_at_exit(board: &mut Board, crew: CrewId) -> Result<PoiId, ReplayError> {
        let carrier = board
            .crew_mut(crew)
            .ok_or(ReplayError::NotFound(Lookup::Crew(crew)))?;
        let id = carrier.carrying.take().ok_or(ReplayError::NotCarrying(crew))?;

        if let Some(poi) = board.poi_mut(id) {
            poi.rescued = true;
            poi.carried_by = None;
        }
        board.retire_poi(id, PoiFate::Rescued);
        board.counters_mut().victims_rescued += 1;
        debug!("{} rescued {}", crew, id);
        Ok(id)
    }

    /// A hazard reached a victim: it is lost, wherever it is.
    pub fn lose_victim(board: &mut Board, id: PoiId) -> Result<PointOfInterest, ReplayError> {
        let poi = board.poi(id).ok_or(ReplayError::NotFound(Lookup::Poi(id)))?;
        if poi.hidden_kind() != PoiKind::Victim {
            return Err(ReplayError::NotAVictim(id));
        }
        if let Some(holder) = poi.carried_by {
            if let Some(carrier) = board.crew_mut(holder) {
                carrier.carrying = None;
            }
        }

        let lost = board
            .retire_poi(id, PoiFate::Lost)
            .ok_or(ReplayError::NotFound(Lookup::Poi(id)))?;
        board.counters_mut().victims_lost += 1;
        debug!("{} lost at {}", id, lost.pos);
        Ok(lost)
    }

    /// Victim lying on the floor of `pos`, revealed or not.
    #[must_use]
    pub fn victim_at(board: &Board, pos: CellPos) -> Option<PoiId> {
        board
            .poi_at(pos)
            .filter(|poi| poi.hidden_kind() == PoiKind::Victim)
            .map(|poi| poi.id)
    }
}

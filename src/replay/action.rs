//! Crew action kinds.
//!
//! Logs name actions with strings. They are parsed once into `ActionKind`
//! so the dispatcher can match exhaustively; anything unrecognised is kept
//! verbatim in `ActionKind::Unknown` and reported when dispatched.
//!
//! Parsing ignores case, underscores and accents, so `attackWall`,
//! `attack_wall` and `ATTACK_WALL` are the same kind. The Spanish names
//! written by the simulator (`mover`, `dañar_pared`, `apagar_fuego`, ...)
//! are accepted as well.
//!
//! ```
//! use rescue_replay::replay::ActionKind;
//!
//! assert_eq!(ActionKind::parse("break_wall"), ActionKind::BreakWall);
//! assert_eq!(ActionKind::BreakWall.wall_damage(), Some(2));
//! assert_eq!(ActionKind::parse("teleport"), ActionKind::Unknown("teleport".into()));
//! ```

use serde::{Deserialize, Serialize};

/// Damage dealt by an `attackWall` action.
pub const ATTACK_DAMAGE: u8 = 1;
/// Damage dealt by a `breakWall` action. Destroys an intact wood wall.
pub const BREAK_DAMAGE: u8 = 2;

/// What a crew member did.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionKind {
    /// Step to an adjacent cell.
    Move,
    /// Damage a wall by one point.
    AttackWall,
    /// Damage a wall by two points.
    BreakWall,
    OpenDoor,
    RevealPoi,
    PickUpVictim,
    /// Drop the carried victim at an exit.
    DropOffVictim,
    /// Remove the hazard on a cell.
    AttackHazard,
    /// Same as `AttackHazard`.
    Extinguish,
    /// Not recognised. Reported, never applied.
    Unknown(String),
}

impl ActionKind {
    /// Parse an action name from a log.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match normalize(name).as_str() {
            "move" | "mover" => ActionKind::Move,
            "attackwall" | "danarpared" | "atacarpared" => ActionKind::AttackWall,
            "breakwall" | "romperpared" | "destruirpared" => ActionKind::BreakWall,
            "opendoor" | "abrirpuerta" => ActionKind::OpenDoor,
            "revealpoi" | "reveal" | "revelarpoi" => ActionKind::RevealPoi,
            "pickupvictim" | "pickup" | "recogervictima" | "cargarvictima" => ActionKind::PickUpVictim,
            "dropoffvictim" | "dropoff" | "depositarvictima" | "dejarvictimaenentrada" => {
                ActionKind::DropOffVictim
            }
            "attackhazard" | "attack" | "eliminararana" | "eliminarhuevo" | "atacararana" => {
                ActionKind::AttackHazard
            }
            "extinguish" | "extinguishfire" | "apagarfuego" => ActionKind::Extinguish,
            _ => ActionKind::Unknown(name.to_string()),
        }
    }

    /// Canonical name, as written back to logs.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            ActionKind::Unknown(name) => name,
            known => known.name(),
        }
    }

    /// Static name for diagnostics. `"unknown"` for unrecognised kinds.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Move => "move",
            ActionKind::AttackWall => "attackWall",
            ActionKind::BreakWall => "breakWall",
            ActionKind::OpenDoor => "openDoor",
            ActionKind::RevealPoi => "revealPoi",
            ActionKind::PickUpVictim => "pickUpVictim",
            ActionKind::DropOffVictim => "dropOffVictim",
            ActionKind::AttackHazard => "attackHazard",
            ActionKind::Extinguish => "extinguish",
            ActionKind::Unknown(_) => "unknown",
        }
    }

    /// Wall damage dealt by this action, if it is a wall attack.
    #[must_use]
    pub const fn wall_damage(&self) -> Option<u8> {
        match self {
            ActionKind::AttackWall => Some(ATTACK_DAMAGE),
            ActionKind::BreakWall => Some(BREAK_DAMAGE),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, ActionKind::Unknown(_))
    }
}

/// Lowercase, drop underscores and strip Spanish accents, so `dañar_pared`,
/// `danar_pared` and `DANARPARED` compare equal.
pub(crate) fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

impl From<String> for ActionKind {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<&str> for ActionKind {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl From<ActionKind> for String {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Unknown(name) => name,
            known => known.name().to_string(),
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_kinds() {
        assert_eq!(ActionKind::parse("move"), ActionKind::Move);
        assert_eq!(ActionKind::parse("attackWall"), ActionKind::AttackWall);
        assert_eq!(ActionKind::parse("openDoor"), ActionKind::OpenDoor);
        assert_eq!(ActionKind::parse("pickUpVictim"), ActionKind::PickUpVictim);
        assert_eq!(ActionKind::parse("dropOffVictim"), ActionKind::DropOffVictim);
        assert_eq!(ActionKind::parse("extinguish"), ActionKind::Extinguish);
    }

    #[test]
    fn test_parse_is_case_and_underscore_insensitive() {
        assert_eq!(ActionKind::parse("ATTACK_WALL"), ActionKind::AttackWall);
        assert_eq!(ActionKind::parse("extinguish_fire"), ActionKind::Extinguish);
        assert_eq!(ActionKind::parse("attack"), ActionKind::AttackHazard);
    }

    #[test]
    fn test_parse_simulator_names() {
        let cases = [
            ("mover", ActionKind::Move),
            ("dañar_pared", ActionKind::AttackWall),
            ("danar_pared", ActionKind::AttackWall),
            ("atacar_pared", ActionKind::AttackWall),
            ("romper_pared", ActionKind::BreakWall),
            ("destruir_pared", ActionKind::BreakWall),
            ("abrir_puerta", ActionKind::OpenDoor),
            ("revelar_poi", ActionKind::RevealPoi),
            ("recoger_victima", ActionKind::PickUpVictim),
            ("cargar_victima", ActionKind::PickUpVictim),
            ("depositar_victima", ActionKind::DropOffVictim),
            ("dejar_victima_en_entrada", ActionKind::DropOffVictim),
            ("eliminar_araña", ActionKind::AttackHazard),
            ("eliminar_huevo", ActionKind::AttackHazard),
            ("atacar_arana", ActionKind::AttackHazard),
            ("apagar_fuego", ActionKind::Extinguish),
        ];
        for (name, kind) in cases {
            assert_eq!(ActionKind::parse(name), kind, "{}", name);
        }
        let kind: ActionKind = serde_json::from_str("\"ELIMINAR_ARAÑA\"").unwrap();
        assert_eq!(kind, ActionKind::AttackHazard);
    }

    #[test]
    fn test_unknown_keeps_name() {
        let kind = ActionKind::parse("teleport");
        assert!(!kind.is_known());
        assert_eq!(kind.as_str(), "teleport");
        assert_eq!(kind.name(), "unknown");
    }

    #[test]
    fn test_wall_damage() {
        assert_eq!(ActionKind::AttackWall.wall_damage(), Some(1));
        assert_eq!(ActionKind::BreakWall.wall_damage(), Some(2));
        assert_eq!(ActionKind::Move.wall_damage(), None);
    }

    #[test]
    fn test_json_roundtrip_uses_strings() {
        let kind: ActionKind = serde_json::from_str("\"break_wall\"").unwrap();
        assert_eq!(kind, ActionKind::BreakWall);
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"breakWall\"");

        let unknown: ActionKind = serde_json::from_str("\"fly\"").unwrap();
        assert_eq!(serde_json::to_string(&unknown).unwrap(), "\"fly\"");
    }
}

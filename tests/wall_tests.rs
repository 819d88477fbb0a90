//! Wall tests.
//!
//! These tests verify the wall model on built boards:
//! - One segment per physical wall, reachable from both sides
//! - Damage, destruction and door transitions
//! - Walls that refuse damage

use rescue_replay::core::{BoardConfig, CellPos, Direction, WallKey, WallMask};
use rescue_replay::walls::{DoorState, WallKind, WallState, WallStateMachine};
use rescue_replay::{Board, ReplayError};

/// A 4x4 board with a wall around the 2x2 centre and a door on its east side.
fn walled_centre() -> Board {
    let mut config = BoardConfig::open(4, 4)
        .with_mask(CellPos::new(2, 2), WallMask::parse("1100").unwrap())
        .with_mask(CellPos::new(2, 3), WallMask::parse("1001").unwrap())
        .with_mask(CellPos::new(3, 2), WallMask::parse("0110").unwrap())
        .with_mask(CellPos::new(3, 3), WallMask::parse("0011").unwrap());
    config = config.with_door(WallKey::new(CellPos::new(3, 3), Direction::East));
    Board::build(&config).unwrap()
}

// =============================================================================
// Deduplication
// =============================================================================

/// Test that every wall is the same segment from both sides.
#[test]
fn test_wall_reachable_from_both_sides() {
    let board = walled_centre();
    for row in 1..=4 {
        for col in 1..=4 {
            let pos = CellPos::new(row, col);
            for direction in Direction::ALL {
                let (r, c, d) = board.opposite(row, col, direction);
                let here = board.wall_at(pos, direction).map(|w| w.id);
                let there = board.wall_at(CellPos::new(r, c), d).map(|w| w.id);
                if board.contains(CellPos::new(r, c)) {
                    assert_eq!(here, there, "wall {:?} from {:?}", direction, pos);
                }
            }
        }
    }
    assert_eq!(board.walls().count(), 8);
}

/// Test that the opposite transform is an involution.
#[test]
fn test_opposite_round_trip() {
    let board = walled_centre();
    let (r, c, d) = board.opposite(2, 3, Direction::North);
    assert_eq!((r, c, d), (1, 3, Direction::South));
    assert_eq!(board.opposite(r, c, d), (2, 3, Direction::North));
}

// =============================================================================
// Transitions
// =============================================================================

/// Test the attack-then-break scenario on a wood wall.
#[test]
fn test_attack_then_break() {
    let key = WallKey::new(CellPos::new(2, 3), Direction::North);
    let mut board = walled_centre();
    assert_eq!(board.wall_by_key(key).unwrap().current_health(), 2);

    let attack = WallStateMachine::damage_at(&mut board, key, 1).unwrap();
    assert_eq!(attack.after.state, WallState::Damaged);
    assert_eq!(attack.after.health, 1);

    let broken = WallStateMachine::damage_at(&mut board, key, 2).unwrap();
    assert!(broken.destroyed);
    let wall = board.wall_by_key(key).unwrap();
    assert_eq!(wall.current_health(), 0);
    assert!(wall.is_destroyed());
    // Only the hit points actually removed count.
    assert_eq!(board.counters().building_damage, 2);
}

/// Test that destroyed walls stay destroyed and take no more damage.
#[test]
fn test_destroyed_wall_is_terminal() {
    let key = WallKey::new(CellPos::new(2, 2), Direction::West);
    let mut board = walled_centre();
    WallStateMachine::damage_at(&mut board, key, 2).unwrap();

    let err = WallStateMachine::damage_at(&mut board, key.opposite(), 1).unwrap_err();
    assert_eq!(err, ReplayError::AlreadyDestroyed(key.canonical()));
    assert_eq!(board.counters().building_damage, 2);
    assert!(board.is_passable(CellPos::new(2, 1), Direction::East));
}

/// Test door opening from the far side.
#[test]
fn test_door_opens_once() {
    let far_side = WallKey::new(CellPos::new(3, 4), Direction::West);
    let mut board = walled_centre();
    assert!(!board.is_passable(CellPos::new(3, 3), Direction::East));

    let opened = WallStateMachine::open_door_at(&mut board, far_side).unwrap();
    assert_eq!(opened.before.door, Some(DoorState::Closed));
    assert_eq!(opened.after.door, Some(DoorState::Open));
    assert!(board.is_passable(CellPos::new(3, 3), Direction::East));

    assert!(matches!(
        WallStateMachine::open_door_at(&mut board, far_side),
        Err(ReplayError::AlreadyOpen(_))
    ));
}

/// Test that doors cannot be damaged and walls cannot be opened.
#[test]
fn test_door_and_wall_are_distinct() {
    let door = WallKey::new(CellPos::new(3, 3), Direction::East);
    let wall = WallKey::new(CellPos::new(3, 3), Direction::South);
    let mut board = walled_centre();

    assert!(matches!(
        WallStateMachine::damage_at(&mut board, door, 1),
        Err(ReplayError::ImmutableWall(_))
    ));
    assert!(matches!(
        WallStateMachine::open_door_at(&mut board, wall),
        Err(ReplayError::NotADoor(_))
    ));
    assert_eq!(board.wall_by_key(wall).unwrap().state(), WallState::Normal);
}

// =============================================================================
// Exterior and Special Walls
// =============================================================================

/// Test that boundary walls are exterior and reject damage.
#[test]
fn test_exterior_walls_reject_damage() {
    let key = WallKey::new(CellPos::new(1, 1), Direction::North);
    let config = BoardConfig::open(2, 2).with_mask(CellPos::new(1, 1), WallMask::parse("1000").unwrap());
    let mut board = Board::build(&config).unwrap();

    assert_eq!(board.wall_by_key(key).unwrap().kind, WallKind::Exterior);
    assert_eq!(
        WallStateMachine::damage_at(&mut board, key, 2),
        Err(ReplayError::ImmutableWall(key.canonical()))
    );
    assert_eq!(board.wall_by_key(key).unwrap().current_health(), 1);
    assert_eq!(board.counters().building_damage, 0);
}

/// Test concrete and pre-damaged walls.
#[test]
fn test_special_walls() {
    let concrete = WallKey::new(CellPos::new(1, 1), Direction::East);
    let cracked = WallKey::new(CellPos::new(2, 1), Direction::East);
    let config = BoardConfig::open(2, 2)
        .with_special_wall(concrete, WallKind::Concrete, None)
        .with_special_wall(cracked, WallKind::Wood, Some(1));
    let mut board = Board::build(&config).unwrap();

    let hit = WallStateMachine::damage_at(&mut board, concrete, 2).unwrap();
    assert!(!hit.destroyed);
    assert_eq!(hit.after.health, 2);

    assert_eq!(board.wall_by_key(cracked).unwrap().state(), WallState::Damaged);
    assert!(WallStateMachine::damage_at(&mut board, cracked, 1).unwrap().destroyed);
}

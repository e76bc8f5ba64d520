//! Integration tests for the room registry.

use scrawl_protocol::{PlayerId, RoomCode, RoomState, SettingsRequest};
use scrawl_room::{ErrorKind, RoomError, RoomRegistry};

// =========================================================================
// Helpers
// =========================================================================

fn registry_with_room() -> (RoomRegistry, RoomCode) {
    let mut registry = RoomRegistry::with_seed(42);
    let code = registry
        .create_room(PlayerId(1), "ann", SettingsRequest::default())
        .code
        .clone();
    (registry, code)
}

fn small_room(max_players: usize) -> (RoomRegistry, RoomCode) {
    let mut registry = RoomRegistry::with_seed(42);
    let settings = SettingsRequest {
        max_players: Some(max_players),
        ..SettingsRequest::default()
    };
    let code = registry
        .create_room(PlayerId(1), "ann", settings)
        .code
        .clone();
    (registry, code)
}

// =========================================================================
// create
// =========================================================================

#[test]
fn test_create_room_seeds_lobby_with_host() {
    let (registry, code) = registry_with_room();
    let room = registry.get_room(&code).unwrap();

    assert_eq!(room.state, RoomState::Lobby);
    assert_eq!(room.host_id, PlayerId(1));
    assert_eq!(room.players.len(), 1);
    assert_eq!(room.players[0].name, "ann");
    assert_eq!(room.players[0].score, 0);
    assert!(room.gallery.is_empty());
    assert_eq!(room.settings.draw_time, 60);
    assert_eq!(room.settings.guess_time, 45);
    assert_eq!(registry.room_by_player(PlayerId(1)), Some(&code));
}

#[test]
fn test_created_codes_are_unique() {
    let mut registry = RoomRegistry::with_seed(9);
    let mut codes = std::collections::HashSet::new();
    for id in 0..300 {
        let code = registry
            .create_room(PlayerId(id), "host", SettingsRequest::default())
            .code
            .clone();
        assert!(codes.insert(code));
    }
    assert_eq!(registry.room_count(), 300);
}

// =========================================================================
// join
// =========================================================================

#[test]
fn test_join_appends_player_in_order() {
    let (mut registry, code) = registry_with_room();
    registry.join_room(&code, PlayerId(2), "bob").unwrap();
    let room = registry.join_room(&code, PlayerId(3), "cat").unwrap();

    let names: Vec<_> = room.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["ann", "bob", "cat"]);
    assert_eq!(registry.members(&code), vec![PlayerId(1), PlayerId(2), PlayerId(3)]);
}

#[test]
fn test_join_missing_room() {
    let (mut registry, _) = registry_with_room();
    let err = registry
        .join_room(&RoomCode::new("ZZZZZ"), PlayerId(2), "bob")
        .unwrap_err();
    assert_eq!(err, RoomError::NotFound(RoomCode::new("ZZZZZ")));
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(registry.room_by_player(PlayerId(2)), None);
}

#[test]
fn test_join_started_room() {
    let (mut registry, code) = registry_with_room();
    registry.get_room_mut(&code).unwrap().state = RoomState::Playing;

    let err = registry.join_room(&code, PlayerId(2), "bob").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(registry.get_room(&code).unwrap().players.len(), 1);
}

#[test]
fn test_join_full_room() {
    let (mut registry, code) = small_room(2);
    registry.join_room(&code, PlayerId(2), "bob").unwrap();

    let err = registry.join_room(&code, PlayerId(3), "cat").unwrap_err();
    assert_eq!(err, RoomError::RoomFull(code.clone()));
    assert_eq!(registry.get_room(&code).unwrap().players.len(), 2);
    assert_eq!(registry.room_by_player(PlayerId(3)), None);
}

#[test]
fn test_join_duplicate_name_is_case_sensitive() {
    let (mut registry, code) = registry_with_room();

    let err = registry.join_room(&code, PlayerId(2), "ann").unwrap_err();
    assert_eq!(err, RoomError::NameTaken("ann".into()));
    assert_eq!(registry.get_room(&code).unwrap().players.len(), 1);

    registry.join_room(&code, PlayerId(2), "Ann").unwrap();
    assert_eq!(registry.get_room(&code).unwrap().players.len(), 2);
}

#[test]
fn test_join_while_seated_elsewhere() {
    let (mut registry, code) = registry_with_room();
    let other = registry
        .create_room(PlayerId(5), "eve", SettingsRequest::default())
        .code
        .clone();

    let err = registry.join_room(&code, PlayerId(5), "eve").unwrap_err();
    assert_eq!(err, RoomError::AlreadyInRoom(other));
}

#[test]
fn test_join_code_is_case_insensitive() {
    let (mut registry, code) = registry_with_room();
    let typed = RoomCode::new(code.as_str().to_lowercase());
    assert!(registry.join_room(&typed, PlayerId(2), "bob").is_ok());
}

// =========================================================================
// leave
// =========================================================================

#[test]
fn test_host_leaving_promotes_first_remaining() {
    let (mut registry, code) = registry_with_room();
    registry.join_room(&code, PlayerId(2), "bob").unwrap();
    registry.join_room(&code, PlayerId(3), "cat").unwrap();

    assert_eq!(registry.remove_player(PlayerId(1)), Some(code.clone()));

    let room = registry.get_room(&code).unwrap();
    assert_eq!(room.host_id, PlayerId(2));
    assert!(room.has_player(room.host_id));
    assert_eq!(registry.room_by_player(PlayerId(1)), None);
}

#[test]
fn test_non_host_leaving_keeps_host() {
    let (mut registry, code) = registry_with_room();
    registry.join_room(&code, PlayerId(2), "bob").unwrap();

    registry.remove_player(PlayerId(2));
    assert_eq!(registry.get_room(&code).unwrap().host_id, PlayerId(1));
}

#[test]
fn test_last_player_leaving_deletes_room() {
    let (mut registry, code) = registry_with_room();
    registry.join_room(&code, PlayerId(2), "bob").unwrap();

    registry.remove_player(PlayerId(1));
    assert!(registry.get_room(&code).is_some());

    assert_eq!(registry.remove_player(PlayerId(2)), Some(code.clone()));
    assert!(registry.get_room(&code).is_none());
    assert_eq!(registry.room_count(), 0);
    assert!(registry.members(&code).is_empty());
}

#[test]
fn test_remove_unknown_player() {
    let (mut registry, _) = registry_with_room();
    assert_eq!(registry.remove_player(PlayerId(99)), None);
    assert_eq!(registry.room_count(), 1);
}

#[test]
fn test_player_can_join_again_after_leaving() {
    let (mut registry, code) = registry_with_room();
    registry.join_room(&code, PlayerId(2), "bob").unwrap();
    registry.remove_player(PlayerId(2));
    assert!(registry.join_room(&code, PlayerId(2), "bob").is_ok());
}

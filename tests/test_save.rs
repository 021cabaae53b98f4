use std::io::{self, Cursor};

use banjo_attack::arena::Arena;
use banjo_attack::entities::*;
use banjo_attack::error::GameError;
use banjo_attack::geometry::Viewport;
use banjo_attack::save::*;

const VIEW: Viewport = Viewport::new(400, 300);

fn populated_arena() -> Arena {
    let background = Background::new(VIEW).unwrap();
    let mut player = Player::new(190, 280, 20, 20).unwrap();
    player.lives = 2;
    player.score = 130;
    player.high_score = 500;

    let mut arena = Arena::new(background, player);
    arena.add_entity(Entity::Shot(NoteShot::new(40, 120, 6, 5).unwrap()));

    let mut simple = Enemy::simple(100, 30, (10, 37), Direction::Right).unwrap();
    simple.movement = MovementState::TouchedSide;
    simple.move_by(0, 44);
    arena.add_entity(Entity::Enemy(simple));

    arena.add_entity(Entity::Enemy(
        Enemy::hunter(200, 10, (10, 37), Direction::Left, 1000).unwrap(),
    ));

    let mut deadly = Enemy::deadly(300, 20, (10, 37), Direction::Left).unwrap();
    let _ = deadly.take_hit();
    arena.add_entity(Entity::Enemy(deadly));
    arena
}

fn to_text(arena: &Arena, now_ms: i64) -> String {
    let mut out = Vec::new();
    write_arena(arena, &mut out, now_ms).unwrap();
    String::from_utf8(out).unwrap()
}

// ── Duration text ─────────────────────────────────────────────────────────────

#[test]
fn duration_formats_as_clock_text() {
    assert_eq!(format_duration(3_723_045), "01:02:03.045");
    assert_eq!(format_duration(0), "00:00:00.000");
    assert_eq!(format_duration(-50), "00:00:00.000");
}

#[test]
fn duration_parses_back() {
    assert_eq!(parse_duration("01:02:03.045").unwrap(), 3_723_045);
    assert_eq!(parse_duration("00:00:01.5").unwrap(), 1500);
    assert_eq!(parse_duration("00:00:02").unwrap(), 2000);
    assert_eq!(parse_duration("00:00:00.1234567").unwrap(), 123);
}

#[test]
fn malformed_durations_are_rejected() {
    for text in [
        "",
        "1:2",
        "aa:00:00.000",
        "00:61:00.000",
        "00:00:00.x",
        "9999999999999999:00:00.000",
    ] {
        assert!(
            matches!(parse_duration(text), Err(GameError::ParseError(_))),
            "{text:?}"
        );
    }
}

// ── Stream format ─────────────────────────────────────────────────────────────

#[test]
fn stream_starts_with_count_background_and_player() {
    let text = to_text(&populated_arena(), 5000);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "6");
    assert_eq!(lines[1], "Background");
    assert_eq!(&lines[2..6], &["0", "0", "400", "300"]);
    assert_eq!(lines[6], "Player");
    assert_eq!(&lines[7..14], &["190", "280", "20", "20", "12", "2", "130"]);
    assert_eq!(lines[14], "NoteShot");
}

#[test]
fn hunter_writes_time_since_spawn() {
    let text = to_text(&populated_arena(), 5000);
    assert!(text.lines().any(|line| line == "00:00:04.000"));
}

#[test]
fn round_trip_restores_every_entity() {
    let arena = populated_arena();
    let text = to_text(&arena, 5000);
    let loaded = read_arena(Cursor::new(text), 5000).unwrap();

    assert_eq!(loaded.background, arena.background);
    assert_eq!(loaded.player.body, arena.player.body);
    assert_eq!(loaded.player.lives, 2);
    assert_eq!(loaded.player.score, 130);
    assert_eq!(loaded.player.high_score, 0, "high score is not persisted");
    assert_eq!(loaded.entities(), arena.entities());
}

#[test]
fn hunter_clock_is_rebased_on_load() {
    let text = to_text(&populated_arena(), 5000);
    let loaded = read_arena(Cursor::new(text), 60_000).unwrap();
    let hunter = loaded
        .entities()
        .iter()
        .find_map(|e| match e {
            Entity::Enemy(enemy) => match enemy.kind {
                EnemyKind::Hunter { mode_switch_at_ms } => Some(mode_switch_at_ms),
                _ => None,
            },
            _ => None,
        })
        .unwrap();
    assert_eq!(hunter, 56_000);
}

#[test]
fn strum_state_is_not_saved() {
    let mut arena = populated_arena();
    let background = arena.background.clone();
    let player = arena.player.clone();
    let mut entities = arena.entities().to_vec();
    if let Some(Entity::Enemy(enemy)) = entities.last_mut() {
        enemy.kind = EnemyKind::Deadly {
            life_points: 1,
            strum: Strum::Spent,
        };
    }
    arena = Arena::restore(background, player, entities, 0);

    let loaded = read_arena(Cursor::new(to_text(&arena, 0)), 0).unwrap();
    let Some(Entity::Enemy(enemy)) = loaded.entities().last() else {
        panic!("deadly strummer missing");
    };
    assert_eq!(
        enemy.kind,
        EnemyKind::Deadly {
            life_points: 1,
            strum: Strum::Ready
        }
    );
}

// ── Rejected streams ──────────────────────────────────────────────────────────

fn replace_line(text: &str, index: usize, with: &str) -> String {
    text.lines()
        .enumerate()
        .map(|(i, line)| if i == index { with } else { line })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn unknown_tag_is_rejected() {
    let text = replace_line(&to_text(&populated_arena(), 0), 14, "Spaceship");
    assert!(matches!(
        read_arena(Cursor::new(text), 0),
        Err(GameError::ParseError(_))
    ));
}

#[test]
fn unknown_tag_on_the_second_line_is_rejected() {
    let text = replace_line(&to_text(&populated_arena(), 0), 1, "Scenery");
    assert!(matches!(
        read_arena(Cursor::new(text), 0),
        Err(GameError::ParseError(_))
    ));
}

#[test]
fn player_must_follow_background() {
    let text = replace_line(&to_text(&populated_arena(), 0), 6, "NoteShot");
    assert!(read_arena(Cursor::new(text), 0).is_err());
}

#[test]
fn repeated_player_is_rejected() {
    let text = replace_line(&to_text(&populated_arena(), 0), 14, "Player");
    assert!(read_arena(Cursor::new(text), 0).is_err());
}

#[test]
fn malformed_integer_is_rejected() {
    let text = replace_line(&to_text(&populated_arena(), 0), 7, "one-ninety");
    assert!(matches!(
        read_arena(Cursor::new(text), 0),
        Err(GameError::ParseError(_))
    ));
}

#[test]
fn truncated_stream_is_rejected() {
    let text = to_text(&populated_arena(), 0);
    let mut lines: Vec<&str> = text.lines().collect();
    lines.pop();
    assert!(matches!(
        read_arena(Cursor::new(lines.join("\n")), 0),
        Err(GameError::ParseError(_))
    ));
}

#[test]
fn huge_hunter_duration_is_rejected() {
    let text = to_text(&populated_arena(), 5000);
    let line = text.lines().position(|l| l == "00:00:04.000").unwrap();
    let text = replace_line(&text, line, "9999999999999999:00:00.000");
    assert!(matches!(
        read_arena(Cursor::new(text), 5000),
        Err(GameError::ParseError(_))
    ));
}

#[test]
fn hunter_duration_older_than_the_clock_is_rejected() {
    let text = to_text(&populated_arena(), 5000);
    let line = text.lines().position(|l| l == "00:00:04.000").unwrap();
    let text = replace_line(&text, line, "2562047788015:00:00.000");
    assert!(matches!(
        read_arena(Cursor::new(text), i64::MIN + 1),
        Err(GameError::ParseError(_))
    ));
}

#[test]
fn impossible_geometry_is_rejected() {
    let base = to_text(&populated_arena(), 0);
    // 3: background y, 9: player width, 11: player speed, 15: shot x.
    for (index, value) in [
        (3, "-2147483648"),
        (9, "-20"),
        (11, "-12"),
        (15, "2147483647"),
    ] {
        let text = replace_line(&base, index, value);
        assert!(
            matches!(read_arena(Cursor::new(text), 0), Err(GameError::ParseError(_))),
            "line {index} = {value}"
        );
    }
}

#[test]
fn shot_already_above_the_screen_still_loads() {
    let text = replace_line(&to_text(&populated_arena(), 0), 16, "-7");
    let loaded = read_arena(Cursor::new(text), 0).unwrap();
    assert_eq!(loaded.entities()[0].rect().y, -7);
}

#[test]
fn deadly_strummer_without_life_points_is_rejected() {
    let base = to_text(&populated_arena(), 0);
    let last = base.lines().count() - 1;
    let text = replace_line(&base, last, "0");
    assert!(matches!(
        read_arena(Cursor::new(text), 0),
        Err(GameError::ParseError(_))
    ));
}

#[test]
fn count_below_two_is_rejected() {
    assert!(read_arena(Cursor::new("1\nBackground\n0\n0\n1\n1\n"), 0).is_err());
    assert!(read_arena(Cursor::new(""), 0).is_err());
}

// ── Save slot ─────────────────────────────────────────────────────────────────

#[test]
fn file_round_trip_leaves_no_staging_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slot.txt");
    let arena = populated_arena();

    save_to_path(&arena, &path, 5000).unwrap();
    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());

    let loaded = load_from_path(&path, 5000).unwrap();
    assert_eq!(loaded.entities(), arena.entities());
    assert_eq!(loaded.entity_count(), arena.entity_count());
}

#[test]
fn missing_slot_is_an_io_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slot.txt");
    match load_from_path(&path, 0) {
        Err(GameError::IoFailure(err)) => assert_eq!(err.kind(), io::ErrorKind::NotFound),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn failed_save_keeps_previous_slot() {
    let dir = tempfile::tempdir().unwrap();
    let not_a_dir = dir.path().join("not_a_dir");
    std::fs::write(&not_a_dir, "occupied").unwrap();
    let inside = not_a_dir.join("slot.txt");

    assert!(save_to_path(&populated_arena(), &inside, 0).is_err());
    assert_eq!(std::fs::read_to_string(&not_a_dir).unwrap(), "occupied");
}

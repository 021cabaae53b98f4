use banjo_attack::entities::*;
use banjo_attack::error::GameError;
use banjo_attack::geometry::{Rect, Viewport};

// ── Construction ──────────────────────────────────────────────────────────────

#[test]
fn sprite_rect_mirrors_position() {
    let sprite = Sprite::new(10, 20, 30, 40).unwrap();
    assert_eq!(sprite.rect(), Rect::new(10, 20, 30, 40));
    assert_eq!(sprite.x(), 10);
    assert_eq!(sprite.y(), 20);
}

#[test]
fn negative_coordinates_are_invalid_geometry() {
    assert!(matches!(
        Sprite::new(-1, 0, 10, 10),
        Err(GameError::InvalidGeometry(_))
    ));
    assert!(matches!(
        Sprite::new(0, -5, 10, 10),
        Err(GameError::InvalidGeometry(_))
    ));
}

#[test]
fn negative_dimensions_are_invalid_geometry() {
    assert!(Sprite::new(0, 0, -10, 10).is_err());
    assert!(Sprite::new(0, 0, 10, -1).is_err());
}

#[test]
fn coordinate_past_declared_maximum_is_still_accepted() {
    // The range check is permissive: any non-negative value inside the coordinate limit passes.
    assert!(Sprite::new(5000, 5000, 10, 10).is_ok());
}

#[test]
fn values_past_the_coordinate_limit_are_invalid_geometry() {
    assert!(matches!(
        Sprite::new(i32::MAX, 0, 10, 10),
        Err(GameError::InvalidGeometry(_))
    ));
    assert!(Sprite::new(0, 0, 10, i32::MAX).is_err());
    assert!(MovingSprite::new(0, 0, 10, 10, i32::MAX).is_err());
}

#[test]
fn restored_sprites_may_sit_off_screen() {
    let shot = Sprite::restored(Rect::new(-3, -12, 6, 5)).unwrap();
    assert_eq!(shot.rect(), Rect::new(-3, -12, 6, 5));
    assert!(Sprite::restored(Rect::new(0, 0, -6, 5)).is_err());
    assert!(Sprite::restored(Rect::new(i32::MIN, 0, 6, 5)).is_err());
    assert!(MovingSprite::restored(Rect::new(0, 0, 6, 5), -12).is_err());
}

#[test]
fn negative_speed_is_invalid_geometry() {
    assert!(matches!(
        MovingSprite::new(0, 0, 10, 10, -1),
        Err(GameError::InvalidGeometry(_))
    ));
    assert_eq!(MovingSprite::new(0, 0, 10, 10, 0).unwrap().speed, 0);
}

#[test]
fn move_by_translates_without_bounds() {
    let mut shot = NoteShot::new(5, 5, 2, 2).unwrap();
    shot.move_by(-10, -20);
    assert_eq!(shot.rect(), Rect::new(-5, -15, 2, 2));
}

// ── Player ────────────────────────────────────────────────────────────────────

#[test]
fn player_starts_with_three_lives_and_no_score() {
    let p = Player::new(0, 0, 10, 10).unwrap();
    assert_eq!(p.lives, 3);
    assert_eq!(p.score, 0);
    assert_eq!(p.high_score, 0);
    assert_eq!(p.body.speed, 12);
}

#[test]
fn subtract_life_returns_count_before_decrement() {
    let mut p = Player::new(0, 0, 10, 10).unwrap();
    assert_eq!(p.subtract_life(), 3);
    assert_eq!(p.lives, 2);
}

#[test]
fn high_score_only_moves_when_beaten() {
    let mut p = Player::new(0, 0, 10, 10).unwrap();
    p.add_score(30);
    assert!(p.record_high_score_if_beaten());
    assert_eq!(p.high_score, 30);

    p.score = 20;
    assert!(!p.record_high_score_if_beaten());
    assert_eq!(p.high_score, 30);
}

#[test]
fn player_reset_keeps_high_score_and_parks_bottom_middle() {
    let mut p = Player::new(0, 0, 20, 30).unwrap();
    p.add_score(90);
    p.record_high_score_if_beaten();
    p.subtract_life();

    p.reset(Viewport::new(400, 300));

    assert_eq!(p.lives, 3);
    assert_eq!(p.score, 0);
    assert_eq!(p.high_score, 90);
    assert_eq!(p.rect(), Rect::new(190, 270, 20, 30));
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[test]
fn points_match_kind_constants() {
    let size = (10, 10);
    let simple = Enemy::simple(0, 0, size, Direction::Left).unwrap();
    let hunter = Enemy::hunter(0, 0, size, Direction::Left, 0).unwrap();
    let deadly = Enemy::deadly(0, 0, size, Direction::Left).unwrap();
    assert_eq!(simple.points(), 10);
    assert_eq!(hunter.points(), 20);
    assert_eq!(deadly.points(), 50);
}

#[test]
fn per_kind_speeds() {
    let size = (10, 10);
    assert_eq!(Enemy::simple(0, 0, size, Direction::Left).unwrap().body.speed, 4);
    assert_eq!(Enemy::hunter(0, 0, size, Direction::Left, 0).unwrap().body.speed, 5);
    assert_eq!(Enemy::deadly(0, 0, size, Direction::Left).unwrap().body.speed, 7);
}

#[test]
fn simple_and_hunter_die_on_first_hit() {
    let mut simple = Enemy::simple(0, 0, (10, 10), Direction::Right).unwrap();
    assert_eq!(simple.take_hit(), Hit::Destroyed { points: 10 });

    let mut hunter = Enemy::hunter(0, 0, (10, 10), Direction::Right, 0).unwrap();
    assert_eq!(hunter.take_hit(), Hit::Destroyed { points: 20 });
}

#[test]
fn deadly_pays_only_on_the_killing_hit() {
    let mut deadly = Enemy::deadly(0, 0, (10, 10), Direction::Right).unwrap();
    assert_eq!(deadly.take_hit(), Hit::Wounded);
    assert_eq!(deadly.take_hit(), Hit::Destroyed { points: 50 });
}

#[test]
fn new_enemies_start_bouncing_from_their_spawn_row() {
    let enemy = Enemy::simple(40, 25, (10, 10), Direction::Left).unwrap();
    assert_eq!(enemy.movement, MovementState::LeftToRight);
    assert_eq!(enemy.origin_y, 25);
    assert!(enemy.strum_shot().is_none());
}

#[test]
fn deadly_strummer_origin_row_is_zero() {
    let enemy = Enemy::deadly(40, 25, (10, 10), Direction::Left).unwrap();
    assert_eq!(enemy.origin_y, 0);
    assert_eq!(enemy.rect().y, 25);
}

#[test]
fn enum_names_parse_back() {
    for state in [
        MovementState::LeftToRight,
        MovementState::TouchedSide,
        MovementState::TouchedBottom,
    ] {
        assert_eq!(state.to_string().parse::<MovementState>().unwrap(), state);
    }
    assert_eq!("Left".parse::<Direction>().unwrap(), Direction::Left);
    assert!("Sideways".parse::<Direction>().is_err());
}

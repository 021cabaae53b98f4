use banjo_attack::explosion::Explosion;

#[test]
fn starts_on_the_first_cell() {
    let explosion = Explosion::new((5, 5));
    assert!(explosion.active());
    assert_eq!(explosion.grid, (5, 4));
    assert_eq!(explosion.visible_frame(), Some((0, 0)));
}

#[test]
fn switches_cell_every_fifty_ms() {
    let mut explosion = Explosion::new((0, 0));
    explosion.advance(49);
    assert_eq!(explosion.frame, (0, 0));
    explosion.advance(1);
    assert_eq!(explosion.frame, (1, 0));
}

#[test]
fn wraps_to_the_next_row_then_back_to_the_top() {
    let mut explosion = Explosion::with_grid((0, 0), (2, 2));
    explosion.advance(50);
    assert_eq!(explosion.frame, (1, 0));
    explosion.advance(50);
    assert_eq!(explosion.frame, (0, 1));
    explosion.advance(50);
    explosion.advance(50);
    assert_eq!(explosion.frame, (0, 0));
}

#[test]
fn burns_out_after_850_ms_regardless_of_frame_rate() {
    for step in [16, 33, 50, 425] {
        let mut explosion = Explosion::new((0, 0));
        let mut total = 0;
        while explosion.active() {
            explosion.advance(step);
            total += step;
        }
        assert!(total >= 850, "step {step}: gone after {total} ms");
        assert!(total - step < 850, "step {step}: lingered until {total} ms");
        assert_eq!(explosion.visible_frame(), None);
    }
}

#[test]
fn empty_grid_is_clamped() {
    let mut explosion = Explosion::with_grid((0, 0), (0, 0));
    assert_eq!(explosion.grid, (1, 1));
    explosion.advance(50);
    assert_eq!(explosion.frame, (0, 0));
}

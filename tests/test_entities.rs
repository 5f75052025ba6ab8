use glam::Vec2;
use kokaton_barrage::entities::*;
use kokaton_barrage::geometry::Rect;

#[test]
fn facing_from_step_covers_all_eight_directions() {
    let all = [
        Facing::East,
        Facing::NorthEast,
        Facing::North,
        Facing::NorthWest,
        Facing::West,
        Facing::SouthWest,
        Facing::South,
        Facing::SouthEast,
    ];
    for facing in all {
        let (dx, dy) = facing.step();
        assert_eq!(Facing::from_step(dx, dy), Some(facing));
    }
    assert_eq!(Facing::from_step(0, 0), None);
}

#[test]
fn facing_degrees_are_counter_clockwise_from_east() {
    assert!((Facing::East.degrees() - 0.0).abs() < 1e-4);
    assert!((Facing::North.degrees() - 90.0).abs() < 1e-4);
    assert!((Facing::West.degrees() - 180.0).abs() < 1e-4);
    assert!((Facing::South.degrees() + 90.0).abs() < 1e-4);
    assert!((Facing::NorthEast.degrees() - 45.0).abs() < 1e-4);
}

#[test]
fn score_spend_is_gated_and_exact() {
    let mut score = Score { value: 19 };
    assert!(!score.try_spend(20));
    assert_eq!(score.value, 19);

    score.add(1);
    assert!(score.try_spend(20));
    assert_eq!(score.value, 0);
    assert!(!score.try_spend(1));
    assert_eq!(score.value, 0);
}

#[test]
fn score_text() {
    assert_eq!(Score { value: 42 }.text(), "Score: 42");
}

#[test]
fn explosion_alternates_every_ten_frames() {
    let mut x = Explosion {
        rect: Rect::new(Vec2::ZERO, Vec2::ONE),
        life: 50,
    };
    assert_eq!(x.frame(), 1);
    x.life = 49;
    assert_eq!(x.frame(), 0);
    x.life = 40;
    assert_eq!(x.frame(), 0);
    x.life = 39;
    assert_eq!(x.frame(), 1);
    x.life = 0;
    assert_eq!(x.frame(), 0);
}

#[test]
fn frame_order_matches_draw_order() {
    assert_eq!(
        EntityKind::FRAME_ORDER,
        [
            EntityKind::Avatar,
            EntityKind::Shield,
            EntityKind::Beam,
            EntityKind::Enemy,
            EntityKind::Bomb,
            EntityKind::Explosion,
        ]
    );
}

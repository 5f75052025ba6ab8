use glam::Vec2;
use proptest::prelude::*;

use kokaton_barrage::compute::{init_state, spread_offsets, update_avatar, HeldKeys};
use kokaton_barrage::consts::{HEIGHT, WIDTH};
use kokaton_barrage::entities::Score;
use kokaton_barrage::geometry::{fully_inside, in_bounds, Rect};

fn point(x: f32, y: f32) -> Rect {
    Rect::new(Vec2::new(x, y), Vec2::ZERO)
}

fn held_keys() -> impl Strategy<Value = HeldKeys> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(up, down, left, right, boost)| HeldKeys {
            up,
            down,
            left,
            right,
            boost,
            hyper: false,
        },
    )
}

proptest! {
    #[test]
    fn points_inside_viewport_are_in_bounds(x in 0.01f32..1599.99, y in 0.01f32..899.99) {
        prop_assert_eq!(in_bounds(&point(x, y)), (true, true));
    }

    #[test]
    fn horizontal_escape_is_reported(x in prop_oneof![-500.0f32..-0.01, 1600.01f32..2500.0], y in 0.01f32..899.99) {
        prop_assert_eq!(in_bounds(&point(x, y)), (false, true));
    }

    #[test]
    fn vertical_escape_is_reported(x in 0.01f32..1599.99, y in prop_oneof![-500.0f32..-0.01, 900.01f32..1500.0]) {
        prop_assert_eq!(in_bounds(&point(x, y)), (true, false));
    }

    #[test]
    fn avatar_never_leaves_viewport(frames in prop::collection::vec(held_keys(), 1..400)) {
        let mut s = init_state();
        for keys in &frames {
            update_avatar(&mut s.avatar, &mut s.score, keys);
            prop_assert!(fully_inside(&s.avatar.rect));
        }
        prop_assert!(s.avatar.rect.left() >= 0.0 && s.avatar.rect.right() <= WIDTH);
        prop_assert!(s.avatar.rect.top() >= 0.0 && s.avatar.rect.bottom() <= HEIGHT);
    }

    #[test]
    fn spending_is_all_or_nothing(value in 0u32..1000, cost in 0u32..200) {
        let mut score = Score { value };
        let spent = score.try_spend(cost);
        if value >= cost {
            prop_assert!(spent);
            prop_assert_eq!(score.value, value - cost);
        } else {
            prop_assert!(!spent);
            prop_assert_eq!(score.value, value);
        }
    }

    #[test]
    fn spread_spans_the_arc_evenly(n in 2usize..30) {
        let offsets = spread_offsets(n);
        prop_assert_eq!(offsets.len(), n);
        prop_assert!((offsets[0] + 50.0).abs() < 1e-3);
        prop_assert!((offsets[n - 1] - 50.0).abs() < 1e-3);
        let step = 100.0 / (n - 1) as f32;
        for pair in offsets.windows(2) {
            prop_assert!((pair[1] - pair[0] - step).abs() < 1e-3);
        }
    }
}

use diagramkit_core::{Rect, Size};
use diagramkit_designer::{HitTestResult, Modifiers, MouseButton, ScrollCommand};
use proptest::prelude::*;

use super::support::{assert_consistent, canvas, grid, show};

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (-50.0..50.0f64, -50.0..50.0f64, 1.0..60.0f64, 1.0..60.0f64)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

fn scroll_strategy() -> impl Strategy<Value = ScrollCommand> {
    prop_oneof![
        Just(ScrollCommand::LineUp),
        Just(ScrollCommand::LineDown),
        Just(ScrollCommand::LineLeft),
        Just(ScrollCommand::LineRight),
        Just(ScrollCommand::PageUp),
        Just(ScrollCommand::PageDown),
        Just(ScrollCommand::PageLeft),
        Just(ScrollCommand::PageRight),
        Just(ScrollCommand::WheelUp),
        Just(ScrollCommand::WheelDown),
    ]
}

proptest! {
    #[test]
    fn hit_test_agrees_with_containment(bounds in rect_strategy(), region in rect_strategy()) {
        let result = HitTestResult::classify(&bounds, &region);
        match result {
            HitTestResult::None => prop_assert!(!region.intersects_with(&bounds)),
            HitTestResult::Inside => prop_assert!(region.contains_rect(&bounds)),
            HitTestResult::Contains => {
                prop_assert!(bounds.contains_rect(&region));
                prop_assert!(!region.contains_rect(&bounds));
            }
            HitTestResult::Intersects => {
                prop_assert!(region.intersects_with(&bounds));
                prop_assert!(!region.contains_rect(&bounds));
                prop_assert!(!bounds.contains_rect(&region));
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn viewport_invariant_holds_after_scrolling(
        offsets in prop::collection::vec((0.0..1500.0f64, 0.0..1500.0f64), 1..6),
        commands in prop::collection::vec(scroll_strategy(), 0..8),
    ) {
        let (mut canvas, host) = canvas();
        grid(&mut canvas, 40, 40);
        show(&mut canvas, 320.0, 240.0);

        for (x, y) in offsets {
            canvas.set_horizontal_offset(x);
            canvas.set_vertical_offset(y);
            canvas.run_pending().unwrap();
            assert_consistent(&canvas, &host);
        }
        for command in commands {
            canvas.scroll(command);
        }
        canvas.run_pending().unwrap();
        assert_consistent(&canvas, &host);
    }

    #[test]
    fn selection_flags_track_random_clicks(
        clicks in prop::collection::vec((0usize..100, any::<bool>()), 1..20),
        width in 100.0..600.0f64,
    ) {
        let (mut canvas, host) = canvas();
        let ids = grid(&mut canvas, 10, 10);
        canvas.set_available_size(Size::new(width, 300.0));
        canvas.run_pending().unwrap();

        for (index, toggle) in clicks {
            let modifiers = if toggle { Modifiers::CONTROL } else { Modifiers::NONE };
            canvas
                .pointer_down_on_item(ids[index], MouseButton::Left, modifiers)
                .unwrap();
            prop_assert!(!canvas.is_synchronizing());
        }
        assert_consistent(&canvas, &host);
    }
}

//! Property tests for the application reducer

#![allow(clippy::unwrap_used, clippy::float_cmp)] // Test code can use unwrap

use learnhub::views::course_progress;
use learnhub::{
    AppAction, AppEnvironment, AppReducer, AppState, Catalog, Course, CourseId, Curriculum,
    LessonId,
};
use learnhub_testing::{replay, test_clock};
use proptest::prelude::*;
use std::sync::Arc;

fn env() -> AppEnvironment {
    AppEnvironment::new(Arc::new(test_clock()))
}

fn courses() -> Vec<Course> {
    Catalog::bundled().unwrap().courses().to_vec()
}

fn course_action() -> impl Strategy<Value = AppAction> {
    let catalog = courses();
    let len = catalog.len();
    (0..6u8, 0..len).prop_map(move |(kind, index)| {
        let course = catalog[index].clone();
        let id = course.id;
        match kind {
            0 => AppAction::AddToCart(course),
            1 => AppAction::RemoveFromCart(id),
            2 => AppAction::AddToWishlist(course),
            3 => AppAction::RemoveFromWishlist(id),
            4 => AppAction::AddDashboardProduct(course),
            _ => AppAction::DeleteDashboardProduct(id),
        }
    })
}

fn lesson_id() -> impl Strategy<Value = LessonId> {
    (0..6usize, 0..8usize).prop_map(|(s, l)| LessonId::new(s, l))
}

fn ids(list: &[Course]) -> Vec<CourseId> {
    list.iter().map(|c| c.id).collect()
}

proptest! {
    #[test]
    fn replay_is_deterministic(actions in prop::collection::vec(course_action(), 0..40)) {
        let reducer = AppReducer::new();
        let env = env();
        let first = replay(&reducer, &env, AppState::new(), actions.clone());
        let second = replay(&reducer, &env, AppState::new(), actions);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn cart_and_wishlist_never_hold_duplicates(actions in prop::collection::vec(course_action(), 0..60)) {
        let state = replay(&AppReducer::new(), &env(), AppState::new(), actions);

        let mut cart = ids(&state.cart);
        cart.sort();
        cart.dedup();
        prop_assert_eq!(cart.len(), state.cart.len());

        let mut wishlist = ids(&state.wishlist);
        wishlist.sort();
        wishlist.dedup();
        prop_assert_eq!(wishlist.len(), state.wishlist.len());
    }

    #[test]
    fn add_then_remove_restores_cart(
        prefix in prop::collection::vec(course_action(), 0..20),
        index in 0..8usize,
    ) {
        let catalog = courses();
        let course = catalog[index % catalog.len()].clone();
        let reducer = AppReducer::new();
        let env = env();

        let before = replay(&reducer, &env, AppState::new(), prefix);
        prop_assume!(!before.in_cart(course.id));

        let after = replay(
            &reducer,
            &env,
            before.clone(),
            [AppAction::AddToCart(course.clone()), AppAction::RemoveFromCart(course.id)],
        );
        prop_assert_eq!(after.cart, before.cart);
    }

    #[test]
    fn progress_matches_completed_lessons(lessons in prop::collection::vec(lesson_id(), 0..30)) {
        let catalog = courses();
        let reducer = AppReducer::new();
        let env = env();
        let course_id = catalog[0].id;

        let mut state = AppState::new();
        state.enrolled_courses.push(learnhub::EnrolledCourse::new(catalog[0].clone()));
        let actions = lessons
            .iter()
            .map(|&lesson| AppAction::CompleteLesson { course_id, lesson });
        let state = replay(&reducer, &env, state, actions);

        let enrollment = state.enrollment(course_id).unwrap();
        let curriculum = Curriculum::standard();
        prop_assert!(enrollment.completed_lessons.iter().all(|l| curriculum.contains(*l)));
        prop_assert!(enrollment.progress >= 0.0 && enrollment.progress <= 100.0);
        prop_assert_eq!(
            enrollment.progress,
            course_progress(&enrollment.completed_lessons, &curriculum)
        );
    }
}

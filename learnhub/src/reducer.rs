//! Reducer logic for the application state.
//!
//! Every transition is synchronous and total: actions that make no sense for
//! the current state leave it unchanged. The only effect produced is the
//! simulated payment delay of a checkout.

use crate::action::AppAction;
use crate::curriculum::Curriculum;
use crate::types::{AppState, Course, EnrolledCourse, Order, OrderId, OrderStatus, PaymentMethod};
use crate::views::pricing::CartTotals;
use crate::views::progress::{course_progress, normalize_lessons};
use learnhub_core::{effect::Effect, environment::Clock, reducer::Reducer, smallvec, SmallVec};
use std::sync::Arc;
use std::time::Duration;

/// How long a checkout takes to "process" by default
pub const DEFAULT_CHECKOUT_DELAY: Duration = Duration::from_millis(1500);

/// Environment dependencies for the application reducer
#[derive(Clone)]
pub struct AppEnvironment {
    /// Clock for order ids and dates
    pub clock: Arc<dyn Clock>,
    /// Curriculum that progress is measured against
    pub curriculum: Arc<Curriculum>,
    /// Simulated payment processing time
    pub checkout_delay: Duration,
}

impl AppEnvironment {
    /// Creates an environment with the standard curriculum and checkout delay
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            curriculum: Arc::new(Curriculum::standard()),
            checkout_delay: DEFAULT_CHECKOUT_DELAY,
        }
    }

    /// Replaces the curriculum
    #[must_use]
    pub fn with_curriculum(mut self, curriculum: Curriculum) -> Self {
        self.curriculum = Arc::new(curriculum);
        self
    }

    /// Replaces the checkout delay
    #[must_use]
    pub const fn with_checkout_delay(mut self, delay: Duration) -> Self {
        self.checkout_delay = delay;
        self
    }
}

impl std::fmt::Debug for AppEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppEnvironment")
            .field("total_lessons", &self.curriculum.total_lessons())
            .field("checkout_delay", &self.checkout_delay)
            .finish_non_exhaustive()
    }
}

/// Reducer for the application state
#[derive(Clone, Debug)]
pub struct AppReducer;

impl AppReducer {
    /// Creates a new `AppReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Appends `course` unless a course with the same id is present
    fn add_unique(list: &mut Vec<Course>, course: Course) {
        if !list.iter().any(|c| c.id == course.id) {
            list.push(course);
        }
    }

    /// Records an order and enrolls in each of its items
    fn add_order(state: &mut AppState, order: Order) {
        state
            .enrolled_courses
            .extend(order.items.iter().cloned().map(EnrolledCourse::new));
        state.orders.push(order);
    }

    /// Builds the order a checkout of the current cart would produce
    fn build_order(state: &AppState, payment_method: PaymentMethod, env: &AppEnvironment) -> Order {
        let now = env.clock.now();
        Order {
            id: OrderId::from_timestamp(now),
            date: now,
            items: state.cart.clone(),
            total: CartTotals::of(&state.cart).rounded().total,
            status: OrderStatus::Completed,
            payment_method,
        }
    }

    /// Reasons a checkout cannot start
    fn validate_checkout(state: &AppState) -> Result<(), &'static str> {
        if state.user.is_none() {
            return Err("no signed-in user");
        }
        if state.cart.is_empty() {
            return Err("cart is empty");
        }
        if state.pending_checkout.is_some() {
            return Err("a checkout is already being processed");
        }
        Ok(())
    }
}

impl Default for AppReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for AppReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment;

    #[allow(clippy::too_many_lines)] // one arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        tracing::trace!(action = action.name(), "Reducing action");

        match action {
            // ========== Session ==========
            AppAction::SetUser(user) => state.user = Some(user),
            AppAction::Logout => state.user = None,
            AppAction::UpdateUser(patch) => match state.user.as_mut() {
                Some(user) => patch.apply(user),
                None => tracing::debug!("Ignoring profile update without a signed-in user"),
            },

            // ========== Cart & wishlist ==========
            AppAction::AddToCart(course) => Self::add_unique(&mut state.cart, course),
            AppAction::RemoveFromCart(id) => state.cart.retain(|c| c.id != id),
            AppAction::ClearCart => state.cart.clear(),
            AppAction::AddToWishlist(course) => Self::add_unique(&mut state.wishlist, course),
            AppAction::RemoveFromWishlist(id) => state.wishlist.retain(|c| c.id != id),

            // ========== Instructor dashboard ==========
            AppAction::SetDashboardProducts(products) => state.dashboard_products = products,
            AppAction::AddDashboardProduct(course) => state.dashboard_products.push(course),
            AppAction::UpdateDashboardProduct(course) => {
                for existing in state.dashboard_products.iter_mut().filter(|c| c.id == course.id) {
                    *existing = course.clone();
                }
            },
            AppAction::DeleteDashboardProduct(id) => state.dashboard_products.retain(|c| c.id != id),

            // ========== Persistence ==========
            AppAction::LoadState(snapshot) => {
                snapshot.merge_into(state);
                // Progress is always derived from completed lessons
                for enrollment in &mut state.enrolled_courses {
                    enrollment.completed_lessons =
                        normalize_lessons(&enrollment.completed_lessons, &env.curriculum);
                    enrollment.progress =
                        course_progress(&enrollment.completed_lessons, &env.curriculum);
                }
            },

            // ========== Orders & learning ==========
            AppAction::AddOrder(order) => Self::add_order(state, order),
            AppAction::AddReview(review) => state.reviews.push(review),
            AppAction::UpdateEnrollmentProgress {
                course_id,
                progress,
                completed_lessons,
            } => {
                let completed = normalize_lessons(&completed_lessons, &env.curriculum);
                let recomputed = course_progress(&completed, &env.curriculum);
                if (recomputed - progress).abs() > 0.01 {
                    tracing::debug!(
                        %course_id,
                        reported = progress,
                        recomputed,
                        "Reported progress disagrees with completed lessons"
                    );
                }
                for enrollment in state.enrolled_courses.iter_mut().filter(|e| e.id() == course_id) {
                    enrollment.completed_lessons.clone_from(&completed);
                    enrollment.progress = recomputed;
                }
            },
            AppAction::CompleteLesson { course_id, lesson } => {
                if !env.curriculum.contains(lesson) {
                    tracing::debug!(%course_id, %lesson, "Ignoring lesson outside the curriculum");
                    return SmallVec::new();
                }
                for enrollment in state.enrolled_courses.iter_mut().filter(|e| e.id() == course_id) {
                    if !enrollment.completed_lessons.contains(&lesson) {
                        enrollment.completed_lessons.push(lesson);
                    }
                    enrollment.progress =
                        course_progress(&enrollment.completed_lessons, &env.curriculum);
                }
            },

            // ========== Checkout ==========
            AppAction::Checkout { payment_method } => {
                if let Err(reason) = Self::validate_checkout(state) {
                    tracing::warn!(reason, "Checkout rejected");
                    return SmallVec::new();
                }

                let order = Self::build_order(state, payment_method, env);
                tracing::info!(
                    order_id = %order.id,
                    items = order.items.len(),
                    total = order.total,
                    %payment_method,
                    "Processing checkout"
                );
                state.pending_checkout = Some(order.id);

                return smallvec![Effect::delay(
                    env.checkout_delay,
                    AppAction::CheckoutCompleted { order },
                )];
            },
            AppAction::CheckoutCompleted { order } => {
                if state.pending_checkout != Some(order.id) {
                    tracing::debug!(order_id = %order.id, "Discarding stale checkout result");
                    return SmallVec::new();
                }
                state.pending_checkout = None;
                tracing::info!(order_id = %order.id, "Checkout completed");
                state
                    .cart
                    .retain(|c| !order.items.iter().any(|item| item.id == c.id));
                Self::add_order(state, order);
            },
            AppAction::CancelCheckout => {
                if let Some(order_id) = state.pending_checkout.take() {
                    tracing::info!(%order_id, "Checkout cancelled");
                }
            },
        }

        SmallVec::new()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp, clippy::unwrap_used, clippy::panic)] // Test code

    use super::*;
    use crate::types::{CourseId, LessonId, Review, StateSnapshot, User, UserId, UserPatch};
    use learnhub_testing::{assertions, test_clock, ReducerTest};

    fn env() -> AppEnvironment {
        AppEnvironment::new(Arc::new(test_clock()))
    }

    fn course(id: u64, price: f64) -> Course {
        Course {
            id: CourseId::new(id),
            title: format!("Course {id}"),
            description: "A course".to_string(),
            price,
            original_price: price * 2.0,
            image: "/course.png".to_string(),
            category: "Development".to_string(),
            rating: 4.7,
            reviews: 12,
            instructor: "Sarah Johnson".to_string(),
            duration: "42 hours".to_string(),
            level: "Beginner".to_string(),
            students: 1000,
            featured: false,
        }
    }

    fn student() -> User {
        User::new(UserId::new(1), "Demo Student", "student@learnhub.com")
    }

    fn shopping_state() -> AppState {
        AppState {
            user: Some(student()),
            cart: vec![course(1, 89.99), course(3, 69.99)],
            ..AppState::default()
        }
    }

    #[test]
    fn add_to_cart_is_idempotent() {
        ReducerTest::new(AppReducer::new())
            .with_env(env())
            .given_state(AppState::default())
            .when_action(AppAction::AddToCart(course(1, 89.99)))
            .when_action(AppAction::AddToCart(course(1, 89.99)))
            .then_state(|state| {
                assert_eq!(state.cart.len(), 1);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn remove_from_cart_restores_prior_cart() {
        let prior = vec![course(2, 79.99)];
        let expected = prior.clone();

        ReducerTest::new(AppReducer::new())
            .with_env(env())
            .given_state(AppState {
                cart: prior,
                ..AppState::default()
            })
            .when_action(AppAction::AddToCart(course(1, 89.99)))
            .when_action(AppAction::RemoveFromCart(CourseId::new(1)))
            .then_state(move |state| {
                assert_eq!(state.cart, expected);
            })
            .run();
    }

    #[test]
    fn wishlist_is_independent_of_cart() {
        ReducerTest::new(AppReducer::new())
            .with_env(env())
            .given_state(AppState::default())
            .when_actions([
                AppAction::AddToWishlist(course(1, 89.99)),
                AppAction::AddToWishlist(course(1, 89.99)),
                AppAction::AddToCart(course(1, 89.99)),
                AppAction::RemoveFromCart(CourseId::new(1)),
            ])
            .then_state(|state| {
                assert!(state.cart.is_empty());
                assert_eq!(state.wishlist.len(), 1);
            })
            .run();
    }

    #[test]
    fn login_and_logout() {
        ReducerTest::new(AppReducer::new())
            .with_env(env())
            .given_state(AppState::default())
            .when_action(AppAction::SetUser(student()))
            .then_state(|state| {
                assert_eq!(state.user.as_ref().unwrap().name, "Demo Student");
            })
            .run();

        ReducerTest::new(AppReducer::new())
            .with_env(env())
            .given_state(shopping_state())
            .when_action(AppAction::Logout)
            .then_state(|state| {
                assert!(state.user.is_none());
                assert_eq!(state.cart.len(), 2);
            })
            .run();
    }

    #[test]
    fn update_user_merges_fields() {
        ReducerTest::new(AppReducer::new())
            .with_env(env())
            .given_state(shopping_state())
            .when_action(AppAction::UpdateUser(UserPatch {
                bio: Some("Lifelong learner".to_string()),
                ..UserPatch::default()
            }))
            .then_state(|state| {
                let user = state.user.as_ref().unwrap();
                assert_eq!(user.name, "Demo Student");
                assert_eq!(user.bio.as_deref(), Some("Lifelong learner"));
            })
            .run();
    }

    #[test]
    fn update_user_without_user_is_a_no_op() {
        ReducerTest::new(AppReducer::new())
            .with_env(env())
            .given_state(AppState::default())
            .when_action(AppAction::UpdateUser(UserPatch {
                name: Some("Ghost".to_string()),
                ..UserPatch::default()
            }))
            .then_state(|state| {
                assert_eq!(*state, AppState::default());
            })
            .run();
    }

    #[test]
    fn checkout_schedules_completion_after_delay() {
        ReducerTest::new(AppReducer::new())
            .with_env(env())
            .given_state(shopping_state())
            .when_action(AppAction::Checkout {
                payment_method: PaymentMethod::Card,
            })
            .then_state(|state| {
                assert!(state.checkout_pending());
                assert_eq!(state.cart.len(), 2);
                assert!(state.orders.is_empty());
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_delay_effect(effects);
                match &effects[0] {
                    Effect::Delay { duration, action } => {
                        assert_eq!(*duration, DEFAULT_CHECKOUT_DELAY);
                        let AppAction::CheckoutCompleted { order } = &**action else {
                            panic!("expected CheckoutCompleted, got {action:?}");
                        };
                        assert_eq!(order.total, 175.98);
                        assert_eq!(order.items.len(), 2);
                        assert_eq!(order.status, OrderStatus::Completed);
                        assert_eq!(order.id, OrderId::new(1_735_689_600_000));
                    },
                    other => panic!("expected delay, got {other:?}"),
                }
            })
            .run();
    }

    #[test]
    fn completed_checkout_enrolls_and_clears_cart() {
        let mut state = shopping_state();
        let effects = AppReducer.reduce(
            &mut state,
            AppAction::Checkout {
                payment_method: PaymentMethod::Paypal,
            },
            &env(),
        );
        let Some(Effect::Delay { action, .. }) = effects.into_iter().next() else {
            panic!("expected a delay effect");
        };

        ReducerTest::new(AppReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(*action)
            .then_state(|state| {
                assert!(state.cart.is_empty());
                assert_eq!(state.orders.len(), 1);
                assert_eq!(state.orders[0].payment_method, PaymentMethod::Paypal);
                assert_eq!(state.enrolled_courses.len(), 2);
                assert!(state.enrolled_courses.iter().all(|e| e.progress == 0.0));
                assert!(!state.checkout_pending());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn completed_checkout_keeps_courses_added_while_paying() {
        let mut state = shopping_state();
        let effects = AppReducer.reduce(
            &mut state,
            AppAction::Checkout {
                payment_method: PaymentMethod::Card,
            },
            &env(),
        );
        let Some(Effect::Delay { action, .. }) = effects.into_iter().next() else {
            panic!("expected a delay effect");
        };

        ReducerTest::new(AppReducer::new())
            .with_env(env())
            .given_state(state)
            .when_actions([AppAction::AddToCart(course(5, 19.99)), *action])
            .then_state(|state| {
                let cart: Vec<_> = state.cart.iter().map(|c| c.id).collect();
                assert_eq!(cart, vec![CourseId::new(5)]);
                assert_eq!(state.orders[0].items.len(), 2);
                assert!(!state.is_enrolled(CourseId::new(5)));
            })
            .run();
    }

    #[test]
    fn checkout_with_empty_cart_changes_nothing() {
        let given = AppState {
            user: Some(student()),
            ..AppState::default()
        };
        let expected = given.clone();

        ReducerTest::new(AppReducer::new())
            .with_env(env())
            .given_state(given)
            .when_action(AppAction::Checkout {
                payment_method: PaymentMethod::Card,
            })
            .then_state(move |state| assert_eq!(*state, expected))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn checkout_requires_user() {
        ReducerTest::new(AppReducer::new())
            .with_env(env())
            .given_state(AppState {
                cart: vec![course(1, 89.99)],
                ..AppState::default()
            })
            .when_action(AppAction::Checkout {
                payment_method: PaymentMethod::Card,
            })
            .then_state(|state| {
                assert!(!state.checkout_pending());
                assert_eq!(state.cart.len(), 1);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn cancelled_checkout_discards_late_result() {
        let mut state = shopping_state();
        let effects = AppReducer.reduce(
            &mut state,
            AppAction::Checkout {
                payment_method: PaymentMethod::Card,
            },
            &env(),
        );
        let Some(Effect::Delay { action, .. }) = effects.into_iter().next() else {
            panic!("expected a delay effect");
        };

        ReducerTest::new(AppReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(AppAction::CancelCheckout)
            .when_action(*action)
            .then_state(|state| {
                assert!(state.orders.is_empty());
                assert_eq!(state.cart.len(), 2);
            })
            .run();
    }

    #[test]
    fn add_order_enrolls_items() {
        let order = Order {
            id: OrderId::new(42),
            date: test_clock().now(),
            items: vec![course(5, 94.99)],
            total: 104.49,
            status: OrderStatus::Completed,
            payment_method: PaymentMethod::Bank,
        };

        ReducerTest::new(AppReducer::new())
            .with_env(env())
            .given_state(shopping_state())
            .when_action(AppAction::AddOrder(order))
            .then_state(|state| {
                assert_eq!(state.orders.len(), 1);
                assert!(state.is_enrolled(CourseId::new(5)));
                assert_eq!(state.cart.len(), 2);
            })
            .run();
    }

    #[test]
    fn progress_is_recomputed_from_lessons() {
        let completed: Vec<_> = (0..5).map(|l| LessonId::new(1, l)).collect();

        ReducerTest::new(AppReducer::new())
            .with_env(env().with_curriculum(Curriculum::uniform(4, 5)))
            .given_state(AppState {
                enrolled_courses: vec![EnrolledCourse::new(course(1, 89.99))],
                ..AppState::default()
            })
            .when_action(AppAction::UpdateEnrollmentProgress {
                course_id: CourseId::new(1),
                progress: 99.0,
                completed_lessons: completed,
            })
            .then_state(|state| {
                let enrollment = state.enrollment(CourseId::new(1)).unwrap();
                assert_eq!(enrollment.progress, 25.0);
                assert_eq!(enrollment.completed_lessons.len(), 5);
            })
            .run();
    }

    #[test]
    fn complete_lesson_appends_once() {
        ReducerTest::new(AppReducer::new())
            .with_env(env().with_curriculum(Curriculum::uniform(4, 5)))
            .given_state(AppState {
                enrolled_courses: vec![EnrolledCourse::new(course(1, 89.99))],
                ..AppState::default()
            })
            .when_actions([
                AppAction::CompleteLesson {
                    course_id: CourseId::new(1),
                    lesson: LessonId::new(0, 0),
                },
                AppAction::CompleteLesson {
                    course_id: CourseId::new(1),
                    lesson: LessonId::new(0, 0),
                },
                AppAction::CompleteLesson {
                    course_id: CourseId::new(1),
                    lesson: LessonId::new(9, 9),
                },
            ])
            .then_state(|state| {
                let enrollment = state.enrollment(CourseId::new(1)).unwrap();
                assert_eq!(enrollment.completed_lessons, vec![LessonId::new(0, 0)]);
                assert_eq!(enrollment.progress, 5.0);
            })
            .run();
    }

    #[test]
    fn dashboard_crud() {
        let mut edited = course(2, 59.99);
        edited.title = "Renamed".to_string();

        ReducerTest::new(AppReducer::new())
            .with_env(env())
            .given_state(AppState::default())
            .when_actions([
                AppAction::SetDashboardProducts(vec![course(1, 89.99), course(2, 79.99)]),
                AppAction::AddDashboardProduct(course(3, 69.99)),
                AppAction::UpdateDashboardProduct(edited),
                AppAction::DeleteDashboardProduct(CourseId::new(1)),
            ])
            .then_state(|state| {
                let titles: Vec<_> = state.dashboard_products.iter().map(|c| c.title.as_str()).collect();
                assert_eq!(titles, vec!["Renamed", "Course 3"]);
                assert_eq!(state.dashboard_products[0].price, 59.99);
            })
            .run();
    }

    #[test]
    fn load_state_merges_present_fields() {
        let snapshot: StateSnapshot =
            serde_json::from_str(r#"{"wishlist": [], "orders": [], "unknown": 1}"#).unwrap();

        ReducerTest::new(AppReducer::new())
            .with_env(env())
            .given_state(AppState {
                wishlist: vec![course(1, 89.99)],
                ..shopping_state()
            })
            .when_action(AppAction::LoadState(snapshot))
            .then_state(|state| {
                assert!(state.wishlist.is_empty());
                assert_eq!(state.cart.len(), 2);
                assert!(state.user.is_some());
            })
            .run();
    }

    #[test]
    fn load_state_recomputes_stored_progress() {
        let snapshot: StateSnapshot = serde_json::from_value(serde_json::json!({
            "enrolledCourses": [{
                "id": 1,
                "title": "Course 1",
                "description": "A course",
                "price": 89.99,
                "originalPrice": 179.98,
                "category": "Development",
                "instructor": "Sarah Johnson",
                "level": "Beginner",
                "progress": 90.0,
                "completedLessons": ["0-0", "0-0", "9-9", "1-2"]
            }]
        }))
        .unwrap();

        ReducerTest::new(AppReducer::new())
            .with_env(env())
            .given_state(AppState::default())
            .when_action(AppAction::LoadState(snapshot))
            .then_state(|state| {
                let enrollment = state.enrollment(CourseId::new(1)).unwrap();
                assert_eq!(
                    enrollment.completed_lessons,
                    vec![LessonId::new(0, 0), LessonId::new(1, 2)]
                );
                assert_eq!(enrollment.progress, 2.0 / 17.0 * 100.0);
            })
            .run();
    }

    #[test]
    fn reviews_append() {
        let review = Review {
            course_id: CourseId::new(1),
            author: "Demo Student".to_string(),
            rating: 5,
            comment: "Great".to_string(),
            date: test_clock().now(),
        };

        ReducerTest::new(AppReducer::new())
            .with_env(env())
            .given_state(AppState::default())
            .when_actions([AppAction::AddReview(review.clone()), AppAction::AddReview(review)])
            .then_state(|state| {
                assert_eq!(state.reviews_for(CourseId::new(1)).count(), 2);
            })
            .run();
    }
}

//! The closed set of things that can change [`AppState`](crate::types::AppState).

use crate::types::{
    Course, CourseId, LessonId, Order, PaymentMethod, Review, StateSnapshot, User, UserPatch,
};

/// Every state transition of the application
#[derive(Clone, Debug, PartialEq)]
pub enum AppAction {
    // ========== Session ==========
    /// Replace the current user (login, registration)
    SetUser(User),
    /// Clear the current user
    Logout,
    /// Shallow-merge fields into the current user
    UpdateUser(UserPatch),

    // ========== Cart & wishlist ==========
    /// Append to the cart unless already present
    AddToCart(Course),
    /// Remove from the cart by id
    RemoveFromCart(CourseId),
    /// Empty the cart
    ClearCart,
    /// Append to the wishlist unless already present
    AddToWishlist(Course),
    /// Remove from the wishlist by id
    RemoveFromWishlist(CourseId),

    // ========== Instructor dashboard ==========
    /// Replace the dashboard list wholesale
    SetDashboardProducts(Vec<Course>),
    /// Append a dashboard course
    AddDashboardProduct(Course),
    /// Replace the dashboard course with the same id
    UpdateDashboardProduct(Course),
    /// Remove a dashboard course by id
    DeleteDashboardProduct(CourseId),

    // ========== Persistence ==========
    /// Shallow-merge a loaded snapshot into the state
    LoadState(StateSnapshot),

    // ========== Orders & learning ==========
    /// Append an order and enroll in its items
    AddOrder(Order),
    /// Append a review
    AddReview(Review),
    /// Replace the completed lessons of an enrollment
    UpdateEnrollmentProgress {
        /// Enrolled course
        course_id: CourseId,
        /// Progress as computed by the caller (recomputed by the reducer)
        progress: f64,
        /// Completed lessons
        completed_lessons: Vec<LessonId>,
    },
    /// Mark one lesson of an enrollment complete
    CompleteLesson {
        /// Enrolled course
        course_id: CourseId,
        /// Lesson to mark
        lesson: LessonId,
    },

    // ========== Checkout ==========
    /// Start processing the cart as an order
    Checkout {
        /// Chosen payment method
        payment_method: PaymentMethod,
    },
    /// Processing finished (fed back by the delay effect)
    CheckoutCompleted {
        /// The order built when checkout started
        order: Order,
    },
    /// Abandon the checkout in progress
    CancelCheckout,
}

impl AppAction {
    /// Stable name for logs
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetUser(_) => "SET_USER",
            Self::Logout => "LOGOUT",
            Self::UpdateUser(_) => "UPDATE_USER",
            Self::AddToCart(_) => "ADD_TO_CART",
            Self::RemoveFromCart(_) => "REMOVE_FROM_CART",
            Self::ClearCart => "CLEAR_CART",
            Self::AddToWishlist(_) => "ADD_TO_WISHLIST",
            Self::RemoveFromWishlist(_) => "REMOVE_FROM_WISHLIST",
            Self::SetDashboardProducts(_) => "SET_DASHBOARD_PRODUCTS",
            Self::AddDashboardProduct(_) => "ADD_DASHBOARD_PRODUCT",
            Self::UpdateDashboardProduct(_) => "UPDATE_DASHBOARD_PRODUCT",
            Self::DeleteDashboardProduct(_) => "DELETE_DASHBOARD_PRODUCT",
            Self::LoadState(_) => "LOAD_STATE",
            Self::AddOrder(_) => "ADD_ORDER",
            Self::AddReview(_) => "ADD_REVIEW",
            Self::UpdateEnrollmentProgress { .. } => "UPDATE_ENROLLMENT_PROGRESS",
            Self::CompleteLesson { .. } => "COMPLETE_LESSON",
            Self::Checkout { .. } => "CHECKOUT",
            Self::CheckoutCompleted { .. } => "CHECKOUT_COMPLETED",
            Self::CancelCheckout => "CANCEL_CHECKOUT",
        }
    }
}

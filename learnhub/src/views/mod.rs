//! Derived view computations.
//!
//! Pure functions of state or catalog data. Nothing here mutates the store.

pub mod catalog;
pub mod instructors;
pub mod pricing;
pub mod progress;

pub use catalog::{categories, filter_courses, instructors, CourseFilter, SortKey};
pub use instructors::{aggregate_instructors, summarize, InstructorProfile, InstructorSummary};
pub use pricing::{discount_percent, round_cents, CartTotals, TAX_RATE};
pub use progress::{course_progress, player_access, rounded_percent, PlayerAccess};

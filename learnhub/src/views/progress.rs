//! Learning progress and player access.

use crate::curriculum::Curriculum;
use crate::types::{AppState, CourseId, LessonId};

/// Percent of the curriculum completed, 0..=100
///
/// Duplicates and lessons outside the curriculum are not counted.
#[must_use]
#[allow(clippy::cast_precision_loss)] // lesson counts are tiny
pub fn course_progress(completed: &[LessonId], curriculum: &Curriculum) -> f64 {
    let total = curriculum.total_lessons();
    if total == 0 {
        return 0.0;
    }
    let done = normalize_lessons(completed, curriculum).len();
    done as f64 / total as f64 * 100.0
}

/// Keeps valid lessons, first occurrence only, in the given order
#[must_use]
pub fn normalize_lessons(completed: &[LessonId], curriculum: &Curriculum) -> Vec<LessonId> {
    let mut seen = Vec::with_capacity(completed.len());
    for lesson in completed {
        if curriculum.contains(*lesson) && !seen.contains(lesson) {
            seen.push(*lesson);
        }
    }
    seen
}

/// Progress rounded to a whole percent for display
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=100
pub fn rounded_percent(progress: f64) -> u32 {
    progress.clamp(0.0, 100.0).round() as u32
}

/// What the player may show for a course
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerAccess {
    /// Purchased: lessons already completed
    Enrolled(Vec<LessonId>),
    /// Signed in but not purchased: lessons can be browsed, nothing is saved
    Preview,
    /// Signed out and not purchased
    RequiresLogin,
}

/// Decides how the player opens a course
#[must_use]
pub fn player_access(state: &AppState, course_id: CourseId) -> PlayerAccess {
    match state.enrollment(course_id) {
        Some(enrollment) => PlayerAccess::Enrolled(enrollment.completed_lessons.clone()),
        None if state.is_signed_in() => PlayerAccess::Preview,
        None => PlayerAccess::RequiresLogin,
    }
}

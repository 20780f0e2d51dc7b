//! Instructor dashboard: course drafts, pagination and stats.

use crate::types::{AppState, Course, CourseId};
use crate::validation::FormErrors;
use crate::views::catalog::CATEGORIES;
use chrono::{DateTime, Utc};

/// Courses per dashboard page
pub const PAGE_SIZE: usize = 5;
/// Image given to new dashboard courses
pub const PLACEHOLDER_IMAGE: &str = "/online-course-education.png";
/// Category preselected in the course form
pub const DEFAULT_CATEGORY: &str = "Development";
/// Original price is the asking price times this
pub const ORIGINAL_PRICE_MARKUP: f64 = 1.5;

const NEW_COURSE_RATING: f64 = 4.5;
const NEW_COURSE_DURATION: &str = "10 hours";
const NEW_COURSE_LEVEL: &str = "Beginner";

/// Course form contents, as typed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseDraft {
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Price text
    pub price: String,
    /// Category
    pub category: String,
}

impl Default for CourseDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            price: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

impl CourseDraft {
    /// Prefills the form for editing `course`
    #[must_use]
    pub fn from_course(course: &Course) -> Self {
        Self {
            title: course.title.clone(),
            description: course.description.clone(),
            price: course.price.to_string(),
            category: course.category.clone(),
        }
    }

    /// Checks the form and returns the parsed price
    ///
    /// # Errors
    ///
    /// Returns the failing fields: empty title or description, a price that
    /// is not a non-negative number, or an unknown category.
    pub fn validate(&self) -> Result<f64, FormErrors> {
        let mut errors = FormErrors::new();
        if self.title.trim().is_empty() {
            errors.insert("title", "Title is required");
        }
        if self.description.trim().is_empty() {
            errors.insert("description", "Description is required");
        }
        let price = match self.price.trim() {
            "" => {
                errors.insert("price", "Price is required");
                None
            },
            raw => match raw.parse::<f64>() {
                Ok(price) if price.is_finite() && price >= 0.0 => Some(price),
                _ => {
                    errors.insert("price", "Price must be a non-negative number");
                    None
                },
            },
        };
        if !CATEGORIES.contains(&self.category.as_str()) {
            errors.insert("category", format!("Unknown category '{}'", self.category));
        }
        errors.into_result()?;
        Ok(price.unwrap_or_default())
    }

    /// Builds a new course taught by `instructor`
    ///
    /// # Errors
    ///
    /// Returns the form errors from [`validate`](Self::validate).
    pub fn into_new_course(self, id: CourseId, instructor: &str) -> Result<Course, FormErrors> {
        let price = self.validate()?;
        Ok(Course {
            id,
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            price,
            original_price: price * ORIGINAL_PRICE_MARKUP,
            image: PLACEHOLDER_IMAGE.to_string(),
            category: self.category,
            rating: NEW_COURSE_RATING,
            reviews: 0,
            instructor: instructor.to_string(),
            duration: NEW_COURSE_DURATION.to_string(),
            level: NEW_COURSE_LEVEL.to_string(),
            students: 0,
            featured: false,
        })
    }

    /// Rebuilds `existing` from the form
    ///
    /// Only the id survives. Every other field is set as for a new course.
    ///
    /// # Errors
    ///
    /// Returns the form errors from [`validate`](Self::validate).
    pub fn apply_to(self, existing: &Course, instructor: &str) -> Result<Course, FormErrors> {
        self.into_new_course(existing.id, instructor)
    }
}

/// Id for a course created at `now`
#[must_use]
pub fn new_course_id(now: DateTime<Utc>) -> CourseId {
    CourseId::new(u64::try_from(now.timestamp_millis()).unwrap_or_default())
}

/// One page of dashboard courses
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Page<'a> {
    /// Courses on this page
    pub items: &'a [Course],
    /// One-based page number, clamped to the available pages
    pub number: usize,
    /// Number of pages (0 when empty)
    pub total_pages: usize,
}

impl Page<'_> {
    /// Returns true if a later page exists
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    /// Returns true if an earlier page exists
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// Number of pages needed for `len` courses
#[must_use]
pub const fn total_pages(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE)
}

/// Returns page `number` (one-based) of `items`
#[must_use]
pub fn paginate(items: &[Course], number: usize) -> Page<'_> {
    let total_pages = total_pages(items.len());
    let number = number.clamp(1, total_pages.max(1));
    let start = ((number - 1) * PAGE_SIZE).min(items.len());
    let end = (start + PAGE_SIZE).min(items.len());
    Page {
        items: &items[start..end],
        number,
        total_pages,
    }
}

/// Courses to seed an empty dashboard with, if it needs seeding
#[must_use]
pub fn seed_products(state: &AppState, catalog: &[Course]) -> Option<Vec<Course>> {
    state.dashboard_products.is_empty().then(|| catalog.to_vec())
}

/// Counters shown at the top of the dashboard
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DashboardStats {
    /// Managed courses
    pub products: usize,
    /// Courses in the cart
    pub in_cart: usize,
    /// Enrolled courses
    pub enrolled: usize,
    /// Orders placed
    pub orders: usize,
}

impl DashboardStats {
    /// Reads the counters from `state`
    #[must_use]
    pub fn of(state: &AppState) -> Self {
        Self {
            products: state.dashboard_products.len(),
            in_cart: state.cart.len(),
            enrolled: state.enrolled_courses.len(),
            orders: state.orders.len(),
        }
    }
}

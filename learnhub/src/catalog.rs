//! Read-only course catalog and testimonials.
//!
//! The catalog is static JSON: bundled into the binary, or read from a
//! directory holding `courses.json` and `testimonials.json`.

use crate::task::SimulatedTask;
use crate::types::{Course, CourseId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// File name of the course list
pub const COURSES_FILE: &str = "courses.json";
/// File name of the testimonials
pub const TESTIMONIALS_FILE: &str = "testimonials.json";

const BUNDLED_COURSES: &str = include_str!("../data/courses.json");
const BUNDLED_TESTIMONIALS: &str = include_str!("../data/testimonials.json");

/// Errors from loading or querying the catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No course has this id; the view shows "Course not found"
    #[error("Course not found: {0}")]
    NotFound(CourseId),

    /// A catalog file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A catalog file is not valid JSON of the expected shape
    #[error("Failed to parse catalog data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A student quote shown on the home page
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    /// Identifier
    pub id: u64,
    /// Student name
    pub name: String,
    /// Student role ("Frontend Developer")
    pub role: String,
    /// Quote
    pub content: String,
    /// Portrait path
    pub image: String,
    /// Stars
    pub rating: u8,
}

/// Courses and testimonials
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    courses: Vec<Course>,
    testimonials: Vec<Testimonial>,
}

impl Catalog {
    /// Creates a catalog from already-parsed data
    #[must_use]
    pub const fn new(courses: Vec<Course>, testimonials: Vec<Testimonial>) -> Self {
        Self {
            courses,
            testimonials,
        }
    }

    /// Parses the two JSON documents
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] if either document is malformed.
    pub fn from_json(courses: &str, testimonials: &str) -> Result<Self, CatalogError> {
        Ok(Self::new(
            serde_json::from_str(courses)?,
            serde_json::from_str(testimonials)?,
        ))
    }

    /// The catalog compiled into the binary
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] if the bundled data is malformed.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_COURSES, BUNDLED_TESTIMONIALS)
    }

    /// Reads `courses.json` and `testimonials.json` from `dir`
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if a file cannot be read and
    /// [`CatalogError::Parse`] if it is malformed.
    pub fn from_dir(dir: &Path) -> Result<Self, CatalogError> {
        let read = |name: &str| {
            let path = dir.join(name);
            std::fs::read_to_string(&path).map_err(|source| CatalogError::Io { path, source })
        };
        let catalog = Self::from_json(&read(COURSES_FILE)?, &read(TESTIMONIALS_FILE)?)?;
        tracing::debug!(dir = %dir.display(), courses = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// Loads from `dir` (or the bundled data) after a simulated latency
    pub fn load_after(dir: Option<PathBuf>, delay: Duration) -> SimulatedTask<Result<Self, CatalogError>> {
        SimulatedTask::spawn(delay, move || match dir {
            Some(dir) => Self::from_dir(&dir),
            None => Self::bundled(),
        })
    }

    /// All courses in catalog order
    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// All testimonials
    #[must_use]
    pub fn testimonials(&self) -> &[Testimonial] {
        &self.testimonials
    }

    /// Looks up a course
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown id.
    pub fn find(&self, id: CourseId) -> Result<&Course, CatalogError> {
        self.courses
            .iter()
            .find(|c| c.id == id)
            .ok_or(CatalogError::NotFound(id))
    }

    /// The first `limit` featured courses
    #[must_use]
    pub fn featured(&self, limit: usize) -> Vec<&Course> {
        self.courses.iter().filter(|c| c.featured).take(limit).collect()
    }

    /// Number of courses
    #[must_use]
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Returns true if there are no courses
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

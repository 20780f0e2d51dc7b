//! Course search, filtering and sorting for the course list.

use crate::types::Course;
use crate::validation::FormErrors;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Categories offered by the filter
pub const CATEGORIES: [&str; 5] = ["Development", "Design", "Data Science", "Marketing", "Cloud"];

/// Levels offered by the filter
pub const LEVELS: [&str; 3] = ["Beginner", "Intermediate", "Advanced"];

/// Sort order for the course list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    /// Cheapest first
    PriceLow,
    /// Most expensive first
    PriceHigh,
    /// Highest rated first
    Rating,
    /// Most students first
    Popular,
}

impl SortKey {
    /// Wire name (`price-low`, `price-high`, `rating`, `popular`)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Rating => "rating",
            Self::Popular => "popular",
        }
    }

    fn compare(self, a: &Course, b: &Course) -> Ordering {
        match self {
            Self::PriceLow => a.price.total_cmp(&b.price),
            Self::PriceHigh => b.price.total_cmp(&a.price),
            Self::Rating => b.rating.total_cmp(&a.rating),
            Self::Popular => b.students.cmp(&a.students),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price-low" => Ok(Self::PriceLow),
            "price-high" => Ok(Self::PriceHigh),
            "rating" => Ok(Self::Rating),
            "popular" => Ok(Self::Popular),
            other => Err(format!(
                "unknown sort '{other}' (price-low, price-high, rating, popular)"
            )),
        }
    }
}

/// Search and filter criteria; empty strings match everything
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CourseFilter {
    /// Case-insensitive text matched against title, description and instructor
    pub query: String,
    /// Exact category
    pub category: String,
    /// Exact level
    pub level: String,
    /// Exact instructor name
    pub instructor: String,
    /// Sort order; catalog order when `None`
    pub sort: Option<SortKey>,
}

impl CourseFilter {
    /// A filter that matches everything in catalog order
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search text
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Restricts to a category
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Restricts to a level
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Restricts to an instructor
    #[must_use]
    pub fn with_instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = instructor.into();
        self
    }

    /// Sets the sort order
    #[must_use]
    pub const fn sorted_by(mut self, sort: SortKey) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Rejects a category or level the filter does not offer
    ///
    /// # Errors
    ///
    /// Returns the failing fields.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        if !self.category.is_empty() && !CATEGORIES.contains(&self.category.as_str()) {
            errors.insert(
                "category",
                format!("Unknown category '{}' ({})", self.category, CATEGORIES.join(", ")),
            );
        }
        if !self.level.is_empty() && !LEVELS.contains(&self.level.as_str()) {
            errors.insert(
                "level",
                format!("Unknown level '{}' ({})", self.level, LEVELS.join(", ")),
            );
        }
        errors.into_result()
    }

    /// Returns true if the course passes every criterion
    #[must_use]
    pub fn matches(&self, course: &Course) -> bool {
        if !self.query.is_empty() {
            let query = self.query.to_lowercase();
            let hit = course.title.to_lowercase().contains(&query)
                || course.description.to_lowercase().contains(&query)
                || course.instructor.to_lowercase().contains(&query);
            if !hit {
                return false;
            }
        }
        (self.category.is_empty() || course.category == self.category)
            && (self.level.is_empty() || course.level == self.level)
            && (self.instructor.is_empty() || course.instructor == self.instructor)
    }
}

/// Applies `filter` to `catalog`; the sort is stable
#[must_use]
pub fn filter_courses(catalog: &[Course], filter: &CourseFilter) -> Vec<Course> {
    let mut result: Vec<Course> = catalog
        .iter()
        .filter(|course| filter.matches(course))
        .cloned()
        .collect();
    if let Some(sort) = filter.sort {
        result.sort_by(|a, b| sort.compare(a, b));
    }
    result
}

/// Distinct categories present in the catalog, first-seen order
#[must_use]
pub fn categories(catalog: &[Course]) -> Vec<String> {
    distinct(catalog.iter().map(|c| c.category.as_str()))
}

/// Distinct instructors present in the catalog, first-seen order
#[must_use]
pub fn instructors(catalog: &[Course]) -> Vec<String> {
    distinct(catalog.iter().map(|c| c.instructor.as_str()))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !out.iter().any(|v| v == value) {
            out.push(value.to_string());
        }
    }
    out
}

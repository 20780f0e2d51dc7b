//! Instructor profiles aggregated from the catalog.

use crate::types::Course;
use std::collections::HashMap;

/// One instructor and the courses they teach
#[derive(Clone, Debug, PartialEq)]
pub struct InstructorProfile {
    /// Display name
    pub name: String,
    /// Category of the first catalog course by this instructor
    pub primary_category: String,
    /// Courses taught, catalog order
    pub courses: Vec<Course>,
    /// Best course rating
    pub rating: f64,
    /// Students across all courses
    pub students: u64,
}

/// Totals over every instructor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InstructorSummary {
    /// Number of instructors
    pub instructors: usize,
    /// Students across all instructors
    pub students: u64,
    /// Courses across all instructors
    pub courses: usize,
}

/// Groups the catalog by instructor, most students first
///
/// Instructors with equal student counts keep first-seen order.
#[must_use]
pub fn aggregate_instructors(catalog: &[Course]) -> Vec<InstructorProfile> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut profiles: Vec<InstructorProfile> = Vec::new();

    for course in catalog {
        if let Some(&i) = index.get(course.instructor.as_str()) {
            let profile = &mut profiles[i];
            profile.courses.push(course.clone());
            profile.rating = profile.rating.max(course.rating);
            profile.students += course.students;
        } else {
            index.insert(course.instructor.as_str(), profiles.len());
            profiles.push(InstructorProfile {
                name: course.instructor.clone(),
                primary_category: course.category.clone(),
                courses: vec![course.clone()],
                rating: course.rating,
                students: course.students,
            });
        }
    }

    profiles.sort_by(|a, b| b.students.cmp(&a.students));
    profiles
}

/// Sums the profiles for the summary banner
#[must_use]
pub fn summarize(profiles: &[InstructorProfile]) -> InstructorSummary {
    InstructorSummary {
        instructors: profiles.len(),
        students: profiles.iter().map(|p| p.students).sum(),
        courses: profiles.iter().map(|p| p.courses.len()).sum(),
    }
}

//! Section and lesson structure shown by the course player.
//!
//! Every course shares the same curriculum. Progress is a fraction of
//! [`Curriculum::total_lessons`], and lessons are addressed by [`LessonId`].

use crate::types::LessonId;

/// What a lesson contains
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LessonKind {
    /// Video lecture
    Video,
    /// Knowledge check
    Quiz,
}

/// A single lesson
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lesson {
    /// Title
    pub title: String,
    /// Running time, `m:ss`
    pub duration: String,
    /// Kind
    pub kind: LessonKind,
}

impl Lesson {
    fn video(title: &str, duration: &str) -> Self {
        Self {
            title: title.to_string(),
            duration: duration.to_string(),
            kind: LessonKind::Video,
        }
    }

    fn quiz(title: &str, duration: &str) -> Self {
        Self {
            kind: LessonKind::Quiz,
            ..Self::video(title, duration)
        }
    }
}

/// A titled group of lessons
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    /// Title
    pub title: String,
    /// Lessons in order
    pub lessons: Vec<Lesson>,
}

/// Ordered sections of a course
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Curriculum {
    sections: Vec<Section>,
}

impl Curriculum {
    /// Creates a curriculum from its sections
    #[must_use]
    pub const fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// The curriculum every course uses: 4 sections, 17 lessons
    #[must_use]
    pub fn standard() -> Self {
        let section = |title: &str, lessons: Vec<Lesson>| Section {
            title: title.to_string(),
            lessons,
        };

        Self::new(vec![
            section(
                "Introduction & Setup",
                vec![
                    Lesson::video("Welcome to the Course", "5:30"),
                    Lesson::video("Course Overview", "8:15"),
                    Lesson::video("Setting Up Your Environment", "12:00"),
                    Lesson::video("Installing Required Tools", "10:45"),
                    Lesson::video("Your First Project", "7:20"),
                ],
            ),
            section(
                "Core Fundamentals",
                vec![
                    Lesson::video("Understanding the Basics", "15:30"),
                    Lesson::video("Key Concepts Explained", "18:45"),
                    Lesson::video("Hands-on Practice", "22:00"),
                    Lesson::video("Common Patterns", "14:20"),
                    Lesson::quiz("Quiz: Test Your Knowledge", "10:00"),
                ],
            ),
            section(
                "Building Projects",
                vec![
                    Lesson::video("Project Setup", "8:30"),
                    Lesson::video("Building the Foundation", "25:00"),
                    Lesson::video("Adding Features", "30:15"),
                    Lesson::video("Testing & Debugging", "20:00"),
                ],
            ),
            section(
                "Advanced Techniques",
                vec![
                    Lesson::video("Advanced Concepts", "28:30"),
                    Lesson::video("Best Practices", "22:45"),
                    Lesson::video("Performance Optimization", "19:20"),
                ],
            ),
        ])
    }

    /// A curriculum of `sections` × `lessons_per_section` video lessons
    #[must_use]
    pub fn uniform(sections: usize, lessons_per_section: usize) -> Self {
        Self::new(
            (0..sections)
                .map(|s| Section {
                    title: format!("Section {}", s + 1),
                    lessons: (0..lessons_per_section)
                        .map(|l| Lesson::video(&format!("Lesson {}", l + 1), "10:00"))
                        .collect(),
                })
                .collect(),
        )
    }

    /// Sections in order
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Number of lessons across all sections
    #[must_use]
    pub fn total_lessons(&self) -> usize {
        self.sections.iter().map(|s| s.lessons.len()).sum()
    }

    /// Returns true if the id addresses a lesson of this curriculum
    #[must_use]
    pub fn contains(&self, id: LessonId) -> bool {
        self.lesson(id).is_some()
    }

    /// Looks up a lesson
    #[must_use]
    pub fn lesson(&self, id: LessonId) -> Option<&Lesson> {
        self.sections.get(id.section)?.lessons.get(id.lesson)
    }

    /// Looks up the section a lesson belongs to
    #[must_use]
    pub fn section(&self, id: LessonId) -> Option<&Section> {
        self.sections.get(id.section)
    }

    /// First lesson, where the player starts
    #[must_use]
    pub fn first(&self) -> Option<LessonId> {
        self.lesson_ids().next()
    }

    /// All lesson ids in playing order
    pub fn lesson_ids(&self) -> impl Iterator<Item = LessonId> + '_ {
        self.sections.iter().enumerate().flat_map(|(s, section)| {
            (0..section.lessons.len()).map(move |l| LessonId::new(s, l))
        })
    }

    /// The lesson after `id`, crossing into the next section
    #[must_use]
    pub fn next(&self, id: LessonId) -> Option<LessonId> {
        if !self.contains(id) {
            return None;
        }
        self.lesson_ids().skip_while(|l| *l != id).nth(1)
    }

    /// The lesson before `id`, crossing into the previous section
    #[must_use]
    pub fn previous(&self, id: LessonId) -> Option<LessonId> {
        if !self.contains(id) {
            return None;
        }
        self.lesson_ids().take_while(|l| *l != id).last()
    }
}

impl Default for Curriculum {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_has_seventeen_lessons() {
        let curriculum = Curriculum::standard();
        assert_eq!(curriculum.sections().len(), 4);
        assert_eq!(curriculum.total_lessons(), 17);
        assert_eq!(
            curriculum.lesson(LessonId::new(1, 4)).map(|l| l.kind),
            Some(LessonKind::Quiz)
        );
    }

    #[test]
    fn navigation_crosses_sections() {
        let curriculum = Curriculum::standard();
        assert_eq!(curriculum.first(), Some(LessonId::new(0, 0)));
        assert_eq!(curriculum.next(LessonId::new(0, 4)), Some(LessonId::new(1, 0)));
        assert_eq!(curriculum.previous(LessonId::new(1, 0)), Some(LessonId::new(0, 4)));
        assert_eq!(curriculum.previous(LessonId::new(0, 0)), None);
        assert_eq!(curriculum.next(LessonId::new(3, 2)), None);
    }

    #[test]
    fn rejects_out_of_range_lessons() {
        let curriculum = Curriculum::standard();
        assert!(!curriculum.contains(LessonId::new(2, 4)));
        assert!(!curriculum.contains(LessonId::new(9, 0)));
        assert_eq!(curriculum.next(LessonId::new(9, 0)), None);
    }

    #[test]
    fn uniform_curriculum() {
        assert_eq!(Curriculum::uniform(4, 5).total_lessons(), 20);
    }
}

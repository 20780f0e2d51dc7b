//! Domain types for the LearnHub marketplace.
//!
//! Everything here is plain data: the reducer owns the rules. Field names
//! serialize in camelCase so a persisted snapshot reads like the static
//! catalog JSON it was built from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Unique, stable identifier of a course
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(u64);

impl CourseId {
    /// Creates a `CourseId` from its numeric value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CourseId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Identifier of a user
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Creates a `UserId`
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Identifier of an order (milliseconds since the epoch at checkout)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(u64);

impl OrderId {
    /// Creates an `OrderId`
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Derives an id from a timestamp
    #[must_use]
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        Self(u64::try_from(at.timestamp_millis()).unwrap_or_default())
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A purchasable course
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Unique identifier
    pub id: CourseId,
    /// Display title
    pub title: String,
    /// Short description
    pub description: String,
    /// Current price
    pub price: f64,
    /// Price before discount
    pub original_price: f64,
    /// Image path
    #[serde(default)]
    pub image: String,
    /// Category name (e.g. "Development")
    pub category: String,
    /// Average rating out of 5
    #[serde(default)]
    pub rating: f64,
    /// Number of reviews
    #[serde(default)]
    pub reviews: u32,
    /// Instructor display name
    pub instructor: String,
    /// Human readable duration ("42 hours")
    #[serde(default)]
    pub duration: String,
    /// Level name (Beginner, Intermediate, Advanced)
    pub level: String,
    /// Number of enrolled students
    #[serde(default)]
    pub students: u64,
    /// Shown on the home page
    #[serde(default)]
    pub featured: bool,
}

/// The signed-in user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User id
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Free-form biography
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl User {
    /// Creates a user with only the required fields
    #[must_use]
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            phone: None,
            bio: None,
            location: None,
        }
    }
}

/// Partial user update; `None` fields are left untouched
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    /// New display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New phone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// New biography
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// New location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl UserPatch {
    /// Shallow-merges the present fields into `user`
    pub fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if self.phone.is_some() {
            user.phone = self.phone;
        }
        if self.bio.is_some() {
            user.bio = self.bio;
        }
        if self.location.is_some() {
            user.location = self.location;
        }
    }

    /// True when no field is present
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.bio.is_none()
            && self.location.is_none()
    }
}

/// Order status, fixed at creation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Paid and enrolled
    Completed,
    /// Display-only
    Pending,
    /// Display-only
    Cancelled,
}

impl OrderStatus {
    /// Lowercase wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment method chosen at checkout
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Credit or debit card
    #[default]
    Card,
    /// PayPal
    Paypal,
    /// Bank transfer
    Bank,
}

impl PaymentMethod {
    /// Lowercase wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Paypal => "paypal",
            Self::Bank => "bank",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "card" => Ok(Self::Card),
            "paypal" => Ok(Self::Paypal),
            "bank" => Ok(Self::Bank),
            other => Err(format!("unknown payment method '{other}' (card, paypal, bank)")),
        }
    }
}

/// A completed purchase
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order id
    pub id: OrderId,
    /// When the order was placed
    pub date: DateTime<Utc>,
    /// Purchased courses, as they were in the cart
    pub items: Vec<Course>,
    /// Total including tax, rounded to cents
    pub total: f64,
    /// Status
    pub status: OrderStatus,
    /// How it was paid
    pub payment_method: PaymentMethod,
}

/// Position of a lesson in the curriculum: `"<section>-<lesson>"` on the wire
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LessonId {
    /// Zero-based section index
    pub section: usize,
    /// Zero-based lesson index within the section
    pub lesson: usize,
}

impl LessonId {
    /// Creates a lesson id
    #[must_use]
    pub const fn new(section: usize, lesson: usize) -> Self {
        Self { section, lesson }
    }
}

impl fmt::Display for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.section, self.lesson)
    }
}

/// Error parsing a [`LessonId`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid lesson id '{0}', expected '<section>-<lesson>'")]
pub struct ParseLessonIdError(String);

impl FromStr for LessonId {
    type Err = ParseLessonIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseLessonIdError(s.to_string());
        let (section, lesson) = s.trim().split_once('-').ok_or_else(invalid)?;
        Ok(Self {
            section: section.parse().map_err(|_| invalid())?,
            lesson: lesson.parse().map_err(|_| invalid())?,
        })
    }
}

impl Serialize for LessonId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LessonId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A purchased course with learning progress
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledCourse {
    /// The purchased course
    #[serde(flatten)]
    pub course: Course,
    /// Percent complete, 0..=100
    #[serde(default)]
    pub progress: f64,
    /// Lessons marked complete, in completion order
    #[serde(default)]
    pub completed_lessons: Vec<LessonId>,
}

impl EnrolledCourse {
    /// Fresh enrollment with no progress
    #[must_use]
    pub const fn new(course: Course) -> Self {
        Self {
            course,
            progress: 0.0,
            completed_lessons: Vec::new(),
        }
    }

    /// The enrolled course id
    #[must_use]
    pub const fn id(&self) -> CourseId {
        self.course.id
    }
}

/// A course review
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Reviewed course
    pub course_id: CourseId,
    /// Author display name
    pub author: String,
    /// Stars, 1..=5
    pub rating: u8,
    /// Review text
    pub comment: String,
    /// When it was written
    pub date: DateTime<Utc>,
}

/// The whole application state
///
/// `pending_checkout` is transient and never persisted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppState {
    /// Signed-in user
    pub user: Option<User>,
    /// Courses in the cart, unique by id
    pub cart: Vec<Course>,
    /// Saved courses, unique by id
    pub wishlist: Vec<Course>,
    /// Instructor-managed courses
    pub dashboard_products: Vec<Course>,
    /// Placed orders, append-only
    pub orders: Vec<Order>,
    /// Purchased courses with progress
    pub enrolled_courses: Vec<EnrolledCourse>,
    /// Reviews, append-only
    pub reviews: Vec<Review>,
    /// Checkout currently being processed
    #[serde(skip)]
    pub pending_checkout: Option<OrderId>,
}

impl AppState {
    /// Creates the initial (empty, signed-out) state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a user is signed in
    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Returns true if the course is in the cart
    #[must_use]
    pub fn in_cart(&self, id: CourseId) -> bool {
        self.cart.iter().any(|c| c.id == id)
    }

    /// Returns true if the course is on the wishlist
    #[must_use]
    pub fn in_wishlist(&self, id: CourseId) -> bool {
        self.wishlist.iter().any(|c| c.id == id)
    }

    /// Returns the enrollment for a course, if purchased
    #[must_use]
    pub fn enrollment(&self, id: CourseId) -> Option<&EnrolledCourse> {
        self.enrolled_courses.iter().find(|e| e.id() == id)
    }

    /// Returns true if the course was purchased
    #[must_use]
    pub fn is_enrolled(&self, id: CourseId) -> bool {
        self.enrollment(id).is_some()
    }

    /// Returns true while a checkout is being processed
    #[must_use]
    pub const fn checkout_pending(&self) -> bool {
        self.pending_checkout.is_some()
    }

    /// Reviews written for a course
    pub fn reviews_for(&self, id: CourseId) -> impl Iterator<Item = &Review> {
        self.reviews.iter().filter(move |r| r.course_id == id)
    }
}

/// A partial state, as loaded from a snapshot
///
/// Absent fields leave the current value untouched. For `user`, an explicit
/// `null` clears it while a missing key keeps it. Unknown fields are dropped.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    /// Signed-in user (`Some(None)` = explicitly signed out)
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub user: Option<Option<User>>,
    /// Cart
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cart: Option<Vec<Course>>,
    /// Wishlist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wishlist: Option<Vec<Course>>,
    /// Dashboard products
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard_products: Option<Vec<Course>>,
    /// Orders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orders: Option<Vec<Order>>,
    /// Enrollments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrolled_courses: Option<Vec<EnrolledCourse>>,
    /// Reviews
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Vec<Review>>,
}

/// Distinguishes a present `null` from a missing key
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl StateSnapshot {
    /// Shallow-merges the present fields into `state`
    pub fn merge_into(self, state: &mut AppState) {
        if let Some(user) = self.user {
            state.user = user;
        }
        if let Some(cart) = self.cart {
            state.cart = cart;
        }
        if let Some(wishlist) = self.wishlist {
            state.wishlist = wishlist;
        }
        if let Some(products) = self.dashboard_products {
            state.dashboard_products = products;
        }
        if let Some(orders) = self.orders {
            state.orders = orders;
        }
        if let Some(enrolled) = self.enrolled_courses {
            state.enrolled_courses = enrolled;
        }
        if let Some(reviews) = self.reviews {
            state.reviews = reviews;
        }
    }
}

impl From<&AppState> for StateSnapshot {
    fn from(state: &AppState) -> Self {
        Self {
            user: Some(state.user.clone()),
            cart: Some(state.cart.clone()),
            wishlist: Some(state.wishlist.clone()),
            dashboard_products: Some(state.dashboard_products.clone()),
            orders: Some(state.orders.clone()),
            enrolled_courses: Some(state.enrolled_courses.clone()),
            reviews: Some(state.reviews.clone()),
        }
    }
}

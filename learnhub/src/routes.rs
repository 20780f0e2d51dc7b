//! Navigation surface.
//!
//! Every page the application can show, its path, and whether it needs a
//! signed-in user. Unknown paths resolve to [`Route::NotFound`].

use crate::types::CourseId;
use std::fmt;

/// A page of the application
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`
    Home,
    /// `/products`
    Products,
    /// `/products/:id`
    ProductDetail(CourseId),
    /// `/blog`
    Blog,
    /// `/about`
    About,
    /// `/contact`
    Contact,
    /// `/instructors`
    Instructors,
    /// `/faq`
    Faq,
    /// `/login`
    Login,
    /// `/register`
    Register,
    /// `/dashboard`
    Dashboard,
    /// `/profile`
    Profile,
    /// `/checkout`
    Checkout,
    /// `/orders`
    Orders,
    /// `/learn/:id`
    Player(CourseId),
    /// Anything else
    NotFound,
}

impl Route {
    /// Parses a path, ignoring any query string and trailing slash
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Home,
            ["products"] => Self::Products,
            ["products", id] => id.parse().map_or(Self::NotFound, Self::ProductDetail),
            ["blog"] => Self::Blog,
            ["about"] => Self::About,
            ["contact"] => Self::Contact,
            ["instructors"] => Self::Instructors,
            ["faq"] => Self::Faq,
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["dashboard"] => Self::Dashboard,
            ["profile"] => Self::Profile,
            ["checkout"] => Self::Checkout,
            ["orders"] => Self::Orders,
            ["learn", id] => id.parse().map_or(Self::NotFound, Self::Player),
            _ => Self::NotFound,
        }
    }

    /// Canonical path
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Products => "/products".to_string(),
            Self::ProductDetail(id) => format!("/products/{id}"),
            Self::Blog => "/blog".to_string(),
            Self::About => "/about".to_string(),
            Self::Contact => "/contact".to_string(),
            Self::Instructors => "/instructors".to_string(),
            Self::Faq => "/faq".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::Profile => "/profile".to_string(),
            Self::Checkout => "/checkout".to_string(),
            Self::Orders => "/orders".to_string(),
            Self::Player(id) => format!("/learn/{id}"),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// Pages that redirect to login when nobody is signed in
    ///
    /// The player is not listed: it decides per course (see
    /// [`player_access`](crate::views::player_access)).
    #[must_use]
    pub const fn requires_user(&self) -> bool {
        matches!(
            self,
            Self::Dashboard | Self::Profile | Self::Checkout | Self::Orders
        )
    }

    /// Where navigation to this route actually lands
    #[must_use]
    pub const fn resolve(self, signed_in: bool) -> Self {
        if self.requires_user() && !signed_in {
            Self::Login
        } else {
            self
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

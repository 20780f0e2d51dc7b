//! Command handlers for the CLI.
//!
//! Each handler validates its input, dispatches actions to the store and
//! prints the resulting view.

use anyhow::{bail, Context as _};
use learnhub::curriculum::LessonKind;
use learnhub::dashboard::{self, CourseDraft, DashboardStats};
use learnhub::validation::{ContactForm, LoginForm, RegisterForm, ReviewForm};
use learnhub::views::{self, CartTotals, PlayerAccess};
use learnhub::{
    app, auth, AppAction, AppStore, Catalog, Config, Course, CourseFilter, CourseId, LessonId,
    PaymentMethod, Review, Route, User, UserPatch,
};
use learnhub_core::environment::Clock;

/// Everything a command needs
pub struct Context<'a> {
    pub store: &'a AppStore,
    pub catalog: &'a Catalog,
    pub config: &'a Config,
}

fn money(amount: f64) -> String {
    format!("${amount:.2}")
}

fn course_line(course: &Course) -> String {
    format!(
        "#{:<14} {:<45} {:>8}  {} · {} · ★{} ({} students)",
        course.id,
        course.title,
        money(course.price),
        course.instructor,
        course.level,
        course.rating,
        course.students
    )
}

/// The signed-in user, or an error pointing at the login page
async fn require_user(ctx: &Context<'_>, route: Route) -> anyhow::Result<User> {
    let user = ctx.store.state(|s| s.user.clone()).await;
    let resolved = route.resolve(user.is_some());
    match user {
        Some(user) if resolved == route => Ok(user),
        _ => bail!("Sign in to open {route}: run `learnhub login` first"),
    }
}

pub fn home(ctx: &Context<'_>) -> anyhow::Result<()> {
    println!("Featured courses");
    for course in ctx.catalog.featured(3) {
        println!("  {}", course_line(course));
    }
    println!();
    println!("What our students say");
    for t in ctx.catalog.testimonials() {
        println!("  {} ({}) {}", t.name, t.role, "★".repeat(usize::from(t.rating)));
        println!("    \"{}\"", t.content);
    }
    Ok(())
}

pub fn catalog(ctx: &Context<'_>, filter: &CourseFilter) -> anyhow::Result<()> {
    filter.validate()?;
    let courses = views::filter_courses(ctx.catalog.courses(), filter);
    if courses.is_empty() {
        println!("No courses found. Try adjusting your search or filters.");
        return Ok(());
    }
    let noun = if courses.len() == 1 { "course" } else { "courses" };
    println!("Showing {} {noun}", courses.len());
    for course in &courses {
        println!("  {}", course_line(course));
    }
    Ok(())
}

pub async fn show(ctx: &Context<'_>, id: CourseId) -> anyhow::Result<()> {
    let course = ctx.catalog.find(id)?;
    let (in_cart, in_wishlist, enrolled, reviews) = ctx
        .store
        .state(|s| {
            (
                s.in_cart(id),
                s.in_wishlist(id),
                s.is_enrolled(id),
                s.reviews_for(id).cloned().collect::<Vec<_>>(),
            )
        })
        .await;

    println!("{}", course.title);
    println!("{}", course.description);
    println!(
        "{} (was {}, {}% off)",
        money(course.price),
        money(course.original_price),
        views::discount_percent(course.price, course.original_price)
    );
    println!(
        "{} · {} · {} · {} · ★{} ({} reviews, {} students)",
        course.category,
        course.level,
        course.duration,
        course.instructor,
        course.rating,
        course.reviews,
        course.students
    );
    let mut flags = Vec::new();
    if enrolled {
        flags.push("enrolled");
    }
    if in_cart {
        flags.push("in cart");
    }
    if in_wishlist {
        flags.push("wishlisted");
    }
    if !flags.is_empty() {
        println!("[{}]", flags.join(", "));
    }
    for review in reviews {
        println!("  {} ★{}: {}", review.author, review.rating, review.comment);
    }
    Ok(())
}

pub fn instructors(ctx: &Context<'_>) {
    let profiles = views::aggregate_instructors(ctx.catalog.courses());
    let summary = views::summarize(&profiles);
    println!(
        "{} instructors · {} students · {} courses",
        summary.instructors, summary.students, summary.courses
    );
    for profile in profiles {
        println!(
            "  {:<20} {:<14} ★{} {} students, {} courses",
            profile.name,
            profile.primary_category,
            profile.rating,
            profile.students,
            profile.courses.len()
        );
    }
}

pub async fn login(ctx: &Context<'_>, email: String, password: String) -> anyhow::Result<()> {
    let task = auth::submit_login(LoginForm { email, password }, ctx.config.timing.loading_delay)?;
    let user = task.join().await??;
    ctx.store.send(AppAction::SetUser(user.clone())).await?;
    println!("Welcome back, {}!", user.name);
    Ok(())
}

pub async fn register(ctx: &Context<'_>, form: RegisterForm) -> anyhow::Result<()> {
    let task = auth::submit_registration(form, ctx.config.timing.loading_delay)?;
    let user = task.join().await??;
    ctx.store.send(AppAction::SetUser(user.clone())).await?;
    println!("Account created. Welcome, {}!", user.name);
    Ok(())
}

pub async fn logout(ctx: &Context<'_>) -> anyhow::Result<()> {
    ctx.store.send(AppAction::Logout).await?;
    println!("Signed out");
    Ok(())
}

pub async fn cart_add(ctx: &Context<'_>, id: CourseId) -> anyhow::Result<()> {
    let course = ctx.catalog.find(id)?.clone();
    let title = course.title.clone();
    ctx.store.send(AppAction::AddToCart(course)).await?;
    println!("Added \"{title}\" to cart");
    Ok(())
}

pub async fn cart_remove(ctx: &Context<'_>, id: CourseId) -> anyhow::Result<()> {
    ctx.store.send(AppAction::RemoveFromCart(id)).await?;
    println!("Removed course {id} from cart");
    Ok(())
}

pub async fn cart_clear(ctx: &Context<'_>) -> anyhow::Result<()> {
    ctx.store.send(AppAction::ClearCart).await?;
    println!("Cart cleared");
    Ok(())
}

pub async fn cart_list(ctx: &Context<'_>) -> anyhow::Result<()> {
    let cart = ctx.store.state(|s| s.cart.clone()).await;
    if cart.is_empty() {
        println!("Your cart is empty");
        return Ok(());
    }
    for course in &cart {
        println!("  {}", course_line(course));
    }
    let totals = CartTotals::of(&cart).rounded();
    println!("Subtotal {}", money(totals.subtotal));
    println!("Tax      {}", money(totals.tax));
    println!("Total    {}", money(totals.total));
    Ok(())
}

pub async fn wishlist_add(ctx: &Context<'_>, id: CourseId) -> anyhow::Result<()> {
    let course = ctx.catalog.find(id)?.clone();
    let title = course.title.clone();
    ctx.store.send(AppAction::AddToWishlist(course)).await?;
    println!("Saved \"{title}\" to wishlist");
    Ok(())
}

pub async fn wishlist_remove(ctx: &Context<'_>, id: CourseId) -> anyhow::Result<()> {
    ctx.store.send(AppAction::RemoveFromWishlist(id)).await?;
    println!("Removed course {id} from wishlist");
    Ok(())
}

pub async fn wishlist_list(ctx: &Context<'_>) -> anyhow::Result<()> {
    let wishlist = ctx.store.state(|s| s.wishlist.clone()).await;
    if wishlist.is_empty() {
        println!("Your wishlist is empty");
    }
    for course in &wishlist {
        println!("  {}", course_line(course));
    }
    Ok(())
}

pub async fn checkout(ctx: &Context<'_>, payment: PaymentMethod) -> anyhow::Result<()> {
    require_user(ctx, Route::Checkout).await?;
    println!("Processing payment...");
    let order = app::checkout(ctx.store, payment).await?;
    println!(
        "Order #{} placed: {} course(s), {} paid by {}",
        order.id,
        order.items.len(),
        money(order.total),
        order.payment_method
    );
    Ok(())
}

pub async fn orders(ctx: &Context<'_>) -> anyhow::Result<()> {
    require_user(ctx, Route::Orders).await?;
    let orders = ctx.store.state(|s| s.orders.clone()).await;
    if orders.is_empty() {
        println!("No orders yet");
    }
    for order in orders.iter().rev() {
        let plural = if order.items.len() > 1 { "s" } else { "" };
        println!(
            "#{} {} {} {} course{plural} {} via {}",
            order.id,
            order.date.format("%Y-%m-%d"),
            order.status,
            order.items.len(),
            money(order.total),
            order.payment_method
        );
        for item in &order.items {
            println!("    {}", item.title);
        }
    }
    Ok(())
}

pub async fn learn(ctx: &Context<'_>, id: CourseId, complete: Option<LessonId>) -> anyhow::Result<()> {
    let course = ctx.catalog.find(id)?;
    let access = ctx.store.state(|s| views::player_access(s, id)).await;
    if access == PlayerAccess::RequiresLogin {
        bail!("Sign in to open {}", Route::Player(id));
    }

    let curriculum = ctx.store.environment().curriculum.clone();
    if let Some(lesson) = complete {
        let title = curriculum
            .lesson(lesson)
            .map(|l| l.title.clone())
            .with_context(|| format!("No lesson {lesson} in this course"))?;
        if access == PlayerAccess::Preview {
            println!("Preview mode: progress is only saved for purchased courses");
        } else {
            ctx.store
                .send(AppAction::CompleteLesson {
                    course_id: id,
                    lesson,
                })
                .await?;
            println!("Completed \"{title}\"");
        }
    }

    let (completed, progress) = ctx
        .store
        .state(|s| {
            s.enrollment(id)
                .map(|e| (e.completed_lessons.clone(), e.progress))
                .unwrap_or_default()
        })
        .await;

    println!("{} ({}% complete)", course.title, views::rounded_percent(progress));
    for (s, section) in curriculum.sections().iter().enumerate() {
        println!("  {}", section.title);
        for (l, lesson) in section.lessons.iter().enumerate() {
            let mark = if completed.contains(&LessonId::new(s, l)) { "✓" } else { " " };
            let kind = match lesson.kind {
                LessonKind::Video => "video",
                LessonKind::Quiz => "quiz",
            };
            println!("    [{mark}] {s}-{l} {:<32} {:>6} {kind}", lesson.title, lesson.duration);
        }
    }
    Ok(())
}

pub async fn profile(ctx: &Context<'_>, patch: UserPatch) -> anyhow::Result<()> {
    require_user(ctx, Route::Profile).await?;
    if !patch.is_empty() {
        app::save_profile(ctx.store, patch, ctx.config.timing.loading_delay).await?;
        println!("Profile updated");
    }
    let user = require_user(ctx, Route::Profile).await?;
    println!("{} <{}>", user.name, user.email);
    for (label, value) in [("Phone", &user.phone), ("Location", &user.location), ("Bio", &user.bio)] {
        if let Some(value) = value {
            println!("  {label}: {value}");
        }
    }
    Ok(())
}

pub async fn dashboard_list(ctx: &Context<'_>, page: usize) -> anyhow::Result<()> {
    let user = require_user(ctx, Route::Dashboard).await?;
    app::seed_dashboard(ctx.store, ctx.catalog).await?;

    let (stats, products) = ctx
        .store
        .state(|s| (DashboardStats::of(s), s.dashboard_products.clone()))
        .await;
    println!("Welcome, {}!", user.name);
    println!(
        "{} courses · {} in cart · {} enrolled · {} orders",
        stats.products, stats.in_cart, stats.enrolled, stats.orders
    );

    let page = dashboard::paginate(&products, page);
    for course in page.items {
        println!("  {}", course_line(course));
    }
    if page.total_pages > 1 {
        println!("Page {} of {}", page.number, page.total_pages);
    }
    Ok(())
}

pub async fn dashboard_add(ctx: &Context<'_>, draft: CourseDraft) -> anyhow::Result<()> {
    let user = require_user(ctx, Route::Dashboard).await?;
    app::seed_dashboard(ctx.store, ctx.catalog).await?;

    let id = dashboard::new_course_id(ctx.store.environment().clock.now());
    let course = draft.into_new_course(id, &user.name)?;
    let (title, id) = (course.title.clone(), course.id);
    ctx.store.send(AppAction::AddDashboardProduct(course)).await?;
    println!("Created \"{title}\" (#{id})");
    Ok(())
}

pub async fn dashboard_edit(ctx: &Context<'_>, id: CourseId, draft: CourseDraft) -> anyhow::Result<()> {
    let user = require_user(ctx, Route::Dashboard).await?;
    app::seed_dashboard(ctx.store, ctx.catalog).await?;

    let existing = ctx
        .store
        .state(|s| s.dashboard_products.iter().find(|c| c.id == id).cloned())
        .await
        .with_context(|| format!("No dashboard course {id}"))?;
    let course = draft.apply_to(&existing, &user.name)?;
    let title = course.title.clone();
    ctx.store.send(AppAction::UpdateDashboardProduct(course)).await?;
    println!("Updated \"{title}\"");
    Ok(())
}

pub async fn dashboard_delete(ctx: &Context<'_>, id: CourseId) -> anyhow::Result<()> {
    require_user(ctx, Route::Dashboard).await?;
    app::seed_dashboard(ctx.store, ctx.catalog).await?;
    ctx.store.send(AppAction::DeleteDashboardProduct(id)).await?;
    println!("Deleted course {id}");
    Ok(())
}

pub async fn review(ctx: &Context<'_>, id: CourseId, form: ReviewForm) -> anyhow::Result<()> {
    form.validate()?;
    let course = ctx.catalog.find(id)?;
    let user = ctx
        .store
        .state(|s| s.user.clone())
        .await
        .context("Sign in to review a course")?;

    let review = Review {
        course_id: id,
        author: user.name,
        rating: form.rating,
        comment: form.comment,
        date: ctx.store.environment().clock.now(),
    };
    ctx.store.send(AppAction::AddReview(review)).await?;
    println!("Thanks for reviewing \"{}\"", course.title);
    Ok(())
}

pub fn contact(form: &ContactForm) -> anyhow::Result<()> {
    form.validate()?;
    tracing::info!(subject = %form.subject, "Contact message received");
    println!("Thanks {}, we'll get back to you at {}", form.name, form.email);
    Ok(())
}

//! LearnHub CLI - browse courses, shop, learn and manage a dashboard.
//!
//! State persists between invocations in `LEARNHUB_DATA_DIR` (default
//! `.learnhub`).
//!
//! # Usage
//!
//! ```bash
//! learnhub catalog --category Design --sort price-low
//! learnhub login --email student@learnhub.com --password password123
//! learnhub cart add 1
//! learnhub checkout --payment paypal
//! learnhub learn 1 --complete 0-0
//! learnhub dashboard add --title "Rust 101" --description "Ownership" --price 49.99
//! ```

use clap::{Args, Parser, Subcommand};
use learnhub::{app, Catalog, Config, CourseId, LessonId, PaymentMethod, SortKey};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// How long to wait for effects to drain on exit
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "learnhub")]
#[command(author, version, about = "LearnHub online course marketplace")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Featured courses and testimonials
    Home,
    /// Search and filter the course catalog
    Catalog(CatalogArgs),
    /// Show one course
    Show {
        /// Course id
        id: CourseId,
    },
    /// List instructors by students taught
    Instructors,
    /// Sign in with the demo account
    Login {
        /// Email address
        #[arg(short, long)]
        email: String,
        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Create an account
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,
        /// Email address
        #[arg(short, long)]
        email: String,
        /// Password
        #[arg(short, long)]
        password: String,
        /// Password again
        #[arg(long)]
        confirm_password: String,
    },
    /// Sign out
    Logout,
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Buy everything in the cart
    Checkout {
        /// Payment method (card, paypal, bank)
        #[arg(long, default_value = "card")]
        payment: PaymentMethod,
    },
    /// Order history
    Orders,
    /// Open the course player
    Learn {
        /// Course id
        id: CourseId,
        /// Mark a lesson complete (`<section>-<lesson>`)
        #[arg(long)]
        complete: Option<LessonId>,
    },
    /// Show or edit the profile
    Profile(ProfileArgs),
    /// Instructor dashboard
    Dashboard {
        #[command(subcommand)]
        action: DashboardAction,
    },
    /// Review a course
    Review {
        /// Course id
        id: CourseId,
        /// Stars, 1 to 5
        #[arg(short, long)]
        rating: u8,
        /// Review text
        #[arg(short, long)]
        comment: String,
    },
    /// Send a message to the team
    Contact {
        /// Your name
        #[arg(long)]
        name: String,
        /// Your email
        #[arg(long)]
        email: String,
        /// Subject line
        #[arg(long)]
        subject: String,
        /// Message body
        #[arg(long)]
        message: String,
    },
}

#[derive(Args)]
struct CatalogArgs {
    /// Text matched against title, description and instructor
    #[arg(short, long, default_value = "")]
    query: String,
    /// Exact category
    #[arg(short, long, default_value = "")]
    category: String,
    /// Exact level
    #[arg(short, long, default_value = "")]
    level: String,
    /// Exact instructor
    #[arg(short, long, default_value = "")]
    instructor: String,
    /// price-low, price-high, rating or popular
    #[arg(short, long)]
    sort: Option<SortKey>,
}

#[derive(Args)]
struct ProfileArgs {
    /// New display name
    #[arg(long)]
    name: Option<String>,
    /// New email
    #[arg(long)]
    email: Option<String>,
    /// New phone
    #[arg(long)]
    phone: Option<String>,
    /// New biography
    #[arg(long)]
    bio: Option<String>,
    /// New location
    #[arg(long)]
    location: Option<String>,
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a course by id
    Add {
        /// Course id
        id: CourseId,
    },
    /// Remove a course by id
    Remove {
        /// Course id
        id: CourseId,
    },
    /// Show the cart with totals
    List,
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Save a course by id
    Add {
        /// Course id
        id: CourseId,
    },
    /// Remove a course by id
    Remove {
        /// Course id
        id: CourseId,
    },
    /// Show saved courses
    List,
}

#[derive(Subcommand)]
enum DashboardAction {
    /// List managed courses
    List {
        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Create a course
    Add(DraftArgs),
    /// Edit a course
    Edit {
        /// Course id
        id: CourseId,
        #[command(flatten)]
        draft: DraftArgs,
    },
    /// Delete a course
    Delete {
        /// Course id
        id: CourseId,
    },
}

#[derive(Args)]
struct DraftArgs {
    /// Title
    #[arg(long)]
    title: String,
    /// Description
    #[arg(long)]
    description: String,
    /// Price
    #[arg(long)]
    price: String,
    /// Category
    #[arg(long, default_value = learnhub::dashboard::DEFAULT_CATEGORY)]
    category: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("warn,learnhub={}", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let store = app::open(&config).await?;
    let catalog = Catalog::load_after(config.catalog.dir.clone(), config.timing.loading_delay)
        .join()
        .await??;
    tracing::debug!(courses = catalog.len(), "Catalog ready");

    let ctx = commands::Context {
        store: &store,
        catalog: &catalog,
        config: &config,
    };
    let result = run(cli.command, &ctx).await;

    store.shutdown(SHUTDOWN_TIMEOUT).await?;
    result
}

async fn run(command: Commands, ctx: &commands::Context<'_>) -> anyhow::Result<()> {
    match command {
        Commands::Home => commands::home(ctx),
        Commands::Catalog(args) => {
            let filter = learnhub::CourseFilter {
                query: args.query,
                category: args.category,
                level: args.level,
                instructor: args.instructor,
                sort: args.sort,
            };
            commands::catalog(ctx, &filter)
        },
        Commands::Show { id } => commands::show(ctx, id).await,
        Commands::Instructors => {
            commands::instructors(ctx);
            Ok(())
        },
        Commands::Login { email, password } => commands::login(ctx, email, password).await,
        Commands::Register {
            name,
            email,
            password,
            confirm_password,
        } => {
            let form = learnhub::validation::RegisterForm {
                name,
                email,
                password,
                confirm_password,
            };
            commands::register(ctx, form).await
        },
        Commands::Logout => commands::logout(ctx).await,
        Commands::Cart { action } => match action {
            CartAction::Add { id } => commands::cart_add(ctx, id).await,
            CartAction::Remove { id } => commands::cart_remove(ctx, id).await,
            CartAction::List => commands::cart_list(ctx).await,
            CartAction::Clear => commands::cart_clear(ctx).await,
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Add { id } => commands::wishlist_add(ctx, id).await,
            WishlistAction::Remove { id } => commands::wishlist_remove(ctx, id).await,
            WishlistAction::List => commands::wishlist_list(ctx).await,
        },
        Commands::Checkout { payment } => commands::checkout(ctx, payment).await,
        Commands::Orders => commands::orders(ctx).await,
        Commands::Learn { id, complete } => commands::learn(ctx, id, complete).await,
        Commands::Profile(args) => {
            let patch = learnhub::UserPatch {
                name: args.name,
                email: args.email,
                phone: args.phone,
                bio: args.bio,
                location: args.location,
            };
            commands::profile(ctx, patch).await
        },
        Commands::Dashboard { action } => match action {
            DashboardAction::List { page } => commands::dashboard_list(ctx, page).await,
            DashboardAction::Add(draft) => commands::dashboard_add(ctx, draft.into()).await,
            DashboardAction::Edit { id, draft } => commands::dashboard_edit(ctx, id, draft.into()).await,
            DashboardAction::Delete { id } => commands::dashboard_delete(ctx, id).await,
        },
        Commands::Review { id, rating, comment } => {
            commands::review(ctx, id, learnhub::validation::ReviewForm { rating, comment }).await
        },
        Commands::Contact {
            name,
            email,
            subject,
            message,
        } => commands::contact(&learnhub::validation::ContactForm {
            name,
            email,
            subject,
            message,
        }),
    }
}

impl From<DraftArgs> for learnhub::dashboard::CourseDraft {
    fn from(args: DraftArgs) -> Self {
        Self {
            title: args.title,
            description: args.description,
            price: args.price,
            category: args.category,
        }
    }
}

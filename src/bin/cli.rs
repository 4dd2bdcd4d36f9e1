use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use dotenvy::dotenv;
use shelfwise::cli::{FakeCounts, seed_fake};
use shelfwise::modules::seed::Seeder;
use shelfwise::state::{init_app_state, init_store};
use shelfwise_config::{FineConfig, SeedConfig, ServerConfig};
use shelfwise_core::SystemClock;

#[derive(Parser)]
#[command(name = "shelfwise-cli")]
#[command(about = "Shelfwise CLI - Administrative tools for the library tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import the configured CSV datasets into empty collections
    InitData,
    /// Fill empty collections with generated books and patrons
    SeedFake {
        /// Number of books to generate
        #[arg(short = 'b', long, default_value = "50")]
        books: usize,

        /// Number of patrons to generate
        #[arg(short = 'u', long, default_value = "100")]
        users: usize,
    },
    /// Assess the fine for a due date and an optional return date
    Fine {
        /// Due date, e.g. 2024-01-01 or 2024-01-01T09:00:00Z
        #[arg(short = 'd', long)]
        due: String,

        /// Return date; omit to assess as of now
        #[arg(short = 'r', long)]
        returned: Option<String>,
    },
    /// Delete every book, patron and loan
    Reset {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::InitData => handle_init_data().await,
        Commands::SeedFake { books, users } => handle_seed_fake(FakeCounts { books, users }).await,
        Commands::Fine { due, returned } => handle_fine(&due, returned.as_deref()),
        Commands::Reset { yes } => handle_reset(yes).await,
    }
}

async fn handle_init_data() -> anyhow::Result<()> {
    let state = init_app_state(&ServerConfig::from_env()).await?;

    println!("🌱 Importing datasets...");
    let summary = Seeder::from_state(&state).run().await?;

    println!("✅ Import finished");
    println!("   - Books: {}", summary.books);
    println!("   - Users: {}", summary.users);
    println!("   - Transactions: {}", summary.transactions);
    Ok(())
}

async fn handle_seed_fake(counts: FakeCounts) -> anyhow::Result<()> {
    let store = init_store(&ServerConfig::from_env()).await?;
    let departments = SeedConfig::from_env().departments;

    println!("🔧 Generating fake data...");
    let summary = seed_fake(store.as_ref(), counts, &departments).await?;

    if summary.total() == 0 {
        println!("ℹ️  Collections already populated, nothing generated");
    } else {
        println!("✅ Seeded {} books and {} users", summary.books, summary.users);
    }
    Ok(())
}

fn handle_fine(due: &str, returned: Option<&str>) -> anyhow::Result<()> {
    let policy = FineConfig::from_env()?.into_policy()?;
    let fine = policy
        .assess_str(due, returned, &SystemClock)
        .context("Could not assess fine")?;

    println!("Due:      {}", due);
    println!("Returned: {}", returned.unwrap_or("not returned (assessed as of now)"));
    println!("Fine:     {:.2}", fine);
    Ok(())
}

async fn handle_reset(yes: bool) -> anyhow::Result<()> {
    let confirmed = yes
        || Confirm::new()
            .with_prompt("Delete all books, users and transactions?")
            .default(false)
            .interact()
            .context("Failed to read confirmation")?;

    if !confirmed {
        println!("Aborted");
        return Ok(());
    }

    let store = init_store(&ServerConfig::from_env()).await?;
    store.clear().await?;
    println!("✅ All library data deleted");
    Ok(())
}

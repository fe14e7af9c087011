//! Operator CLI for the library database: apply migrations and print loan
//! statistics.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use library_backend::config::LibrarySettings;
use library_backend::domain::ports::{
    BookQuery, BookStatResponse, UserLoanHistoryResponse, UserQuery,
};
use library_backend::domain::{BookService, UserService};
use library_backend::outbound::persistence::{
    DbPool, DieselBookRepository, DieselLoanRepository, DieselUserRepository,
    run_pending_migrations,
};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// `library-admin` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "library-admin",
    about = "Maintain the library database and report loan statistics",
    version
)]
struct CliArgs {
    /// Database connection URL. Overrides `LIBRARY_DATABASE_URL` and
    /// `DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url", global = true)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Apply pending schema migrations.
    Migrate,
    /// Print the number of active loans and the catalogue breakdown.
    Stats {
        /// Also print every user's loan history as JSON lines.
        #[arg(long)]
        histories: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StatsReport {
    loaned_books: u64,
    categories: Vec<BookStatResponse>,
    histories: Option<Vec<UserLoanHistoryResponse>>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(run(args))
}

async fn run(args: CliArgs) -> Result<()> {
    let mut settings = LibrarySettings::load_from_iter([OsString::from("library-admin")])
        .map_err(|err| eyre!("load library settings: {err}"))?;
    if let Some(url) = args.database_url.filter(|url| !url.trim().is_empty()) {
        settings.database_url = Some(url);
    }
    let pool_config = settings
        .pool_config()
        .wrap_err("resolve database configuration")?;

    match args.command {
        Command::Migrate => {
            let applied = run_pending_migrations(pool_config.database_url())
                .await
                .wrap_err("apply migrations")?;
            println!("applied_migrations={}", applied.len());
            for version in applied {
                println!("migration={version}");
            }
        }
        Command::Stats { histories } => {
            let pool = DbPool::new(pool_config)
                .await
                .wrap_err("create database pool")?;
            let users = Arc::new(DieselUserRepository::new(pool.clone()));
            let loans = Arc::new(DieselLoanRepository::new(pool.clone()));
            let book_service = BookService::new(
                Arc::new(DieselBookRepository::new(pool)),
                Arc::clone(&users),
                Arc::clone(&loans),
            );
            let user_service = UserService::new(users, loans);

            let report = collect_report(&book_service, &user_service, histories).await?;
            info!(loaned_books = report.loaned_books, "collected loan statistics");
            for line in render_report(&report)? {
                println!("{line}");
            }
        }
    }

    Ok(())
}

async fn collect_report<B, U>(books: &B, users: &U, histories: bool) -> Result<StatsReport>
where
    B: BookQuery,
    U: UserQuery,
{
    let loaned_books = books
        .count_loaned_books()
        .await
        .map_err(|err| eyre!("count loaned books: {err}"))?;
    let categories = books
        .book_statistics()
        .await
        .map_err(|err| eyre!("collect book statistics: {err}"))?;
    let histories = if histories {
        Some(
            users
                .user_loan_histories()
                .await
                .map_err(|err| eyre!("collect loan histories: {err}"))?,
        )
    } else {
        None
    };

    Ok(StatsReport {
        loaned_books,
        categories,
        histories,
    })
}

fn render_report(report: &StatsReport) -> Result<Vec<String>> {
    let mut lines = vec![format!("loaned_books={}", report.loaned_books)];
    lines.extend(
        report
            .categories
            .iter()
            .map(|stat| format!("type={} count={}", stat.book_type, stat.count)),
    );
    for history in report.histories.iter().flatten() {
        lines.push(serde_json::to_string(history).wrap_err("serialise loan history")?);
    }
    Ok(lines)
}

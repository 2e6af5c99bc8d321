use clap::{Parser, ValueEnum};
use migration::sea_orm::Database;
use migration::MigrationCommand;

#[derive(Clone, ValueEnum)]
enum Db {
    Postgres,
    SqliteFile,
}

#[derive(Parser)]
#[command(name = "migration-cli")]
#[command(about = "Storefront database migration tool")]
struct Args {
    /// Migration command to run
    command: String,

    /// Database type
    #[arg(
        short,
        long,
        value_enum,
        default_value = "postgres",
        help = "Database type: postgres, sqlite-file"
    )]
    db: Db,
}

/// Build the connection URL from environment variables.
///
/// Postgres uses the owner role (full permissions for DDL); SQLite file
/// databases are for local development only. In-memory SQLite is not
/// supported here: each CLI invocation would migrate a fresh database
/// that vanishes when the command exits.
fn database_url(db: &Db) -> Result<String, String> {
    match db {
        Db::Postgres => {
            let host = std::env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
            let port = std::env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string());
            let name = must_var("PROD_DB")?;
            let user = must_var("STOREFRONT_OWNER_USER")?;
            let password = must_var("STOREFRONT_OWNER_PASSWORD")?;
            Ok(format!("postgresql://{user}:{password}@{host}:{port}/{name}"))
        }
        Db::SqliteFile => {
            let path = must_var("SQLITE_PATH")?;
            Ok(format!("sqlite://{path}?mode=rwc"))
        }
    }
}

fn must_var(name: &str) -> Result<String, String> {
    std::env::var(name).map_err(|_| format!("Required environment variable '{name}' is not set"))
}

fn parse_command(raw: &str) -> Option<MigrationCommand> {
    match raw {
        "up" => Some(MigrationCommand::Up),
        "down" => Some(MigrationCommand::Down),
        "fresh" => Some(MigrationCommand::Fresh),
        "reset" => Some(MigrationCommand::Reset),
        "refresh" => Some(MigrationCommand::Refresh),
        "status" => Some(MigrationCommand::Status),
        _ => None,
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_env_filter("migration=info,sqlx=warn")
        .init();

    let args = Args::parse();

    let command = match parse_command(&args.command) {
        Some(command) => command,
        None => {
            eprintln!(
                "❌ Unknown command '{}'. Expected one of: up, down, fresh, reset, refresh, status",
                args.command
            );
            std::process::exit(2);
        }
    };

    let url = match database_url(&args.db) {
        Ok(url) => url,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let db = match Database::connect(&url).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("❌ Failed to connect: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = migration::migrate(&db, command).await {
        eprintln!("❌ Migration failed: {e}");
        std::process::exit(1);
    }
}

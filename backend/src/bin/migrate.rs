//! Apply (or revert) the embedded Diesel migrations against PostgreSQL.

use std::env;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// `migrate` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "migrate",
    about = "Apply pending help desk schema migrations",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `HELPDESK_DATABASE_URL`, then
    /// `DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Revert the most recent migration instead of applying pending ones.
    #[arg(long)]
    revert: bool,
}

fn resolve_database_url(cli: Option<String>) -> Result<String> {
    cli.or_else(|| env::var("HELPDESK_DATABASE_URL").ok())
        .or_else(|| env::var("DATABASE_URL").ok())
        .ok_or_else(|| {
            eyre!("no database URL: pass --database-url or set HELPDESK_DATABASE_URL")
        })
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let url = resolve_database_url(args.database_url)?;
    let mut conn = PgConnection::establish(&url).wrap_err("failed to connect to PostgreSQL")?;

    if args.revert {
        let reverted = conn
            .revert_last_migration(MIGRATIONS)
            .map_err(|err| eyre!("revert failed: {err}"))?;
        println!("reverted {reverted}");
        return Ok(());
    }

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| eyre!("migration failed: {err}"))?;
    if applied.is_empty() {
        println!("schema is up to date");
    }
    for version in applied {
        println!("applied {version}");
    }
    Ok(())
}

//! Command-line entry points: run the server or manage migrations.

use clap::{Parser, Subcommand};
use sqlx::PgPool;
use sqlx::migrate::Migrate;

use campus_db::MIGRATOR;

#[derive(Debug, Parser)]
#[command(name = "campus")]
#[command(about = "Campus API server and administrative tools", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Manage database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum MigrateAction {
    /// Apply all pending migrations
    Up,
    /// List migrations and whether each has been applied
    Status,
}

impl Cli {
    pub fn command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Serve)
    }
}

pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    MIGRATOR.run(pool).await?;
    tracing::info!("Migrations applied");
    Ok(())
}

pub async fn migration_status(pool: &PgPool) -> anyhow::Result<Vec<(i64, String, bool)>> {
    let mut conn = pool.acquire().await?;
    conn.ensure_migrations_table().await?;
    let applied = conn.list_applied_migrations().await?;

    Ok(MIGRATOR
        .iter()
        .map(|migration| {
            let is_applied = applied.iter().any(|a| a.version == migration.version);
            (migration.version, migration.description.to_string(), is_applied)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_is_default() {
        let cli = Cli::try_parse_from(["campus"]).unwrap();
        assert_eq!(cli.command(), &Commands::Serve);
    }

    #[test]
    fn test_migrate_subcommands() {
        let cli = Cli::try_parse_from(["campus", "migrate", "up"]).unwrap();
        assert_eq!(
            cli.command(),
            &Commands::Migrate {
                action: MigrateAction::Up
            }
        );

        let cli = Cli::try_parse_from(["campus", "migrate", "status"]).unwrap();
        assert_eq!(
            cli.command(),
            &Commands::Migrate {
                action: MigrateAction::Status
            }
        );

        assert!(Cli::try_parse_from(["campus", "migrate"]).is_err());
    }
}

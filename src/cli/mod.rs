//! Command line entry points
//!
//! - `serve`: run the HTTP API
//! - `migrate`: apply, revert or inspect PostgreSQL schema migrations
//! - `bulk`: rename, age or delete members matching a filter

pub mod bulk;
pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// Member search service
#[derive(Parser)]
#[command(name = "member-search-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Manage the PostgreSQL schema
    Migrate(migrate::MigrateArgs),

    /// Update or delete matching members in one statement
    Bulk(bulk::BulkArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["member-search-api", "serve"]).unwrap();
        assert!(matches!(cli.command, Command::Serve));
    }

    #[test]
    fn test_parse_migrate_flags() {
        let cli = Cli::try_parse_from(["member-search-api", "migrate", "--revert"]).unwrap();

        match cli.command {
            Command::Migrate(args) => {
                assert!(args.revert);
                assert!(!args.status);
            }
            _ => panic!("expected migrate"),
        }
    }

    #[test]
    fn test_migrate_flags_conflict() {
        assert!(
            Cli::try_parse_from(["member-search-api", "migrate", "--revert", "--status"]).is_err()
        );
    }
}

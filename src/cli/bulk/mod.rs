//! Bulk command - set-based member updates without loading entities

use clap::{Args, Subcommand};
use tracing::info;

use crate::config::AppConfig;
use crate::domain::search::{
    age_eq, age_goe, age_gt, age_loe, age_lt, username_contains, username_eq, Conjunction,
};
use crate::domain::DomainError;
use crate::infrastructure::logging;
use crate::infrastructure::search::MemberSearchServiceTrait;
use crate::infrastructure::storage::StorageFactory;

#[derive(Args, Debug)]
pub struct BulkArgs {
    #[command(flatten)]
    pub filter: MemberFilterArgs,

    #[command(subcommand)]
    pub action: BulkAction,
}

/// Member-column filters, combined with AND
#[derive(Args, Debug, Default)]
pub struct MemberFilterArgs {
    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub username_contains: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub age_eq: Option<i32>,

    #[arg(long, allow_hyphen_values = true)]
    pub age_goe: Option<i32>,

    #[arg(long, allow_hyphen_values = true)]
    pub age_loe: Option<i32>,

    #[arg(long, allow_hyphen_values = true)]
    pub age_gt: Option<i32>,

    #[arg(long, allow_hyphen_values = true)]
    pub age_lt: Option<i32>,

    /// Required to touch every member when no filter is given
    #[arg(long)]
    pub all: bool,
}

impl MemberFilterArgs {
    pub fn conjunction(&self) -> Result<Conjunction, DomainError> {
        let conjunction: Conjunction = [
            username_eq(self.username.as_deref()),
            username_contains(self.username_contains.as_deref()),
            age_eq(self.age_eq),
            age_goe(self.age_goe),
            age_loe(self.age_loe),
            age_gt(self.age_gt),
            age_lt(self.age_lt),
        ]
        .into_iter()
        .collect();

        if conjunction.is_empty() && !self.all {
            return Err(DomainError::validation(
                "No member filter given; pass --all to update every member",
            ));
        }

        Ok(conjunction)
    }
}

#[derive(Subcommand, Debug)]
pub enum BulkAction {
    /// Set the username of every matching member
    Rename {
        #[arg(long = "to")]
        username: String,
    },

    /// Add a (possibly negative) delta to every matching member's age
    AddAge {
        #[arg(long, allow_hyphen_values = true)]
        delta: i32,
    },

    /// Delete every matching member
    Delete,
}

pub async fn run(args: BulkArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    let repositories = StorageFactory::create(&config.storage, &config.pagination).await?;
    let affected = execute(repositories.search.as_ref(), &args).await?;

    info!(affected, action = ?args.action, "Bulk operation finished");
    Ok(())
}

/// Run one bulk action and return the number of affected members
pub async fn execute(
    service: &dyn MemberSearchServiceTrait,
    args: &BulkArgs,
) -> Result<u64, DomainError> {
    let conjunction = args.filter.conjunction()?;

    match &args.action {
        BulkAction::Rename { username } => service.bulk_rename(&conjunction, username).await,
        BulkAction::AddAge { delta } => service.bulk_add_age(&conjunction, *delta).await,
        BulkAction::Delete => service.bulk_delete(&conjunction).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use crate::config::{PaginationConfig, SeedConfig};
    use crate::domain::member::MemberRepository;
    use crate::domain::search::{MemberSearchCondition, Sort};
    use crate::infrastructure::seed::seed_sample_data;
    use crate::infrastructure::storage::{Repositories, StorageFactory};
    use clap::Parser;

    fn parse(args: &[&str]) -> BulkArgs {
        let argv = ["member-search-api", "bulk"].iter().chain(args.iter()).copied();

        match Cli::try_parse_from(argv).unwrap().command {
            Command::Bulk(args) => args,
            _ => panic!("expected bulk"),
        }
    }

    async fn seeded(member_count: u32) -> Repositories {
        let repositories = StorageFactory::in_memory(&PaginationConfig::default());
        let seed = SeedConfig {
            enabled: true,
            member_count,
        };

        seed_sample_data(
            repositories.teams.as_ref(),
            repositories.members.as_ref(),
            &seed,
        )
        .await
        .unwrap();

        repositories
    }

    #[test]
    fn test_parse_filters_and_action() {
        let args = parse(&["--age-lt", "28", "rename", "--to", "unknown"]);

        assert_eq!(args.filter.age_lt, Some(28));
        assert!(matches!(args.action, BulkAction::Rename { ref username } if username == "unknown"));
    }

    #[test]
    fn test_parse_negative_delta() {
        let args = parse(&["--all", "add-age", "--delta", "-1"]);

        assert!(args.filter.all);
        assert!(matches!(args.action, BulkAction::AddAge { delta: -1 }));
    }

    #[test]
    fn test_missing_filter_requires_all() {
        assert!(MemberFilterArgs::default().conjunction().is_err());

        let all = MemberFilterArgs {
            all: true,
            ..Default::default()
        };
        assert!(all.conjunction().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rename_members_below_age() {
        let repositories = seeded(10).await;
        let args = parse(&["--age-lt", "3", "rename", "--to", "unknown"]);

        let affected = execute(repositories.search.as_ref(), &args).await.unwrap();
        assert_eq!(affected, 3);

        let renamed = repositories
            .search
            .search(
                &MemberSearchCondition::new().with_username("unknown"),
                &Sort::unsorted(),
            )
            .await
            .unwrap();
        assert_eq!(renamed.len(), 3);
    }

    #[tokio::test]
    async fn test_add_age_to_every_member() {
        let repositories = seeded(4).await;
        let args = parse(&["--all", "add-age", "--delta", "1"]);

        assert_eq!(execute(repositories.search.as_ref(), &args).await.unwrap(), 4);

        let statistics = repositories
            .search
            .member_statistics(&MemberSearchCondition::new())
            .await
            .unwrap();
        assert_eq!(statistics.min, Some(1));
        assert_eq!(statistics.max, Some(4));
    }

    #[tokio::test]
    async fn test_delete_members_above_age() {
        let repositories = seeded(10).await;
        let args = parse(&["--age-gt", "6", "delete"]);

        assert_eq!(execute(repositories.search.as_ref(), &args).await.unwrap(), 3);
        assert_eq!(repositories.members.count().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_unfiltered_delete_is_refused() {
        let repositories = seeded(4).await;
        let args = parse(&["delete"]);

        assert!(matches!(
            execute(repositories.search.as_ref(), &args).await,
            Err(DomainError::Validation { .. })
        ));
        assert_eq!(repositories.members.count().await.unwrap(), 4);
    }
}

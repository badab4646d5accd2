//! Sample data for local development

use tracing::info;

use crate::config::SeedConfig;
use crate::domain::member::{MemberDraft, MemberRepository};
use crate::domain::team::TeamRepository;
use crate::domain::DomainError;

/// Create `teamA`, `teamB` and `member_count` members named `member{i}`
/// with age `i`; even members join `teamA`, odd members `teamB`.
///
/// Returns the number of members created, or `None` when teams already
/// exist and seeding was skipped.
pub async fn seed_sample_data(
    teams: &dyn TeamRepository,
    members: &dyn MemberRepository,
    config: &SeedConfig,
) -> Result<Option<u32>, DomainError> {
    if teams.count().await? > 0 {
        info!("Teams already present, skipping sample data");
        return Ok(None);
    }

    let team_a = teams.create("teamA").await?;
    let team_b = teams.create("teamB").await?;

    for i in 0..config.member_count {
        let age = i32::try_from(i).map_err(|e| DomainError::configuration(e.to_string()))?;
        let team = if i % 2 == 0 { &team_a } else { &team_b };

        let draft = MemberDraft::named(format!("member{}", i), age)
            .map_err(|e| DomainError::validation(e.to_string()))?
            .with_team(team.id());
        members.create(draft).await?;
    }

    info!(members = config.member_count, "Sample data loaded");
    Ok(Some(config.member_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PaginationConfig;
    use crate::domain::search::{MemberSearchCondition, PageRequest, Sort};
    use crate::infrastructure::search::PaginationStrategy;
    use crate::infrastructure::storage::StorageFactory;

    fn config(member_count: u32) -> SeedConfig {
        SeedConfig {
            enabled: true,
            member_count,
        }
    }

    #[tokio::test]
    async fn test_seed_assigns_teams_by_parity() {
        let repos = StorageFactory::in_memory(&PaginationConfig::default());

        let created = seed_sample_data(repos.teams.as_ref(), repos.members.as_ref(), &config(100))
            .await
            .unwrap();
        assert_eq!(created, Some(100));

        let team_a = repos.teams.get_by_name("teamA").await.unwrap().unwrap();
        let in_a = repos.members.list_by_team(team_a.id()).await.unwrap();
        assert_eq!(in_a.len(), 50);
        assert!(in_a.iter().all(|m| m.age() % 2 == 0));

        let member7 = repos.members.list_by_username("member7").await.unwrap();
        assert_eq!(member7.len(), 1);
        assert_eq!(member7[0].age(), 7);
    }

    #[tokio::test]
    async fn test_seed_is_skipped_when_teams_exist() {
        let repos = StorageFactory::in_memory(&PaginationConfig::default());
        repos.teams.create("existing").await.unwrap();

        let created = seed_sample_data(repos.teams.as_ref(), repos.members.as_ref(), &config(10))
            .await
            .unwrap();

        assert_eq!(created, None);
        assert_eq!(repos.members.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_strategies_agree_on_seeded_data() {
        let repos = StorageFactory::in_memory(&PaginationConfig::default());
        seed_sample_data(repos.teams.as_ref(), repos.members.as_ref(), &config(100))
            .await
            .unwrap();

        let condition = MemberSearchCondition::new()
            .with_team_name("teamB")
            .with_age_goe(10);
        let sort = Sort::parse("age:desc").unwrap();

        for (page, size) in [(0, 7), (3, 7), (6, 7), (7, 7), (0, 100), (1, 45)] {
            let request = PageRequest::new(page, size).unwrap().with_sort(sort.clone());
            let mut pages = Vec::new();

            for strategy in [
                PaginationStrategy::Simple,
                PaginationStrategy::Complex,
                PaginationStrategy::Optimized,
            ] {
                pages.push(
                    repos
                        .search
                        .search_page(&condition, &request, strategy)
                        .await
                        .unwrap(),
                );
            }

            // Odd ages 11..=99: 45 members.
            assert!(pages.iter().all(|p| p.total() == 45), "page {} size {}", page, size);
            assert_eq!(pages[0], pages[1]);
            assert_eq!(pages[1], pages[2]);
        }
    }

    #[tokio::test]
    async fn test_pages_partition_the_result_set() {
        let repos = StorageFactory::in_memory(&PaginationConfig::default());
        seed_sample_data(repos.teams.as_ref(), repos.members.as_ref(), &config(100))
            .await
            .unwrap();

        let condition = MemberSearchCondition::new();
        let full = repos.search.search(&condition, &Sort::unsorted()).await.unwrap();

        let mut collected = Vec::new();
        for page in 0..9 {
            let request = PageRequest::new(page, 12).unwrap();
            let page = repos
                .search
                .search_page(&condition, &request, PaginationStrategy::Optimized)
                .await
                .unwrap();
            assert_eq!(page.total(), 100);
            collected.extend(page.into_content());
        }

        assert_eq!(collected, full);
    }
}

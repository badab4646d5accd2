//! Member search service: list search, the three pagination strategies,
//! statistics and bulk operations

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::config::PaginationConfig;
use crate::domain::search::{
    resolve_total, AgeStatistics, Conjunction, MemberQueryRepository, MemberSearchCondition,
    MemberTeamDto, Page, PageRequest, Sort, TeamAgeStatistics, TotalCount, TotalHint,
};
use crate::domain::DomainError;

/// How a page and its total are obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationStrategy {
    /// Content and total from one round trip
    Simple,
    /// Content query plus an independent count query
    Complex,
    /// Content query; the count query runs only when the page cannot prove
    /// the total
    Optimized,
}

impl fmt::Display for PaginationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple => write!(f, "simple"),
            Self::Complex => write!(f, "complex"),
            Self::Optimized => write!(f, "optimized"),
        }
    }
}

/// Trait for member search operations (for dynamic dispatch in AppState)
#[async_trait]
pub trait MemberSearchServiceTrait: Send + Sync {
    /// Every matching member in the requested order
    async fn search(
        &self,
        condition: &MemberSearchCondition,
        sort: &Sort,
    ) -> Result<Vec<MemberTeamDto>, DomainError>;

    /// One page of matching members with its total
    async fn search_page(
        &self,
        condition: &MemberSearchCondition,
        request: &PageRequest,
        strategy: PaginationStrategy,
    ) -> Result<Page<MemberTeamDto>, DomainError>;

    async fn member_statistics(
        &self,
        condition: &MemberSearchCondition,
    ) -> Result<AgeStatistics, DomainError>;

    async fn team_statistics(&self) -> Result<Vec<TeamAgeStatistics>, DomainError>;

    async fn bulk_rename(&self, conjunction: &Conjunction, username: &str)
        -> Result<u64, DomainError>;

    async fn bulk_add_age(&self, conjunction: &Conjunction, delta: i32)
        -> Result<u64, DomainError>;

    async fn bulk_delete(&self, conjunction: &Conjunction) -> Result<u64, DomainError>;

    /// Liveness of the underlying storage
    async fn ping(&self) -> Result<(), DomainError>;
}

/// Member search service implementation
pub struct MemberSearchService<R: MemberQueryRepository> {
    repository: Arc<R>,
    config: PaginationConfig,
}

impl<R: MemberQueryRepository> fmt::Debug for MemberSearchService<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberSearchService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<R: MemberQueryRepository> MemberSearchService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_config(repository, PaginationConfig::default())
    }

    pub fn with_config(repository: Arc<R>, config: PaginationConfig) -> Self {
        Self { repository, config }
    }

    /// Single round trip for content and total
    pub async fn search_page_simple(
        &self,
        condition: &MemberSearchCondition,
        request: &PageRequest,
    ) -> Result<Page<MemberTeamDto>, DomainError> {
        request.ensure_max_size(self.config.max_page_size)?;
        let conjunction = condition.to_conjunction();

        let (content, total) = self
            .repository
            .fetch_slice_with_total(
                &conjunction,
                request.sort(),
                request.offset(),
                u64::from(request.page_size()),
            )
            .await?;

        Ok(Page::new(content, request, total))
    }

    /// Content query followed by an independent count query
    pub async fn search_page_complex(
        &self,
        condition: &MemberSearchCondition,
        request: &PageRequest,
    ) -> Result<Page<MemberTeamDto>, DomainError> {
        request.ensure_max_size(self.config.max_page_size)?;
        let conjunction = condition.to_conjunction();

        let content = self
            .repository
            .fetch_slice(
                &conjunction,
                request.sort(),
                request.offset(),
                u64::from(request.page_size()),
            )
            .await?;
        let total = self.repository.count(&conjunction).await?;

        Ok(Page::new(content, request, total))
    }

    /// Peeks one row past the page and skips the count query whenever the
    /// page itself proves the total
    pub async fn search_page_optimized(
        &self,
        condition: &MemberSearchCondition,
        request: &PageRequest,
    ) -> Result<Page<MemberTeamDto>, DomainError> {
        request.ensure_max_size(self.config.max_page_size)?;
        let conjunction = condition.to_conjunction();
        let page_size = usize::try_from(request.page_size())
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let mut content = self
            .repository
            .fetch_slice(
                &conjunction,
                request.sort(),
                request.offset(),
                u64::from(request.page_size()) + 1,
            )
            .await?;

        let has_more = content.len() > page_size;
        content.truncate(page_size);

        let hint = TotalHint::new(request, content.len(), has_more);
        let total = match resolve_total(&hint) {
            TotalCount::Known(total) => {
                debug!(total, "Count query skipped");
                total
            }
            TotalCount::NeedsCount => self.repository.count(&conjunction).await?,
        };

        Ok(Page::new(content, request, total))
    }
}

#[async_trait]
impl<R: MemberQueryRepository + 'static> MemberSearchServiceTrait for MemberSearchService<R> {
    #[instrument(skip(self, condition, sort))]
    async fn search(
        &self,
        condition: &MemberSearchCondition,
        sort: &Sort,
    ) -> Result<Vec<MemberTeamDto>, DomainError> {
        let rows = self
            .repository
            .search(&condition.to_conjunction(), sort)
            .await?;

        debug!(rows = rows.len(), "Member search completed");
        Ok(rows)
    }

    #[instrument(
        skip(self, condition, request, strategy),
        fields(page = request.page_number(), size = request.page_size(), strategy = %strategy)
    )]
    async fn search_page(
        &self,
        condition: &MemberSearchCondition,
        request: &PageRequest,
        strategy: PaginationStrategy,
    ) -> Result<Page<MemberTeamDto>, DomainError> {
        let page = match strategy {
            PaginationStrategy::Simple => self.search_page_simple(condition, request).await?,
            PaginationStrategy::Complex => self.search_page_complex(condition, request).await?,
            PaginationStrategy::Optimized => {
                self.search_page_optimized(condition, request).await?
            }
        };

        debug!(
            rows = page.content().len(),
            total = page.total(),
            "Member page loaded"
        );
        Ok(page)
    }

    async fn member_statistics(
        &self,
        condition: &MemberSearchCondition,
    ) -> Result<AgeStatistics, DomainError> {
        self.repository
            .age_statistics(&condition.to_conjunction())
            .await
    }

    async fn team_statistics(&self) -> Result<Vec<TeamAgeStatistics>, DomainError> {
        self.repository.team_statistics().await
    }

    #[instrument(skip(self, conjunction))]
    async fn bulk_rename(
        &self,
        conjunction: &Conjunction,
        username: &str,
    ) -> Result<u64, DomainError> {
        conjunction.ensure_member_only()?;
        let affected = self.repository.bulk_rename(conjunction, username).await?;

        info!(affected, "Members renamed");
        Ok(affected)
    }

    #[instrument(skip(self, conjunction))]
    async fn bulk_add_age(&self, conjunction: &Conjunction, delta: i32) -> Result<u64, DomainError> {
        conjunction.ensure_member_only()?;
        let affected = self.repository.bulk_add_age(conjunction, delta).await?;

        info!(affected, "Member ages updated");
        Ok(affected)
    }

    #[instrument(skip(self, conjunction))]
    async fn bulk_delete(&self, conjunction: &Conjunction) -> Result<u64, DomainError> {
        conjunction.ensure_member_only()?;
        let affected = self.repository.bulk_delete(conjunction).await?;

        info!(affected, "Members deleted");
        Ok(affected)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        self.repository.count(&Conjunction::all()).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::member::MemberId;
    use crate::domain::search::{MockMemberQueryRepository, Predicate};

    fn rows(ids: std::ops::RangeInclusive<i64>) -> Vec<MemberTeamDto> {
        ids.map(|id| {
            MemberTeamDto::new(
                MemberId::new(id).unwrap(),
                Some(format!("member{}", id)),
                id as i32,
                None,
                None,
            )
        })
        .collect()
    }

    fn service(mock: MockMemberQueryRepository) -> MemberSearchService<MockMemberQueryRepository> {
        MemberSearchService::new(Arc::new(mock))
    }

    fn request(page: i64, size: i64) -> PageRequest {
        PageRequest::new(page, size).unwrap()
    }

    #[tokio::test]
    async fn test_optimized_skips_count_on_short_first_page() {
        let mut mock = MockMemberQueryRepository::new();
        mock.expect_fetch_slice()
            .withf(|_, _, offset, limit| *offset == 0 && *limit == 11)
            .times(1)
            .returning(|_, _, _, _| Ok(rows(1..=4)));
        mock.expect_count().times(0);

        let page = service(mock)
            .search_page_optimized(&MemberSearchCondition::new(), &request(0, 10))
            .await
            .unwrap();

        assert_eq!(page.content().len(), 4);
        assert_eq!(page.total(), 4);
    }

    #[tokio::test]
    async fn test_optimized_skips_count_on_last_page() {
        let mut mock = MockMemberQueryRepository::new();
        mock.expect_fetch_slice()
            .withf(|_, _, offset, limit| *offset == 6 && *limit == 4)
            .returning(|_, _, _, _| Ok(rows(7..=8)));
        mock.expect_count().times(0);

        let page = service(mock)
            .search_page_optimized(&MemberSearchCondition::new(), &request(2, 3))
            .await
            .unwrap();

        assert_eq!(page.total(), 8);
        assert!(page.is_last());
    }

    #[tokio::test]
    async fn test_optimized_counts_when_more_rows_exist() {
        let mut mock = MockMemberQueryRepository::new();
        mock.expect_fetch_slice()
            .returning(|_, _, _, _| Ok(rows(1..=4)));
        mock.expect_count().times(1).returning(|_| Ok(5));

        let page = service(mock)
            .search_page_optimized(&MemberSearchCondition::new(), &request(0, 3))
            .await
            .unwrap();

        // The peeked row is not part of the page.
        assert_eq!(page.content().len(), 3);
        assert_eq!(page.content()[2].member_id.value(), 3);
        assert_eq!(page.total(), 5);
        assert_eq!(page.total_pages(), 2);
    }

    #[tokio::test]
    async fn test_optimized_counts_for_empty_page_past_end() {
        let mut mock = MockMemberQueryRepository::new();
        mock.expect_fetch_slice().returning(|_, _, _, _| Ok(Vec::new()));
        mock.expect_count().times(1).returning(|_| Ok(5));

        let page = service(mock)
            .search_page_optimized(&MemberSearchCondition::new(), &request(4, 3))
            .await
            .unwrap();

        assert!(page.content().is_empty());
        assert_eq!(page.total(), 5);
    }

    #[tokio::test]
    async fn test_complex_always_counts() {
        let mut mock = MockMemberQueryRepository::new();
        mock.expect_fetch_slice()
            .withf(|conjunction, _, offset, limit| {
                conjunction.predicates() == [Predicate::AgeGoe(20)] && *offset == 0 && *limit == 10
            })
            .returning(|_, _, _, _| Ok(rows(20..=21)));
        mock.expect_count().times(1).returning(|_| Ok(2));

        let condition = MemberSearchCondition::new().with_age_goe(20);
        let page = service(mock)
            .search_page_complex(&condition, &request(0, 10))
            .await
            .unwrap();

        assert_eq!(page.total(), 2);
    }

    #[tokio::test]
    async fn test_complex_reports_count_unchanged() {
        let mut mock = MockMemberQueryRepository::new();
        mock.expect_fetch_slice()
            .returning(|_, _, _, _| Ok(rows(3..=4)));
        // rows deleted between the content and count queries
        mock.expect_count().times(1).returning(|_| Ok(1));

        let page = service(mock)
            .search_page_complex(&MemberSearchCondition::new(), &request(1, 2))
            .await
            .unwrap();

        assert_eq!(page.content().len(), 2);
        assert_eq!(page.total(), 1);
    }

    #[tokio::test]
    async fn test_simple_uses_single_query() {
        let mut mock = MockMemberQueryRepository::new();
        mock.expect_fetch_slice_with_total()
            .withf(|_, _, offset, limit| *offset == 5 && *limit == 5)
            .times(1)
            .returning(|_, _, _, _| Ok((rows(6..=10), 100)));
        mock.expect_fetch_slice().times(0);
        mock.expect_count().times(0);

        let page = service(mock)
            .search_page_simple(&MemberSearchCondition::new(), &request(1, 5))
            .await
            .unwrap();

        assert_eq!(page.total(), 100);
        assert_eq!(page.total_pages(), 20);
    }

    #[tokio::test]
    async fn test_oversized_page_rejected_before_query() {
        let mut mock = MockMemberQueryRepository::new();
        mock.expect_fetch_slice().times(0);
        mock.expect_fetch_slice_with_total().times(0);
        mock.expect_count().times(0);

        let service = MemberSearchService::with_config(
            Arc::new(mock),
            PaginationConfig {
                default_page_size: 10,
                max_page_size: 50,
            },
        );
        let condition = MemberSearchCondition::new();

        for strategy in [
            PaginationStrategy::Simple,
            PaginationStrategy::Complex,
            PaginationStrategy::Optimized,
        ] {
            let result = service
                .search_page(&condition, &request(0, 51), strategy)
                .await;
            assert!(matches!(result, Err(DomainError::Validation { .. })));
        }
    }

    #[tokio::test]
    async fn test_storage_errors_propagate() {
        let mut mock = MockMemberQueryRepository::new();
        mock.expect_fetch_slice()
            .returning(|_, _, _, _| Err(DomainError::storage("connection reset")));

        let result = service(mock)
            .search_page(
                &MemberSearchCondition::new(),
                &request(0, 10),
                PaginationStrategy::Optimized,
            )
            .await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_bulk_rejects_team_predicates_before_repository() {
        let mut mock = MockMemberQueryRepository::new();
        mock.expect_bulk_delete().times(0);

        let conjunction = Conjunction::from(Predicate::TeamNameEq("teamA".to_string()));
        let result = service(mock).bulk_delete(&conjunction).await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_bulk_delete_reports_affected_rows() {
        let mut mock = MockMemberQueryRepository::new();
        mock.expect_bulk_delete()
            .withf(|conjunction| conjunction.predicates() == [Predicate::AgeGt(18)])
            .returning(|_| Ok(3));

        let affected = service(mock)
            .bulk_delete(&Conjunction::from(Predicate::AgeGt(18)))
            .await
            .unwrap();

        assert_eq!(affected, 3);
    }
}

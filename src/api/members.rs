//! Member search endpoints
//!
//! `/v1/members` lists every match; `/v2`, `/v3` and `/v4` return pages
//! using the simple, complex and optimized strategies.

use std::fmt::Display;
use std::str::FromStr;

use axum::{extract::State, Json};
use serde::{de, Deserialize, Deserializer, Serialize};
use tracing::debug;
use validator::Validate;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Query};
use crate::config::PaginationConfig;
use crate::domain::search::{MemberSearchCondition, MemberTeamDto, Page, PageRequest, Sort};
use crate::domain::DomainError;
use crate::infrastructure::search::PaginationStrategy;

/// Query parameters shared by the member endpoints
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MemberSearchParams {
    #[validate(length(max = 100))]
    pub username: Option<String>,
    #[validate(length(max = 100))]
    pub team_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub age_goe: Option<i32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub age_loe: Option<i32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(range(min = 0))]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(range(min = 1))]
    pub size: Option<i64>,
    /// `key[:asc|desc][:nulls_first|nulls_last]`, comma separated
    pub sort: Option<String>,
}

/// `ageGoe=` binds to `None`, like an omitted parameter
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;

    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

impl MemberSearchParams {
    pub fn condition(&self) -> MemberSearchCondition {
        MemberSearchCondition {
            username: self.username.clone(),
            team_name: self.team_name.clone(),
            age_goe: self.age_goe,
            age_loe: self.age_loe,
        }
    }

    pub fn sort(&self) -> Result<Sort, DomainError> {
        self.sort
            .as_deref()
            .map_or_else(|| Ok(Sort::unsorted()), Sort::parse)
    }

    pub fn page_request(&self, pagination: &PaginationConfig) -> Result<PageRequest, DomainError> {
        let page = self.page.unwrap_or(0);
        let size = self
            .size
            .unwrap_or_else(|| i64::from(pagination.default_page_size));

        Ok(PageRequest::new(page, size)?.with_sort(self.sort()?))
    }
}

/// JSON shape of a page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub total: u64,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u64,
    pub first: bool,
    pub last: bool,
}

impl<T> From<Page<T>> for PageResponse<T> {
    fn from(page: Page<T>) -> Self {
        let total = page.total();
        let page_number = page.page_number();
        let page_size = page.page_size();
        let total_pages = page.total_pages();
        let first = page.is_first();
        let last = page.is_last();

        Self {
            content: page.into_content(),
            total,
            page_number,
            page_size,
            total_pages,
            first,
            last,
        }
    }
}

pub(crate) fn validate_params(params: &MemberSearchParams) -> Result<(), ApiError> {
    params.validate().map_err(|e| {
        let param = e.field_errors().keys().next().map(|k| k.to_string());
        let error = ApiError::bad_request(format!("Invalid query parameters: {}", e));

        match param {
            Some(param) => error.with_param(param),
            None => error,
        }
    })
}

/// GET /v1/members
pub async fn list_members(
    State(state): State<AppState>,
    Query(params): Query<MemberSearchParams>,
) -> Result<Json<Vec<MemberTeamDto>>, ApiError> {
    validate_params(&params)?;
    debug!(?params, "Listing members");

    let sort = params.sort()?;
    let rows = state
        .search_service
        .search(&params.condition(), &sort)
        .await?;

    Ok(Json(rows))
}

async fn search_page(
    state: &AppState,
    params: &MemberSearchParams,
    strategy: PaginationStrategy,
) -> Result<Json<PageResponse<MemberTeamDto>>, ApiError> {
    validate_params(params)?;
    debug!(?params, %strategy, "Searching member page");

    let request = params.page_request(&state.pagination)?;
    let page = state
        .search_service
        .search_page(&params.condition(), &request, strategy)
        .await?;

    Ok(Json(page.into()))
}

/// GET /v2/members
pub async fn search_members_simple(
    State(state): State<AppState>,
    Query(params): Query<MemberSearchParams>,
) -> Result<Json<PageResponse<MemberTeamDto>>, ApiError> {
    search_page(&state, &params, PaginationStrategy::Simple).await
}

/// GET /v3/members
pub async fn search_members_complex(
    State(state): State<AppState>,
    Query(params): Query<MemberSearchParams>,
) -> Result<Json<PageResponse<MemberTeamDto>>, ApiError> {
    search_page(&state, &params, PaginationStrategy::Complex).await
}

/// GET /v4/members
pub async fn search_members_optimized(
    State(state): State<AppState>,
    Query(params): Query<MemberSearchParams>,
) -> Result<Json<PageResponse<MemberTeamDto>>, ApiError> {
    search_page(&state, &params, PaginationStrategy::Optimized).await
}

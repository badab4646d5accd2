//! Application state for shared services

use std::sync::Arc;

use crate::config::PaginationConfig;
use crate::infrastructure::search::MemberSearchServiceTrait;
use crate::infrastructure::storage::Repositories;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub search_service: Arc<dyn MemberSearchServiceTrait>,
    pub pagination: PaginationConfig,
}

impl AppState {
    pub fn new(search_service: Arc<dyn MemberSearchServiceTrait>, pagination: PaginationConfig) -> Self {
        Self {
            search_service,
            pagination,
        }
    }

    pub fn from_repositories(repositories: &Repositories, pagination: PaginationConfig) -> Self {
        Self::new(repositories.search.clone(), pagination)
    }
}

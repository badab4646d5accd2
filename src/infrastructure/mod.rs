//! Infrastructure layer - Storage backends, search service and logging

pub mod logging;
pub mod member;
pub mod search;
pub mod seed;
pub mod storage;
pub mod team;

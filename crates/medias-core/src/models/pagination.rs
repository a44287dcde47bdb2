use serde::Serialize;

use crate::error::AppError;

pub const DEFAULT_PAGE_LIMIT: i64 = 50;
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Raw pagination input; `limit == 0` means "use the default".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationParams {
    pub limit: i64,
    pub offset: i64,
}

/// Pagination after validation and defaulting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl PaginationParams {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }

    pub fn resolve(self) -> Result<Page, AppError> {
        if self.limit < 0 {
            return Err(AppError::invalid_entity(
                "invalid limit",
                "limit cannot be negative",
            ));
        }
        if self.offset < 0 {
            return Err(AppError::invalid_entity(
                "invalid offset",
                "offset cannot be negative",
            ));
        }
        if self.limit > MAX_PAGE_LIMIT {
            return Err(AppError::invalid_entity(
                "invalid limit",
                format!("limit cannot exceed {}", MAX_PAGE_LIMIT),
            ));
        }
        let limit = if self.limit == 0 {
            DEFAULT_PAGE_LIMIT
        } else {
            self.limit
        };
        Ok(Page {
            limit,
            offset: self.offset,
        })
    }
}

/// One page of items plus the total count of the underlying set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

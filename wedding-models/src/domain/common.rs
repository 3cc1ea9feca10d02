use serde::{Deserialize, Serialize};
use serde_aux::prelude::*;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    #[validate(required(message = "page is required"), range(min = 1))]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    #[validate(
        required(message = "pageSize is required"),
        range(min = 1, max = 500, message = "pageSize must be between 1 and 500")
    )]
    pub page_size: Option<u32>,
}

impl PageParams {
    /// Zero-based page index and page size, falling back to the first page of 20.
    pub fn resolve(&self) -> (u64, u64) {
        let page = self.page.unwrap_or(1).max(1);
        let page_size = self.page_size.unwrap_or(20).max(1);
        (u64::from(page - 1), u64::from(page_size))
    }
}

/// Request body shared by every batch delete route
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BatchDeletePayload {
    #[validate(length(min = 1, message = "ids is required"))]
    pub ids: Vec<i32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub pages: u32,
    pub records: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> PageResult<T> {
    pub fn new(records: Vec<T>, total: u64, page: u32, page_size: u32) -> Self {
        let pages = if page_size == 0 {
            0
        } else {
            total.div_ceil(u64::from(page_size)) as u32
        };
        Self {
            pages,
            records,
            total,
            page,
            page_size,
        }
    }
}

use serde::{Deserialize, Serialize};
use crate::models::restaurant::Restaurant;

pub const PAGE_SIZE: usize = 20;

/// One page of search results. Serialized with the camelCase keys the web client reads.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub restaurants: Vec<Restaurant>,
    pub total_pages: u64,
    pub current_page: u32,
}

/// `ceil(total / PAGE_SIZE)`, so an empty result has zero pages.
pub fn total_pages(total: u64) -> u64 {
    total.div_ceil(PAGE_SIZE as u64)
}

/// Offset of the first record on a 1-based page.
pub fn page_offset(page: u32) -> usize {
    (page.max(1) as usize - 1) * PAGE_SIZE
}

use std::sync::Arc;
use tracing::debug;
use crate::models::page::{page_offset, total_pages, PageResult, PAGE_SIZE};
use crate::models::restaurant::Restaurant;
use crate::models::search_query::SearchQuery;
use crate::repositories::{RestaurantRepository, Window};

/// Filters and pages the restaurant directory.
///
/// Without a distance filter, counting and paging are delegated to the repository.
/// With one, every match is loaded and the distance check runs in memory before
/// paging. Either way a page is a slice of the repository's own order, so page
/// boundaries are only stable if the repository orders deterministically.
pub struct RestaurantSearchService {
    repo: Arc<dyn RestaurantRepository>,
}

impl RestaurantSearchService {
    pub fn new(repo: Arc<dyn RestaurantRepository>) -> Self {
        Self { repo }
    }

    pub async fn search(&self, query: &SearchQuery) -> anyhow::Result<PageResult> {
        let offset = page_offset(query.page);

        let (restaurants, total) = match &query.distance {
            None => {
                let total = self.repo.count_restaurants(&query.filter).await?;
                let window = Window { offset, limit: PAGE_SIZE };
                let restaurants = if (offset as u64) < total {
                    self.repo.find_restaurants(&query.filter, Some(window)).await?
                } else {
                    Vec::new()
                };
                (restaurants, total)
            }
            Some(distance) => {
                let nearby: Vec<Restaurant> = self
                    .repo
                    .find_restaurants(&query.filter, None)
                    .await?
                    .into_iter()
                    .filter(|restaurant| distance.matches(restaurant))
                    .collect();
                let total = nearby.len() as u64;
                let restaurants = nearby.into_iter().skip(offset).take(PAGE_SIZE).collect();
                (restaurants, total)
            }
        };

        debug!(
            "Search {:?} matched {} restaurants, returning {} on page {}",
            query.filter, total, restaurants.len(), query.page
        );

        Ok(PageResult {
            restaurants,
            total_pages: total_pages(total),
            current_page: query.page,
        })
    }

    pub async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Restaurant>> {
        self.repo.find_restaurant_by_id(id).await
    }

    /// Distinct cuisine strings, as stored.
    pub async fn list_cuisines(&self) -> anyhow::Result<Vec<String>> {
        self.repo.distinct_cuisines().await
    }
}

use async_trait::async_trait;
use crate::models::restaurant::Restaurant;
use crate::models::search_query::RestaurantFilter;
use crate::models::user::{NewUser, User};

pub mod postgres_repo;
#[cfg(test)]
pub mod memory_repo;

/// A slice of a result set, in records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub offset: usize,
    pub limit: usize,
}

/// Read access to the restaurant directory.
///
/// Implementations must return matches in the same order for identical
/// filters, pagination relies on it.
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    /// Restaurants matching `filter`, restricted to `window` when given.
    async fn find_restaurants(
        &self,
        filter: &RestaurantFilter,
        window: Option<Window>,
    ) -> anyhow::Result<Vec<Restaurant>>;

    async fn count_restaurants(&self, filter: &RestaurantFilter) -> anyhow::Result<u64>;

    async fn find_restaurant_by_id(&self, id: i32) -> anyhow::Result<Option<Restaurant>>;

    /// Up to `limit` restaurant names containing `fragment`, case-insensitively.
    async fn names_containing(&self, fragment: &str, limit: usize) -> anyhow::Result<Vec<String>>;

    /// Up to `limit` distinct, non-null cities containing `fragment`, case-insensitively.
    async fn cities_containing(&self, fragment: &str, limit: usize) -> anyhow::Result<Vec<String>>;

    async fn distinct_cuisines(&self) -> anyhow::Result<Vec<String>>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;

    /// Inserts the user. Returns `Ok(None)` if the email is already taken.
    async fn create_user(&self, user: NewUser) -> anyhow::Result<Option<User>>;
}

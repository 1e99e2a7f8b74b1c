use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use anyhow::anyhow;
use async_trait::async_trait;
use time::OffsetDateTime;
use crate::models::restaurant::Restaurant;
use crate::models::search_query::{contains_ignore_case, RestaurantFilter};
use crate::models::user::{NewUser, User};
use crate::repositories::{RestaurantRepository, UserRepository, Window};

/// In-memory stand-in for the postgres repository. Returns records in insertion order.
#[derive(Default)]
pub struct InMemoryRepo {
    restaurants: Vec<Restaurant>,
    users: Mutex<Vec<User>>,
    failing: bool,
    calls: AtomicUsize,
}

impl InMemoryRepo {
    pub fn with_restaurants(restaurants: Vec<Restaurant>) -> Self {
        Self {
            restaurants,
            ..Self::default()
        }
    }

    /// Every call fails as if the database were unreachable.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Number of repository calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(anyhow!("connection refused"));
        }
        Ok(())
    }

    fn matching<'a>(&'a self, filter: &'a RestaurantFilter) -> impl Iterator<Item = &'a Restaurant> + 'a {
        self.restaurants.iter().filter(move |restaurant| filter.matches(restaurant))
    }
}

#[async_trait]
impl RestaurantRepository for InMemoryRepo {
    async fn find_restaurants(
        &self,
        filter: &RestaurantFilter,
        window: Option<Window>,
    ) -> anyhow::Result<Vec<Restaurant>> {
        self.enter()?;
        let matches = self.matching(filter).cloned();
        Ok(match window {
            Some(window) => matches.skip(window.offset).take(window.limit).collect(),
            None => matches.collect(),
        })
    }

    async fn count_restaurants(&self, filter: &RestaurantFilter) -> anyhow::Result<u64> {
        self.enter()?;
        Ok(self.matching(filter).count() as u64)
    }

    async fn find_restaurant_by_id(&self, id: i32) -> anyhow::Result<Option<Restaurant>> {
        self.enter()?;
        Ok(self.restaurants.iter().find(|restaurant| restaurant.id == id).cloned())
    }

    async fn names_containing(&self, fragment: &str, limit: usize) -> anyhow::Result<Vec<String>> {
        self.enter()?;
        Ok(self
            .restaurants
            .iter()
            .filter(|restaurant| contains_ignore_case(Some(restaurant.name.as_str()), fragment))
            .take(limit)
            .map(|restaurant| restaurant.name.clone())
            .collect())
    }

    async fn cities_containing(&self, fragment: &str, limit: usize) -> anyhow::Result<Vec<String>> {
        self.enter()?;
        let mut cities: Vec<String> = Vec::new();
        for city in self.restaurants.iter().filter_map(|restaurant| restaurant.city.as_ref()) {
            if cities.len() == limit {
                break;
            }
            if contains_ignore_case(Some(city.as_str()), fragment) && !cities.contains(city) {
                cities.push(city.clone());
            }
        }
        Ok(cities)
    }

    async fn distinct_cuisines(&self) -> anyhow::Result<Vec<String>> {
        self.enter()?;
        let mut cuisines: Vec<String> = self
            .restaurants
            .iter()
            .filter_map(|restaurant| restaurant.cuisines.clone())
            .collect();
        cuisines.sort();
        cuisines.dedup();
        Ok(cuisines)
    }
}

#[async_trait]
impl UserRepository for InMemoryRepo {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        self.enter()?;
        let users = self.users.lock().map_err(|_| anyhow!("user store poisoned"))?;
        Ok(users.iter().find(|user| user.email == email).cloned())
    }

    async fn create_user(&self, user: NewUser) -> anyhow::Result<Option<User>> {
        self.enter()?;
        let mut users = self.users.lock().map_err(|_| anyhow!("user store poisoned"))?;
        if users.iter().any(|existing| existing.email == user.email) {
            return Ok(None);
        }

        let created = User {
            id: users.len() as i64 + 1,
            name: user.name,
            email: user.email,
            hashed_password: user.hashed_password,
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(created.clone());
        Ok(Some(created))
    }
}

use std::time::Duration;
use anyhow::Context;
use async_trait::async_trait;
use bb8_postgres::bb8::{Pool, PooledConnection};
use bb8_postgres::PostgresConnectionManager;
use bb8_postgres::tokio_postgres::{NoTls, Row};
use bb8_postgres::tokio_postgres::types::ToSql;
use tracing::{debug, info};
use crate::models::restaurant::Restaurant;
use crate::models::search_query::RestaurantFilter;
use crate::models::user::{NewUser, User};
use crate::repositories::{RestaurantRepository, UserRepository, Window};

pub type PostgresPool = Pool<PostgresConnectionManager<NoTls>>;

const RESTAURANT_COLUMNS: &str = "id, name, city, address, locality, cuisines, average_cost, \
    latitude, longitude, aggregate_rating, votes";

const USER_COLUMNS: &str = "id, name, email, hashed_password, created_at";

/// Builds the process-wide connection pool. Connections are opened lazily.
pub async fn build_pool(
    database_url: &str,
    max_size: u32,
    connection_timeout: Duration,
) -> anyhow::Result<PostgresPool> {
    let manager = PostgresConnectionManager::new_from_stringlike(database_url, NoTls)
        .context("Invalid postgres connection string")?;

    let pool = Pool::builder()
        .max_size(max_size)
        .connection_timeout(connection_timeout)
        .build(manager)
        .await
        .context("Failed to build postgres connection pool")?;

    info!("Postgres pool ready with max size: {}", max_size);
    Ok(pool)
}

pub struct PostgresConnectionRepo {
    postgres_connection: PostgresPool,
}

impl PostgresConnectionRepo {
    pub fn new(
        postgres_connection: PostgresPool,
    ) -> Self {
        Self {
            postgres_connection
        }
    }

    async fn get_postgres_connection(
        &self,
    ) -> anyhow::Result<PooledConnection<'_, PostgresConnectionManager<NoTls>>> {
        self.postgres_connection
            .get()
            .await
            .context("Failed to retrieve a valid connection from postgres pool")
    }
}

#[async_trait]
impl RestaurantRepository for PostgresConnectionRepo {
    async fn find_restaurants(
        &self,
        filter: &RestaurantFilter,
        window: Option<Window>,
    ) -> anyhow::Result<Vec<Restaurant>> {
        let conn = self.get_postgres_connection().await?;
        let mut clause = WhereClause::from_filter(filter);
        let mut stmt = format!(
            "SELECT {} FROM restaurants{} ORDER BY id",
            RESTAURANT_COLUMNS,
            clause.sql(),
        );
        if let Some(window) = window {
            let limit = clause.bind(window.limit as i64);
            let offset = clause.bind(window.offset as i64);
            stmt.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset));
        }
        debug!("Querying restaurants with: {}", stmt);

        let rows = conn
            .query(&stmt, &clause.params())
            .await
            .context("Failed to query restaurants")?;

        rows.iter()
            .map(parse_row_into_restaurant)
            .collect()
    }

    async fn count_restaurants(&self, filter: &RestaurantFilter) -> anyhow::Result<u64> {
        let conn = self.get_postgres_connection().await?;
        let clause = WhereClause::from_filter(filter);
        let stmt = format!("SELECT COUNT(*) FROM restaurants{}", clause.sql());

        let row = conn
            .query_one(&stmt, &clause.params())
            .await
            .context("Failed to count restaurants")?;

        let count: i64 = row.try_get(0)?;
        Ok(count.max(0) as u64)
    }

    async fn find_restaurant_by_id(&self, id: i32) -> anyhow::Result<Option<Restaurant>> {
        let conn = self.get_postgres_connection().await?;
        let stmt = format!("SELECT {} FROM restaurants WHERE id = $1", RESTAURANT_COLUMNS);

        let row = conn
            .query_opt(&stmt, &[&id])
            .await
            .with_context(|| format!("Failed to retrieve restaurant with id: {}", id))?;

        row.as_ref().map(parse_row_into_restaurant).transpose()
    }

    async fn names_containing(&self, fragment: &str, limit: usize) -> anyhow::Result<Vec<String>> {
        let conn = self.get_postgres_connection().await?;
        let pattern = like_pattern(fragment);
        let limit = limit as i64;

        let rows = conn
            .query(
                "SELECT name FROM restaurants WHERE name ILIKE $1 ORDER BY id LIMIT $2",
                &[&pattern, &limit],
            )
            .await
            .context("Failed to query restaurant names")?;

        rows.iter()
            .map(|row| row.try_get::<_, String>("name").map_err(Into::into))
            .collect()
    }

    async fn cities_containing(&self, fragment: &str, limit: usize) -> anyhow::Result<Vec<String>> {
        let conn = self.get_postgres_connection().await?;
        let pattern = like_pattern(fragment);
        let limit = limit as i64;

        // distinct cities, in the order their first restaurant appears
        let rows = conn
            .query(
                "SELECT city FROM ( \
                    SELECT city, MIN(id) AS first_id FROM restaurants \
                    WHERE city IS NOT NULL AND city ILIKE $1 \
                    GROUP BY city \
                ) AS cities ORDER BY first_id LIMIT $2",
                &[&pattern, &limit],
            )
            .await
            .context("Failed to query restaurant cities")?;

        rows.iter()
            .map(|row| row.try_get::<_, String>("city").map_err(Into::into))
            .collect()
    }

    async fn distinct_cuisines(&self) -> anyhow::Result<Vec<String>> {
        let conn = self.get_postgres_connection().await?;
        let rows = conn
            .query(
                "SELECT DISTINCT cuisines FROM restaurants WHERE cuisines IS NOT NULL ORDER BY cuisines",
                &[],
            )
            .await
            .context("Failed to query cuisines")?;

        rows.iter()
            .map(|row| row.try_get::<_, String>("cuisines").map_err(Into::into))
            .collect()
    }
}

#[async_trait]
impl UserRepository for PostgresConnectionRepo {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let conn = self.get_postgres_connection().await?;
        let stmt = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);

        let row = conn
            .query_opt(&stmt, &[&email])
            .await
            .context("Failed to look up user by email")?;

        row.as_ref().map(parse_row_into_user).transpose()
    }

    async fn create_user(&self, user: NewUser) -> anyhow::Result<Option<User>> {
        let conn = self.get_postgres_connection().await?;
        let stmt = format!(
            "INSERT INTO users (name, email, hashed_password) VALUES ($1, $2, $3) \
            ON CONFLICT (email) DO NOTHING RETURNING {}",
            USER_COLUMNS,
        );

        let row = conn
            .query_opt(&stmt, &[&user.name, &user.email, &user.hashed_password])
            .await
            .with_context(|| format!("Failed to create user: {}", user.email))?;

        row.as_ref().map(parse_row_into_user).transpose()
    }
}

/// Positional SQL conditions for a `RestaurantFilter`, ANDed together.
struct WhereClause {
    conditions: Vec<String>,
    params: Vec<Box<dyn ToSql + Sync + Send>>,
}

impl WhereClause {
    fn from_filter(filter: &RestaurantFilter) -> Self {
        let mut clause = WhereClause {
            conditions: Vec::new(),
            params: Vec::new(),
        };

        if let Some(cuisine) = &filter.cuisine {
            let p = clause.bind(like_pattern(cuisine));
            clause.conditions.push(format!("cuisines ILIKE {}", p));
        }
        if let Some(range) = &filter.price_range {
            let min = clause.bind(range.min);
            let max = clause.bind(range.max);
            clause.conditions.push(format!("average_cost BETWEEN {} AND {}", min, max));
        }
        if let Some(city) = &filter.city {
            let p = clause.bind(like_pattern(city));
            clause.conditions.push(format!("city ILIKE {}", p));
        }
        if let Some(term) = &filter.search_term {
            let p = clause.bind(like_pattern(term));
            clause.conditions.push(format!("(city ILIKE {} OR name ILIKE {})", p, p));
        }

        clause
    }

    /// Registers a parameter and returns its placeholder.
    fn bind(&mut self, value: impl ToSql + Sync + Send + 'static) -> String {
        self.params.push(Box::new(value));
        format!("${}", self.params.len())
    }

    fn sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|param| param.as_ref() as &(dyn ToSql + Sync))
            .collect()
    }
}

/// `%fragment%` with LIKE wildcards in the fragment escaped.
fn like_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for ch in fragment.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn parse_row_into_restaurant(
    row: &Row,
) -> anyhow::Result<Restaurant> {
    Ok(Restaurant {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        city: row.try_get("city")?,
        address: row.try_get("address")?,
        locality: row.try_get("locality")?,
        cuisines: row.try_get("cuisines")?,
        average_cost: row.try_get("average_cost")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        aggregate_rating: row.try_get("aggregate_rating")?,
        votes: row.try_get("votes")?,
    })
}

fn parse_row_into_user(
    row: &Row,
) -> anyhow::Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        hashed_password: row.try_get("hashed_password")?,
        created_at: row.try_get("created_at")?,
    })
}

//! Cafe repository for database operations.
//!
//! Queries are built at runtime with `sqlx::query_as` and `QueryBuilder`;
//! search conditions come from the typed [`Predicate`] tree.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::instrument;

use cafe_map_core::{Cafe, CafeId, NewCafe, Predicate};

use super::RepositoryError;
use super::predicate::push_predicate;

const SELECT_CAFE: &str = "SELECT id, name, map_url, img_url, location, seats, \
     has_toilet, has_wifi, has_sockets, can_take_calls, coffee_price, lat, lon \
     FROM cafe";

/// Repository for cafe database operations.
pub struct CafeRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CafeRepository<'a> {
    /// Create a new cafe repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a cafe by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: CafeId) -> Result<Option<Cafe>, RepositoryError> {
        let cafe = sqlx::query_as::<_, Cafe>(&format!("{SELECT_CAFE} WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(cafe)
    }

    /// Get the first cafe with exactly this name.
    ///
    /// Names are not unique; the oldest record wins.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Cafe>, RepositoryError> {
        let cafe = sqlx::query_as::<_, Cafe>(&format!(
            "{SELECT_CAFE} WHERE name = ? ORDER BY id LIMIT 1"
        ))
        .bind(name)
        .fetch_optional(self.pool)
        .await?;
        Ok(cafe)
    }

    /// List every cafe in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Cafe>, RepositoryError> {
        let cafes = sqlx::query_as::<_, Cafe>(&format!("{SELECT_CAFE} ORDER BY id"))
            .fetch_all(self.pool)
            .await?;
        Ok(cafes)
    }

    /// Count stored cafes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cafe")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// List cafes matching `predicate`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn find_by_predicate(
        &self,
        predicate: &Predicate,
    ) -> Result<Vec<Cafe>, RepositoryError> {
        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_CAFE);
        builder.push(" WHERE ");
        push_predicate(&mut builder, predicate);
        builder.push(" ORDER BY id");

        let cafes = builder
            .build_query_as::<Cafe>()
            .fetch_all(self.pool)
            .await?;
        Ok(cafes)
    }

    /// Insert a cafe and return the stored record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, cafe), fields(name = %cafe.name))]
    pub async fn insert(&self, cafe: &NewCafe) -> Result<Cafe, RepositoryError> {
        let stored = sqlx::query_as::<_, Cafe>(
            r"
            INSERT INTO cafe (name, map_url, img_url, location, seats,
                              has_toilet, has_wifi, has_sockets, can_take_calls,
                              coffee_price, lat, lon)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, name, map_url, img_url, location, seats,
                      has_toilet, has_wifi, has_sockets, can_take_calls,
                      coffee_price, lat, lon
            ",
        )
        .bind(&cafe.name)
        .bind(&cafe.map_url)
        .bind(&cafe.img_url)
        .bind(&cafe.location)
        .bind(&cafe.seats)
        .bind(cafe.amenities.has_toilet)
        .bind(cafe.amenities.has_wifi)
        .bind(cafe.amenities.has_sockets)
        .bind(cafe.amenities.can_take_calls)
        .bind(&cafe.coffee_price)
        .bind(cafe.lat)
        .bind(cafe.lon)
        .fetch_one(self.pool)
        .await?;

        tracing::info!(cafe_id = %stored.id, "Cafe inserted");
        Ok(stored)
    }

    /// Set the coffee price of a cafe.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no cafe has this ID.
    /// Returns `RepositoryError::Database` if the update fails.
    #[instrument(skip(self))]
    pub async fn update_price(&self, id: CafeId, price: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE cafe SET coffee_price = ? WHERE id = ?")
            .bind(price)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a cafe.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no cafe has this ID.
    /// Returns `RepositoryError::Database` if the delete fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: CafeId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cafe WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tracing::info!(cafe_id = %id, "Cafe deleted");
        Ok(())
    }
}

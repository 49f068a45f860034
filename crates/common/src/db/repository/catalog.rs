//! Read-only catalog queries: films, actors, search, countries

use super::{mysql, Repository};
use crate::db::models::*;
use crate::db::search::like_pattern;
use crate::errors::Result;
use sea_orm::{EntityTrait, FromQueryResult, QueryOrder, Value};

/// Rows returned by the "top" rankings
const TOP_LIMIT: u64 = 5;

/// Free-text search result cap
const SEARCH_LIMIT: u64 = 50;

impl Repository {
    // ========================================================================
    // Film Operations
    // ========================================================================

    /// Most rented films. Films never rented do not appear.
    pub async fn top_films(&self) -> Result<Vec<FilmRentalCount>> {
        let stmt = mysql(
            r#"
            SELECT f.film_id, f.title, COUNT(r.rental_id) AS rentals
            FROM rental r
            JOIN inventory i ON r.inventory_id = i.inventory_id
            JOIN film f ON i.film_id = f.film_id
            GROUP BY f.film_id, f.title
            ORDER BY rentals DESC, f.title
            LIMIT ?
            "#,
            [Value::from(TOP_LIMIT)],
        );

        FilmRentalCount::find_by_statement(stmt)
            .all(self.pool.conn())
            .await
            .map_err(Into::into)
    }

    /// Film detail plus its cast ordered by name.
    ///
    /// An unknown id yields `(None, [])` rather than an error.
    pub async fn film_detail(&self, film_id: u16) -> Result<(Option<FilmDetail>, Vec<FilmActor>)> {
        let film_stmt = mysql(
            r#"
            SELECT f.film_id, f.title, f.description, f.length,
                   CAST(f.rating AS CHAR) AS rating,
                   l.name AS language, c.name AS category
            FROM film f
            JOIN language l ON f.language_id = l.language_id
            LEFT JOIN film_category fc ON fc.film_id = f.film_id
            LEFT JOIN category c ON c.category_id = fc.category_id
            WHERE f.film_id = ?
            ORDER BY c.name
            LIMIT 1
            "#,
            [Value::from(film_id)],
        );

        let actors_stmt = mysql(
            r#"
            SELECT a.actor_id, CONCAT(a.first_name, ' ', a.last_name) AS name
            FROM actor a
            JOIN film_actor fa ON fa.actor_id = a.actor_id
            WHERE fa.film_id = ?
            ORDER BY name
            "#,
            [Value::from(film_id)],
        );

        let film = FilmDetail::find_by_statement(film_stmt)
            .one(self.pool.conn())
            .await?;

        let actors = FilmActor::find_by_statement(actors_stmt)
            .all(self.pool.conn())
            .await?;

        Ok((film, actors))
    }

    /// Case-insensitive substring search over title, actor name and category
    pub async fn search_films(&self, query: &str) -> Result<Vec<FilmSummary>> {
        let pattern = like_pattern(query.trim());

        let stmt = mysql(
            r#"
            SELECT DISTINCT f.film_id, f.title
            FROM film f
            LEFT JOIN film_actor fa ON fa.film_id = f.film_id
            LEFT JOIN actor a ON a.actor_id = fa.actor_id
            LEFT JOIN film_category fc ON fc.film_id = f.film_id
            LEFT JOIN category c ON c.category_id = fc.category_id
            WHERE f.title LIKE ?
               OR CONCAT(a.first_name, ' ', a.last_name) LIKE ?
               OR c.name LIKE ?
            ORDER BY f.title
            LIMIT ?
            "#,
            [
                Value::from(pattern.clone()),
                Value::from(pattern.clone()),
                Value::from(pattern),
                Value::from(SEARCH_LIMIT),
            ],
        );

        FilmSummary::find_by_statement(stmt)
            .all(self.pool.conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Actor Operations
    // ========================================================================

    /// Most rented actors, summed over every copy of every film they are in.
    /// Actors whose films were never rented still appear with zero.
    pub async fn top_actors(&self) -> Result<Vec<ActorRentalCount>> {
        let stmt = mysql(
            r#"
            SELECT a.actor_id, CONCAT(a.first_name, ' ', a.last_name) AS name,
                   COUNT(r.rental_id) AS rentals
            FROM actor a
            JOIN film_actor fa ON fa.actor_id = a.actor_id
            LEFT JOIN inventory i ON i.film_id = fa.film_id
            LEFT JOIN rental r ON r.inventory_id = i.inventory_id
            GROUP BY a.actor_id, name
            ORDER BY rentals DESC, name
            LIMIT ?
            "#,
            [Value::from(TOP_LIMIT)],
        );

        ActorRentalCount::find_by_statement(stmt)
            .all(self.pool.conn())
            .await
            .map_err(Into::into)
    }

    /// The actor and their five most rented films, zero-rental films included
    pub async fn actor_top_films(
        &self,
        actor_id: u16,
    ) -> Result<(Option<Actor>, Vec<FilmRentalCount>)> {
        let actor_stmt = mysql(
            "SELECT actor_id, first_name, last_name FROM actor WHERE actor_id = ?",
            [Value::from(actor_id)],
        );

        let films_stmt = mysql(
            r#"
            SELECT f.film_id, f.title, COUNT(r.rental_id) AS rentals
            FROM film f
            JOIN film_actor fa ON fa.film_id = f.film_id AND fa.actor_id = ?
            LEFT JOIN inventory i ON i.film_id = f.film_id
            LEFT JOIN rental r ON r.inventory_id = i.inventory_id
            GROUP BY f.film_id, f.title
            ORDER BY rentals DESC, f.title
            LIMIT ?
            "#,
            [Value::from(actor_id), Value::from(TOP_LIMIT)],
        );

        let actor = Actor::find_by_statement(actor_stmt)
            .one(self.pool.conn())
            .await?;

        let films = FilmRentalCount::find_by_statement(films_stmt)
            .all(self.pool.conn())
            .await?;

        Ok((actor, films))
    }

    // ========================================================================
    // Country Operations
    // ========================================================================

    /// All countries ordered by name
    pub async fn list_countries(&self) -> Result<Vec<Country>> {
        CountryEntity::find()
            .order_by_asc(CountryColumn::Country)
            .all(self.pool.conn())
            .await
            .map_err(Into::into)
    }
}

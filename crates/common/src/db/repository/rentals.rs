//! Rental lifecycle: open, return, history

use super::{mysql, Repository, API_STAFF_ID};
use crate::db::models::*;
use crate::errors::{AppError, Result};
use sea_orm::{ConnectionTrait, DbErr, FromQueryResult, SqlErr, Value};

impl Repository {
    // ========================================================================
    // Rental Operations
    // ========================================================================

    /// Rent any available copy of `film_id` to `customer_id`.
    ///
    /// The film's inventory rows are locked for the rest of the transaction,
    /// so concurrent requests for the same film queue up behind each other.
    /// The availability check is itself a locking read and therefore sees
    /// rentals committed by whoever held the lock before.
    pub async fn rent_film(&self, film_id: u16, customer_id: u16) -> Result<CreatedRental> {
        let txn = self.pool.begin().await?;

        txn.query_one(mysql(
            "SELECT customer_id FROM customer WHERE customer_id = ?",
            [Value::from(customer_id)],
        ))
        .await?
        .ok_or(AppError::CustomerNotFound { id: customer_id })?;

        let copies = txn
            .query_all(mysql(
                "SELECT inventory_id FROM inventory WHERE film_id = ? ORDER BY inventory_id FOR UPDATE",
                [Value::from(film_id)],
            ))
            .await?;

        if copies.is_empty() {
            return Err(AppError::NoCopyAvailable { film_id });
        }

        let inventory_id: u32 = txn
            .query_one(mysql(
                r#"
                SELECT i.inventory_id
                FROM inventory i
                LEFT JOIN rental r ON r.inventory_id = i.inventory_id AND r.return_date IS NULL
                WHERE i.film_id = ? AND r.rental_id IS NULL
                ORDER BY i.inventory_id
                LIMIT 1
                FOR UPDATE
                "#,
                [Value::from(film_id)],
            ))
            .await?
            .ok_or(AppError::NoCopyAvailable { film_id })?
            .try_get("", "inventory_id")?;

        let inserted = txn
            .execute(mysql(
                r#"
                INSERT INTO rental (rental_date, inventory_id, customer_id, return_date, staff_id)
                VALUES (NOW(), ?, ?, NULL, ?)
                "#,
                [
                    Value::from(inventory_id),
                    customer_id.into(),
                    API_STAFF_ID.into(),
                ],
            ))
            .await
            .map_err(|e| open_rental_conflict(e, film_id))?;

        txn.commit().await?;

        Ok(CreatedRental {
            rental_id: inserted.last_insert_id(),
            inventory_id,
        })
    }

    /// Close an open rental. Unknown and already-returned ids both fail
    /// with `RentalNotFound`.
    pub async fn return_rental(&self, rental_id: i32) -> Result<()> {
        let result = self
            .pool
            .conn()
            .execute(mysql(
                "UPDATE rental SET return_date = NOW() WHERE rental_id = ? AND return_date IS NULL",
                [Value::from(rental_id)],
            ))
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::RentalNotFound { id: rental_id });
        }

        Ok(())
    }

    /// All rentals of a customer, newest first, split into open and returned
    pub async fn customer_rentals(&self, customer_id: u16) -> Result<RentalHistory> {
        let rows = CustomerRental::find_by_statement(mysql(
            r#"
            SELECT r.rental_id, r.rental_date, r.return_date, r.inventory_id,
                   f.film_id, f.title
            FROM rental r
            JOIN inventory i ON i.inventory_id = r.inventory_id
            JOIN film f ON f.film_id = i.film_id
            WHERE r.customer_id = ?
            ORDER BY r.rental_date DESC, r.rental_id DESC
            "#,
            [Value::from(customer_id)],
        ))
        .all(self.pool.conn())
        .await?;

        Ok(RentalHistory::from_rows(rows))
    }
}

fn open_rental_conflict(err: DbErr, film_id: u16) -> AppError {
    guard_conflict(err.sql_err(), film_id).unwrap_or_else(|| err.into())
}

/// A duplicate on the open-rental guard means another request won the copy
fn guard_conflict(sql_err: Option<SqlErr>, film_id: u16) -> Option<AppError> {
    match sql_err {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::warn!(film_id, %detail, "Open rental guard rejected insert");
            Some(AppError::NoCopyAvailable { film_id })
        }
        _ => None,
    }
}

//! Customer listing, detail and mutations

use super::{mysql, Repository};
use crate::db::models::*;
use crate::db::search::CustomerFilter;
use crate::errors::{AppError, Result};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, QueryFilter,
    Value,
};

/// Store assigned to customers created without one
const DEFAULT_STORE_ID: u8 = 1;

const CUSTOMER_DETAIL_SQL: &str = r#"
    SELECT c.customer_id, c.store_id, c.first_name, c.last_name, c.email, c.active,
           c.create_date,
           a.address_id, a.address, a.address2, a.district, a.postal_code, a.phone,
           ci.city_id, ci.city, co.country_id, co.country
    FROM customer c
    JOIN address a ON a.address_id = c.address_id
    JOIN city ci ON ci.city_id = a.city_id
    JOIN country co ON co.country_id = ci.country_id
    WHERE c.customer_id = ?
"#;

impl Repository {
    // ========================================================================
    // Customer Reads
    // ========================================================================

    /// One page of customers ordered by last name then first name,
    /// optionally narrowed by a free-text query.
    ///
    /// `page` is 1-based.
    pub async fn list_customers(
        &self,
        query: Option<&str>,
        page: u64,
        limit: u64,
    ) -> Result<Vec<CustomerSummary>> {
        let offset = page.saturating_sub(1).saturating_mul(limit);
        let filter = query.and_then(CustomerFilter::from_query);

        let where_clause = filter
            .as_ref()
            .map(|f| format!("WHERE {}", f.sql()))
            .unwrap_or_default();

        // customer_id breaks name ties so pages stay disjoint
        let sql = format!(
            r#"
            SELECT customer_id, first_name, last_name, email, active
            FROM customer
            {}
            ORDER BY last_name, first_name, customer_id
            LIMIT ? OFFSET ?
            "#,
            where_clause
        );

        let mut values: Vec<Value> = filter.map(CustomerFilter::into_values).unwrap_or_default();
        values.push(limit.into());
        values.push(offset.into());

        CustomerSummary::find_by_statement(mysql(&sql, values))
            .all(self.pool.conn())
            .await
            .map_err(Into::into)
    }

    /// Customer with the full address chain, if present
    pub async fn find_customer(&self, customer_id: u16) -> Result<Option<CustomerDetail>> {
        CustomerDetail::find_by_statement(mysql(CUSTOMER_DETAIL_SQL, [Value::from(customer_id)]))
            .one(self.pool.conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Customer Writes
    // ========================================================================

    /// Insert the address and then the customer that references it
    pub async fn create_customer(&self, record: &CustomerRecord) -> Result<CreatedCustomer> {
        let txn = self.pool.begin().await?;

        let city_id = resolve_city(&txn, &record.address.city).await?;

        let address = &record.address;
        let address_id = txn
            .execute(mysql(
                r#"
                INSERT INTO address (address, address2, district, city_id, postal_code, phone, location)
                VALUES (?, ?, ?, ?, ?, ?, ST_GeomFromText('POINT(0 0)'))
                "#,
                [
                    Value::from(address.address.clone()),
                    address.address2.clone().into(),
                    address.district.clone().into(),
                    city_id.into(),
                    address.postal_code.clone().into(),
                    address.phone.clone().into(),
                ],
            ))
            .await?
            .last_insert_id();

        let customer_id = txn
            .execute(mysql(
                r#"
                INSERT INTO customer (store_id, first_name, last_name, email, address_id, active, create_date)
                VALUES (?, ?, ?, ?, ?, ?, NOW())
                "#,
                [
                    Value::from(record.store_id.unwrap_or(DEFAULT_STORE_ID)),
                    record.first_name.clone().into(),
                    record.last_name.clone().into(),
                    record.email.clone().into(),
                    address_id.into(),
                    record.active.unwrap_or(true).into(),
                ],
            ))
            .await?
            .last_insert_id();

        txn.commit().await?;

        Ok(CreatedCustomer {
            customer_id,
            address_id,
        })
    }

    /// Overwrite the customer row and its address row
    pub async fn update_customer(&self, customer_id: u16, record: &CustomerRecord) -> Result<()> {
        let txn = self.pool.begin().await?;

        let address_id: u16 = txn
            .query_one(mysql(
                "SELECT address_id FROM customer WHERE customer_id = ? FOR UPDATE",
                [Value::from(customer_id)],
            ))
            .await?
            .ok_or(AppError::CustomerNotFound { id: customer_id })?
            .try_get("", "address_id")?;

        let city_id = resolve_city(&txn, &record.address.city).await?;

        txn.execute(mysql(
            r#"
            UPDATE customer
            SET store_id = COALESCE(?, store_id), first_name = ?, last_name = ?, email = ?,
                active = COALESCE(?, active)
            WHERE customer_id = ?
            "#,
            [
                Value::from(record.store_id),
                record.first_name.clone().into(),
                record.last_name.clone().into(),
                record.email.clone().into(),
                record.active.into(),
                customer_id.into(),
            ],
        ))
        .await?;

        let address = &record.address;
        txn.execute(mysql(
            r#"
            UPDATE address
            SET address = ?, address2 = ?, district = ?, city_id = ?, postal_code = ?, phone = ?
            WHERE address_id = ?
            "#,
            [
                Value::from(address.address.clone()),
                address.address2.clone().into(),
                address.district.clone().into(),
                city_id.into(),
                address.postal_code.clone().into(),
                address.phone.clone().into(),
                address_id.into(),
            ],
        ))
        .await?;

        txn.commit().await?;
        Ok(())
    }

    /// Remove the customer after their payments and rentals
    pub async fn delete_customer(&self, customer_id: u16) -> Result<()> {
        let txn = self.pool.begin().await?;

        for sql in [
            "DELETE FROM payment WHERE customer_id = ?",
            "DELETE FROM rental WHERE customer_id = ?",
        ] {
            txn.execute(mysql(sql, [Value::from(customer_id)])).await?;
        }

        let deleted = txn
            .execute(mysql(
                "DELETE FROM customer WHERE customer_id = ?",
                [Value::from(customer_id)],
            ))
            .await?;

        if deleted.rows_affected() == 0 {
            // Dropping the transaction rolls the dependent deletes back
            return Err(AppError::CustomerNotFound { id: customer_id });
        }

        txn.commit().await?;
        Ok(())
    }
}

/// Resolve a city reference to a `city_id`, creating named cities on demand
async fn resolve_city<C>(conn: &C, city: &CityRef) -> Result<u16>
where
    C: ConnectionTrait,
{
    match city {
        CityRef::Id(city_id) => CityEntity::find_by_id(*city_id)
            .one(conn)
            .await?
            .map(|city| city.city_id)
            .ok_or_else(|| AppError::not_found("City", city_id)),

        CityRef::Named { city, country_id } => {
            let existing = CityEntity::find()
                .filter(CityColumn::City.eq(city.as_str()))
                .filter(CityColumn::CountryId.eq(*country_id))
                .one(conn)
                .await?;

            if let Some(existing) = existing {
                return Ok(existing.city_id);
            }

            CountryEntity::find_by_id(*country_id)
                .one(conn)
                .await?
                .ok_or_else(|| AppError::not_found("Country", country_id))?;

            let inserted = CityEntity::insert(CityActiveModel {
                city: Set(city.clone()),
                country_id: Set(*country_id),
                ..Default::default()
            })
            .exec(conn)
            .await?;

            tracing::info!(city_id = inserted.last_insert_id, city = %city, "City created");
            Ok(inserted.last_insert_id)
        }
    }
}

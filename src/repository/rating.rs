use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::rating::{
        EmployeeRating as DomainEmployeeRating, NewEmployeeRating as DomainNewEmployeeRating,
        NewOrderRating as DomainNewOrderRating, OrderRating as DomainOrderRating,
    },
    models::rating::{
        EmployeeRating as DbEmployeeRating, NewEmployeeRating as DbNewEmployeeRating,
        NewOrderRating as DbNewOrderRating, OrderRating as DbOrderRating,
    },
    repository::{DieselRepository, RatingReader, RatingWriter},
    schema::{employee_ratings, order_ratings},
};

impl RatingReader for DieselRepository {
    fn list_order_employee_ratings(
        &self,
        order_id: i32,
    ) -> RepositoryResult<Vec<DomainEmployeeRating>> {
        let mut conn = self.conn()?;
        let ratings = employee_ratings::table
            .filter(employee_ratings::order_id.eq(order_id))
            .order(employee_ratings::id.asc())
            .load::<DbEmployeeRating>(&mut conn)?;

        Ok(ratings.into_iter().map(Into::into).collect())
    }

    fn get_order_rating(&self, order_id: i32) -> RepositoryResult<Option<DomainOrderRating>> {
        let mut conn = self.conn()?;
        let rating = order_ratings::table
            .filter(order_ratings::order_id.eq(order_id))
            .first::<DbOrderRating>(&mut conn)
            .optional()?;

        Ok(rating.map(Into::into))
    }

    fn list_employee_scores(&self, employee_id: i32) -> RepositoryResult<Vec<i32>> {
        let mut conn = self.conn()?;
        let scores = employee_ratings::table
            .filter(employee_ratings::employee_id.eq(employee_id))
            .select(employee_ratings::rating)
            .load::<i32>(&mut conn)?;

        Ok(scores)
    }
}

impl RatingWriter for DieselRepository {
    fn upsert_employee_rating(
        &self,
        rating: &DomainNewEmployeeRating,
    ) -> RepositoryResult<DomainEmployeeRating> {
        let mut conn = self.conn()?;
        let db_rating = DbNewEmployeeRating::from(rating);

        conn.transaction::<DomainEmployeeRating, RepositoryError, _>(|conn| {
            let existing = employee_ratings::table
                .filter(employee_ratings::order_id.eq(rating.order_id))
                .filter(employee_ratings::employee_id.eq(rating.employee_id))
                .select(employee_ratings::id)
                .first::<i32>(conn)
                .optional()?;

            let stored = match existing {
                Some(id) => diesel::update(employee_ratings::table.find(id))
                    .set(&db_rating)
                    .get_result::<DbEmployeeRating>(conn)?,
                None => diesel::insert_into(employee_ratings::table)
                    .values(&db_rating)
                    .get_result::<DbEmployeeRating>(conn)?,
            };

            Ok(stored.into())
        })
    }

    fn upsert_order_rating(
        &self,
        rating: &DomainNewOrderRating,
    ) -> RepositoryResult<DomainOrderRating> {
        use crate::schema::orders;

        let mut conn = self.conn()?;
        let db_rating = DbNewOrderRating::from(rating);

        conn.transaction::<DomainOrderRating, RepositoryError, _>(|conn| {
            let existing = order_ratings::table
                .filter(order_ratings::order_id.eq(rating.order_id))
                .select(order_ratings::id)
                .first::<i32>(conn)
                .optional()?;

            let stored = match existing {
                Some(id) => diesel::update(order_ratings::table.find(id))
                    .set(&db_rating)
                    .get_result::<DbOrderRating>(conn)?,
                None => diesel::insert_into(order_ratings::table)
                    .values(&db_rating)
                    .get_result::<DbOrderRating>(conn)?,
            };

            diesel::update(orders::table.find(rating.order_id))
                .set(orders::is_rated.eq(true))
                .execute(conn)?;

            Ok(stored.into())
        })
    }
}

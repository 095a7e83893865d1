use std::str::FromStr;

use crate::domain::UnknownChoice;

pub mod customer;
pub mod employee;
pub mod material;
pub mod order;
pub mod order_status_history;
pub mod rating;
pub mod report;
pub mod setting;

/// Decodes a stored choice code, falling back to `fallback` on unknown values.
pub(crate) fn decode_choice<T>(raw: &str, fallback: T) -> T
where
    T: FromStr<Err = UnknownChoice>,
{
    match raw.parse::<T>() {
        Ok(value) => value,
        Err(err) => {
            log::warn!("{err} in database, using fallback");
            fallback
        }
    }
}

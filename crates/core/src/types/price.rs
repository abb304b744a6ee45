//! Variant price type.

use core::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount does not fit in the stored precision.
    #[error("price {amount} has more than {max} digits")]
    TooManyDigits {
        /// The rejected amount.
        amount: Decimal,
        /// Maximum number of digits in total.
        max: u32,
    },
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
}

/// A variant price with exactly two fractional digits.
///
/// Matches a `NUMERIC(10,2)` column: at most ten digits in total, two of
/// them after the decimal point. Extra fractional digits are rounded half
/// away from zero, as the column itself would (`9.999` becomes `10.00`).
///
/// Deserializes from a JSON number or string and serializes as a decimal
/// string, e.g. `"9.99"`.
///
/// ## Examples
///
/// ```
/// use catalog_core::Price;
///
/// let price: Price = "9.99".parse().unwrap();
/// assert_eq!(price.to_string(), "9.99");
///
/// let whole: Price = "10".parse().unwrap();
/// assert_eq!(whole.to_string(), "10.00");
///
/// let rounded: Price = "9.999".parse().unwrap();
/// assert_eq!(rounded.to_string(), "10.00");
///
/// assert!("100000000".parse::<Price>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Number of fractional digits stored.
    pub const SCALE: u32 = 2;

    /// Total number of digits stored.
    pub const MAX_DIGITS: u32 = 10;

    /// Create a price from a decimal amount, rounding to [`Self::SCALE`]
    /// fractional digits.
    ///
    /// # Errors
    ///
    /// Returns an error if the rounded amount needs more than
    /// [`Self::MAX_DIGITS`] digits in total.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        let mut rounded =
            amount.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);

        let limit = Decimal::from(10_i64.pow(Self::MAX_DIGITS - Self::SCALE));
        if rounded.abs() >= limit {
            return Err(PriceError::TooManyDigits {
                amount,
                max: Self::MAX_DIGITS,
            });
        }

        rounded.rescale(Self::SCALE);
        Ok(Self(rounded))
    }

    /// Returns the amount, always with two fractional digits.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim()).map_err(|e| PriceError::Invalid(e.to_string()))?;
        Self::new(amount)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

//! Premium estimation
//!
//! Private motor is rated at 5% of the declared vehicle value. The other
//! products carry illustrative rating bases; they are indicative figures for
//! the summary screen, not an underwriting rate table.

use rust_decimal::Decimal;

use core_kernel::{Money, Rate};
use crate::draft::QuoteDraft;
use crate::error::QuoteError;

/// How a product turns a validated draft into a premium
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingBasis {
    /// Percentage of the insurable value, with an optional floor
    ValueRate {
        percentage: Decimal,
        minimum_premium: Option<Decimal>,
    },
    /// Percentage of the insurable value plus a loading per collection entity
    ValueRatePerEntity {
        percentage: Decimal,
        per_entity: Decimal,
    },
    /// Flat premium per unit of a numeric field
    PerUnit {
        field: &'static str,
        unit_premium: Decimal,
    },
}

impl RatingBasis {
    /// Computes the premium, rounded to the draft currency
    ///
    /// Pure function of its inputs; a missing insurable value rates as zero.
    /// Overflow and negative results are errors, never a committed figure.
    pub fn estimate(
        &self,
        draft: &QuoteDraft,
        insurable_value: Option<Money>,
        entity_count: usize,
    ) -> Result<Money, QuoteError> {
        let currency = draft.currency();
        let value = insurable_value.unwrap_or_else(|| Money::zero(currency));

        let premium = match *self {
            RatingBasis::ValueRate {
                percentage,
                minimum_premium,
            } => {
                let premium = Rate::from_percentage(percentage).apply(&value)?;
                match minimum_premium {
                    Some(floor) if premium.amount() < floor => Money::new(floor, currency),
                    _ => premium,
                }
            }
            RatingBasis::ValueRatePerEntity {
                percentage,
                per_entity,
            } => {
                let base = Rate::from_percentage(percentage).apply(&value)?;
                let loading = Money::new(per_entity, currency)
                    .checked_mul(Decimal::from(entity_count))?;
                base.checked_add(&loading)?
            }
            RatingBasis::PerUnit {
                field,
                unit_premium,
            } => {
                let units = draft
                    .field(field)
                    .and_then(|value| value.as_decimal())
                    .unwrap_or(Decimal::ZERO);
                Money::new(unit_premium, currency).checked_mul(units)?
            }
        };

        if premium.amount() < Decimal::ZERO {
            return Err(QuoteError::PremiumOutOfRange(format!("{premium} is negative")));
        }
        Ok(premium.round_to_currency())
    }
}

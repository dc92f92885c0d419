//! Event pricing calculator.

use serde::{Deserialize, Serialize};

use crate::domain::money::Money;
use crate::domain::types::TypeConstraintError;

/// Service charge rate expressed in percent.
pub const SERVICE_CHARGE_PERCENT: i64 = 10;

/// One wine line reduced to what pricing needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WineCharge {
    pub quantity: i32,
    pub bottle_price: Money,
}

/// Derived monetary fields of an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingBreakdown {
    pub menu_subtotal: Money,
    pub drinks_subtotal: Money,
    pub wine_subtotal: Money,
    pub service_charge: Money,
    pub total: Money,
}

impl PricingBreakdown {
    /// Sum before the service charge.
    pub fn pre_tax(&self) -> Money {
        self.menu_subtotal + self.drinks_subtotal + self.wine_subtotal
    }
}

/// Computes every derived monetary field of an event.
///
/// Inputs are expected to be validated (non-negative). The service charge is
/// `preTax * 10%` rounded half up to the nearest cent. Amounts that do not fit
/// in an `i64` of cents are rejected instead of wrapping.
pub fn compute_pricing(
    headcount: i32,
    price_per_person: Money,
    drinks_package: bool,
    drinks_price_per_person: Money,
    wines: &[WineCharge],
) -> Result<PricingBreakdown, TypeConstraintError> {
    let overflow = || TypeConstraintError::ValueTooLarge("event total");
    let headcount = i64::from(headcount);

    let menu_subtotal = price_per_person
        .checked_mul(headcount)
        .ok_or_else(overflow)?;
    let drinks_subtotal = if drinks_package {
        drinks_price_per_person
            .checked_mul(headcount)
            .ok_or_else(overflow)?
    } else {
        Money::ZERO
    };
    let wine_subtotal = wines
        .iter()
        .try_fold(Money::ZERO, |sum, wine| {
            wine.bottle_price
                .checked_mul(i64::from(wine.quantity))
                .and_then(|line| sum.checked_add(line))
        })
        .ok_or_else(overflow)?;

    let pre_tax = menu_subtotal
        .checked_add(drinks_subtotal)
        .and_then(|sum| sum.checked_add(wine_subtotal))
        .ok_or_else(overflow)?;
    let service_charge = round_half_up_percent(pre_tax.cents(), SERVICE_CHARGE_PERCENT)
        .map(Money::from_cents)
        .ok_or_else(overflow)?;
    let total = pre_tax.checked_add(service_charge).ok_or_else(overflow)?;

    Ok(PricingBreakdown {
        menu_subtotal,
        drinks_subtotal,
        wine_subtotal,
        service_charge,
        total,
    })
}

fn round_half_up_percent(amount: i64, percent: i64) -> Option<i64> {
    Some(amount.checked_mul(percent)?.checked_add(50)?.div_euclid(100))
}

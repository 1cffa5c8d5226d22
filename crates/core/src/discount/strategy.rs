use rust_decimal::Decimal;

use crate::{
    domain::product::{Product, MONEY_OFF, PERCENTAGE},
    errors::PricingError,
};

use super::DiscountStrategy;

/// Charges `price * magnitude` for magnitudes in `(0, 1]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PercentageDiscount;

impl DiscountStrategy for PercentageDiscount {
    fn name(&self) -> &'static str {
        "percentage"
    }

    fn applies_to(&self, product: &Product) -> bool {
        product.has_discount_type(PERCENTAGE)
    }

    fn apply(&self, product: &Product, magnitude: Decimal) -> Result<Decimal, PricingError> {
        if magnitude > Decimal::ONE {
            return Err(PricingError::InvalidDiscount("discount exceeded one".to_string()));
        }
        if magnitude <= Decimal::ZERO {
            return Err(PricingError::InvalidDiscount("discount was under zero".to_string()));
        }

        Ok(product.price * magnitude)
    }
}

/// Subtracts a fixed amount in `[0, price]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MoneyOffDiscount;

impl DiscountStrategy for MoneyOffDiscount {
    fn name(&self) -> &'static str {
        "moneyoff"
    }

    fn applies_to(&self, product: &Product) -> bool {
        product.has_discount_type(MONEY_OFF)
    }

    fn apply(&self, product: &Product, magnitude: Decimal) -> Result<Decimal, PricingError> {
        if magnitude > product.price {
            return Err(PricingError::InvalidDiscount(
                "cannot reduce more than price".to_string(),
            ));
        }
        if magnitude < Decimal::ZERO {
            return Err(PricingError::InvalidDiscount(
                "cannot reduce by negative discount".to_string(),
            ));
        }

        Ok(product.price - magnitude)
    }
}

/// Catch-all that turns an unknown discount type into an explicit failure.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnrecognizedDiscount;

impl DiscountStrategy for UnrecognizedDiscount {
    fn name(&self) -> &'static str {
        "unrecognized"
    }

    fn applies_to(&self, _product: &Product) -> bool {
        true
    }

    fn apply(&self, product: &Product, _magnitude: Decimal) -> Result<Decimal, PricingError> {
        Err(PricingError::UnknownDiscountType(product.discount_type.clone()))
    }

    fn is_fallback(&self) -> bool {
        true
    }
}

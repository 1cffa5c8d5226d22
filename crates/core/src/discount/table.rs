use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::errors::PricingError;

use super::DiscountRepository;

/// In-memory discount magnitudes keyed by discount type and product category.
///
/// Values are stored exactly as configured; range checks belong to the strategies.
#[derive(Clone, Debug, Default)]
pub struct DiscountTable {
    magnitudes: HashMap<(String, String), Decimal>,
}

impl DiscountTable {
    pub fn new<I, T, C>(entries: I) -> Self
    where
        I: IntoIterator<Item = (T, C, Decimal)>,
        T: Into<String>,
        C: Into<String>,
    {
        let mut table = Self::default();
        for (discount_type, product_category, magnitude) in entries {
            table.insert(discount_type, product_category, magnitude);
        }
        table
    }

    pub fn insert(
        &mut self,
        discount_type: impl Into<String>,
        product_category: impl Into<String>,
        magnitude: Decimal,
    ) -> Option<Decimal> {
        self.magnitudes.insert((discount_type.into(), product_category.into()), magnitude)
    }

    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }
}

impl DiscountRepository for DiscountTable {
    fn discount_for_type(
        &self,
        discount_type: &str,
        product_category: &str,
    ) -> Result<Decimal, PricingError> {
        self.magnitudes
            .get(&(discount_type.to_string(), product_category.to_string()))
            .copied()
            .ok_or_else(|| {
                PricingError::Lookup(format!(
                    "no discount configured for type `{discount_type}` in category `{product_category}`"
                ))
            })
    }
}

use rust_decimal::Decimal;
use tracing::debug;

use crate::{domain::product::Product, errors::PricingError};

use super::{DiscountPriceResolver, DiscountRepository, DiscountStrategy};

/// Looks up the raw discount magnitude for a product and hands it to a strategy.
///
/// The engine never validates magnitudes and never wraps errors; whatever the
/// repository or strategy returns reaches the caller as-is.
pub struct DiscountEngine<R, S> {
    repository: R,
    strategy: S,
}

impl<R, S> DiscountEngine<R, S> {
    pub fn new(repository: R, strategy: S) -> Self {
        Self { repository, strategy }
    }
}

impl<R, S> DiscountPriceResolver for DiscountEngine<R, S>
where
    R: DiscountRepository,
    S: DiscountStrategy,
{
    fn discount_price(&self, product: &Product) -> Result<Decimal, PricingError> {
        let magnitude = self
            .repository
            .discount_for_type(&product.discount_type, &product.product_category)?;
        debug!(
            event_name = "pricing.engine.lookup",
            discount_type = %product.discount_type,
            product_category = %product.product_category,
            %magnitude,
            "discount magnitude resolved"
        );

        let price = self.strategy.apply(product, magnitude)?;
        debug!(event_name = "pricing.engine.priced", %price, "discount price computed");
        Ok(price)
    }
}

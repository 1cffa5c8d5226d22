use rust_decimal::Decimal;
use tracing::warn;

use crate::{domain::product::Product, errors::PricingError};

use super::{Authorizer, DiscountPriceResolver};

/// Refuses discounted pricing to unauthorized callers before anything else runs.
pub struct AuthorizationGate<A, P> {
    authorizer: A,
    inner: P,
}

impl<A, P> AuthorizationGate<A, P> {
    pub fn new(authorizer: A, inner: P) -> Self {
        Self { authorizer, inner }
    }
}

impl<A, P> DiscountPriceResolver for AuthorizationGate<A, P>
where
    A: Authorizer,
    P: DiscountPriceResolver,
{
    fn discount_price(&self, product: &Product) -> Result<Decimal, PricingError> {
        if !self.authorizer.is_authorized() {
            warn!(
                event_name = "pricing.gate.denied",
                product_category = %product.product_category,
                "caller not authorized for discounted pricing"
            );
            return Err(PricingError::Unauthorized(
                "user not authorized for discount".to_string(),
            ));
        }

        self.inner.discount_price(product)
    }
}

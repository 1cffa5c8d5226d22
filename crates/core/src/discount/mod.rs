pub mod authorizer;
pub mod dispatcher;
pub mod engine;
pub mod gate;
pub mod strategy;
pub mod table;

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::{domain::product::Product, errors::PricingError};

pub use self::{
    authorizer::{ApiKeyAuthorizer, StaticAuthorizer},
    dispatcher::FirstMatchDispatcher,
    engine::DiscountEngine,
    gate::AuthorizationGate,
    strategy::{MoneyOffDiscount, PercentageDiscount, UnrecognizedDiscount},
    table::DiscountTable,
};

/// One pricing rule: an applicability predicate paired with a price transform.
pub trait DiscountStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn applies_to(&self, product: &Product) -> bool;

    fn apply(&self, product: &Product, magnitude: Decimal) -> Result<Decimal, PricingError>;

    /// True for strategies that match every product. A dispatcher must end with one.
    fn is_fallback(&self) -> bool {
        false
    }
}

pub trait DiscountPriceResolver: Send + Sync {
    fn discount_price(&self, product: &Product) -> Result<Decimal, PricingError>;
}

/// Source of raw discount magnitudes. Implementations own any timeout or retry
/// policy and report failures as `PricingError::Lookup`.
pub trait DiscountRepository: Send + Sync {
    fn discount_for_type(
        &self,
        discount_type: &str,
        product_category: &str,
    ) -> Result<Decimal, PricingError>;
}

pub trait Authorizer: Send + Sync {
    fn is_authorized(&self) -> bool;
}

impl<T: DiscountStrategy + ?Sized> DiscountStrategy for &T {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn applies_to(&self, product: &Product) -> bool {
        (**self).applies_to(product)
    }

    fn apply(&self, product: &Product, magnitude: Decimal) -> Result<Decimal, PricingError> {
        (**self).apply(product, magnitude)
    }

    fn is_fallback(&self) -> bool {
        (**self).is_fallback()
    }
}

impl<T: DiscountStrategy + ?Sized> DiscountStrategy for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn applies_to(&self, product: &Product) -> bool {
        (**self).applies_to(product)
    }

    fn apply(&self, product: &Product, magnitude: Decimal) -> Result<Decimal, PricingError> {
        (**self).apply(product, magnitude)
    }

    fn is_fallback(&self) -> bool {
        (**self).is_fallback()
    }
}

impl<T: DiscountPriceResolver + ?Sized> DiscountPriceResolver for &T {
    fn discount_price(&self, product: &Product) -> Result<Decimal, PricingError> {
        (**self).discount_price(product)
    }
}

impl<T: DiscountPriceResolver + ?Sized> DiscountPriceResolver for Arc<T> {
    fn discount_price(&self, product: &Product) -> Result<Decimal, PricingError> {
        (**self).discount_price(product)
    }
}

impl<T: DiscountRepository + ?Sized> DiscountRepository for &T {
    fn discount_for_type(
        &self,
        discount_type: &str,
        product_category: &str,
    ) -> Result<Decimal, PricingError> {
        (**self).discount_for_type(discount_type, product_category)
    }
}

impl<T: DiscountRepository + ?Sized> DiscountRepository for Arc<T> {
    fn discount_for_type(
        &self,
        discount_type: &str,
        product_category: &str,
    ) -> Result<Decimal, PricingError> {
        (**self).discount_for_type(discount_type, product_category)
    }
}

impl<T: Authorizer + ?Sized> Authorizer for &T {
    fn is_authorized(&self) -> bool {
        (**self).is_authorized()
    }
}

impl<T: Authorizer + ?Sized> Authorizer for Arc<T> {
    fn is_authorized(&self) -> bool {
        (**self).is_authorized()
    }
}

pub type PricingService<A, R> = AuthorizationGate<A, DiscountEngine<R, FirstMatchDispatcher>>;

/// Production wiring: authorization gate around an engine that dispatches over
/// percentage, money-off and the unrecognized fallback, in that order.
pub fn pricing_service<A, R>(repository: R, authorizer: A) -> PricingService<A, R>
where
    A: Authorizer,
    R: DiscountRepository,
{
    AuthorizationGate::new(
        authorizer,
        DiscountEngine::new(repository, FirstMatchDispatcher::standard()),
    )
}

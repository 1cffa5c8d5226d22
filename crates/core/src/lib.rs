pub mod config;
pub mod discount;
pub mod domain;
pub mod errors;

pub use discount::{
    pricing_service, ApiKeyAuthorizer, AuthorizationGate, Authorizer, DiscountEngine,
    DiscountPriceResolver, DiscountRepository, DiscountStrategy, DiscountTable,
    FirstMatchDispatcher, MoneyOffDiscount, PercentageDiscount, PricingService,
    StaticAuthorizer, UnrecognizedDiscount,
};
pub use domain::product::{Product, MONEY_OFF, PERCENTAGE};
pub use errors::PricingError;

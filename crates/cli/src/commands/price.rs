use std::sync::Arc;

use pricewise_core::config::{AppConfig, AuthorizationMode, LoadOptions};
use pricewise_core::{
    pricing_service, ApiKeyAuthorizer, Authorizer, DiscountPriceResolver, PricingError, Product,
    StaticAuthorizer,
};
use rust_decimal::Decimal;
use secrecy::SecretString;
use tracing::info;

use crate::commands::CommandResult;
use crate::logging;

#[derive(Clone, Debug)]
pub struct PriceRequest {
    pub price: Decimal,
    pub discount_type: String,
    pub product_category: String,
    pub api_key: Option<String>,
}

pub fn run(options: LoadOptions, request: PriceRequest) -> CommandResult {
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "price",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };
    logging::init(&config);

    if request.price < Decimal::ZERO {
        return CommandResult::failure(
            "price",
            "invalid_input",
            "price must not be negative".to_string(),
            2,
        );
    }

    let authorizer = request_authorizer(&config, request.api_key);
    let service = pricing_service(config.discount_table(), authorizer);
    let product = Product::new(request.price, request.discount_type, request.product_category);

    match service.discount_price(&product) {
        Ok(price) => {
            info!(
                event_name = "cli.price.resolved",
                discount_type = %product.discount_type,
                product_category = %product.product_category,
                %price,
                "discount price resolved"
            );
            CommandResult::success("price", format!("discounted price is {price}"), Some(price))
        }
        Err(error) => CommandResult::failure(
            "price",
            error.error_class(),
            format!("{} ({error})", error.user_message()),
            exit_code_for(&error),
        ),
    }
}

fn request_authorizer(config: &AppConfig, presented: Option<String>) -> Arc<dyn Authorizer> {
    match config.authorization.mode {
        AuthorizationMode::AllowAll => Arc::new(StaticAuthorizer::allow()),
        AuthorizationMode::DenyAll => Arc::new(StaticAuthorizer::deny()),
        AuthorizationMode::ApiKey => {
            let expected = config
                .authorization
                .api_key
                .clone()
                .unwrap_or_else(|| SecretString::from(String::new()));
            Arc::new(ApiKeyAuthorizer::new(expected, presented.map(SecretString::from)))
        }
    }
}

fn exit_code_for(error: &PricingError) -> u8 {
    match error {
        PricingError::InvalidConfiguration(_) => 2,
        PricingError::Unauthorized(_) => 3,
        PricingError::InvalidDiscount(_) | PricingError::UnknownDiscountType(_) => 4,
        PricingError::Lookup(_) => 5,
    }
}

use thiserror::Error;

/// Every way a discount price computation can end without a price.
///
/// Exactly one of these is returned per failed request and none of them are
/// retried internally. `InvalidConfiguration` is only raised while wiring
/// components together, never from a price call.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("invalid discount: {0}")]
    InvalidDiscount(String),
    #[error("unknown discount type `{0}`")]
    UnknownDiscountType(String),
    #[error("discount lookup failed: {0}")]
    Lookup(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl PricingError {
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "unauthorized",
            Self::InvalidDiscount(_) => "invalid_discount",
            Self::UnknownDiscountType(_) => "unknown_discount_type",
            Self::Lookup(_) => "lookup",
            Self::InvalidConfiguration(_) => "invalid_configuration",
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "You are not authorized to receive discounted pricing.",
            Self::InvalidDiscount(_) => {
                "The configured discount for this product is invalid. Contact support."
            }
            Self::UnknownDiscountType(_) => "This product has an unsupported discount type.",
            Self::Lookup(_) => "The discount could not be retrieved. Please retry shortly.",
            Self::InvalidConfiguration(_) => "An unexpected internal error occurred.",
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::PricingError;

    #[test]
    fn error_classes_are_stable_snake_case() {
        let cases = [
            (PricingError::Unauthorized("denied".to_owned()), "unauthorized"),
            (PricingError::InvalidDiscount("too big".to_owned()), "invalid_discount"),
            (PricingError::UnknownDiscountType("bogus".to_owned()), "unknown_discount_type"),
            (PricingError::Lookup("timeout".to_owned()), "lookup"),
            (PricingError::InvalidConfiguration("empty".to_owned()), "invalid_configuration"),
        ];

        for (error, class) in cases {
            assert_eq!(error.error_class(), class);
        }
    }

    #[test]
    fn user_message_does_not_leak_internal_detail() {
        let error =
            PricingError::Lookup("connection string Server=db01;Password=hunter2".to_owned());

        assert!(!error.user_message().contains("hunter2"));
        assert_eq!(
            error.user_message(),
            "The discount could not be retrieved. Please retry shortly."
        );
    }

    #[test]
    fn display_names_the_unknown_discount_type() {
        let error = PricingError::UnknownDiscountType("bogus".to_owned());
        assert_eq!(error.to_string(), "unknown discount type `bogus`");
    }
}

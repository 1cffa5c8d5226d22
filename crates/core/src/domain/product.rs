use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const PERCENTAGE: &str = "percentage";
pub const MONEY_OFF: &str = "moneyoff";

/// A product as presented for one price computation.
///
/// `discount_type` selects the pricing rule and `product_category` is only used
/// as a lookup key against the discount repository.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub price: Decimal,
    pub discount_type: String,
    pub product_category: String,
}

impl Product {
    pub fn new(
        price: Decimal,
        discount_type: impl Into<String>,
        product_category: impl Into<String>,
    ) -> Self {
        Self {
            price,
            discount_type: discount_type.into(),
            product_category: product_category.into(),
        }
    }

    pub fn has_discount_type(&self, discount_type: &str) -> bool {
        self.discount_type == discount_type
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{Product, MONEY_OFF, PERCENTAGE};

    #[test]
    fn discount_type_match_is_exact() {
        let product = Product::new(Decimal::ONE_HUNDRED, "percentage", "books");

        assert!(product.has_discount_type(PERCENTAGE));
        assert!(!product.has_discount_type(MONEY_OFF));
        assert!(!Product::new(Decimal::ONE_HUNDRED, "Percentage", "books")
            .has_discount_type(PERCENTAGE));
    }

    #[test]
    fn product_round_trips_through_serde_with_exact_price() {
        let product = Product::new(Decimal::new(1999, 2), MONEY_OFF, "games");
        let encoded = toml::to_string(&product).expect("serialize");
        let decoded: Product = toml::from_str(&encoded).expect("deserialize");

        assert_eq!(decoded, product);
        assert_eq!(decoded.price, Decimal::new(1999, 2));
    }
}

use rust_decimal::Decimal;
use tracing::debug;

use crate::{domain::product::Product, errors::PricingError};

use super::{
    strategy::{MoneyOffDiscount, PercentageDiscount, UnrecognizedDiscount},
    DiscountStrategy,
};

/// Ordered "first match wins" composite over discount strategies.
///
/// The list must end with exactly one fallback strategy so that every product
/// selects something; this is checked once at construction instead of on each
/// call.
pub struct FirstMatchDispatcher {
    strategies: Vec<Box<dyn DiscountStrategy>>,
}

impl FirstMatchDispatcher {
    pub fn new(strategies: Vec<Box<dyn DiscountStrategy>>) -> Result<Self, PricingError> {
        let Some(last) = strategies.last() else {
            return Err(PricingError::InvalidConfiguration(
                "dispatcher requires at least one strategy".to_string(),
            ));
        };

        if !last.is_fallback() {
            return Err(PricingError::InvalidConfiguration(format!(
                "dispatcher must end with a fallback strategy, found `{}`",
                last.name()
            )));
        }

        let position = strategies.iter().position(|strategy| strategy.is_fallback());
        if let Some(position) = position.filter(|position| *position + 1 < strategies.len()) {
            return Err(PricingError::InvalidConfiguration(format!(
                "fallback strategy `{}` at position {position} makes later strategies unreachable",
                strategies[position].name()
            )));
        }

        Ok(Self { strategies })
    }

    pub fn standard() -> Self {
        Self {
            strategies: vec![
                Box::new(PercentageDiscount),
                Box::new(MoneyOffDiscount),
                Box::new(UnrecognizedDiscount),
            ],
        }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|strategy| strategy.name()).collect()
    }

    fn select(&self, product: &Product) -> Option<&dyn DiscountStrategy> {
        self.strategies.iter().map(|strategy| strategy.as_ref()).find(|s| s.applies_to(product))
    }
}

impl DiscountStrategy for FirstMatchDispatcher {
    fn name(&self) -> &'static str {
        "first_match"
    }

    fn applies_to(&self, _product: &Product) -> bool {
        true
    }

    fn apply(&self, product: &Product, magnitude: Decimal) -> Result<Decimal, PricingError> {
        // Unreachable for a constructed dispatcher; the last strategy is a fallback.
        let strategy = self
            .select(product)
            .ok_or_else(|| PricingError::UnknownDiscountType(product.discount_type.clone()))?;

        debug!(
            event_name = "pricing.dispatch.selected",
            strategy = strategy.name(),
            discount_type = %product.discount_type,
            "discount strategy selected"
        );
        strategy.apply(product, magnitude)
    }

    fn is_fallback(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use proptest::prelude::*;
    use rust_decimal::Decimal;

    use crate::{
        discount::{
            dispatcher::FirstMatchDispatcher,
            strategy::{MoneyOffDiscount, PercentageDiscount, UnrecognizedDiscount},
            DiscountStrategy,
        },
        domain::product::Product,
        errors::PricingError,
    };

    struct RecordingStrategy {
        name: &'static str,
        matches: bool,
        result: Decimal,
        predicate_calls: AtomicUsize,
        apply_calls: AtomicUsize,
    }

    impl RecordingStrategy {
        fn new(name: &'static str, matches: bool, result: i64) -> Arc<Self> {
            Arc::new(Self {
                name,
                matches,
                result: Decimal::from(result),
                predicate_calls: AtomicUsize::new(0),
                apply_calls: AtomicUsize::new(0),
            })
        }

        fn predicate_calls(&self) -> usize {
            self.predicate_calls.load(Ordering::SeqCst)
        }

        fn apply_calls(&self) -> usize {
            self.apply_calls.load(Ordering::SeqCst)
        }
    }

    impl DiscountStrategy for RecordingStrategy {
        fn name(&self) -> &'static str {
            self.name
        }

        fn applies_to(&self, _product: &Product) -> bool {
            self.predicate_calls.fetch_add(1, Ordering::SeqCst);
            self.matches
        }

        fn apply(&self, _product: &Product, _magnitude: Decimal) -> Result<Decimal, PricingError> {
            self.apply_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.result)
        }
    }

    fn product(discount_type: &str) -> Product {
        Product::new(Decimal::ONE_HUNDRED, discount_type, "books")
    }

    fn boxed(strategy: &Arc<RecordingStrategy>) -> Box<dyn DiscountStrategy> {
        Box::new(strategy.clone())
    }

    #[test]
    fn only_the_first_matching_strategy_is_applied() {
        let first = RecordingStrategy::new("first", false, 1);
        let second = RecordingStrategy::new("second", true, 2);
        let third = RecordingStrategy::new("third", true, 3);
        let dispatcher = FirstMatchDispatcher::new(vec![
            boxed(&first),
            boxed(&second),
            boxed(&third),
            Box::new(UnrecognizedDiscount),
        ])
        .expect("valid dispatcher");

        let result = dispatcher.apply(&product("anything"), Decimal::new(5, 1));

        assert_eq!(result, Ok(Decimal::from(2)));
        assert_eq!(first.apply_calls(), 0);
        assert_eq!(second.apply_calls(), 1);
        assert_eq!(third.predicate_calls(), 0);
        assert_eq!(third.apply_calls(), 0);
    }

    #[test]
    fn earliest_strategy_wins_when_all_match() {
        let strategies: Vec<_> =
            (0..5).map(|index| RecordingStrategy::new("any", true, index)).collect();
        let mut boxed_strategies: Vec<Box<dyn DiscountStrategy>> =
            strategies.iter().map(boxed).collect();
        boxed_strategies.push(Box::new(UnrecognizedDiscount));
        let dispatcher = FirstMatchDispatcher::new(boxed_strategies).expect("valid dispatcher");

        let result = dispatcher.apply(&product("anything"), Decimal::ONE);

        assert_eq!(result, Ok(Decimal::ZERO));
        assert_eq!(strategies[0].apply_calls(), 1);
        assert!(strategies[1..].iter().all(|strategy| strategy.apply_calls() == 0));
    }

    #[test]
    fn dispatcher_falls_through_to_unrecognized() {
        let dispatcher = FirstMatchDispatcher::standard();

        assert!(dispatcher.applies_to(&product("bogus")));
        assert_eq!(
            dispatcher.apply(&product("bogus"), Decimal::new(5, 1)),
            Err(PricingError::UnknownDiscountType("bogus".to_string()))
        );
    }

    #[test]
    fn standard_dispatcher_routes_known_types() {
        let dispatcher = FirstMatchDispatcher::standard();

        assert_eq!(dispatcher.strategy_names(), vec!["percentage", "moneyoff", "unrecognized"]);
        assert_eq!(
            dispatcher.apply(&product("percentage"), Decimal::new(5, 1)),
            Ok(Decimal::new(50, 0))
        );
        assert_eq!(
            dispatcher.apply(&product("moneyoff"), Decimal::new(20, 0)),
            Ok(Decimal::new(80, 0))
        );
    }

    #[test]
    fn empty_strategy_list_is_rejected() {
        let result = FirstMatchDispatcher::new(Vec::new());
        assert!(matches!(result, Err(PricingError::InvalidConfiguration(_))));
    }

    #[test]
    fn list_without_trailing_fallback_is_rejected() {
        let result = FirstMatchDispatcher::new(vec![
            Box::new(PercentageDiscount),
            Box::new(MoneyOffDiscount),
        ]);

        assert!(matches!(
            result,
            Err(PricingError::InvalidConfiguration(ref message)) if message.contains("moneyoff")
        ));
    }

    #[test]
    fn fallback_before_the_end_is_rejected() {
        let result = FirstMatchDispatcher::new(vec![
            Box::new(PercentageDiscount),
            Box::new(UnrecognizedDiscount),
            Box::new(MoneyOffDiscount),
            Box::new(UnrecognizedDiscount),
        ]);

        assert!(matches!(
            result,
            Err(PricingError::InvalidConfiguration(ref message)) if message.contains("position 1")
        ));
    }

    #[test]
    fn nested_dispatcher_counts_as_fallback() {
        let inner: Box<dyn DiscountStrategy> = Box::new(FirstMatchDispatcher::standard());
        let outer = FirstMatchDispatcher::new(vec![Box::new(MoneyOffDiscount), inner])
            .expect("nested dispatcher is a valid fallback");

        assert_eq!(
            outer.apply(&product("percentage"), Decimal::new(25, 2)),
            Ok(Decimal::new(25, 0))
        );
    }

    proptest! {
        #[test]
        fn any_unknown_discount_type_surfaces_as_unknown(
            discount_type in any::<String>()
                .prop_filter("known discount types", |value| {
                    value != "percentage" && value != "moneyoff"
                }),
            magnitude_cents in -1_000_000i64..=1_000_000,
        ) {
            let product = Product::new(Decimal::ONE_HUNDRED, discount_type.clone(), "books");
            let result = FirstMatchDispatcher::standard()
                .apply(&product, Decimal::new(magnitude_cents, 2));

            prop_assert_eq!(result, Err(PricingError::UnknownDiscountType(discount_type)));
        }
    }
}

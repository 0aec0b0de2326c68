use market_engine::{Price, PriceSnapshot, Symbol};
use rand::Rng;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

use crate::error::FeedError;

/// Largest per-tick move, as a fraction of the previous price.
pub const DEFAULT_VOLATILITY: f64 = 0.02;

/// Session universe and opening prices.
pub fn default_universe() -> Vec<(Symbol, Price)> {
    vec![
        ("GOOG".to_string(), dec!(140.00)),
        ("TSLA".to_string(), dec!(250.00)),
        ("AMZN".to_string(), dec!(130.00)),
        ("META".to_string(), dec!(300.00)),
        ("NVDA".to_string(), dec!(450.00)),
    ]
}

/// Random-walk generator over a fixed, ordered universe.
#[derive(Debug, Clone)]
pub struct PriceGenerator {
    volatility: f64,
    prices: Vec<(Symbol, Price)>,
}

impl PriceGenerator {
    /// # Errors
    /// [`FeedError::InvalidVolatility`] unless `0 < volatility <= 1`; the
    /// universe must be non-empty, unique and positively priced.
    pub fn new(seed: Vec<(Symbol, Price)>, volatility: f64) -> Result<Self, FeedError> {
        if !(volatility > 0.0 && volatility <= 1.0) {
            return Err(FeedError::InvalidVolatility(volatility));
        }
        if seed.is_empty() {
            return Err(FeedError::EmptyUniverse);
        }
        for (i, (symbol, price)) in seed.iter().enumerate() {
            if *price <= Decimal::ZERO {
                return Err(FeedError::InvalidSeedPrice {
                    symbol: symbol.clone(),
                    price: *price,
                });
            }
            if seed[..i].iter().any(|(s, _)| s == symbol) {
                return Err(FeedError::DuplicateSymbol(symbol.clone()));
            }
        }

        Ok(Self {
            volatility,
            prices: seed,
        })
    }

    /// Symbols in their configured order.
    pub fn universe(&self) -> Vec<Symbol> {
        self.prices.iter().map(|(s, _)| s.clone()).collect()
    }

    /// Current prices without advancing the walk.
    pub fn snapshot(&self) -> PriceSnapshot {
        self.prices.iter().cloned().collect()
    }

    /// Advance every price by one step and return the full snapshot.
    pub fn tick<R: Rng>(&mut self, rng: &mut R) -> PriceSnapshot {
        for (symbol, price) in self.prices.iter_mut() {
            let factor = rng.gen_range(-self.volatility..self.volatility);
            *price = step(*price, factor);
            tracing::trace!("{} -> {}", symbol, price);
        }
        self.snapshot()
    }
}

/// `price * (1 + factor)` rounded to cents, never below zero.
fn step(price: Price, factor: f64) -> Price {
    let change = price * Decimal::from_f64(factor).unwrap_or_default();
    (price + change)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_invalid_volatility() {
        for bad in [0.0, -0.1, 1.5, f64::NAN] {
            assert!(matches!(
                PriceGenerator::new(default_universe(), bad),
                Err(FeedError::InvalidVolatility(_))
            ));
        }
    }

    #[test]
    fn test_invalid_universe() {
        assert_eq!(
            PriceGenerator::new(vec![], DEFAULT_VOLATILITY).unwrap_err(),
            FeedError::EmptyUniverse
        );

        let dup = vec![("GOOG".to_string(), dec!(1)), ("GOOG".to_string(), dec!(2))];
        assert_eq!(
            PriceGenerator::new(dup, DEFAULT_VOLATILITY).unwrap_err(),
            FeedError::DuplicateSymbol("GOOG".into())
        );

        let zero = vec![("GOOG".to_string(), Decimal::ZERO)];
        assert!(matches!(
            PriceGenerator::new(zero, DEFAULT_VOLATILITY),
            Err(FeedError::InvalidSeedPrice { .. })
        ));
    }

    #[test]
    fn test_tick_covers_full_universe() {
        let mut generator = PriceGenerator::new(default_universe(), DEFAULT_VOLATILITY).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let snapshot = generator.tick(&mut rng);
        assert_eq!(snapshot.len(), 5);
        assert_eq!(generator.universe(), vec!["GOOG", "TSLA", "AMZN", "META", "NVDA"]);
    }

    #[test]
    fn test_moves_stay_within_band_and_cents() {
        let mut generator = PriceGenerator::new(default_universe(), DEFAULT_VOLATILITY).unwrap();
        let mut rng = StdRng::seed_from_u64(2024);
        let mut previous = generator.snapshot();

        for _ in 0..500 {
            let next = generator.tick(&mut rng);
            for (symbol, price) in &next {
                let prev = previous[symbol];
                let band = prev * dec!(0.02) + dec!(0.005);
                assert!((*price - prev).abs() <= band, "{symbol}: {prev} -> {price}");
                assert!(price.scale() <= 2);
                assert!(*price >= Decimal::ZERO);
            }
            previous = next;
        }
    }

    #[test]
    fn test_step_rounding() {
        assert_eq!(step(dec!(100.00), 0.01234), dec!(101.23));
        assert_eq!(step(dec!(100.00), -0.02), dec!(98.00));
        assert_eq!(step(dec!(0.01), -0.02), dec!(0.01));
    }
}

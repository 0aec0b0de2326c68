#[cfg(test)]
mod scenario_tests {
    use crate::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    const UNIVERSE: [&str; 5] = ["GOOG", "TSLA", "AMZN", "META", "NVDA"];

    fn snapshot(pairs: &[(&str, Decimal)]) -> PriceSnapshot {
        pairs.iter().map(|(s, p)| (s.to_string(), *p)).collect()
    }

    fn opening_prices() -> PriceSnapshot {
        snapshot(&[
            ("GOOG", dec!(140.00)),
            ("TSLA", dec!(250.00)),
            ("AMZN", dec!(130.00)),
            ("META", dec!(300.00)),
            ("NVDA", dec!(450.00)),
        ])
    }

    #[test]
    fn test_scenario_buy_debits_one_share() {
        let mut engine = MarketEngine::new(UNIVERSE);
        engine.apply_tick(&opening_prices());

        engine.buy("GOOG").unwrap();

        assert_eq!(engine.ledger().cash(), dec!(9860.00));
        assert_eq!(engine.ledger().holding("GOOG"), 1);
        let view = engine.view();
        assert_eq!(view.journal.len(), 1);
        assert_eq!(view.journal[0].side, TradeSide::Buy);
        assert_eq!(view.journal[0].cash_after, dec!(9860.00));
    }

    #[test]
    fn test_scenario_sell_without_shares() {
        let mut engine = MarketEngine::new(UNIVERSE);
        engine.apply_tick(&opening_prices());
        let before = engine.view();

        let err = engine.sell("GOOG").unwrap_err();

        assert_eq!(err, EngineError::NoHoldings("GOOG".into()));
        assert_eq!(engine.view(), before);
    }

    #[test]
    fn test_scenario_alert_fires_once() {
        let mut engine = MarketEngine::new(UNIVERSE);
        engine.toggle_watch("TSLA").unwrap();
        engine.set_alert("TSLA", 260.00).unwrap();

        let quiet = engine.apply_tick(&snapshot(&[("TSLA", dec!(255))]));
        assert!(quiet.fired.is_empty());
        assert!(quiet.view.banner.is_none());

        let loud = engine.apply_tick(&snapshot(&[("TSLA", dec!(261))]));
        assert_eq!(loud.fired.len(), 1);
        let banner = loud.view.banner.expect("banner after fire");
        assert!(banner.contains("TSLA"));
        assert!(banner.contains("$261.00"));
        assert!(banner.contains("target $260.00"));
        assert!(loud.view.quotes[0].alert_active);

        let again = engine.apply_tick(&snapshot(&[("TSLA", dec!(270))]));
        assert!(again.fired.is_empty());
    }

    #[test]
    fn test_scenario_watchlist_aggregate() {
        let mut engine = MarketEngine::new(UNIVERSE);
        engine.toggle_watch("GOOG").unwrap();
        engine.toggle_watch("TSLA").unwrap();

        let outcome = engine.apply_tick(&snapshot(&[("GOOG", dec!(140)), ("TSLA", dec!(260))]));

        let agg = outcome.view.watchlist.expect("two watched symbols are priced");
        assert_eq!(agg.count, 2);
        assert_eq!(agg.high, dec!(260));
        assert_eq!(agg.low, dec!(140));
        assert_eq!(agg.average, dec!(200));
    }

    #[test]
    fn test_watchlist_aggregate_empty_without_watch() {
        let mut engine = MarketEngine::new(UNIVERSE);
        let outcome = engine.apply_tick(&opening_prices());
        assert!(outcome.view.watchlist.is_none());
        assert_eq!(outcome.view.watched_count, 0);
    }

    #[test]
    fn test_scenario_journal_keeps_six() {
        let mut engine = MarketEngine::new(UNIVERSE);
        engine.apply_tick(&opening_prices());

        let order = ["GOOG", "TSLA", "AMZN", "META", "NVDA", "GOOG", "TSLA"];
        for symbol in order {
            engine.buy(symbol).unwrap();
        }

        let journal = engine.journal().all();
        assert_eq!(journal.len(), JOURNAL_CAPACITY);
        let symbols: Vec<&str> = journal.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["TSLA", "GOOG", "NVDA", "META", "AMZN", "TSLA"]);
    }

    #[test]
    fn test_rejected_alert_leaves_previous_alert() {
        let mut engine = MarketEngine::new(UNIVERSE);
        engine.set_alert("META", 310.0).unwrap();
        assert!(matches!(
            engine.set_alert("META", -1.0),
            Err(EngineError::InvalidAlert(_))
        ));
        assert_eq!(engine.alerts().get("META").map(|a| a.target), Some(dec!(310)));
    }
}

#[cfg(test)]
mod property_tests {
    use crate::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rust_decimal::Decimal;

    const UNIVERSE: [&str; 3] = ["GOOG", "TSLA", "NVDA"];

    fn random_snapshot(rng: &mut StdRng) -> PriceSnapshot {
        UNIVERSE
            .iter()
            .map(|s| (s.to_string(), Decimal::new(rng.gen_range(1..=200_000), 2)))
            .collect()
    }

    #[test]
    fn test_cash_and_holdings_never_negative() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut engine = MarketEngine::new(UNIVERSE);

        for _ in 0..2_000 {
            if rng.gen_bool(0.2) {
                engine.apply_tick(&random_snapshot(&mut rng));
            }
            let symbol = UNIVERSE[rng.gen_range(0..UNIVERSE.len())];
            let before = (engine.ledger().cash(), engine.ledger().holding(symbol));
            let result = if rng.gen_bool(0.5) {
                engine.buy(symbol)
            } else {
                engine.sell(symbol)
            };
            if result.is_err() {
                assert_eq!(
                    (engine.ledger().cash(), engine.ledger().holding(symbol)),
                    before
                );
            }
            assert!(engine.ledger().cash() >= Decimal::ZERO);
            assert!(engine.journal().len() <= JOURNAL_CAPACITY);
        }
    }

    #[test]
    fn test_history_is_most_recent_window() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut engine = MarketEngine::new(UNIVERSE);
        let mut seen: Vec<Price> = Vec::new();

        for _ in 0..180 {
            let tick = random_snapshot(&mut rng);
            seen.push(tick["TSLA"]);
            engine.apply_tick(&tick);

            let window = engine.history().get("TSLA");
            assert!(window.len() <= HISTORY_CAPACITY);
            let start = seen.len().saturating_sub(HISTORY_CAPACITY);
            assert_eq!(window, seen[start..].to_vec());
        }
    }

    #[test]
    fn test_buy_then_sell_restores_net_worth() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut engine = MarketEngine::new(UNIVERSE);

        for _ in 0..100 {
            engine.apply_tick(&random_snapshot(&mut rng));
            let symbol = UNIVERSE[rng.gen_range(0..UNIVERSE.len())];
            let before = engine.portfolio().net_worth;
            if engine.buy(symbol).is_ok() {
                engine.sell(symbol).unwrap();
                assert_eq!(engine.portfolio().net_worth, before);
            }
        }
    }
}

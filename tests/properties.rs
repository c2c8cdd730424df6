//! Property tests for detection invariants over arbitrary close series.

use hspd::prelude::*;
use proptest::prelude::*;
use proptest::sample::Index;

fn closes_strategy(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    // coarse integer levels produce plateaus and ties as well as clean peaks
    let level = prop_oneof![(1u8..12).prop_map(f64::from), 1.0f64..200.0];
    prop::collection::vec(level, 0..max_len)
}

fn bars_strategy(max_len: usize) -> impl Strategy<Value = Vec<PricePoint>> {
    prop::collection::vec((1.0f64..200.0, prop::option::of(0.0f64..5000.0)), 0..max_len).prop_map(
        |rows| {
            rows.into_iter()
                .map(|(c, v)| match v {
                    Some(v) => PricePoint::from_close(c).with_volume(v),
                    None => PricePoint::from_close(c),
                })
                .collect()
        },
    )
}

fn to_bars(closes: &[f64]) -> Vec<PricePoint> {
    closes.iter().map(|&c| PricePoint::from_close(c)).collect()
}

proptest! {
    #[test]
    fn short_series_yield_nothing(closes in closes_strategy(MIN_SERIES_LEN)) {
        let engine = PatternEngine::default();
        prop_assert!(engine.detect(&to_bars(&closes)).is_empty());
    }

    #[test]
    fn found_peaks_are_local_maxima(
        prices in prop::collection::vec(0.0f64..10.0, 1..60),
        a in any::<Index>(),
        b in any::<Index>(),
    ) {
        let (start, end) = {
            let (x, y) = (a.index(prices.len()), b.index(prices.len()));
            (x.min(y), x.max(y))
        };
        if let PeakSearch::Found(peak) = find_local_peak(&prices, start, end) {
            prop_assert!(peak.index >= start && peak.index <= end);
            prop_assert_eq!(prices[peak.index], peak.value);
            prop_assert!(prices[start..=end].iter().all(|&p| p <= peak.value));
            // first occurrence of the maximum
            prop_assert!(prices[start..peak.index].iter().all(|&p| p < peak.value));
            if peak.index > start {
                prop_assert!(prices[peak.index - 1] < peak.value);
            }
            if peak.index < end {
                prop_assert!(prices[peak.index + 1] < peak.value);
            }
        }
    }

    #[test]
    fn ranges_past_the_end_are_out_of_range(
        prices in prop::collection::vec(0.0f64..10.0, 0..30),
        extra in 0usize..10,
    ) {
        let len = prices.len();
        prop_assert_eq!(find_local_peak(&prices, 0, len + extra), PeakSearch::OutOfRange);
    }

    #[test]
    fn patterns_satisfy_shape_invariants(bars in bars_strategy(120)) {
        let engine = PatternEngine::default();
        for p in engine.detect(&bars) {
            prop_assert!(p.head_price > p.left_shoulder_price);
            prop_assert!(p.head_price > p.right_shoulder_price);
            prop_assert!((60..=95).contains(&p.confidence));
            prop_assert!(p.start_index < p.center_index && p.center_index < p.end_index);
            prop_assert!(p.center_index >= 10 && p.center_index < bars.len() - 10);
            prop_assert_eq!(p.left_shoulder_price, bars[p.start_index].close);
            prop_assert_eq!(p.right_shoulder_price, bars[p.end_index].close);
            prop_assert_eq!(p.signal.direction() == Direction::Bearish, p.kind == PatternKind::Top);
        }
    }

    #[test]
    fn output_is_ordered_and_separated(closes in closes_strategy(150)) {
        let bars = to_bars(&closes);
        for strategy in [DedupeStrategy::FirstWins, DedupeStrategy::HighestConfidence] {
            let engine = EngineBuilder::new().dedupe_strategy(strategy).build().unwrap();
            let patterns = engine.detect(&bars);
            for w in patterns.windows(2) {
                prop_assert!(w[0].center_index < w[1].center_index);
            }
            for (i, a) in patterns.iter().enumerate() {
                for b in &patterns[i + 1..] {
                    prop_assert!(a.center_index.abs_diff(b.center_index) >= DEDUPE_DISTANCE);
                }
            }
        }
    }

    #[test]
    fn dedupe_is_idempotent(closes in closes_strategy(150)) {
        let engine = PatternEngine::default();
        let once = engine.detect(&to_bars(&closes));
        prop_assert_eq!(dedupe(&once, DEDUPE_DISTANCE), once);
    }

    #[test]
    fn parallel_matches_sequential(bars in bars_strategy(150)) {
        let sequential = PatternEngine::default();
        let parallel = EngineBuilder::new().parallel(true).build().unwrap();
        prop_assert_eq!(parallel.candidates(&bars), sequential.candidates(&bars));
        prop_assert_eq!(parallel.detect(&bars), sequential.detect(&bars));
    }

    #[test]
    fn min_confidence_is_strict(closes in closes_strategy(150), floor in 0u8..100) {
        let engine = EngineBuilder::new().min_confidence(floor).build().unwrap();
        for p in engine.detect(&to_bars(&closes)) {
            prop_assert!(p.confidence > floor);
        }
    }
}

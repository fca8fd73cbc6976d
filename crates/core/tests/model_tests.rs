// ═══════════════════════════════════════════════════════════════════
// Model Tests — PriceSeries, DateRange, events, chart types, settings
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use gold_replay_core::models::chart::TrendColor;
use gold_replay_core::models::event::{default_events, EventId, HistoricalEvent};
use gold_replay_core::models::price::{DateRange, PricePoint, PriceSeries};
use gold_replay_core::models::settings::{AnimationSettings, FetchSettings, Granularity};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn series(points: &[(NaiveDate, f64)]) -> PriceSeries {
    PriceSeries::from_points(
        "test",
        points.iter().map(|&(date, price)| PricePoint::new(date, price)).collect(),
    )
}

// ═══════════════════════════════════════════════════════════════════
// PriceSeries — normalization
// ═══════════════════════════════════════════════════════════════════

mod price_series {
    use super::*;

    #[test]
    fn sorts_by_date() {
        let s = series(&[(d(2020, 1, 3), 3.0), (d(2020, 1, 1), 1.0), (d(2020, 1, 2), 2.0)]);
        let dates: Vec<_> = s.points().iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d(2020, 1, 1), d(2020, 1, 2), d(2020, 1, 3)]);
        assert_eq!(s.get(2).unwrap().price, 3.0);
    }

    #[test]
    fn dates_strictly_increasing_after_normalization() {
        let s = series(&[
            (d(2021, 5, 1), 10.0),
            (d(2019, 5, 1), 20.0),
            (d(2021, 5, 1), 11.0),
            (d(2020, 5, 1), 30.0),
            (d(2019, 5, 1), 21.0),
        ]);
        assert_eq!(s.len(), 3);
        assert!(s.points().windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn duplicate_date_keeps_last_seen_value() {
        let s = series(&[(d(2020, 1, 1), 1.0), (d(2020, 1, 1), 2.0)]);
        assert_eq!(s.len(), 1);
        assert_eq!(s.first().unwrap().price, 2.0);
    }

    #[test]
    fn keeps_nan_rows() {
        let s = series(&[(d(2020, 1, 1), 1500.5), (d(2020, 1, 2), f64::NAN)]);
        assert_eq!(s.len(), 2);
        assert!(s.last().unwrap().price.is_nan());
    }

    #[test]
    fn empty_series() {
        let s = PriceSeries::from_points("none", vec![]);
        assert!(s.is_empty());
        assert_eq!(s.len(), 0);
        assert!(s.first().is_none());
        assert_eq!(s.nearest_index(d(2020, 1, 1)), None);
    }

    #[test]
    fn source_name_is_kept() {
        let s = PriceSeries::from_points("FRED", vec![PricePoint::new(d(2020, 1, 1), 1.0)]);
        assert_eq!(s.source(), "FRED");
    }
}

// ═══════════════════════════════════════════════════════════════════
// PriceSeries — nearest row lookup
// ═══════════════════════════════════════════════════════════════════

mod nearest_index {
    use super::*;

    fn sample() -> PriceSeries {
        series(&[
            (d(2020, 1, 1), 1.0),
            (d(2020, 1, 5), 5.0),
            (d(2020, 1, 9), 9.0),
        ])
    }

    #[test]
    fn exact_match() {
        assert_eq!(sample().nearest_index(d(2020, 1, 5)), Some(1));
    }

    #[test]
    fn closer_to_next_row() {
        assert_eq!(sample().nearest_index(d(2020, 1, 4)), Some(1));
    }

    #[test]
    fn closer_to_previous_row() {
        assert_eq!(sample().nearest_index(d(2020, 1, 6)), Some(1));
    }

    #[test]
    fn tie_resolves_to_earlier_row() {
        // Jan 3 is two days from both Jan 1 and Jan 5.
        assert_eq!(sample().nearest_index(d(2020, 1, 3)), Some(0));
        assert_eq!(sample().nearest_index(d(2020, 1, 7)), Some(1));
    }

    #[test]
    fn before_first_and_after_last() {
        assert_eq!(sample().nearest_index(d(2019, 6, 1)), Some(0));
        assert_eq!(sample().nearest_index(d(2030, 1, 1)), Some(2));
    }
}

// ═══════════════════════════════════════════════════════════════════
// DateRange
// ═══════════════════════════════════════════════════════════════════

mod date_range {
    use super::*;

    #[test]
    fn explicit_bounds_win() {
        let r = DateRange::new(Some(d(2000, 1, 1)), Some(d(2001, 1, 1)));
        assert_eq!(r.resolve(d(1968, 1, 1)), (d(2000, 1, 1), d(2001, 1, 1)));
    }

    #[test]
    fn missing_start_uses_default() {
        let r = DateRange::new(None, Some(d(2001, 1, 1)));
        assert_eq!(r.resolve(d(1968, 1, 1)).0, d(1968, 1, 1));
    }

    #[test]
    fn missing_end_is_today() {
        let today = chrono::Utc::now().date_naive();
        let (_, end) = DateRange::default().resolve(d(1968, 1, 1));
        // Allow for a midnight rollover between the two calls.
        assert!(end == today || end == today.succ_opt().unwrap());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Events
// ═══════════════════════════════════════════════════════════════════

mod events {
    use super::*;

    #[test]
    fn default_table() {
        let events = default_events();
        assert_eq!(events.len(), 6);
        assert_eq!(events[0].label, "Dot-com Bubble Bursts");
        assert_eq!(events[0].date, d(2000, 3, 10));
        assert_eq!(events[2].offset_fraction, -0.15);
        assert_eq!(events[5].label, "COVID-19 Pandemic");
        assert_eq!(events[5].date, d(2020, 3, 11));
    }

    #[test]
    fn default_table_is_chronological() {
        let events = default_events();
        assert!(events.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn new_event() {
        let e = HistoricalEvent::new(d(1971, 8, 15), "Nixon Shock", 0.1);
        assert_eq!(e.label, "Nixon Shock");
        assert_eq!(e.offset_fraction, 0.1);
    }

    #[test]
    fn event_id_display() {
        assert_eq!(EventId(3).to_string(), "event#3");
    }
}

// ═══════════════════════════════════════════════════════════════════
// TrendColor
// ═══════════════════════════════════════════════════════════════════

mod trend_color {
    use super::*;

    #[test]
    fn rise_is_up() {
        assert_eq!(TrendColor::for_move(100.0, 110.0), TrendColor::Up);
    }

    #[test]
    fn fall_is_down() {
        assert_eq!(TrendColor::for_move(110.0, 90.0), TrendColor::Down);
    }

    #[test]
    fn tie_is_up() {
        assert_eq!(TrendColor::for_move(100.0, 100.0), TrendColor::Up);
    }

    #[test]
    fn sign() {
        assert_eq!(TrendColor::for_sign(0.0), TrendColor::Up);
        assert_eq!(TrendColor::for_sign(2.5), TrendColor::Up);
        assert_eq!(TrendColor::for_sign(-0.01), TrendColor::Down);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Settings defaults
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    #[test]
    fn fetch_defaults() {
        let s = FetchSettings::default();
        assert_eq!(s.ticker, "GC=F");
        assert_eq!(s.fred_series, "GOLDPMGBD228NLBM");
        assert_eq!(s.ticker_start, d(1970, 1, 1));
        assert_eq!(s.fred_start, d(1968, 1, 1));
        assert_eq!(s.macrotrends_granularity, Granularity::Annual);
    }

    #[test]
    fn animation_defaults() {
        let s = AnimationSettings::default();
        assert_eq!(s.x_padding_days, 180);
        assert_eq!(s.y_margin, 0.05);
        assert_eq!(s.frame_step, 1);
        assert_eq!(s.up_color, (0x2E, 0xCC, 0x71));
        assert_eq!(s.down_color, (0xE7, 0x4C, 0x3C));
    }

    #[test]
    fn granularity_query() {
        assert_eq!(Granularity::Annual.as_query(), "annual");
        assert_eq!(Granularity::Monthly.to_string(), "monthly");
    }

    #[test]
    fn settings_serde_roundtrip() {
        let s = FetchSettings::default();
        let json = serde_json::to_string(&s).unwrap();
        let back: FetchSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.ticker, s.ticker);
        assert_eq!(back.macrotrends_granularity, s.macrotrends_granularity);
    }
}

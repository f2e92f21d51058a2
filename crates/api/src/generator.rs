//! Random forecast generation

use chrono::{Days, Local, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::Range;
use storage::NewForecast;

/// Summary vocabulary
pub const SUMMARIES: [&str; 5] = ["Freezing", "Chilly", "Mild", "Warm", "Hot"];

/// Temperature range in Celsius, upper bound exclusive
pub const TEMPERATURE_RANGE_C: Range<i32> = -20..55;

/// Forecasts per batch, one per day starting tomorrow
pub const FORECAST_DAYS: u64 = 5;

/// Today's date in the server's local time zone
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Build one batch of forecasts for the days after `today`
pub fn generate_batch<R: Rng + ?Sized>(today: NaiveDate, rng: &mut R) -> Vec<NewForecast> {
    (1..=FORECAST_DAYS)
        .map(|offset| NewForecast {
            date: today + Days::new(offset),
            temperature_c: rng.gen_range(TEMPERATURE_RANGE_C),
            summary: SUMMARIES
                .choose(rng)
                .copied()
                .unwrap_or(SUMMARIES[0])
                .to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_year_batch_dates() {
        let mut rng = StdRng::seed_from_u64(1);
        let batch = generate_batch(date(2024, 1, 1), &mut rng);

        let dates: Vec<_> = batch.iter().map(|f| f.date).collect();
        assert_eq!(
            dates,
            vec![
                date(2024, 1, 2),
                date(2024, 1, 3),
                date(2024, 1, 4),
                date(2024, 1, 5),
                date(2024, 1, 6),
            ]
        );
    }

    #[test]
    fn test_batch_crosses_month_end() {
        let mut rng = StdRng::seed_from_u64(2);
        let batch = generate_batch(date(2024, 2, 27), &mut rng);

        assert_eq!(batch[0].date, date(2024, 2, 28));
        assert_eq!(batch[1].date, date(2024, 2, 29));
        assert_eq!(batch[4].date, date(2024, 3, 3));
    }

    #[test]
    fn test_summaries_cover_vocabulary() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = std::collections::HashSet::new();

        for _ in 0..200 {
            for forecast in generate_batch(date(2024, 6, 1), &mut rng) {
                seen.insert(forecast.summary);
            }
        }

        assert_eq!(seen.len(), SUMMARIES.len());
    }

    proptest! {
        #[test]
        fn prop_batch_invariants(
            seed in any::<u64>(),
            days_since_epoch in 0i64..100_000,
        ) {
            let today = date(1970, 1, 1) + chrono::Duration::days(days_since_epoch);
            let mut rng = StdRng::seed_from_u64(seed);
            let batch = generate_batch(today, &mut rng);

            prop_assert_eq!(batch.len(), 5);
            for (i, forecast) in batch.iter().enumerate() {
                prop_assert!(forecast.date > today);
                prop_assert_eq!((forecast.date - today).num_days(), i as i64 + 1);
                prop_assert!(TEMPERATURE_RANGE_C.contains(&forecast.temperature_c));
                prop_assert!(SUMMARIES.contains(&forecast.summary.as_str()));
            }
        }
    }
}

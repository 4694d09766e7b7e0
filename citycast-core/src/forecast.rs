//! Reduction of a 3-hourly forecast to one sample per day.

use std::collections::{BTreeMap, btree_map::Entry};

use chrono::{NaiveDate, NaiveDateTime, TimeZone};

use crate::model::ForecastSample;

/// Pick the sample closest to local noon for every calendar day in `tz`.
///
/// Returns at most one sample per distinct date, sorted by timestamp.
/// Equidistant samples resolve to the earlier timestamp; samples with the
/// same timestamp resolve to the first one in input order.
pub fn daily_forecast<Tz: TimeZone>(samples: &[ForecastSample], tz: &Tz) -> Vec<ForecastSample> {
    let mut best: BTreeMap<NaiveDate, (i64, &ForecastSample)> = BTreeMap::new();

    for sample in samples {
        let local = sample.time().with_timezone(tz).naive_local();
        let date = local.date();
        let distance = distance_from_noon(sample.dt, local, tz);

        match best.entry(date) {
            Entry::Vacant(slot) => {
                slot.insert((distance, sample));
            }
            Entry::Occupied(mut slot) => {
                let (best_distance, current) = *slot.get();
                if distance < best_distance || (distance == best_distance && sample.dt < current.dt) {
                    slot.insert((distance, sample));
                }
            }
        }
    }

    let mut picks: Vec<ForecastSample> = best.into_values().map(|(_, s)| s.clone()).collect();
    picks.sort_by_key(|s| s.dt);
    picks
}

/// Seconds between `ts` and 12:00 on the local date of `local`.
///
/// When noon does not exist on that date (DST gap) the distance is measured
/// in wall-clock time instead.
fn distance_from_noon<Tz: TimeZone>(ts: i64, local: NaiveDateTime, tz: &Tz) -> i64 {
    let Some(noon) = local.date().and_hms_opt(12, 0, 0) else {
        return 0;
    };

    match tz.from_local_datetime(&noon).earliest() {
        Some(instant) => (ts - instant.timestamp()).abs(),
        None => (local - noon).num_seconds().abs(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Utc};

    use super::*;
    use crate::model::{Clouds, Condition, MainMetrics, Wind};

    const DAY_START: i64 = 1_728_864_000; // 2024-10-14 00:00:00 UTC
    const THREE_HOURS: i64 = 3 * 3600;

    fn sample(dt: i64) -> ForecastSample {
        ForecastSample {
            dt,
            main: MainMetrics {
                temp: 10.0,
                feels_like: 9.0,
                temp_min: 8.0,
                temp_max: 12.0,
                pressure: 1012,
                humidity: 70,
            },
            conditions: vec![Condition {
                id: 800,
                main: "Clear".into(),
                description: "clear sky".into(),
                icon: "01d".into(),
            }],
            clouds: Clouds { all: 0 },
            wind: Wind { speed: 2.0, deg: 90 },
            visibility: 10_000,
            pop: 0.0,
            dt_txt: String::new(),
        }
    }

    fn series(start: i64, count: i64) -> Vec<ForecastSample> {
        (0..count).map(|i| sample(start + i * THREE_HOURS)).collect()
    }

    #[test]
    fn single_day_selects_noon_exactly() {
        let samples = series(DAY_START, 8);
        let daily = daily_forecast(&samples, &Utc);

        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].dt, DAY_START + 12 * 3600);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(daily_forecast(&[], &Utc).is_empty());
    }

    #[test]
    fn lone_sample_is_selected_regardless_of_distance() {
        let samples = vec![sample(DAY_START + 21 * 3600)];
        let daily = daily_forecast(&samples, &Utc);

        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].dt, DAY_START + 21 * 3600);
    }

    #[test]
    fn five_day_window_gives_one_sorted_sample_per_day() {
        // 40 samples starting 09:00 UTC cover six calendar days in UTC+05:30.
        let tz = FixedOffset::east_opt(5 * 3600 + 1800).expect("offset");
        let samples = series(DAY_START + 9 * 3600, 40);
        let daily = daily_forecast(&samples, &tz);

        let dates: Vec<NaiveDate> =
            daily.iter().map(|s| s.time().with_timezone(&tz).date_naive()).collect();
        let mut distinct = dates.clone();
        distinct.dedup();

        assert_eq!(dates, distinct);
        assert_eq!(daily.len(), 6);
        assert!(daily.windows(2).all(|w| w[0].dt < w[1].dt));
        assert_eq!(daily.iter().take(5).count(), 5);
    }

    #[test]
    fn output_is_sorted_even_when_input_is_shuffled() {
        let mut samples = series(DAY_START, 16);
        samples.reverse();
        samples.swap(3, 11);

        let daily = daily_forecast(&samples, &Utc);
        assert_eq!(
            daily.iter().map(|s| s.dt).collect::<Vec<_>>(),
            vec![DAY_START + 12 * 3600, DAY_START + 36 * 3600]
        );
    }

    #[test]
    fn equidistant_samples_pick_the_earlier_one() {
        // 10:30 and 13:30 local are both 90 minutes from noon.
        let later = sample(DAY_START + 13 * 3600 + 1800);
        let earlier = sample(DAY_START + 10 * 3600 + 1800);

        let daily = daily_forecast(&[later, earlier.clone()], &Utc);
        assert_eq!(daily, vec![earlier]);
    }

    #[test]
    fn noon_is_measured_in_the_given_time_zone() {
        // In UTC-03:00 the 15:00 UTC sample is local noon.
        let tz = FixedOffset::west_opt(3 * 3600).expect("offset");
        let samples = series(DAY_START + 3 * 3600, 8);
        let daily = daily_forecast(&samples, &tz);

        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].dt, DAY_START + 15 * 3600);
    }
}

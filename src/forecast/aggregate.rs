use chrono::{DateTime, NaiveDate, TimeZone};
use indexmap::IndexMap;

use super::models::{DailySummary, HourlySummary, Sample};
use crate::units::round_half_up;

/// At most one week of daily rollups
pub const MAX_DAILY_SUMMARIES: usize = 7;

/// 8 x 3h = the next 24 hours
pub const MAX_HOURLY_SUMMARIES: usize = 8;

/// Roll samples up into one summary per calendar day in `tz`.
///
/// Days are emitted in the order they are first seen in `samples` and only
/// the first [`MAX_DAILY_SUMMARIES`] days are kept. The temperature is the
/// rounded mean of the day, min/max are the extrema of the day, and every
/// other field comes from the sample at index `len / 2` of that day.
pub fn build_daily_summaries<Tz: TimeZone>(samples: &[Sample], tz: &Tz) -> Vec<DailySummary> {
    let mut days: IndexMap<NaiveDate, Vec<&Sample>> = IndexMap::new();

    for sample in samples {
        let Some(date) = local_date(sample.timestamp, tz) else {
            tracing::warn!(
                timestamp = sample.timestamp,
                "Skipping forecast sample with unrepresentable timestamp"
            );
            continue;
        };
        days.entry(date).or_default().push(sample);
    }

    days.into_values()
        .take(MAX_DAILY_SUMMARIES)
        .map(|day| summarize_day(&day))
        .collect()
}

/// The next 24 hours: the first [`MAX_HOURLY_SUMMARIES`] samples, unreduced
pub fn build_hourly_summaries(samples: &[Sample]) -> Vec<HourlySummary> {
    samples
        .iter()
        .take(MAX_HOURLY_SUMMARIES)
        .map(HourlySummary::from)
        .collect()
}

fn local_date<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|utc| utc.with_timezone(tz).date_naive())
}

// `day` is never empty: a group only exists once a sample has been pushed.
fn summarize_day(day: &[&Sample]) -> DailySummary {
    let representative = day[day.len() / 2];

    let total: i64 = day.iter().map(|s| i64::from(s.temperature)).sum();
    let temperature = round_half_up(total as f64 / day.len() as f64);

    // A sample's own min/max may be inconsistent with its temperature, so
    // fold the temperature in to keep min <= mean <= max.
    let temperature_min = day
        .iter()
        .map(|s| s.temperature_min.min(s.temperature))
        .fold(i32::MAX, i32::min);
    let temperature_max = day
        .iter()
        .map(|s| s.temperature_max.max(s.temperature))
        .fold(i32::MIN, i32::max);

    DailySummary {
        timestamp: representative.timestamp,
        temperature,
        temperature_min,
        temperature_max,
        feels_like: representative.feels_like,
        humidity: representative.humidity,
        wind_speed_kph: representative.wind_speed_kph,
        precipitation_probability: representative.precipitation_probability,
        condition_main: representative.condition_main.clone(),
        condition_description: representative.condition_description.clone(),
        icon_id: representative.icon_id.clone(),
    }
}

impl From<&Sample> for HourlySummary {
    fn from(s: &Sample) -> Self {
        HourlySummary {
            timestamp: s.timestamp,
            temperature: s.temperature,
            feels_like: s.feels_like,
            humidity: s.humidity,
            wind_speed_kph: s.wind_speed_kph,
            precipitation_probability: s.precipitation_probability,
            condition_main: s.condition_main.clone(),
            condition_description: s.condition_description.clone(),
            icon_id: s.icon_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    /// 2023-11-14 00:00:00 UTC
    const DAY1: i64 = 1_699_920_000;
    const HOUR: i64 = 3600;
    const DAY: i64 = 86_400;

    fn sample(timestamp: i64, temperature: i32) -> Sample {
        Sample {
            timestamp,
            temperature,
            feels_like: temperature - 1,
            temperature_min: temperature,
            temperature_max: temperature,
            humidity: 60,
            wind_speed_kph: 12,
            precipitation_probability: 20,
            condition_main: "Clouds".to_string(),
            condition_description: "scattered clouds".to_string(),
            icon_id: "03d".to_string(),
        }
    }

    /// 8 samples per day, 3 hours apart
    fn day_of_samples(day_start: i64, temps: &[i32]) -> Vec<Sample> {
        temps
            .iter()
            .enumerate()
            .map(|(i, t)| sample(day_start + i as i64 * 3 * HOUR, *t))
            .collect()
    }

    #[test]
    fn test_empty_input_gives_empty_output() {
        assert!(build_daily_summaries(&[], &Utc).is_empty());
        assert!(build_hourly_summaries(&[]).is_empty());
    }

    #[test]
    fn test_two_days_of_samples() {
        let mut samples = day_of_samples(DAY1, &[10, 12, 14, 16, 18, 20, 22, 24]);
        samples.extend(day_of_samples(DAY1 + DAY, &[8, 10, 12, 14, 16, 18, 20, 22]));

        let daily = build_daily_summaries(&samples, &Utc);

        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].temperature, 17);
        assert_eq!(daily[0].temperature_min, 10);
        assert_eq!(daily[0].temperature_max, 24);
        assert_eq!(daily[1].temperature, 15);
        assert_eq!(daily[1].temperature_min, 8);
        assert_eq!(daily[1].temperature_max, 22);
    }

    #[test]
    fn test_representative_sample_is_middle_index() {
        let mut samples = day_of_samples(DAY1, &[5, 6, 7]);
        samples[0].humidity = 10;
        samples[1].humidity = 55;
        samples[1].condition_main = "Rain".to_string();
        samples[1].precipitation_probability = 80;
        samples[2].humidity = 90;

        let daily = build_daily_summaries(&samples, &Utc);

        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].timestamp, samples[1].timestamp);
        assert_eq!(daily[0].humidity, 55);
        assert_eq!(daily[0].condition_main, "Rain");
        assert_eq!(daily[0].precipitation_probability, 80);
        assert_eq!(daily[0].feels_like, 5);
    }

    #[test]
    fn test_even_sized_day_uses_upper_middle() {
        let samples = day_of_samples(DAY1, &[1, 2, 3, 4]);
        let daily = build_daily_summaries(&samples, &Utc);
        assert_eq!(daily[0].timestamp, samples[2].timestamp);
    }

    #[test]
    fn test_caps_at_seven_days() {
        let samples: Vec<Sample> = (0..10).map(|d| sample(DAY1 + d * DAY, d as i32)).collect();

        let daily = build_daily_summaries(&samples, &Utc);

        assert_eq!(daily.len(), MAX_DAILY_SUMMARIES);
        assert_eq!(daily[0].timestamp, DAY1);
        assert_eq!(daily[6].timestamp, DAY1 + 6 * DAY);
    }

    #[test]
    fn test_day_count_matches_distinct_dates() {
        for days in 1..=9 {
            let samples: Vec<Sample> = (0..days * 4)
                .map(|i| sample(DAY1 + i * 6 * HOUR, 0))
                .collect();
            let daily = build_daily_summaries(&samples, &Utc);
            assert_eq!(daily.len(), (days as usize).min(MAX_DAILY_SUMMARIES));
        }
    }

    #[test]
    fn test_days_keep_first_seen_order() {
        let samples = vec![
            sample(DAY1 + DAY, 20),
            sample(DAY1, 10),
            sample(DAY1 + DAY + 3 * HOUR, 22),
        ];

        let daily = build_daily_summaries(&samples, &Utc);

        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].temperature, 21);
        assert_eq!(daily[1].temperature, 10);
    }

    #[test]
    fn test_grouping_follows_timezone() {
        // 21:00 and 00:00 UTC fall on different UTC dates but on the same
        // date three hours east of UTC.
        let samples = vec![sample(DAY1 + 21 * HOUR, 10), sample(DAY1 + 24 * HOUR, 14)];

        assert_eq!(build_daily_summaries(&samples, &Utc).len(), 2);

        let east = FixedOffset::east_opt(3 * 3600).unwrap();
        let daily = build_daily_summaries(&samples, &east);
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].temperature, 12);
    }

    #[test]
    fn test_named_timezone_grouping() {
        // 2023-11-14 03:00 UTC is still 2023-11-13 in Chicago (UTC-6)
        let samples = vec![sample(DAY1 + 3 * HOUR, 1), sample(DAY1 + 9 * HOUR, 3)];

        let daily = build_daily_summaries(&samples, &chrono_tz::America::Chicago);
        assert_eq!(daily.len(), 2);
    }

    #[test]
    fn test_mean_stays_within_extrema() {
        let mut samples = day_of_samples(DAY1, &[-3, -2, 4, 9, 1]);
        // Upstream min/max that disagree with the temperature itself
        samples[3].temperature_min = 12;
        samples[0].temperature_max = -10;
        samples[2].temperature_min = -8;

        let daily = build_daily_summaries(&samples, &Utc);

        for day in &daily {
            assert!(day.temperature_min <= day.temperature);
            assert!(day.temperature <= day.temperature_max);
        }
        assert_eq!(daily[0].temperature_min, -8);
        assert_eq!(daily[0].temperature_max, 9);
    }

    #[test]
    fn test_negative_mean_rounds_half_up() {
        let samples = day_of_samples(DAY1, &[-2, -3]);
        let daily = build_daily_summaries(&samples, &Utc);
        assert_eq!(daily[0].temperature, -2);
    }

    #[test]
    fn test_hourly_is_first_eight_in_order() {
        for n in 0..12 {
            let samples: Vec<Sample> = (0..n)
                .map(|i| sample(DAY1 + i * 3 * HOUR, i as i32))
                .collect();

            let hourly = build_hourly_summaries(&samples);

            assert_eq!(hourly.len(), (n as usize).min(MAX_HOURLY_SUMMARIES));
            for (summary, original) in hourly.iter().zip(&samples) {
                assert_eq!(summary.timestamp, original.timestamp);
                assert_eq!(summary.temperature, original.temperature);
            }
        }
    }

    #[test]
    fn test_hourly_carries_sample_fields() {
        let mut s = sample(DAY1, 18);
        s.precipitation_probability = 45;
        s.icon_id = "10n".to_string();

        let hourly = build_hourly_summaries(std::slice::from_ref(&s));

        assert_eq!(hourly[0].precipitation_probability, 45);
        assert_eq!(hourly[0].icon_id, "10n");
        assert_eq!(hourly[0].feels_like, 17);
        assert_eq!(hourly[0].wind_speed_kph, 12);
    }
}

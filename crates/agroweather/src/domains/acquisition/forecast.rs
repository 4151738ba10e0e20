use rand::Rng;
use time::{Date, Duration, Weekday};

use crate::{
    formulas::round_half_up, Capability, ConditionCategory, ForecastEntry, ForecastPoint,
    WeatherSnapshot,
};

pub const FORECAST_DAYS: usize = 5;

/// Provider forecast points are 3 hours apart, so every 8th is a day later.
pub const POINTS_PER_DAY: usize = 8;

/// Placeholder conditions for extrapolated days 1..=4: (temperature spread, group, description).
const PLACEHOLDER_DAYS: [(f64, &str, &str); 4] = [
    (3.0, "Clouds", "Partly cloudy"),
    (4.0, "Clear", "Sunny"),
    (3.0, "Rain", "Light rain"),
    (3.0, "Clouds", "Cloudy"),
];

fn short_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "Mon",
        Weekday::Tuesday => "Tue",
        Weekday::Wednesday => "Wed",
        Weekday::Thursday => "Thu",
        Weekday::Friday => "Fri",
        Weekday::Saturday => "Sat",
        Weekday::Sunday => "Sun",
    }
}

pub fn day_label(index: usize, date: Date) -> String {
    if index == 0 {
        String::from("Today")
    } else {
        short_weekday(date.weekday()).to_string()
    }
}

/// Down-samples raw points to one per day, at most `FORECAST_DAYS`.
pub fn daily_entries(points: &[ForecastPoint]) -> Vec<ForecastEntry> {
    points
        .iter()
        .step_by(POINTS_PER_DAY)
        .take(FORECAST_DAYS)
        .enumerate()
        .map(|(index, point)| {
            let date = point.timestamp_utc.date();
            ForecastEntry {
                day_label: day_label(index, date),
                date,
                temperature_c: point.temperature_c,
                condition: point.condition.clone(),
                condition_description: point.condition_description.clone(),
            }
        })
        .collect()
}

/// Extrapolates the entry for `day` days after the current snapshot.
/// Day 0 echoes current conditions.
pub fn synthesize_entry<R: Rng + ?Sized>(
    current: &WeatherSnapshot,
    day: usize,
    rng: &mut R,
) -> ForecastEntry {
    let date = current
        .timestamp_utc
        .date()
        .saturating_add(Duration::days(day as i64));

    if day == 0 {
        return ForecastEntry {
            day_label: day_label(0, date),
            date,
            temperature_c: round_half_up(current.temperature_c) as f64,
            condition: current.condition.clone(),
            condition_description: current.condition_description.clone(),
        };
    }

    let (spread, group, description) = PLACEHOLDER_DAYS[(day - 1) % PLACEHOLDER_DAYS.len()];
    let temperature = current.temperature_c + rng.gen_range(-spread..spread);
    ForecastEntry {
        day_label: day_label(day, date),
        date,
        temperature_c: round_half_up(temperature) as f64,
        condition: ConditionCategory::from(group),
        condition_description: description.to_string(),
    }
}

/// Always returns exactly `FORECAST_DAYS` entries. Missing days, or all of
/// them when the forecast is unavailable, are extrapolated from `current`.
/// The flag reports whether any entry was extrapolated.
pub fn assemble_forecast<R: Rng + ?Sized>(
    current: &WeatherSnapshot,
    forecast: Capability<Vec<ForecastPoint>>,
    rng: &mut R,
) -> (Vec<ForecastEntry>, bool) {
    let mut entries = match forecast {
        Capability::Available(points) => daily_entries(&points),
        Capability::Unavailable { .. } => Vec::with_capacity(FORECAST_DAYS),
    };

    let synthesized = entries.len() < FORECAST_DAYS;
    while entries.len() < FORECAST_DAYS {
        let day = entries.len();
        entries.push(synthesize_entry(current, day, rng));
    }
    (entries, synthesized)
}

//! Reshaping OpenWeatherMap documents into the frontend payload.
//!
//! Pure functions, no I/O. Temperatures are rounded to integers, text
//! descriptions capitalized, and the 3-hour forecast readings collapsed
//! into at most five daily entries.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::types::{CurrentConditions, ForecastDay, WeatherReport};
use crate::upstream::openweather::{CurrentResponse, ForecastEntry, ForecastResponse};

/// Maximum number of daily forecast entries emitted.
const MAX_FORECAST_DAYS: usize = 5;

/// Build the lean frontend payload from the two upstream documents.
pub fn normalize(current: &CurrentResponse, forecast: &ForecastResponse) -> WeatherReport {
    let (desc, icon) = current
        .weather
        .first()
        .map(|w| (capitalize(&w.description), w.icon.clone()))
        .unwrap_or_default();

    let now = CurrentConditions {
        temp: current.main.temp.round() as i64,
        feels_like: current.main.feels_like.round() as i64,
        desc,
        icon,
        humidity: current.main.humidity,
        wind: round_to_tenth(current.wind.speed),
    };

    WeatherReport {
        city: current.name.clone(),
        country: current.sys.country.clone(),
        now,
        forecast: daily_forecast(forecast),
    }
}

/// One entry per calendar date, up to five, sorted ascending by date.
///
/// The noon reading represents the day (first reading of the date if no
/// noon reading exists); min/max span every reading of that date. No
/// explicit "skip today" — grouping by date is the whole of the logic.
fn daily_forecast(forecast: &ForecastResponse) -> Vec<ForecastDay> {
    let mut days: BTreeMap<NaiveDate, Vec<&ForecastEntry>> = BTreeMap::new();
    for entry in &forecast.list {
        let Some(date) = entry_date(entry) else {
            continue;
        };
        days.entry(date).or_default().push(entry);
    }

    days.iter()
        .take(MAX_FORECAST_DAYS)
        .map(|(date, readings)| {
            let noon = readings
                .iter()
                .find(|r| r.dt_txt.contains("12:00"))
                .unwrap_or(&readings[0]);
            let (desc, icon) = noon
                .weather
                .first()
                .map(|w| (capitalize(&w.description), w.icon.clone()))
                .unwrap_or_default();

            let min = readings
                .iter()
                .map(|r| r.main.temp_min)
                .fold(f64::INFINITY, f64::min);
            let max = readings
                .iter()
                .map(|r| r.main.temp_max)
                .fold(f64::NEG_INFINITY, f64::max);

            ForecastDay {
                date: date.format("%Y-%m-%d").to_string(),
                min: min.round() as i64,
                max: max.round() as i64,
                desc,
                icon,
            }
        })
        .collect()
}

/// Calendar date from the "YYYY-MM-DD" prefix of a reading timestamp.
/// Readings with an unparseable timestamp are dropped.
fn entry_date(entry: &ForecastEntry) -> Option<NaiveDate> {
    let prefix = entry.dt_txt.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

/// Python-style capitalize: first character uppercased, the rest lowercased.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn round_to_tenth(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

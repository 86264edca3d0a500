//! Display-ready values derived from an aggregate result.
//!
//! This is the only place temperatures are converted out of Celsius.

use chrono::{DateTime, NaiveDate, Timelike, Utc};

use crate::{
    aggregator::{AggregateResult, DataSource},
    model::{ForecastSample, WeatherAlert},
    units::{TemperatureUnit, to_display},
};

pub const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";
pub const DEFAULT_BACKGROUND: &str = "oklch(20.8% 0.042 265.755)";

/// `None` when the provider sent no icon.
pub fn icon_url(icon_id: &str) -> Option<String> {
    let icon_id = icon_id.trim();
    (!icon_id.is_empty()).then(|| format!("{ICON_BASE_URL}/{icon_id}@4x.png"))
}

pub fn air_quality_label(index: u8) -> &'static str {
    match index {
        1 => "Good",
        2 => "Fair",
        3 => "Moderate",
        4 => "Poor",
        5 => "Very Poor",
        _ => "Unknown",
    }
}

/// Overall feel of the current conditions, used to pick the page background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    ClearDay,
    ClearNight,
    Clouds,
    Rain,
    Storm,
    Snow,
    Mist,
    Unknown,
}

impl Mood {
    /// Map an OpenWeather icon id such as `10n` to a mood.
    pub fn from_icon(icon_id: &str) -> Self {
        let night = icon_id.ends_with('n');
        match icon_id.get(..2) {
            Some("01") if night => Mood::ClearNight,
            Some("01") => Mood::ClearDay,
            Some("02" | "03" | "04") => Mood::Clouds,
            Some("09" | "10") => Mood::Rain,
            Some("11") => Mood::Storm,
            Some("13") => Mood::Snow,
            Some("50") => Mood::Mist,
            _ => Mood::Unknown,
        }
    }

    pub fn background(&self) -> &'static str {
        match self {
            Mood::ClearDay => "linear-gradient(#4facfe, #00f2fe)",
            Mood::ClearNight => "linear-gradient(#0f2027, #2c5364)",
            Mood::Clouds => "linear-gradient(#757f9a, #d7dde8)",
            Mood::Rain => "linear-gradient(#4b6cb7, #182848)",
            Mood::Storm => "linear-gradient(#232526, #414345)",
            Mood::Snow => "linear-gradient(#e6dada, #274046)",
            Mood::Mist => "linear-gradient(#606c88, #3f4c6b)",
            Mood::Unknown => DEFAULT_BACKGROUND,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::ClearDay => "clear",
            Mood::ClearNight => "clear night",
            Mood::Clouds => "cloudy",
            Mood::Rain => "rainy",
            Mood::Storm => "stormy",
            Mood::Snow => "snowy",
            Mood::Mist => "misty",
            Mood::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentView {
    pub place: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub description: String,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub description: String,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub min: f64,
    pub max: f64,
    /// Conditions of the sample closest to midday.
    pub description: String,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyPoint {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AirQualityView {
    pub index: u8,
    pub label: &'static str,
}

/// Everything the presentation layer needs. Failed kinds are simply absent or empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub unit: TemperatureUnit,
    pub source: DataSource,
    pub mood: Mood,
    pub background: &'static str,
    pub current: Option<CurrentView>,
    pub forecast: Vec<ForecastPoint>,
    pub daily: Vec<DailySummary>,
    pub hourly: Vec<HourlyPoint>,
    pub alerts: Vec<WeatherAlert>,
    pub air_quality: Option<AirQualityView>,
    /// Why current conditions are missing from a live result.
    pub weather_error: Option<String>,
    /// Set only when nothing at all could be shown.
    pub notice: Option<String>,
}

impl ViewModel {
    pub fn build(result: &AggregateResult, unit: TemperatureUnit) -> Self {
        let convert = |celsius: f64| to_display(celsius, unit);

        let current = result.weather.as_ref().ok().map(|w| CurrentView {
            place: w.place_name.clone(),
            temperature: convert(w.temperature_c),
            feels_like: convert(w.feels_like_c),
            humidity_pct: w.humidity_pct,
            wind_speed_mps: w.wind_speed_mps,
            description: w.description.clone(),
            icon_url: icon_url(&w.icon_id),
        });

        let mood = result
            .weather
            .as_ref()
            .map(|w| Mood::from_icon(&w.icon_id))
            .unwrap_or(Mood::Unknown);

        let samples: &[ForecastSample] = result
            .forecast
            .as_ref()
            .map(|f| f.0.as_slice())
            .unwrap_or_default();

        let forecast = samples
            .iter()
            .map(|s| ForecastPoint {
                timestamp: s.timestamp,
                temperature: convert(s.temperature_c),
                description: s.description.clone(),
                icon_url: icon_url(&s.icon_id),
            })
            .collect();

        let hourly = result
            .hourly
            .as_ref()
            .map(|h| {
                h.0.iter()
                    .map(|s| HourlyPoint {
                        timestamp: s.timestamp,
                        temperature: convert(s.temperature_c),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            unit,
            source: result.source,
            mood,
            background: mood.background(),
            current,
            forecast,
            daily: daily_summaries(samples, unit),
            hourly,
            alerts: result.alerts.as_ref().map(|a| a.0.clone()).unwrap_or_default(),
            air_quality: result.air_quality.as_ref().ok().map(|r| AirQualityView {
                index: r.index,
                label: air_quality_label(r.index),
            }),
            weather_error: match (result.source, &result.weather) {
                (DataSource::Live, Err(e)) => Some(e.to_string()),
                _ => None,
            },
            notice: result.failure_message(),
        }
    }
}

/// Collapse 3-hourly samples into one entry per UTC day, in date order.
pub fn daily_summaries(samples: &[ForecastSample], unit: TemperatureUnit) -> Vec<DailySummary> {
    let mut days: Vec<(NaiveDate, Vec<&ForecastSample>)> = Vec::new();

    for sample in samples {
        let date = sample.timestamp.date_naive();
        match days.iter_mut().find(|(d, _)| *d == date) {
            Some((_, group)) => group.push(sample),
            None => days.push((date, vec![sample])),
        }
    }
    days.sort_by_key(|(date, _)| *date);

    days.into_iter()
        .filter_map(|(date, group)| {
            let midday = group
                .iter()
                .min_by_key(|s| (s.timestamp.hour() as i32 - 12).abs())?;
            let (min, max) = group.iter().fold((f64::MAX, f64::MIN), |(lo, hi), s| {
                (lo.min(s.temperature_c), hi.max(s.temperature_c))
            });

            Some(DailySummary {
                date,
                min: to_display(min, unit),
                max: to_display(max, unit),
                description: midday.description.clone(),
                icon_url: icon_url(&midday.icon_id),
            })
        })
        .collect()
}

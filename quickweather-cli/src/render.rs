//! Plain-text rendering of the dashboard view model.

use quickweather_core::{DataSource, ViewModel};

/// How many daily rows to print; the provider horizon is five days.
const DAILY_ROWS: usize = 5;
/// Hourly temperatures are printed every few hours to keep one line.
const HOURLY_STRIDE: usize = 3;

pub fn print_dashboard(view: &ViewModel, history: &[String]) {
    let symbol = view.unit.symbol();

    if let Some(current) = &view.current {
        println!("{} ({})", current.place, view.mood.as_str());
        println!(
            "  {:.1}{symbol} (feels like {:.1}{symbol}), {}",
            current.temperature, current.feels_like, current.description
        );
        println!(
            "  Humidity: {}%  Wind: {:.1} m/s",
            current.humidity_pct, current.wind_speed_mps
        );
        if let Some(icon) = &current.icon_url {
            println!("  Icon: {icon}");
        }
    } else if let Some(reason) = &view.weather_error {
        println!("Current conditions unavailable: {reason}");
    } else {
        println!("Current conditions unavailable.");
    }

    if let Some(aqi) = &view.air_quality {
        println!("  Air quality: {} ({}/5)", aqi.label, aqi.index);
    }

    if !view.alerts.is_empty() {
        println!();
        println!("Alerts:");
        for alert in &view.alerts {
            println!(
                "  ! {} ({} to {})",
                alert.event,
                alert.start.format("%a %d %b %H:%M"),
                alert.end.format("%a %d %b %H:%M"),
            );
            if !alert.description.is_empty() {
                println!("    {}", alert.description.trim());
            }
        }
    }

    if !view.hourly.is_empty() {
        println!();
        let line: Vec<String> = view
            .hourly
            .iter()
            .step_by(HOURLY_STRIDE)
            .map(|p| format!("{} {:.0}{symbol}", p.timestamp.format("%H:%M"), p.temperature))
            .collect();
        println!("Next 24h: {}", line.join("  "));
    }

    if !view.daily.is_empty() {
        println!();
        println!("Forecast:");
        for day in view.daily.iter().take(DAILY_ROWS) {
            println!(
                "  {}  {:>5.1}{symbol} / {:>5.1}{symbol}  {}",
                day.date.format("%a %d %b"),
                day.min,
                day.max,
                day.description
            );
        }
    }

    if view.source == DataSource::Cache {
        println!();
        println!("(saved data, shown while offline)");
    }

    if !history.is_empty() {
        println!();
        println!("Recent: {}", history.join(", "));
    }
}

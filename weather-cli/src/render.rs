use std::fmt::{self, Write};

use weather_core::{ForecastDay, Hour, WeatherResponse};

/// Temperatures are shown as their integer part.
fn degrees(temp_c: f64) -> String {
    format!("{}°", temp_c.trunc() as i64)
}

/// `HH:MM`, falling back to the raw text after the date.
fn hour_label(hour: &Hour) -> String {
    hour.parsed_time()
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| hour.clock_time().to_string())
}

fn daylight(hour: &Hour) -> &'static str {
    match hour.is_daytime() {
        Some(true) => "day",
        Some(false) => "night",
        None => "",
    }
}

pub fn loading() -> &'static str {
    "Loading forecast..."
}

pub fn error(message: &str) -> String {
    format!("Failed to load data: {message}")
}

/// Current conditions, today's hours and the daily summary.
pub fn weather(data: &WeatherResponse) -> Result<String, fmt::Error> {
    let mut out = String::new();

    current(&mut out, data)?;

    let hours = data.today_hours();
    if !hours.is_empty() {
        writeln!(out)?;
        hourly(&mut out, hours)?;
    }

    if !data.forecast.forecast_day.is_empty() {
        writeln!(out)?;
        daily(&mut out, &data.forecast.forecast_day)?;
    }

    Ok(out)
}

fn current(out: &mut impl Write, data: &WeatherResponse) -> fmt::Result {
    writeln!(out, "{}", data.location.name)?;
    writeln!(
        out,
        "{}  {}",
        degrees(data.current.temp_c),
        data.current.condition.text.trim()
    )?;
    writeln!(out, "{}", data.current.condition.icon_url())
}

fn hourly(out: &mut impl Write, hours: &[Hour]) -> fmt::Result {
    writeln!(out, "Hourly forecast")?;
    for hour in hours {
        writeln!(
            out,
            "  {:<5}  {:>4}  {:<5}  {}",
            hour_label(hour),
            degrees(hour.temp_c),
            daylight(hour),
            hour.condition.text.trim()
        )?;
    }
    Ok(())
}

fn daily(out: &mut impl Write, days: &[ForecastDay]) -> fmt::Result {
    writeln!(out, "{}-day forecast", days.len())?;
    for day in days {
        let weekday = day.parsed_date().map(|d| d.format("%a").to_string()).unwrap_or_default();
        writeln!(
            out,
            "  {} {:<3}  {:<24}  {:>4} {:>4}",
            day.date,
            weekday,
            day.day.condition.text.trim(),
            degrees(day.day.max_temp_c),
            degrees(day.day.min_temp_c)
        )?;
    }
    Ok(())
}

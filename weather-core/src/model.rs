use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Root of one decoded forecast.json response.
///
/// Fields the app does not use are ignored on decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResponse {
    pub location: Location,
    pub current: Current,
    pub forecast: Forecast,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    /// Protocol-relative, e.g. `//cdn.weatherapi.com/weather/64x64/day/113.png`.
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Current {
    pub temp_c: f64,
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(rename = "forecastday")]
    pub forecast_day: Vec<ForecastDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// `YYYY-MM-DD`
    pub date: String,
    pub day: Day,
    /// Chronological as provided, normally 24 entries.
    pub hour: Vec<Hour>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    #[serde(rename = "maxtemp_c")]
    pub max_temp_c: f64,
    #[serde(rename = "mintemp_c")]
    pub min_temp_c: f64,
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hour {
    /// `YYYY-MM-DD HH:MM`
    pub time: String,
    pub temp_c: f64,
    pub condition: Condition,
    /// Provider flag, 1 for daytime and 0 for night.
    pub is_day: u8,
}

const DATE_FORMAT: &str = "%Y-%m-%d";
const HOUR_FORMAT: &str = "%Y-%m-%d %H:%M";

impl WeatherResponse {
    /// Hours of the first forecast day ("today"), used for the hourly strip.
    pub fn today_hours(&self) -> &[Hour] {
        self.forecast
            .forecast_day
            .first()
            .map(|day| day.hour.as_slice())
            .unwrap_or_default()
    }
}

impl Condition {
    /// Icon reference with an explicit scheme.
    pub fn icon_url(&self) -> String {
        if self.icon.starts_with("//") {
            format!("https:{}", self.icon)
        } else {
            self.icon.clone()
        }
    }
}

impl ForecastDay {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }
}

impl Hour {
    pub fn parsed_time(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.time, HOUR_FORMAT).ok()
    }

    /// The `HH:MM` part of the timestamp, or the whole string if it has no date part.
    pub fn clock_time(&self) -> &str {
        self.time
            .split_once(' ')
            .map(|(_, clock)| clock)
            .unwrap_or(&self.time)
    }

    /// `Some` only for the two values the provider is known to send.
    pub fn is_daytime(&self) -> Option<bool> {
        match self.is_day {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        }
    }
}

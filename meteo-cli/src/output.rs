use anyhow::Result;
use chrono::NaiveDate;
use meteo_core::{
    DailyRecord, ForecastResult, HistoricalResult, LookupOutcome, ToolId, WeatherCondition,
    WeatherResult,
};
use serde::Serialize;

pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_today(outcome: &LookupOutcome<WeatherResult>) {
    match outcome {
        LookupOutcome::Found(w) => {
            println!("{}", location_line(&w.city, w.latitude, w.longitude));
            println!(
                "{} UTC: {:.1}°C, {}",
                w.time,
                w.temperature,
                WeatherCondition::from_code(w.weather_code)
            );
        }
        LookupOutcome::Failed(e) => println!("Error: {}", e.error),
    }
}

pub fn print_forecast(outcome: &LookupOutcome<ForecastResult>) {
    match outcome {
        LookupOutcome::Found(f) => {
            println!("{}", location_line(&f.city, f.latitude, f.longitude));
            for day in &f.forecast {
                println!("  {}", day_line(day));
            }
        }
        LookupOutcome::Failed(e) => println!("Error: {}", e.error),
    }
}

pub fn print_past(outcome: &LookupOutcome<HistoricalResult>) {
    match outcome {
        LookupOutcome::Found(h) => {
            println!("{}", location_line(&h.city, h.latitude, h.longitude));
            let day = DailyRecord {
                date: h.date.clone(),
                weather_code: h.weather_code,
                temp_max: h.temp_max,
                temp_min: h.temp_min,
            };
            println!("  {}", day_line(&day));
        }
        LookupOutcome::Failed(e) => println!("Error: {}", e.error),
    }
}

pub fn print_tools() {
    for tool in ToolId::all() {
        println!("{:<16} ({})  {}", tool.as_str(), tool.params().join(", "), tool.description());
    }
}

fn location_line(city: &str, latitude: f64, longitude: f64) -> String {
    format!("{city} ({latitude:.4}, {longitude:.4})")
}

fn day_line(day: &DailyRecord) -> String {
    let condition = day
        .weather_code
        .map(WeatherCondition::from_code)
        .map(|c| c.to_string())
        .unwrap_or_else(|| "n/a".to_string());

    format!(
        "{} {}  {:<22} {} / {}",
        weekday(&day.date),
        day.date,
        condition,
        temp(day.temp_min),
        temp(day.temp_max),
    )
}

/// Short weekday name for a `YYYY-MM-DD` date, blank padding if it doesn't parse.
fn weekday(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%a").to_string())
        .unwrap_or_else(|_| "   ".to_string())
}

fn temp(value: Option<f64>) -> String {
    match value {
        Some(t) => format!("{t:.1}°C"),
        None => "n/a".to_string(),
    }
}

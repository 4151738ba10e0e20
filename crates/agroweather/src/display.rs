use serde::Serialize;
use std::fmt::Write;
use time::{macros::format_description, OffsetDateTime};

use crate::{
    formulas::{round_half_up, uv_risk, wind_speed_kmh},
    DerivedMetrics, WeatherReport,
};

/// Display-ready values for one query, in the units the dashboard shows.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub location: String,
    pub date: String,
    pub temperature_c: i64,
    pub feels_like_c: i64,
    pub description: String,
    pub icon_class: String,
    pub accent_color: String,
    pub humidity_pct: u8,
    pub wind_kmh: i64,
    pub pressure_hpa: i32,
    pub visibility_km: String,
    pub uv_index: f64,
    pub uv_risk: String,
    pub uv_risk_class: String,
    pub forecast: Vec<ForecastDisplay>,
    pub forecast_synthesized: bool,
    pub metrics: DerivedMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForecastDisplay {
    pub day_label: String,
    pub date: String,
    pub temperature_c: i64,
    pub description: String,
    pub icon_class: String,
}

fn long_date(timestamp: OffsetDateTime) -> String {
    let format = format_description!("[weekday], [month repr:long] [day padding:none], [year]");
    timestamp
        .format(&format)
        .unwrap_or_else(|_| timestamp.date().to_string())
}

impl DashboardView {
    pub fn new(report: &WeatherReport, metrics: &DerivedMetrics) -> Self {
        let current = &report.current;
        let risk = uv_risk(report.uv.index);
        let short_date = format_description!("[month repr:short] [day padding:none]");

        let forecast = report
            .forecast
            .iter()
            .map(|entry| ForecastDisplay {
                day_label: entry.day_label.clone(),
                date: entry
                    .date
                    .format(&short_date)
                    .unwrap_or_else(|_| entry.date.to_string()),
                temperature_c: round_half_up(entry.temperature_c),
                description: entry.condition_description.clone(),
                icon_class: entry.condition.icon_class().to_string(),
            })
            .collect();

        DashboardView {
            location: report.location.to_string(),
            date: long_date(current.timestamp_utc),
            temperature_c: round_half_up(current.temperature_c),
            feels_like_c: round_half_up(current.feels_like_c),
            description: current.condition_description.clone(),
            icon_class: current.condition.icon_class().to_string(),
            accent_color: current.condition.accent_color().to_string(),
            humidity_pct: current.humidity_pct,
            wind_kmh: wind_speed_kmh(current.wind_speed_ms),
            pressure_hpa: current.pressure_hpa,
            visibility_km: format!("{:.1}", f64::from(current.visibility_m) / 1000.0),
            uv_index: report.uv.index,
            uv_risk: risk.label().to_string(),
            uv_risk_class: risk.css_class().to_string(),
            forecast,
            forecast_synthesized: report.forecast_synthesized,
            metrics: metrics.clone(),
        }
    }
}

/// Plain-text dashboard for the terminal.
pub fn render_dashboard(view: &DashboardView) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "{}", view.location);
    let _ = writeln!(out, "{}", view.date);
    let _ = writeln!(out);
    let _ = writeln!(out, "  {} °C  {}", view.temperature_c, view.description);
    let _ = writeln!(out, "  Feels like   {}°C", view.feels_like_c);
    let _ = writeln!(out, "  Humidity     {}%", view.humidity_pct);
    let _ = writeln!(out, "  Wind         {} km/h", view.wind_kmh);
    let _ = writeln!(out, "  Pressure     {} hPa", view.pressure_hpa);
    let _ = writeln!(out, "  Visibility   {} km", view.visibility_km);
    let _ = writeln!(out, "  UV index     {} ({})", view.uv_index, view.uv_risk);
    let _ = writeln!(out);

    let _ = writeln!(out, "Agricultural metrics");
    let _ = writeln!(out, "  Soil temperature   {}°C", view.metrics.soil_temperature_c);
    let _ = writeln!(out, "  Dew point          {}°C", view.metrics.dew_point_c);
    let _ = writeln!(
        out,
        "  Precipitation      {}%",
        view.metrics.precipitation_chance_pct
    );
    let _ = writeln!(out, "  Heat index         {}°C", view.metrics.heat_index_c);
    let _ = writeln!(out);

    if view.forecast_synthesized {
        let _ = writeln!(out, "5-day forecast (estimated)");
    } else {
        let _ = writeln!(out, "5-day forecast");
    }
    for entry in &view.forecast {
        let _ = writeln!(
            out,
            "  {:<6} {:<7} {:>4}°C  {}",
            entry.day_label, entry.date, entry.temperature_c, entry.description
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Tip: {}", view.metrics.advisory_tip);
    out
}

//! Closed-form weather formulas used by the agricultural metrics.
//!
//! These are field approximations, not physical models. Every rounded value
//! uses half-up rounding so `-2.5` becomes `-2`, matching what the dashboard
//! has always displayed.

/// Below this temperature the heat index equals the air temperature.
pub const HEAT_INDEX_THRESHOLD_C: f64 = 27.0;

/// Rounds to the nearest integer, ties toward positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Soil temperature proxy: 90% of air temperature.
pub fn soil_temperature(temperature_c: f64) -> i64 {
    round_half_up(temperature_c * 0.9)
}

/// Unrounded dew point approximation, `T - (100 - RH) / 5`.
pub fn dew_point_raw(temperature_c: f64, humidity_pct: u8) -> f64 {
    let humidity = f64::from(humidity_pct.min(100));
    temperature_c - ((100.0 - humidity) / 5.0)
}

pub fn dew_point(temperature_c: f64, humidity_pct: u8) -> i64 {
    round_half_up(dew_point_raw(temperature_c, humidity_pct))
}

/// Heat index in °C.
///
/// Uses the Rothfusz regression at or above 27 °C; below that the index is
/// not meaningful and the rounded air temperature is returned.
pub fn heat_index(temperature_c: f64, humidity_pct: u8) -> i64 {
    if temperature_c < HEAT_INDEX_THRESHOLD_C {
        return round_half_up(temperature_c);
    }

    let t = temperature_c;
    let h = f64::from(humidity_pct.min(100));
    let hi = -8.784_694_755_56 + 1.611_394_11 * t + 2.338_548_838_89 * h
        - 0.146_116_05 * t * h
        - 0.012_308_094 * t * t
        - 0.016_424_827_777_8 * h * h
        + 0.002_211_732 * t * t * h
        + 0.000_725_46 * t * h * h
        - 0.000_003_582 * t * t * h * h;

    round_half_up(hi)
}

/// Precipitation likelihood from a condition category name.
///
/// Substring rules are checked in a fixed order and the first hit wins, so a
/// name containing both "rain" and "thunderstorm" lands in the rain bucket.
pub fn precipitation_chance(category_name: &str) -> u8 {
    let name = category_name.to_lowercase();
    if name.contains("rain") {
        80
    } else if name.contains("drizzle") {
        60
    } else if name.contains("clouds") {
        30
    } else if name.contains("thunderstorm") {
        90
    } else {
        10
    }
}

/// Converts m/s to km/h and rounds.
pub fn wind_speed_kmh(speed_ms: f64) -> i64 {
    round_half_up(speed_ms * 3.6)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UvRisk {
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl UvRisk {
    pub fn label(&self) -> &'static str {
        match self {
            UvRisk::Low => "Low",
            UvRisk::Moderate => "Moderate",
            UvRisk::High => "High",
            UvRisk::VeryHigh => "Very High",
            UvRisk::Extreme => "Extreme",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            UvRisk::Low => "uv-low",
            UvRisk::Moderate => "uv-moderate",
            UvRisk::High => "uv-high",
            UvRisk::VeryHigh => "uv-very-high",
            UvRisk::Extreme => "uv-extreme",
        }
    }
}

impl std::fmt::Display for UvRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

pub fn uv_risk(index: f64) -> UvRisk {
    if index <= 2.0 {
        UvRisk::Low
    } else if index <= 5.0 {
        UvRisk::Moderate
    } else if index <= 7.0 {
        UvRisk::High
    } else if index <= 10.0 {
        UvRisk::VeryHigh
    } else {
        UvRisk::Extreme
    }
}

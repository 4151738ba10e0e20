use rand::seq::SliceRandom;
use rand::Rng;

use crate::{formulas::wind_speed_kmh, WeatherSnapshot};

pub const EXTREME_HEAT_TIP: &str =
    "🌡️ Extreme heat conditions - ensure adequate irrigation and consider shade structures for crops";
pub const HOT_TIP: &str =
    "☀️ Hot weather - monitor soil moisture levels and provide extra water to sensitive crops";
pub const COLD_TIP: &str = "❄️ Cold conditions - protect sensitive plants from frost damage";
pub const IDEAL_TEMPERATURE_TIP: &str =
    "🌱 Ideal growing temperature - perfect conditions for most crops";
pub const HIGH_HUMIDITY_TIP: &str =
    "💧 High humidity - increased risk of fungal diseases, ensure good air circulation";
pub const LOW_HUMIDITY_TIP: &str =
    "🏜️ Low humidity - plants may need extra watering, consider mulching to retain moisture";
pub const STRONG_WIND_TIP: &str =
    "💨 Strong winds - delay spraying activities and secure greenhouse structures";
pub const MODERATE_WIND_TIP: &str =
    "🍃 Moderate winds - ideal conditions for pesticide and fertilizer applications";
pub const RAIN_TIP: &str = "🌧️ Rain expected - postpone irrigation and harvesting activities";
pub const STORM_TIP: &str = "⛈️ Thunderstorm warning - secure equipment and avoid field work";
pub const CLEAR_TIP: &str =
    "☀️ Clear skies - excellent conditions for harvesting and field operations";
pub const HIGH_UV_TIP: &str =
    "🕶️ High UV levels - protect workers and consider timing activities for early morning or evening";
pub const GENERIC_TIP: &str =
    "🌾 Monitor weather conditions regularly to optimize your farming activities and crop health.";

fn temperature_tip(temperature_c: f64) -> Option<&'static str> {
    if temperature_c > 35.0 {
        Some(EXTREME_HEAT_TIP)
    } else if temperature_c > 30.0 {
        Some(HOT_TIP)
    } else if temperature_c < 5.0 {
        Some(COLD_TIP)
    } else if (20.0..=25.0).contains(&temperature_c) {
        Some(IDEAL_TEMPERATURE_TIP)
    } else {
        None
    }
}

fn humidity_tip(humidity_pct: u8) -> Option<&'static str> {
    if humidity_pct > 80 {
        Some(HIGH_HUMIDITY_TIP)
    } else if humidity_pct < 30 {
        Some(LOW_HUMIDITY_TIP)
    } else {
        None
    }
}

fn wind_tip(wind_kmh: i64) -> Option<&'static str> {
    if wind_kmh > 25 {
        Some(STRONG_WIND_TIP)
    } else if (5..=15).contains(&wind_kmh) {
        Some(MODERATE_WIND_TIP)
    } else {
        None
    }
}

fn condition_tip(category_name: &str) -> Option<&'static str> {
    let name = category_name.to_lowercase();
    if name.contains("rain") {
        Some(RAIN_TIP)
    } else if name.contains("storm") {
        Some(STORM_TIP)
    } else if name.contains("clear") {
        Some(CLEAR_TIP)
    } else {
        None
    }
}

fn uv_tip(uv_index: u8) -> Option<&'static str> {
    (uv_index > 7).then_some(HIGH_UV_TIP)
}

/// Every tip whose rule fires for the snapshot. The UV rule is judged against
/// `uv_index` rather than the report's reading.
pub fn advisory_candidates(snapshot: &WeatherSnapshot, uv_index: u8) -> Vec<&'static str> {
    [
        temperature_tip(snapshot.temperature_c),
        humidity_tip(snapshot.humidity_pct),
        wind_tip(wind_speed_kmh(snapshot.wind_speed_ms)),
        condition_tip(snapshot.condition.name()),
        uv_tip(uv_index),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Picks one applicable tip uniformly, or the generic tip when none apply.
///
/// A fresh UV value in [0, 10] is drawn for the UV rule on every call, so the
/// choice varies between otherwise identical queries.
pub fn select_advisory<R: Rng + ?Sized>(snapshot: &WeatherSnapshot, rng: &mut R) -> String {
    let uv_index = rng.gen_range(0u8..=10);
    advisory_candidates(snapshot, uv_index)
        .choose(rng)
        .copied()
        .unwrap_or(GENERIC_TIP)
        .to_string()
}

mod advisory;

pub use advisory::*;

use rand::Rng;

use crate::{formulas, DerivedMetrics, WeatherSnapshot};

/// Computes the agricultural metrics for a snapshot.
///
/// Everything except the advisory tip is deterministic; the tip is drawn from
/// `rng`, so a seeded generator reproduces the same output.
pub fn derive_metrics<R: Rng + ?Sized>(snapshot: &WeatherSnapshot, rng: &mut R) -> DerivedMetrics {
    DerivedMetrics {
        soil_temperature_c: formulas::soil_temperature(snapshot.temperature_c),
        dew_point_c: formulas::dew_point(snapshot.temperature_c, snapshot.humidity_pct),
        precipitation_chance_pct: formulas::precipitation_chance(snapshot.condition.name()),
        heat_index_c: formulas::heat_index(snapshot.temperature_c, snapshot.humidity_pct),
        advisory_tip: select_advisory(snapshot, rng),
    }
}

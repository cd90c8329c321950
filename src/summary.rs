use serde::Serialize;

use crate::model::Flight;

// Client-side aggregate over the loaded pages only — not the global figures
// the /flights/summary endpoint reports. Kept behind `summary --local`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocalSummary {
    pub total_flights: usize,
    pub avg_distance_km: f64,
    pub avg_fuel_kg: f64,
    pub avg_co2_kg: f64,
}

pub fn aggregate(flights: &[Flight]) -> LocalSummary {
    if flights.is_empty() {
        return LocalSummary::default();
    }

    let count = flights.len() as f64;
    let distance: f64 = flights.iter().filter_map(|f| f.distance_km()).sum();
    let fuel: f64 = flights.iter().map(|f| f.total_fuel_kg()).sum();
    let co2: f64 = flights.iter().filter_map(|f| f.co2_total_kg).sum();

    LocalSummary {
        total_flights: flights.len(),
        avg_distance_km: distance / count,
        avg_fuel_kg: fuel / count,
        avg_co2_kg: co2 / count,
    }
}

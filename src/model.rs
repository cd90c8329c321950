use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Flight {
    pub fr24_id: String,
    pub flight: Option<String>,
    pub callsign: Option<String>,
    pub aircraft_model: Option<String>,
    pub aircraft_reg: Option<String>,
    pub departure_icao: Option<String>,
    pub arrival_icao: Option<String>,
    pub distance_calculated_km: Option<f64>,
    pub great_circle_distance_km: Option<f64>,

    pub departure_time_utc: Option<String>,
    pub arrival_time_utc: Option<String>,
    pub flight_duration_s: Option<f64>,

    pub duration_takeoff_s: Option<f64>,
    pub duration_climb_s: Option<f64>,
    pub duration_cruise_s: Option<f64>,
    pub duration_descent_s: Option<f64>,
    pub duration_landing_s: Option<f64>,

    pub fuel_takeoff_kg: Option<f64>,
    pub fuel_climb_kg: Option<f64>,
    pub fuel_cruise_kg: Option<f64>,
    pub fuel_descent_kg: Option<f64>,
    pub fuel_landing_kg: Option<f64>,

    pub co2_takeoff_kg: Option<f64>,
    pub co2_climb_kg: Option<f64>,
    pub co2_cruise_kg: Option<f64>,
    pub co2_descent_kg: Option<f64>,
    pub co2_landing_kg: Option<f64>,
    pub co2_total_kg: Option<f64>,
    pub co2_per_passenger_kg: Option<f64>,

    pub flight_id: Option<i64>,
    pub created_at: String,
    pub last_updated: String,
}

impl Flight {
    // Per-phase fuel fields summed; the backend sends no aggregate fuel figure.
    pub fn total_fuel_kg(&self) -> f64 {
        [
            self.fuel_takeoff_kg,
            self.fuel_climb_kg,
            self.fuel_cruise_kg,
            self.fuel_descent_kg,
            self.fuel_landing_kg,
        ]
        .iter()
        .map(|kg| kg.unwrap_or(0.0))
        .sum()
    }

    pub fn distance_km(&self) -> Option<f64> {
        self.distance_calculated_km.or(self.great_circle_distance_km)
    }

    pub fn route(&self) -> String {
        format!(
            "{} → {}",
            self.departure_icao.as_deref().unwrap_or("????"),
            self.arrival_icao.as_deref().unwrap_or("????"),
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryMetrics {
    pub total_flights: i64,
    pub avg_distance: f64,
    pub total_fuel_saving: f64,
    pub total_co2_saving: f64,
}

use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL};

use crate::model::{Flight, SummaryMetrics};
use crate::summary::LocalSummary;

pub fn format_seconds(seconds: Option<f64>) -> String {
    let s = match seconds {
        Some(s) if s >= 0.0 => s as u64,
        _ => return "—".to_string(),
    };
    format!("{:02}:{:02}:{:02}", s / 3600, (s % 3600) / 60, s % 60)
}

pub fn format_kg(kg: Option<f64>) -> String {
    match kg {
        Some(kg) => format!("{kg:.0} kg"),
        None => "—".to_string(),
    }
}

pub fn format_km(km: Option<f64>) -> String {
    match km {
        Some(km) => format!("{km:.0} km"),
        None => "—".to_string(),
    }
}

// Departure timestamps arrive as RFC 3339 strings; the date prefix is all
// the table has room for.
fn date_part(timestamp: Option<&str>) -> String {
    timestamp
        .and_then(|t| t.get(..10))
        .unwrap_or("—")
        .to_string()
}

pub fn render(flights: &[Flight]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Flight", "Route", "Aircraft", "Date", "Duration", "Distance", "Fuel", "CO\u{2082}",
        ]);

    for flight in flights {
        let fuel = flight.total_fuel_kg();
        table.add_row(vec![
            flight.flight.as_deref().unwrap_or("—").to_string(),
            flight.route(),
            flight.aircraft_model.as_deref().unwrap_or("—").to_string(),
            date_part(flight.departure_time_utc.as_deref()),
            format_seconds(flight.flight_duration_s),
            format_km(flight.distance_km()),
            if fuel > 0.0 {
                format!("{fuel:.0} kg")
            } else {
                "—".to_string()
            },
            format_kg(flight.co2_total_kg),
        ]);
    }

    table.to_string()
}

pub fn render_summary(summary: &SummaryMetrics) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Total Flights",
            "Avg. Distance",
            "Total Fuel Savings",
            "Total CO\u{2082} Savings (per Pax)",
        ]);

    table.add_row(vec![
        summary.total_flights.to_string(),
        format!("{:.0} km", summary.avg_distance),
        format!("{:.0} kg", summary.total_fuel_saving),
        format!("{:.0} kg", summary.total_co2_saving),
    ]);

    table.to_string()
}

pub fn render_local_summary(summary: &LocalSummary) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Loaded Flights",
            "Avg. Distance",
            "Avg. Fuel Burn",
            "Avg. CO\u{2082}",
        ]);

    table.add_row(vec![
        summary.total_flights.to_string(),
        format!("{:.0} km", summary.avg_distance_km),
        format!("{:.0} kg", summary.avg_fuel_kg),
        format!("{:.0} kg", summary.avg_co2_kg),
    ]);

    table.to_string()
}

use crate::error::ApiError;

pub const PAGE_SIZE: usize = 9;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    pub search: String,
    pub airport: String,
    pub aircraft_model: String,
    pub flight_date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Search,
    Airport,
    AircraftModel,
    FlightDate,
}

fn validate_airport(code: &str) -> Result<(), ApiError> {
    if code.len() != 4 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ApiError::InvalidAirport(code.to_string()));
    }
    Ok(())
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

fn validate_date(date: &str) -> Result<(), ApiError> {
    let parts: Vec<&str> = date.split('-').collect();
    if parts.len() != 3 {
        return Err(ApiError::InvalidDate(date.to_string()));
    }
    let year: u32 = parts[0]
        .parse()
        .map_err(|_| ApiError::InvalidDate(date.to_string()))?;
    let month: u32 = parts[1]
        .parse()
        .map_err(|_| ApiError::InvalidDate(date.to_string()))?;
    let day: u32 = parts[2]
        .parse()
        .map_err(|_| ApiError::InvalidDate(date.to_string()))?;

    if year < 2000 || !(1..=12).contains(&month) {
        return Err(ApiError::InvalidDate(date.to_string()));
    }

    if day < 1 || day > days_in_month(year, month) {
        return Err(ApiError::InvalidDate(date.to_string()));
    }

    Ok(())
}

impl FilterSet {
    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::Search => &self.search,
            FilterField::Airport => &self.airport,
            FilterField::AircraftModel => &self.aircraft_model,
            FilterField::FlightDate => self.flight_date.as_deref().unwrap_or(""),
        }
    }

    pub fn set(&mut self, field: FilterField, value: &str) {
        match field {
            FilterField::Search => self.search = value.to_string(),
            FilterField::Airport => self.airport = value.to_string(),
            FilterField::AircraftModel => self.aircraft_model = value.to_string(),
            FilterField::FlightDate => {
                self.flight_date = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.airport.is_empty()
            && self.aircraft_model.is_empty()
            && self.flight_date.is_none()
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if !self.airport.is_empty() {
            validate_airport(&self.airport)?;
        }
        if let Some(ref date) = self.flight_date {
            validate_date(date)?;
        }
        Ok(())
    }

    // Absent filter fields are omitted from the query string entirely.
    pub fn to_query_params(&self, limit: usize, offset: usize) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if !self.search.is_empty() {
            params.push(("search".to_string(), self.search.clone()));
        }
        if !self.airport.is_empty() {
            params.push(("airport".to_string(), self.airport.clone()));
        }
        if !self.aircraft_model.is_empty() {
            params.push(("aircraft_model".to_string(), self.aircraft_model.clone()));
        }
        if let Some(ref date) = self.flight_date {
            params.push(("flight_date".to_string(), date.clone()));
        }

        params.push(("limit".to_string(), limit.to_string()));
        params.push(("offset".to_string(), offset.to_string()));

        params
    }
}

pub fn page_offset(page: u32) -> usize {
    (page.saturating_sub(1) as usize) * PAGE_SIZE
}

use std::time::{Duration, Instant};

use crate::debounce::Debounced;
use crate::model::Flight;
use crate::query::{page_offset, FilterField, FilterSet, PAGE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlePhase {
    Idle,
    Pending,
    Settled,
}

// Four independently debounced filter fields plus the combined-settle
// watcher. A settle event fires only when no field has a pending edit and
// the combined set differs from the last one emitted. The very first poll
// emits the initial (empty) set, which the controller skips.
#[derive(Debug)]
pub struct FilterDebounce {
    search: Debounced<String>,
    airport: Debounced<String>,
    aircraft_model: Debounced<String>,
    flight_date: Debounced<Option<String>>,
    last_settled: Option<FilterSet>,
}

impl FilterDebounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            search: Debounced::new(String::new(), delay),
            airport: Debounced::new(String::new(), delay),
            aircraft_model: Debounced::new(String::new(), delay),
            flight_date: Debounced::new(None, delay),
            last_settled: None,
        }
    }

    pub fn set(&mut self, field: FilterField, value: &str, now: Instant) {
        match field {
            FilterField::Search => self.search.set(value.to_string(), now),
            FilterField::Airport => self.airport.set(value.to_string(), now),
            FilterField::AircraftModel => self.aircraft_model.set(value.to_string(), now),
            FilterField::FlightDate => {
                let date = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
                self.flight_date.set(date, now);
            }
        }
    }

    pub fn settled(&self) -> FilterSet {
        FilterSet {
            search: self.search.value().clone(),
            airport: self.airport.value().clone(),
            aircraft_model: self.aircraft_model.value().clone(),
            flight_date: self.flight_date.value().clone(),
        }
    }

    pub fn phase(&self) -> SettlePhase {
        if self.search.is_pending()
            || self.airport.is_pending()
            || self.aircraft_model.is_pending()
            || self.flight_date.is_pending()
        {
            SettlePhase::Pending
        } else if self.last_settled.is_some() {
            SettlePhase::Settled
        } else {
            SettlePhase::Idle
        }
    }

    pub fn poll(&mut self, now: Instant) -> Option<FilterSet> {
        self.search.poll(now);
        self.airport.poll(now);
        self.aircraft_model.poll(now);
        self.flight_date.poll(now);

        if self.phase() == SettlePhase::Pending {
            return None;
        }

        let combined = self.settled();
        if self.last_settled.as_ref() == Some(&combined) {
            return None;
        }
        self.last_settled = Some(combined.clone());
        Some(combined)
    }

    pub fn cancel(&mut self) {
        self.search.cancel();
        self.airport.cancel();
        self.aircraft_model.cancel();
        self.flight_date.cancel();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
    LoadingMore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub filters: FilterSet,
    pub limit: usize,
    pub offset: usize,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    Stale,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuerySnapshot {
    pub is_loading: bool,
    pub is_loading_more: bool,
    pub has_more: bool,
    pub current_page: u32,
    pub generation: u64,
    pub loaded: usize,
}

// Owns all query state for one dashboard session: raw and settled filters,
// the growing result list, pagination, and the in-flight guard. Completions
// carry the generation stamped on the request; anything issued before the
// latest filter settle is discarded on arrival.
#[derive(Debug)]
pub struct QueryController {
    debounce: FilterDebounce,
    raw: FilterSet,
    flights: Vec<Flight>,
    page: u32,
    has_more: bool,
    phase: LoadPhase,
    generation: u64,
    initial_settle: bool,
}

impl QueryController {
    pub fn new(delay: Duration) -> Self {
        Self {
            debounce: FilterDebounce::new(delay),
            raw: FilterSet::default(),
            flights: Vec::new(),
            page: 1,
            has_more: true,
            phase: LoadPhase::Idle,
            generation: 0,
            initial_settle: true,
        }
    }

    pub fn set_field(&mut self, field: FilterField, value: &str, now: Instant) {
        self.raw.set(field, value);
        self.debounce.set(field, value, now);
    }

    pub fn raw_filters(&self) -> &FilterSet {
        &self.raw
    }

    pub fn filters(&self) -> FilterSet {
        self.debounce.settled()
    }

    pub fn settle_phase(&self) -> SettlePhase {
        self.debounce.phase()
    }

    pub fn has_active_filters(&self) -> bool {
        !self.debounce.settled().is_empty()
    }

    // Drives the debounce windows. On a non-initial settle: reset the result
    // set, page, and hasMore before the new query is issued, and invalidate
    // any in-flight fetch by bumping the generation. An all-empty settle
    // resets state without querying.
    pub fn poll(&mut self, now: Instant) -> Option<FetchRequest> {
        let settled = self.debounce.poll(now)?;

        if self.initial_settle {
            self.initial_settle = false;
            // The mount settle carries no filters; if edits already landed
            // before the first poll, fall through and query.
            if settled.is_empty() {
                return None;
            }
        }

        self.flights.clear();
        self.page = 1;
        self.has_more = true;
        self.generation += 1;
        self.phase = LoadPhase::Idle;

        if settled.is_empty() {
            return None;
        }

        self.phase = LoadPhase::Loading;
        Some(FetchRequest {
            filters: settled,
            limit: PAGE_SIZE,
            offset: 0,
            generation: self.generation,
        })
    }

    pub fn request_next_page(&mut self) -> Option<FetchRequest> {
        if self.phase != LoadPhase::Idle || !self.has_more {
            return None;
        }

        self.page += 1;
        self.phase = LoadPhase::LoadingMore;
        Some(FetchRequest {
            filters: self.debounce.settled(),
            limit: PAGE_SIZE,
            offset: page_offset(self.page),
            generation: self.generation,
        })
    }

    pub fn apply_success(&mut self, generation: u64, page: Vec<Flight>) -> ApplyOutcome {
        if generation != self.generation || self.phase == LoadPhase::Idle {
            return ApplyOutcome::Stale;
        }

        self.has_more = page.len() >= PAGE_SIZE;

        match self.phase {
            LoadPhase::Loading => self.flights = page,
            LoadPhase::LoadingMore => self.flights.extend(page),
            LoadPhase::Idle => unreachable!(),
        }

        self.phase = LoadPhase::Idle;
        ApplyOutcome::Applied
    }

    // Failure keeps whatever was already loaded and stops auto-loading until
    // the next filter settle resets hasMore.
    pub fn apply_failure(&mut self, generation: u64) -> ApplyOutcome {
        if generation != self.generation || self.phase == LoadPhase::Idle {
            return ApplyOutcome::Stale;
        }

        self.has_more = false;
        self.phase = LoadPhase::Idle;
        ApplyOutcome::Failed
    }

    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    pub fn into_flights(self) -> Vec<Flight> {
        self.flights
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    pub fn is_loading_more(&self) -> bool {
        self.phase == LoadPhase::LoadingMore
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn current_page(&self) -> u32 {
        self.page
    }

    pub fn snapshot(&self) -> QuerySnapshot {
        QuerySnapshot {
            is_loading: self.is_loading(),
            is_loading_more: self.is_loading_more(),
            has_more: self.has_more,
            current_page: self.page,
            generation: self.generation,
            loaded: self.flights.len(),
        }
    }
}

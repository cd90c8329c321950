pub mod browse;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod fetch;
pub mod mcp;
pub mod model;
pub mod query;
pub mod sentinel;
pub mod summary;
pub mod table;

use error::ApiError;
use fetch::ApiOptions;
use model::{Flight, SummaryMetrics};
use query::{page_offset, FilterSet, PAGE_SIZE};

pub async fn list_flights(
    filters: &FilterSet,
    page: u32,
    options: &ApiOptions,
) -> Result<Vec<Flight>, ApiError> {
    filters.validate()?;
    fetch::fetch_flights(filters, PAGE_SIZE, page_offset(page), options).await
}

pub async fn get_summary(options: &ApiOptions) -> Result<SummaryMetrics, ApiError> {
    fetch::fetch_summary(options).await
}

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::schemars;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt};
use serde::Deserialize;

use crate::fetch::ApiOptions;
use crate::query::FilterSet;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct SearchArgs {
    #[schemars(
        description = "Free-text search over flight number, FR24 id, and callsign. Example: AAL123"
    )]
    search: Option<String>,
    #[schemars(
        description = "Filter by airport ICAO code, exactly 4 uppercase letters, matches departure or arrival. Example: KJFK"
    )]
    airport: Option<String>,
    #[schemars(description = "Filter by aircraft model substring. Example: Boeing 737")]
    aircraft_model: Option<String>,
    #[schemars(description = "Filter by flight date in YYYY-MM-DD format. Example: 2026-03-01")]
    date: Option<String>,
    #[schemars(description = "Result page, 9 flights per page. Default: 1")]
    page: Option<u32>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct OpenUrlArgs {
    #[schemars(description = "URL to open. Must start with http:// or https://")]
    url: String,
}

fn parse_filters(
    search: Option<&str>,
    airport: Option<&str>,
    aircraft_model: Option<&str>,
    date: Option<&str>,
) -> FilterSet {
    FilterSet {
        search: search.unwrap_or("").trim().to_string(),
        airport: airport.map(|a| a.trim().to_uppercase()).unwrap_or_default(),
        aircraft_model: aircraft_model.unwrap_or("").trim().to_string(),
        flight_date: date
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
    }
}

fn tool_error(msg: impl Into<String>) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::error(vec![Content::text(msg.into())]))
}

#[derive(Debug, Clone)]
struct FlightdashMcp {
    options: ApiOptions,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl FlightdashMcp {
    fn new(options: ApiOptions) -> Self {
        Self {
            options,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Search tracked flights and return one page of records as JSON. Each record carries route, timing, per-phase fuel burn, and CO2 emission fields. All filters are optional and combine. Pages hold 9 flights; request increasing 'page' values until fewer than 9 records come back."
    )]
    async fn flights_search(
        &self,
        Parameters(args): Parameters<SearchArgs>,
    ) -> Result<CallToolResult, McpError> {
        let filters = parse_filters(
            args.search.as_deref(),
            args.airport.as_deref(),
            args.aircraft_model.as_deref(),
            args.date.as_deref(),
        );
        let page = args.page.unwrap_or(1).max(1);

        match crate::list_flights(&filters, page, &self.options).await {
            Ok(flights) => {
                let json = serde_json::to_string_pretty(&flights).unwrap();
                Ok(CallToolResult::success(vec![Content::text(json)]))
            }
            Err(e) => tool_error(e.to_string()),
        }
    }

    #[tool(
        description = "Fetch the dashboard summary metrics as JSON: total tracked flights, average distance, and total fuel / CO2 savings versus the statistical simulation baseline."
    )]
    async fn flights_summary(&self) -> Result<CallToolResult, McpError> {
        match crate::get_summary(&self.options).await {
            Ok(summary) => {
                let json = serde_json::to_string_pretty(&summary).unwrap();
                Ok(CallToolResult::success(vec![Content::text(json)]))
            }
            Err(e) => tool_error(e.to_string()),
        }
    }

    #[tool(description = "Open a URL in the default web browser.")]
    async fn open_url(
        &self,
        Parameters(args): Parameters<OpenUrlArgs>,
    ) -> Result<CallToolResult, McpError> {
        if !args.url.starts_with("http://") && !args.url.starts_with("https://") {
            return tool_error("URL must start with http:// or https://");
        }

        match open::that(&args.url) {
            Ok(()) => Ok(CallToolResult::success(vec![Content::text(format!(
                "Opened: {}",
                args.url
            ))])),
            Err(e) => tool_error(format!("failed to open browser: {e}")),
        }
    }
}

#[tool_handler]
impl ServerHandler for FlightdashMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "flightdash".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "Read-only flight analytics. flights_search lists tracked flights (9 per page; \
                 page until fewer than 9 return). flights_summary reports the dashboard totals."
                    .into(),
            ),
        }
    }
}

pub async fn run(options: ApiOptions) {
    let service = FlightdashMcp::new(options)
        .serve(rmcp::transport::stdio())
        .await
        .expect("failed to start MCP server");
    service.waiting().await.expect("MCP server error");
}

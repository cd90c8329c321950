use std::process;
use std::time::{Duration, Instant};

use clap::Parser;

use flightdash::controller::QueryController;
use flightdash::error::ApiError;
use flightdash::fetch::{self, ApiOptions, DEFAULT_BASE_URL};
use flightdash::model::Flight;
use flightdash::query::{page_offset, FilterField, FilterSet, PAGE_SIZE};
use flightdash::summary::aggregate;
use flightdash::table;

#[derive(Parser)]
#[command(
    name = "flightdash",
    about = "Flight fuel and CO2 analytics dashboard for the terminal",
    version,
    after_help = "\
Examples:
  flightdash flights -a KJFK
  flightdash flights -s AAL123 --json --pretty
  flightdash flights -m \"Boeing 737\" -d 2026-03-01 --all
  flightdash summary
  flightdash browse
  flightdash mcp

The backend URL comes from --base-url or the FLIGHTDASH_URL environment
variable, defaulting to http://localhost:8000."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    #[command(
        about = "List tracked flights",
        long_about = "List tracked flights with their route, timing, fuel burn, and CO2 fields.\n\
            All filters are optional and combine. Results come in pages of 9; use --page to\n\
            pick one, or --all to follow the pagination to the end.",
        after_help = "\
Examples:
  By airport:   flightdash flights -a KJFK
  Free text:    flightdash flights -s AAL123
  By aircraft:  flightdash flights -m \"Boeing 737\" --all
  By date:      flightdash flights -d 2026-03-01 --page 2
  JSON output:  flightdash flights -a EGLL --json --pretty
  With stats:   flightdash flights -a KJFK --all --stats"
    )]
    Flights(FlightsArgs),
    #[command(
        about = "Show dashboard summary metrics",
        long_about = "Show the dashboard summary metrics: total tracked flights, average\n\
            distance, and total fuel / CO2 savings versus the statistical simulation baseline.\n\
            --local aggregates over fetched pages client-side instead of asking the backend;\n\
            it reflects only the pages actually loaded."
    )]
    Summary(SummaryArgs),
    #[command(about = "Interactive dashboard (filters, infinite scroll)")]
    Browse(BrowseArgs),
    #[command(about = "Start MCP server for AI agents (stdio transport)")]
    Mcp(McpArgs),
}

#[derive(clap::Args)]
struct ApiArgs {
    #[arg(
        long,
        value_name = "URL",
        env = "FLIGHTDASH_URL",
        default_value = DEFAULT_BASE_URL,
        help = "Flights backend base URL"
    )]
    base_url: String,

    #[arg(long, value_name = "URL", help = "HTTP or SOCKS5 proxy")]
    proxy: Option<String>,

    #[arg(long, default_value = "30", value_name = "SECS", help = "Request timeout")]
    timeout: u64,
}

#[derive(clap::Args)]
struct FilterArgs {
    #[arg(
        short,
        long,
        value_name = "TEXT",
        help = "Free-text search (flight no., FR24 ID, callsign)"
    )]
    search: Option<String>,

    #[arg(
        short,
        long,
        value_name = "ICAO",
        help = "Filter by airport ICAO code (departure or arrival)",
        long_help = "Filter by airport ICAO code (4 letters, e.g. KJFK, EGLL). \
            Matches either end of the route."
    )]
    airport: Option<String>,

    #[arg(short = 'm', long, value_name = "MODEL", help = "Filter by aircraft model")]
    aircraft: Option<String>,

    #[arg(short, long, value_name = "YYYY-MM-DD", help = "Filter by flight date")]
    date: Option<String>,
}

#[derive(clap::Args)]
struct FlightsArgs {
    #[command(flatten)]
    filters: FilterArgs,

    #[arg(long, default_value = "1", value_name = "N", help = "Result page (9 flights per page)")]
    page: u32,

    #[arg(long, help = "Follow the pagination until the last page")]
    all: bool,

    #[arg(
        long,
        default_value = "50",
        value_name = "N",
        help = "Safety cap on pages fetched with --all"
    )]
    max_pages: u32,

    #[arg(long, help = "Append client-side aggregate stats for the listed flights")]
    stats: bool,

    #[arg(long, help = "One-line-per-flight output (recommended for scripts and AI agents)")]
    compact: bool,

    #[arg(long, help = "Output as JSON")]
    json: bool,

    #[arg(long, help = "Output as pretty-printed JSON")]
    pretty: bool,

    #[arg(long, help = "Print the backend request URL and exit (no request made)")]
    url: bool,

    #[arg(long, help = "Open the backend request URL in the browser")]
    open: bool,

    #[command(flatten)]
    api: ApiArgs,
}

#[derive(clap::Args)]
struct SummaryArgs {
    #[arg(long, help = "Aggregate client-side over fetched pages instead of asking the backend")]
    local: bool,

    #[command(flatten)]
    filters: FilterArgs,

    #[arg(
        long,
        default_value = "50",
        value_name = "N",
        help = "Safety cap on pages fetched with --local"
    )]
    max_pages: u32,

    #[arg(long, help = "Output as JSON")]
    json: bool,

    #[arg(long, help = "Output as pretty-printed JSON")]
    pretty: bool,

    #[command(flatten)]
    api: ApiArgs,
}

#[derive(clap::Args)]
struct BrowseArgs {
    #[command(flatten)]
    api: ApiArgs,
}

#[derive(clap::Args)]
struct McpArgs {
    #[command(flatten)]
    api: ApiArgs,
}

fn error_code(err: &ApiError) -> i32 {
    match err {
        ApiError::InvalidAirport(_) | ApiError::InvalidDate(_) | ApiError::Validation(_) => 2,
        ApiError::Timeout
        | ApiError::ConnectionFailed(_)
        | ApiError::DnsResolution(_)
        | ApiError::TlsError(_)
        | ApiError::ProxyError(_) => 3,
        ApiError::RateLimited => 4,
        ApiError::HttpStatus(_) => 5,
        ApiError::Decode(_) => 6,
    }
}

fn error_kind(err: &ApiError) -> &'static str {
    match err {
        ApiError::InvalidAirport(_) => "invalid_airport",
        ApiError::InvalidDate(_) => "invalid_date",
        ApiError::Validation(_) => "validation_error",
        ApiError::Timeout => "timeout",
        ApiError::ConnectionFailed(_) => "connection_failed",
        ApiError::DnsResolution(_) => "dns_error",
        ApiError::TlsError(_) => "tls_error",
        ApiError::ProxyError(_) => "proxy_error",
        ApiError::RateLimited => "rate_limited",
        ApiError::HttpStatus(_) => "http_error",
        ApiError::Decode(_) => "decode_error",
    }
}

fn die(err: &ApiError, json_mode: bool) -> ! {
    if json_mode {
        let json = serde_json::json!({
            "error": {
                "kind": error_kind(err),
                "message": err.to_string(),
            }
        });
        println!("{}", serde_json::to_string(&json).unwrap());
    } else {
        eprintln!("error: {err}");
    }
    process::exit(error_code(err));
}

fn api_options(args: &ApiArgs) -> ApiOptions {
    ApiOptions {
        base_url: args.base_url.clone(),
        proxy: args.proxy.clone(),
        timeout: args.timeout,
    }
}

fn build_filters(args: &FilterArgs) -> FilterSet {
    FilterSet {
        search: args.search.as_deref().unwrap_or("").trim().to_string(),
        airport: args
            .airport
            .as_deref()
            .map(|a| a.trim().to_uppercase())
            .unwrap_or_default(),
        aircraft_model: args.aircraft.as_deref().unwrap_or("").trim().to_string(),
        flight_date: args
            .date
            .as_deref()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
    }
}

// Drives the query controller through settle and load-more exactly the way
// the interactive dashboard does, just without the idle time between pages.
async fn fetch_all(
    filters: &FilterSet,
    max_pages: u32,
    options: &ApiOptions,
    json_mode: bool,
) -> Vec<Flight> {
    if filters.is_empty() {
        return fetch_all_unfiltered(max_pages, options, json_mode).await;
    }

    let mut controller = QueryController::new(Duration::ZERO);
    let now = Instant::now();
    let _ = controller.poll(now);

    for field in [
        FilterField::Search,
        FilterField::Airport,
        FilterField::AircraftModel,
        FilterField::FlightDate,
    ] {
        controller.set_field(field, filters.get(field), now);
    }

    let mut request = controller.poll(now);
    let mut pages = 0;

    while let Some(req) = request {
        pages += 1;
        match fetch::fetch_flights(&req.filters, req.limit, req.offset, options).await {
            Ok(page) => {
                controller.apply_success(req.generation, page);
            }
            Err(e) => {
                controller.apply_failure(req.generation);
                if controller.flights().is_empty() {
                    die(&e, json_mode);
                }
                eprintln!(
                    "warning: stopping after {} flights: {e}",
                    controller.flights().len()
                );
                break;
            }
        }
        if pages >= max_pages {
            break;
        }
        request = controller.request_next_page();
    }

    controller.into_flights()
}

async fn fetch_all_unfiltered(
    max_pages: u32,
    options: &ApiOptions,
    json_mode: bool,
) -> Vec<Flight> {
    let filters = FilterSet::default();
    let mut all = Vec::new();
    let mut page = 1;

    loop {
        match flightdash::list_flights(&filters, page, options).await {
            Ok(batch) => {
                let last = batch.len() < PAGE_SIZE;
                all.extend(batch);
                if last || page >= max_pages {
                    break;
                }
                page += 1;
            }
            Err(e) => {
                if all.is_empty() {
                    die(&e, json_mode);
                }
                eprintln!("warning: stopping after {} flights: {e}", all.len());
                break;
            }
        }
    }

    all
}

fn print_compact(flights: &[Flight]) {
    for flight in flights {
        let fuel = flight.total_fuel_kg();
        println!(
            "{} | {} | {} | {} | {} | {} | {}",
            flight.flight.as_deref().unwrap_or("—"),
            flight.route().replace(" → ", ">"),
            flight
                .departure_time_utc
                .as_deref()
                .and_then(|t| t.get(..10))
                .unwrap_or("—"),
            flight.aircraft_model.as_deref().unwrap_or("—"),
            table::format_km(flight.distance_km()),
            if fuel > 0.0 {
                format!("{fuel:.0} kg")
            } else {
                "—".to_string()
            },
            table::format_kg(flight.co2_total_kg),
        );
    }
}

fn print_flights(flights: &[Flight], args: &FlightsArgs) {
    if args.json || args.pretty {
        let value = if args.stats {
            serde_json::json!({ "flights": flights, "stats": aggregate(flights) })
        } else {
            serde_json::json!(flights)
        };
        let output = if args.pretty {
            serde_json::to_string_pretty(&value).unwrap()
        } else {
            serde_json::to_string(&value).unwrap()
        };
        println!("{output}");
        return;
    }

    if flights.is_empty() {
        println!("No flights found.");
        return;
    }

    if args.compact {
        print_compact(flights);
    } else {
        println!("{}", table::render(flights));
    }

    if args.stats {
        println!("{}", table::render_local_summary(&aggregate(flights)));
    }
}

async fn run_flights(args: FlightsArgs) {
    let json_mode = args.json || args.pretty;
    let options = api_options(&args.api);
    let filters = build_filters(&args.filters);

    if let Err(e) = filters.validate() {
        die(&e, json_mode);
    }

    if args.url || args.open {
        let url = fetch::flights_url(&filters, PAGE_SIZE, page_offset(args.page), &options);
        if args.open {
            println!("Opening: {url}");
            if let Err(e) = open::that(&url) {
                die(
                    &ApiError::Validation(format!("failed to open browser: {e}")),
                    json_mode,
                );
            }
        } else {
            println!("{url}");
        }
        return;
    }

    let flights = if args.all {
        fetch_all(&filters, args.max_pages, &options, json_mode).await
    } else {
        match flightdash::list_flights(&filters, args.page, &options).await {
            Ok(flights) => flights,
            Err(e) => die(&e, json_mode),
        }
    };

    print_flights(&flights, &args);
}

async fn run_summary(args: SummaryArgs) {
    let json_mode = args.json || args.pretty;
    let options = api_options(&args.api);

    if args.local {
        let filters = build_filters(&args.filters);
        if let Err(e) = filters.validate() {
            die(&e, json_mode);
        }
        let flights = fetch_all(&filters, args.max_pages, &options, json_mode).await;
        let stats = aggregate(&flights);
        if json_mode {
            let output = if args.pretty {
                serde_json::to_string_pretty(&stats).unwrap()
            } else {
                serde_json::to_string(&stats).unwrap()
            };
            println!("{output}");
        } else {
            println!("{}", table::render_local_summary(&stats));
        }
        return;
    }

    match flightdash::get_summary(&options).await {
        Ok(summary) => {
            if json_mode {
                let output = if args.pretty {
                    serde_json::to_string_pretty(&summary).unwrap()
                } else {
                    serde_json::to_string(&summary).unwrap()
                };
                println!("{output}");
            } else {
                println!("{}", table::render_summary(&summary));
            }
        }
        Err(e) => die(&e, json_mode),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !matches!(cli.command, Commands::Browse(_)) {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Flights(args) => run_flights(args).await,
        Commands::Summary(args) => run_summary(args).await,
        Commands::Browse(args) => {
            let options = api_options(&args.api);
            if let Err(e) = flightdash::browse::run(options).await {
                eprintln!("error: terminal failure: {e}");
                process::exit(1);
            }
        }
        Commands::Mcp(args) => flightdash::mcp::run(api_options(&args.api)).await,
    }
}

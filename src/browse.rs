use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::{Frame, Terminal};
use tokio::runtime::Handle;

use crate::controller::{ApplyOutcome, FetchRequest, QueryController};
use crate::error::ApiError;
use crate::fetch::{self, ApiOptions};
use crate::model::{Flight, SummaryMetrics};
use crate::query::FilterField;
use crate::sentinel::{RowRange, ScrollSentinel};
use crate::table::{format_km, format_seconds};

const DEBOUNCE: Duration = Duration::from_millis(800);
const TICK_RATE: Duration = Duration::from_millis(30);
const TOAST_TTL: Duration = Duration::from_secs(4);

const FIELDS: [FilterField; 4] = [
    FilterField::Search,
    FilterField::Airport,
    FilterField::AircraftModel,
    FilterField::FlightDate,
];

enum Completion {
    Flights {
        generation: u64,
        result: Result<Vec<Flight>, ApiError>,
    },
    Summary(Result<SummaryMetrics, ApiError>),
}

fn field_label(field: FilterField) -> &'static str {
    match field {
        FilterField::Search => "Search",
        FilterField::Airport => "Airport",
        FilterField::AircraftModel => "Aircraft",
        FilterField::FlightDate => "Date",
    }
}

fn spawn_flights_fetch(
    handle: &Handle,
    tx: &mpsc::Sender<Completion>,
    req: FetchRequest,
    options: &ApiOptions,
) {
    let tx = tx.clone();
    let options = options.clone();
    handle.spawn(async move {
        let result = match req.filters.validate() {
            Ok(()) => fetch::fetch_flights(&req.filters, req.limit, req.offset, &options).await,
            Err(e) => Err(e),
        };
        let _ = tx.send(Completion::Flights {
            generation: req.generation,
            result,
        });
    });
}

fn spawn_summary_fetch(handle: &Handle, tx: &mpsc::Sender<Completion>, options: &ApiOptions) {
    let tx = tx.clone();
    let options = options.clone();
    handle.spawn(async move {
        let _ = tx.send(Completion::Summary(fetch::fetch_summary(&options).await));
    });
}

pub async fn run(options: ApiOptions) -> io::Result<()> {
    let handle = Handle::current();
    tokio::task::spawn_blocking(move || ui_loop(&handle, options))
        .await
        .expect("browse task panicked")
}

fn ui_loop(handle: &Handle, options: ApiOptions) -> io::Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(handle, &options, &mut terminal);

    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    result
}

fn event_loop(
    handle: &Handle,
    options: &ApiOptions,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> io::Result<()> {
    let (tx, rx) = mpsc::channel::<Completion>();

    let mut controller = QueryController::new(DEBOUNCE);
    let mut sentinel = ScrollSentinel::new();
    let mut summary: Option<SummaryMetrics> = None;
    let mut active_field: usize = 0;
    let mut scroll: usize = 0;
    let mut list_rows: usize = 0;
    let mut toast: Option<(String, Instant)> = None;

    spawn_summary_fetch(handle, &tx, options);

    loop {
        let now = Instant::now();

        while let Ok(completion) = rx.try_recv() {
            match completion {
                Completion::Summary(Ok(metrics)) => summary = Some(metrics),
                Completion::Summary(Err(e)) => {
                    toast = Some((format!("Could not fetch summary metrics: {e}"), now));
                }
                Completion::Flights { generation, result } => match result {
                    Ok(flights) => {
                        controller.apply_success(generation, flights);
                    }
                    Err(e) => {
                        if controller.apply_failure(generation) == ApplyOutcome::Failed {
                            toast = Some((format!("Could not fetch flight data: {e}"), now));
                        }
                    }
                },
            }
        }

        if let Some(req) = controller.poll(now) {
            scroll = 0;
            spawn_flights_fetch(handle, &tx, req, options);
        }

        // The sentinel tracks the last rendered row; rebinding re-arms it
        // whenever a page lands and the list grows.
        sentinel.rebind(controller.flights().len().checked_sub(1));
        let viewport = RowRange {
            first: scroll,
            rows: list_rows,
        };
        if sentinel.poll(&viewport) && controller.has_more() {
            if let Some(req) = controller.request_next_page() {
                spawn_flights_fetch(handle, &tx, req, options);
            }
        }

        if let Some((_, since)) = toast {
            if now.duration_since(since) >= TOAST_TTL {
                toast = None;
            }
        }

        let max_scroll = controller.flights().len().saturating_sub(1);
        scroll = scroll.min(max_scroll);

        terminal.draw(|f| {
            list_rows = draw(
                f,
                &controller,
                summary.as_ref(),
                FIELDS[active_field],
                scroll,
                toast.as_ref().map(|(msg, _)| msg.as_str()),
            );
        })?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                {
                    break;
                }
                match key.code {
                    KeyCode::Esc => break,
                    KeyCode::Tab => active_field = (active_field + 1) % FIELDS.len(),
                    KeyCode::BackTab => {
                        active_field = (active_field + FIELDS.len() - 1) % FIELDS.len();
                    }
                    KeyCode::Char(c) => {
                        let field = FIELDS[active_field];
                        let mut value = controller.raw_filters().get(field).to_string();
                        value.push(c);
                        controller.set_field(field, &value, now);
                    }
                    KeyCode::Backspace => {
                        let field = FIELDS[active_field];
                        let mut value = controller.raw_filters().get(field).to_string();
                        value.pop();
                        controller.set_field(field, &value, now);
                    }
                    KeyCode::Up => scroll = scroll.saturating_sub(1),
                    KeyCode::Down => scroll = (scroll + 1).min(max_scroll),
                    KeyCode::PageUp => scroll = scroll.saturating_sub(list_rows.max(1)),
                    KeyCode::PageDown => scroll = (scroll + list_rows.max(1)).min(max_scroll),
                    KeyCode::Home => scroll = 0,
                    KeyCode::End => scroll = max_scroll,
                    _ => {}
                }
            }
        }
    }

    Ok(())
}

// Returns the number of list rows visible, which the next tick's sentinel
// viewport is computed from.
fn draw(
    f: &mut Frame,
    controller: &QueryController,
    summary: Option<&SummaryMetrics>,
    active_field: FilterField,
    scroll: usize,
    toast: Option<&str>,
) -> usize {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // summary tiles
            Constraint::Length(3), // filter inputs
            Constraint::Min(0),    // flight list
            Constraint::Length(1), // footer
        ])
        .split(f.area());

    draw_tiles(f, chunks[0], summary);
    draw_filters(f, chunks[1], controller, active_field);
    let rows = draw_list(f, chunks[2], controller, scroll);
    draw_footer(f, chunks[3], controller, toast);
    rows
}

fn tile(title: &'static str, value: String) -> Paragraph<'static> {
    Paragraph::new(Line::from(Span::styled(
        value,
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL).title(title))
}

fn draw_tiles(f: &mut Frame, area: Rect, summary: Option<&SummaryMetrics>) {
    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let (flights, distance, fuel, co2) = match summary {
        Some(s) => (
            s.total_flights.to_string(),
            format!("{:.0} km", s.avg_distance),
            format!("{:.0} kg", s.total_fuel_saving),
            format!("{:.0} kg", s.total_co2_saving),
        ),
        None => ("...".into(), "...".into(), "...".into(), "...".into()),
    };

    f.render_widget(tile("Total Flights", flights), tiles[0]);
    f.render_widget(tile("Avg. Distance", distance), tiles[1]);
    f.render_widget(tile("Fuel Savings", fuel), tiles[2]);
    f.render_widget(tile("CO\u{2082} Savings/Pax", co2), tiles[3]);
}

fn draw_filters(f: &mut Frame, area: Rect, controller: &QueryController, active: FilterField) {
    let raw = controller.raw_filters();
    let mut spans: Vec<Span> = Vec::new();

    for (i, field) in FIELDS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        let style = if *field == active {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!("{}:", field_label(*field)), style));
        let value = raw.get(*field);
        let shown = if value.is_empty() && *field == active {
            "_".to_string()
        } else {
            value.to_string()
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(shown, Style::default()));
    }

    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Search & Filter (Tab to switch field)"),
    );
    f.render_widget(bar, area);
}

fn flight_row(flight: &Flight) -> String {
    let fuel = flight.total_fuel_kg();
    format!(
        "{:<8} {:<13} {:<10} {:<20} {:>9} {:>10} {:>10}",
        flight.flight.as_deref().unwrap_or("—"),
        flight.route(),
        flight
            .departure_time_utc
            .as_deref()
            .and_then(|t| t.get(..10))
            .unwrap_or("—"),
        flight.aircraft_model.as_deref().unwrap_or("—"),
        format_seconds(flight.flight_duration_s),
        format_km(flight.distance_km()),
        if fuel > 0.0 {
            format!("{fuel:.0} kg")
        } else {
            "—".to_string()
        },
    )
}

fn draw_list(f: &mut Frame, area: Rect, controller: &QueryController, scroll: usize) -> usize {
    let rows = area.height.saturating_sub(2) as usize;
    let flights = controller.flights();

    let title = format!(
        "Flights ({} loaded{})",
        flights.len(),
        if controller.has_more() { ", more available" } else { "" }
    );
    let block = Block::default().borders(Borders::ALL).title(title);

    if controller.is_loading() {
        f.render_widget(
            Paragraph::new("Loading...").block(block),
            area,
        );
        return rows;
    }

    if flights.is_empty() {
        let hint = if controller.has_active_filters() {
            "No results found for your search."
        } else {
            "Type into the filters above to find flights."
        };
        f.render_widget(Paragraph::new(hint).block(block), area);
        return rows;
    }

    let end = (scroll + rows).min(flights.len());
    let items: Vec<ListItem> = flights[scroll..end]
        .iter()
        .map(|flight| ListItem::new(flight_row(flight)))
        .collect();

    f.render_widget(List::new(items).block(block), area);
    rows
}

fn draw_footer(f: &mut Frame, area: Rect, controller: &QueryController, toast: Option<&str>) {
    let line = if let Some(msg) = toast {
        Line::from(Span::styled(
            msg.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
    } else if controller.is_loading_more() {
        Line::from(Span::raw("Loading more..."))
    } else {
        let snap = controller.snapshot();
        Line::from(Span::styled(
            format!(
                "page {} | Tab switch field | arrows scroll | Esc quit{}",
                snap.current_page,
                if snap.has_more { "" } else { " | end of results" }
            ),
            Style::default().fg(Color::DarkGray),
        ))
    };
    f.render_widget(Paragraph::new(line), area);
}

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    let mut c = Command::new(assert_cmd::cargo_bin!("flightdash"));
    c.env("FLIGHTDASH_URL", "http://flights.test");
    c
}

#[test]
fn top_level_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Flight fuel and CO2 analytics dashboard for the terminal",
        ))
        .stdout(predicate::str::contains("flights"))
        .stdout(predicate::str::contains("summary"))
        .stdout(predicate::str::contains("browse"))
        .stdout(predicate::str::contains("mcp"))
        .stdout(predicate::str::contains("Examples:"))
        .stdout(predicate::str::contains("flightdash flights -a KJFK"));
}

#[test]
fn top_level_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("flightdash 0.3.2"));
}

#[test]
fn flights_help_shows_all_flags() {
    cmd()
        .args(["flights", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-s, --search <TEXT>"))
        .stdout(predicate::str::contains("-a, --airport <ICAO>"))
        .stdout(predicate::str::contains("-m, --aircraft <MODEL>"))
        .stdout(predicate::str::contains("-d, --date <YYYY-MM-DD>"))
        .stdout(predicate::str::contains("--page <N>"))
        .stdout(predicate::str::contains("--all"))
        .stdout(predicate::str::contains("--max-pages <N>"))
        .stdout(predicate::str::contains("--stats"))
        .stdout(predicate::str::contains("--compact"))
        .stdout(predicate::str::contains("--json"))
        .stdout(predicate::str::contains("--pretty"))
        .stdout(predicate::str::contains("--url"))
        .stdout(predicate::str::contains("--open"))
        .stdout(predicate::str::contains("--base-url <URL>"))
        .stdout(predicate::str::contains("--proxy <URL>"))
        .stdout(predicate::str::contains("--timeout <SECS>"))
        .stdout(predicate::str::contains("Examples:"));
}

#[test]
fn flights_help_shows_defaults() {
    cmd()
        .args(["flights", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[default: 1]"))
        .stdout(predicate::str::contains("[default: 50]"))
        .stdout(predicate::str::contains("[default: 30]"))
        .stdout(predicate::str::contains("9 flights per page"));
}

#[test]
fn summary_help_shows_local_mode() {
    cmd()
        .args(["summary", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--local"))
        .stdout(predicate::str::contains("--json"))
        .stdout(predicate::str::contains("only the pages actually loaded"));
}

#[test]
fn invalid_airport_code_fails() {
    cmd()
        .args(["flights", "-a", "JFK", "--url"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("invalid airport code"));
}

#[test]
fn invalid_date_fails() {
    cmd()
        .args(["flights", "-d", "2026-02-30", "--url"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("invalid date"));
}

#[test]
fn invalid_airport_fails_as_json() {
    cmd()
        .args(["flights", "-a", "JFK", "--json"])
        .assert()
        .failure()
        .code(2)
        .stdout(predicate::str::contains("\"kind\":\"invalid_airport\""));
}

#[test]
fn url_mode_prints_request_url_without_network() {
    cmd()
        .args(["flights", "-a", "kjfk", "--url"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "http://flights.test/flights?airport=KJFK&limit=9&offset=0",
        ));
}

#[test]
fn url_mode_encodes_and_offsets() {
    cmd()
        .args(["flights", "-m", "Boeing 737", "--page", "3", "--url"])
        .assert()
        .success()
        .stdout(predicate::str::contains("aircraft_model=Boeing%20737"))
        .stdout(predicate::str::contains("offset=18"));
}

#[test]
fn url_mode_omits_empty_filters() {
    cmd()
        .args(["flights", "-a", "EGLL", "--url"])
        .assert()
        .success()
        .stdout(predicate::str::contains("airport=EGLL"))
        .stdout(predicate::str::contains("search=").not())
        .stdout(predicate::str::contains("flight_date=").not());
}

#[test]
fn base_url_flag_overrides_env() {
    cmd()
        .args([
            "flights",
            "-a",
            "EFHK",
            "--url",
            "--base-url",
            "http://override.test",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://override.test/flights?"));
}

#[test]
fn unknown_subcommand_fails() {
    cmd().arg("routes").assert().failure();
}

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use iss_tracker::api::decode_json;
use iss_tracker::error::Result;
use iss_tracker::ui::{self, Request};
use iss_tracker::{Config, Fetch, IssClient};
use serde_json::Value;

const POSITION: &str = r#"{"iss_position":{"latitude":"10.1","longitude":"-20.2"},"message":"success"}"#;
const PASS: &str = r#"{"message":"success","response":[{"risetime":1700000000,"duration":420}]}"#;
const PEOPLE: &str = r#"{"people":[{"name":"A","craft":"ISS"},{"name":"B","craft":"ISS"},{"name":"C","craft":"Shenzhou"}],"number":3,"message":"success"}"#;

/// Answers by URL and remembers which URLs were hit, in order.
struct Scripted {
    bodies: HashMap<String, String>,
    hits: RefCell<Vec<String>>,
}

impl Scripted {
    fn new(position: &str, pass: &str, people: &str) -> Self {
        let config = Config::default();
        let bodies = HashMap::from([
            (config.position_url, position.to_string()),
            (config.pass_url, pass.to_string()),
            (config.astros_url, people.to_string()),
        ]);
        Scripted { bodies, hits: RefCell::new(Vec::new()) }
    }
}

impl Fetch for Scripted {
    fn get_json(&self, url: &str, _params: &[(&str, String)]) -> Result<Value> {
        self.hits.borrow_mut().push(url.to_string());
        decode_json(url, &self.bodies[url])
    }
}

fn clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

fn run(client: &IssClient<Scripted>, request: &Request) -> (anyhow::Result<()>, String) {
    let mut out = Vec::new();
    let result = ui::run_in(client, request, &Utc, clock, &mut out);
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn all_blocks_in_flag_order() {
    let client = IssClient::new(Scripted::new(POSITION, PASS, PEOPLE), Config::default());
    let request = Request {
        location: true,
        pass: Some("40.7,-74.0".into()),
        people: true,
    };

    let (result, out) = run(&client, &request);
    result.unwrap();
    assert_eq!(
        out,
        "The ISS current location at 2024-03-01 12:00:00 is 10.1, -20.2\n\
         The ISS will be overhead 40.7, -74.0 at 2023-11-14 22:13:20 for 420 seconds\n\
         There are 2 people aboard the ISS. They are A, B\n\
         There are 1 people aboard the Shenzhou. They are C\n"
    );
}

#[test]
fn only_requested_blocks_run() {
    let client = IssClient::new(Scripted::new(POSITION, PASS, PEOPLE), Config::default());
    let request = Request { people: true, ..Request::default() };

    let (result, out) = run(&client, &request);
    result.unwrap();
    assert!(out.starts_with("There are 2 people"));
    assert_eq!(*client_hits(&client), vec![Config::default().astros_url]);
}

#[test]
fn earlier_output_survives_later_failure() {
    let client = IssClient::new(Scripted::new(POSITION, PASS, "not json"), Config::default());
    let request = Request {
        location: true,
        pass: None,
        people: true,
    };

    let (result, out) = run(&client, &request);
    let err = result.unwrap_err();
    assert!(err.to_string().contains("crew roster"));
    assert!(err.chain().any(|e| e.to_string().contains("not valid JSON")));
    assert_eq!(out, "The ISS current location at 2024-03-01 12:00:00 is 10.1, -20.2\n");
}

#[test]
fn bad_pass_argument_stops_the_run_without_a_request() {
    let client = IssClient::new(Scripted::new(POSITION, PASS, PEOPLE), Config::default());
    let request = Request {
        location: true,
        pass: Some("somewhere".into()),
        people: true,
    };

    let (result, out) = run(&client, &request);
    assert!(result.is_err());
    assert_eq!(out.lines().count(), 1);
    assert_eq!(*client_hits(&client), vec![Config::default().position_url]);
}

#[test]
fn empty_pass_list_is_an_error() {
    let client = IssClient::new(Scripted::new(POSITION, r#"{"response":[]}"#, PEOPLE), Config::default());
    let request = Request { pass: Some("40.7 -74.0".into()), ..Request::default() };

    let (result, out) = run(&client, &request);
    let err = result.unwrap_err();
    assert!(err.chain().any(|e| e.to_string().contains("no pass prediction")));
    assert!(out.is_empty());
}

#[test]
fn location_line_uses_server_time_and_raw_text() {
    let position = r#"{"iss_position":{"latitude":"51.5000","longitude":"-0.1200"},"timestamp":1700000000,"message":"success"}"#;
    let client = IssClient::new(Scripted::new(position, PASS, PEOPLE), Config::default());
    let request = Request { location: true, ..Request::default() };

    let (result, out) = run(&client, &request);
    result.unwrap();
    assert_eq!(out, "The ISS current location at 2023-11-14 22:13:20 is 51.5000, -0.1200\n");
}

#[test]
fn nobody_in_space_prints_nothing() {
    let client = IssClient::new(Scripted::new(POSITION, PASS, r#"{"people":[],"number":0}"#), Config::default());
    let request = Request { people: true, ..Request::default() };

    let (result, out) = run(&client, &request);
    result.unwrap();
    assert!(out.is_empty());
}

fn client_hits(client: &IssClient<Scripted>) -> std::cell::Ref<'_, Vec<String>> {
    client.fetcher().hits.borrow()
}

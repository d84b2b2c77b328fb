// tests/fetch_retry.rs
use std::time::Duration;

use httpmock::prelude::*;
use muni_scrape::core::Fetcher;
use muni_scrape::error::FetchError;
use serde_json::json;

fn fetcher() -> Fetcher {
    Fetcher::new("test", Duration::from_secs(5), Duration::ZERO).unwrap()
}

#[test]
fn server_errors_are_retried_up_to_the_cap() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/w/api.php");
        then.status(503);
    });

    let err = fetcher().get_json(&server.url("/w/api.php"), &[("page", "X")], None).unwrap_err();

    mock.assert_calls(3);
    match err {
        FetchError::Exhausted { attempts, last_error } => {
            assert_eq!(attempts, 3);
            assert!(last_error.contains("503"), "{last_error}");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn undecodable_bodies_are_retried() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/sparql");
        then.status(200).body("<html>maintenance</html>");
    });

    assert!(fetcher().get_json(&server.url("/sparql"), &[], None).is_err());
    mock.assert_calls(3);
}

#[test]
fn unexpected_shape_is_returned_once() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/w/api.php").query_param("action", "parse");
        then.status(200).json_body(json!({ "batchcomplete": "" }));
    });

    let v = fetcher()
        .get_json(&server.url("/w/api.php"), &[("action", "parse")], None)
        .unwrap();

    mock.assert_calls(1);
    assert_eq!(v, json!({ "batchcomplete": "" }));
}

#[test]
fn accept_header_and_user_agent_are_sent() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/sparql")
            .header("accept", "application/sparql-results+json")
            .header_exists("user-agent");
        then.status(200).json_body(json!({ "results": { "bindings": [] } }));
    });

    fetcher()
        .get_json(&server.url("/sparql"), &[("format", "json")], Some("application/sparql-results+json"))
        .unwrap();
    mock.assert();
}

//! Loopback HTTP stub shared by the integration tests
#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

/// Canned response: status code and JSON body
pub type Reply = (u16, String);

/// Start a stub server answering every request with `route(target)`
///
/// `target` is the request target as sent (`/rest/api/2/search?jql=...`).
/// Returns the base URL, e.g. `http://127.0.0.1:41234`.
pub fn serve(route: fn(&str) -> Reply) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
    let addr = listener.local_addr().expect("stub addr");
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            handle(stream, route);
        }
    });
    format!("http://{}", addr)
}

fn handle(mut stream: TcpStream, route: fn(&str) -> Reply) {
    let mut buf = [0u8; 8192];
    let mut request = Vec::new();
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
    let head = String::from_utf8_lossy(&request);
    let target = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();

    let (status, body) = route(&target);
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason(status),
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Jira stub: any search fails with a JQL parse error
pub fn jira_bad_jql(target: &str) -> Reply {
    if target.starts_with("/rest/api/2/search") {
        (
            400,
            r#"{"errorMessages":["Error in the JQL Query: Expecting either a value or a field name"],"errors":{}}"#
                .to_string(),
        )
    } else {
        (404, String::new())
    }
}

/// Jira stub: two issues, one of them covered by case 5 below
pub fn jira_two_issues(target: &str) -> Reply {
    if target.starts_with("/rest/api/2/search") {
        (
            200,
            r#"{"total":2,"issues":[
                {"key":"MCR-5","fields":{"summary":"Login","status":{"name":"QA Finished"},"updated":"2024-03-09T10:00:00.000+0000","customfield_10020":[{"id":7,"name":"Sprint 7"}]}},
                {"key":"MCR-6","fields":{"summary":"Logout","status":{"name":"In Progress"}}}
            ]}"#
            .to_string(),
        )
    } else {
        (404, String::new())
    }
}

/// TestRail stub for project 2
///
/// Plan 1 answers 500. Plan 2 has runs 7 and 8; run 8 answers 403. Run 7
/// observes case 5 twice, the later one with unmapped status 9. The plan
/// and test lists use the wrapped (paginated) shape.
pub fn testrail_partial(target: &str) -> Reply {
    let endpoint = target.rsplit("/api/v2/").next().unwrap_or("");
    match endpoint {
        "get_plans/2" => (200, r#"{"offset":0,"limit":250,"size":2,"_links":{"next":null},"plans":[{"id":1,"name":"Broken"},{"id":2,"name":"Sprint 7"}]}"#.to_string()),
        "get_plan/1" => (500, r#"{"error":"Internal error"}"#.to_string()),
        "get_plan/2" => (200, r#"{"id":2,"entries":[{"runs":[{"id":7}]},{"runs":[{"id":8}]}]}"#.to_string()),
        "get_tests/7" => (200, r#"{"offset":0,"tests":[{"id":70,"case_id":5,"status_id":1,"updated_on":1600000000},{"id":71,"case_id":5,"status_id":9,"updated_on":1700000000}]}"#.to_string()),
        "get_tests/8" => (403, r#"{"error":"No access to run 8"}"#.to_string()),
        "get_case/5" => (200, r#"{"id":5,"title":"Covers MCR-5 login"}"#.to_string()),
        _ => (404, r#"{"error":"unknown endpoint"}"#.to_string()),
    }
}

#![cfg(feature = "network")]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use serde_json::Value;
use studyplan::plan::client::{GenerationError, HttpPlanClient, PlanGenerator};
use studyplan::plan::model::{Goal, Level, SessionConfig};
use studyplan::plan::render::render_plan;
use studyplan::store::json_store::JsonStore;
use studyplan::store::plan_store::PlanStore;
use tempfile::TempDir;

/// Serve one canned response and hand back the request path and JSON body.
fn serve_once(status: &'static str, body: &'static str) -> (String, mpsc::Receiver<(String, Value)>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        let path = request_line
            .split_whitespace()
            .nth(1)
            .unwrap_or_default()
            .to_string();

        let mut content_length = 0;
        loop {
            let mut header = String::new();
            reader.read_line(&mut header).unwrap();
            let header = header.trim_end();
            if header.is_empty() {
                break;
            }
            if let Some((name, value)) = header.split_once(':')
                && name.eq_ignore_ascii_case("content-length")
            {
                content_length = value.trim().parse().unwrap();
            }
        }
        let mut request_body = vec![0; content_length];
        reader.read_exact(&mut request_body).unwrap();
        let json: Value = serde_json::from_slice(&request_body).unwrap_or(Value::Null);
        tx.send((path, json)).unwrap();

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
        .unwrap();
    });

    (base_url, rx)
}

fn calculus() -> SessionConfig {
    SessionConfig {
        topic: "Calculus".to_string(),
        syllabus: "Limits, derivatives".to_string(),
        hours: "2".to_string(),
        days: "5".to_string(),
        goal: Goal::ExamPrep,
        level: Level::Intermediate,
    }
}

fn client(base_url: &str) -> HttpPlanClient {
    HttpPlanClient::new(base_url, Duration::from_secs(5))
}

#[test]
fn generates_plan_from_service() {
    let (base_url, requests) = serve_once(
        "200 OK",
        r#"{"strategy_notes":"Front-load proofs.","plan":[
            {"unit_title":"Day 1: Limits","duration":"2h","description":"Epsilon-delta","intensity":"High","important":true,"subtopics":["Continuity"]},
            {"unit_title":"Day 2: Derivatives","description":"Rules"}
        ]}"#,
    );

    let payload = client(&base_url).generate(&calculus()).unwrap();
    assert_eq!(payload.units().len(), 2);
    assert_eq!(payload.strategy(), "Front-load proofs.");

    let (path, sent) = requests.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(path, "/api/generate-plan");
    assert_eq!(sent["topic"], "Calculus");
    assert_eq!(sent["hours"], "2");

    let rendered = render_plan(&payload, &calculus());
    assert_eq!(rendered.entries[0].duration, "2h");
    assert!(rendered.entries[0].critical);
    assert_eq!(rendered.entries[1].duration, "FLEX");
}

#[test]
fn error_field_rejects_even_with_ok_status() {
    let (base_url, _requests) = serve_once("200 OK", r#"{"error":"quota exceeded"}"#);

    let err = client(&base_url).generate(&calculus()).unwrap_err();
    assert_eq!(err, GenerationError::Rejected("quota exceeded".to_string()));
}

#[test]
fn non_json_gateway_error_is_transport_failure() {
    let (base_url, _requests) = serve_once("502 Bad Gateway", "<html>Bad Gateway</html>");

    let err = client(&base_url).generate(&calculus()).unwrap_err();
    assert_eq!(err, GenerationError::Transport("HTTP 502".to_string()));
}

#[test]
fn unreachable_service_is_transport_failure() {
    // Bind then drop to get a port nothing listens on.
    let addr = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();

    let err = client(&format!("http://{addr}/"))
        .generate(&calculus())
        .unwrap_err();
    assert!(matches!(err, GenerationError::Transport(_)));
}

#[test]
fn generated_plan_survives_save_and_reload() {
    let (base_url, _requests) = serve_once(
        "200 OK",
        r#"{"plan":[{"unit_title":"Unit 1","description":"Intro","resource":"chapter 3"}]}"#,
    );
    let payload = client(&base_url).generate(&calculus()).unwrap();

    let dir = TempDir::new().unwrap();
    let store = PlanStore::new(JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap());
    store.save(&calculus(), &payload).unwrap();

    let reopened = PlanStore::new(JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap());
    let saved = reopened.list();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].topic, "Calculus");
    assert_eq!(saved[0].data, payload);
    assert_eq!(saved[0].data.units()[0].extra["resource"], "chapter 3");
}

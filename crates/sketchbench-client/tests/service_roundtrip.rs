use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use serde_json::json;
use tiny_http::{Header, Method, Request, Response, Server};

use sketchbench_client::ServiceClient;
use sketchbench_session::{
    ProjectIdentity, ProjectStore, SaveOutcome, StoreError, SyncController,
};

type RequestLog = Arc<Mutex<Vec<String>>>;

/// Serve a canned sketch service on an ephemeral port. The first
/// `initializing_probes` requests answer 503 the way the real service does
/// while its workspace bootstrap is still running.
fn spawn_service(initializing_probes: usize) -> (String, RequestLog) {
    let server = Server::http("127.0.0.1:0").expect("bind fake service");
    let addr = server.server_addr().to_ip().expect("tcp listener address");
    let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let thread_log = Arc::clone(&log);
    thread::spawn(move || {
        let mut remaining = initializing_probes;
        for mut request in server.incoming_requests() {
            let method = request.method().clone();
            let url = request.url().to_string();
            let mut body = String::new();
            let _ = request.as_reader().read_to_string(&mut body);
            thread_log
                .lock()
                .expect("request log")
                .push(format!("{method} {url} {body}").trim_end().to_string());
            if remaining > 0 {
                remaining -= 1;
                respond(
                    request,
                    503,
                    json!({
                        "error": "initializing",
                        "message": "the workspace bootstrap is still running",
                    }),
                );
                continue;
            }
            let (path, query) = url.split_once('?').unwrap_or((url.as_str(), ""));
            route(request, &method, path, query, &body);
        }
    });
    (format!("http://{addr}"), log)
}

fn route(request: Request, method: &Method, path: &str, query: &str, body: &str) {
    match (method, path) {
        (Method::Get, "/api/directories/sketchbook") => {
            respond(request, 200, json!({ "path": "/sketchbook" }));
        }
        (Method::Get, "/api/sketches") => respond(
            request,
            200,
            json!({
                "sketchbooks": [{
                    "path": "/sketchbook",
                    "sketches": [
                        { "name": "Blink", "path": "/sketchbook/Blink" },
                        { "name": "Fade", "path": "/sketchbook/Fade" },
                    ],
                }],
            }),
        ),
        (Method::Get, "/api/sketch/files") => {
            let target = query_param(query, "path").unwrap_or_default();
            match files_for(&target) {
                Some(files) => respond(request, 200, json!({ "files": files })),
                None => respond(
                    request,
                    404,
                    json!({ "error": "not found", "message": format!("no sketch at {target}") }),
                ),
            }
        }
        (Method::Get, "/api/sketch/file/content") => {
            let target = query_param(query, "path").unwrap_or_default();
            match file_content(&target) {
                Some(content) => respond(request, 200, json!({ "content": content })),
                None => respond(
                    request,
                    404,
                    json!({ "error": "not found", "message": format!("no file at {target}") }),
                ),
            }
        }
        (Method::Put, "/api/sketch/file/content") => {
            respond(request, 200, json!({ "success": true }));
        }
        (Method::Post, "/api/sketches/new") => respond(
            request,
            200,
            json!({ "success": true, "path": "/sketchbook/Gadget" }),
        ),
        (Method::Post, "/api/compile") => {
            let payload: serde_json::Value = serde_json::from_str(body).unwrap_or_default();
            let fqbn = payload.get("fqbn").and_then(|v| v.as_str()).unwrap_or("");
            respond(
                request,
                200,
                json!({ "success": true, "output": format!("Build for {fqbn} finished") }),
            );
        }
        _ => respond(request, 404, json!({ "error": "not found" })),
    }
}

fn files_for(path: &str) -> Option<Vec<&'static str>> {
    match path {
        "/sketchbook/Blink" => Some(vec!["Blink.ino", "util.h"]),
        "/sketchbook/Fade" => Some(vec!["Fade.ino"]),
        "/sketchbook/Gadget" => Some(vec!["Gadget.ino"]),
        _ => None,
    }
}

fn file_content(path: &str) -> Option<&'static str> {
    match path {
        "/sketchbook/Blink/Blink.ino" => Some("void setup() {}\n\nvoid loop() {}\n"),
        "/sketchbook/Blink/util.h" => Some("#pragma once\n"),
        "/sketchbook/Fade/Fade.ino" => Some("int level = 0;\n"),
        "/sketchbook/Gadget/Gadget.ino" => Some("void setup() {}\n\nvoid loop() {}\n"),
        _ => None,
    }
}

fn respond(request: Request, status: u16, body: serde_json::Value) {
    let response = Response::from_string(body.to_string())
        .with_header(Header::from_bytes("Content-Type", "application/json").unwrap())
        .with_status_code(status);
    let _ = request.respond(response);
}

fn query_param(query: &str, name: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| percent_decode(value))
    })
}

fn percent_decode(input: &str) -> String {
    let mut bytes = Vec::with_capacity(input.len());
    let mut iter = input.as_bytes().iter().copied();
    while let Some(byte) = iter.next() {
        match byte {
            b'%' => {
                let hi = iter.next().unwrap_or(b'0');
                let lo = iter.next().unwrap_or(b'0');
                let hex = [hi, lo];
                if let Ok(text) = std::str::from_utf8(&hex) {
                    if let Ok(value) = u8::from_str_radix(text, 16) {
                        bytes.push(value);
                    }
                }
            }
            b'+' => bytes.push(b' '),
            _ => bytes.push(byte),
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

async fn find_sketch(client: &ServiceClient, name: &str) -> ProjectIdentity {
    let sketches = client.list_projects().await.expect("list sketches");
    sketches
        .into_iter()
        .find(|sketch| sketch.name.as_str() == name)
        .expect("sketch exists")
}

fn count_with_prefix(log: &RequestLog, prefix: &str) -> usize {
    log.lock()
        .expect("request log")
        .iter()
        .filter(|entry| entry.starts_with(prefix))
        .count()
}

fn position_of(log: &RequestLog, prefix: &str) -> usize {
    log.lock()
        .expect("request log")
        .iter()
        .position(|entry| entry.starts_with(prefix))
        .expect("request issued")
}

#[tokio::test(flavor = "current_thread")]
async fn lists_sketches_from_the_first_sketchbook() {
    let (base_url, _log) = spawn_service(0);
    let client = ServiceClient::new(base_url);

    let sketches = client.list_projects().await.expect("list sketches");

    let names: Vec<&str> = sketches.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Blink", "Fade"]);
    assert_eq!(sketches[0].path, "/sketchbook/Blink");
    let dir = client.sketchbook_dir().await.expect("sketchbook dir");
    assert_eq!(dir, "/sketchbook");
}

#[tokio::test(flavor = "current_thread")]
async fn unreachable_service_maps_to_unavailable() {
    let server = Server::http("127.0.0.1:0").expect("bind probe listener");
    let addr = server.server_addr().to_ip().expect("tcp listener address");
    drop(server);
    let client = ServiceClient::new(format!("http://{addr}"));

    let err = client.list_projects().await.expect_err("refused connection");

    assert!(matches!(err, StoreError::Unavailable(_)));
}

#[tokio::test(flavor = "current_thread")]
async fn load_hydrates_every_listed_file() {
    let (base_url, log) = spawn_service(0);
    let client = ServiceClient::new(base_url);
    let blink = find_sketch(&client, "Blink").await;
    let mut controller = SyncController::new(client);

    controller.load_project(blink).await.expect("load Blink");

    let session = controller.session();
    assert_eq!(session.open_count(), 2);
    let active = session.active_file().expect("active file");
    assert_eq!(active.file_name(), "Blink.ino");
    assert_eq!(
        session.content(active),
        Some("void setup() {}\n\nvoid loop() {}\n")
    );
    assert_eq!(count_with_prefix(&log, "GET /api/sketch/files"), 1);
    assert_eq!(count_with_prefix(&log, "GET /api/sketch/file/content"), 2);
}

#[tokio::test(flavor = "current_thread")]
async fn unknown_sketch_path_maps_to_not_found() {
    let (base_url, _log) = spawn_service(0);
    let client = ServiceClient::new(base_url);

    let err = client
        .list_files("/sketchbook/Nope")
        .await
        .expect_err("missing sketch");

    assert_eq!(err, StoreError::NotFound("/sketchbook/Nope".into()));
}

#[tokio::test(flavor = "current_thread")]
async fn save_round_trip_sends_path_and_content() {
    let (base_url, log) = spawn_service(0);
    let client = ServiceClient::new(base_url);
    let blink = find_sketch(&client, "Blink").await;
    let mut controller = SyncController::new(client);
    controller.load_project(blink).await.expect("load Blink");

    let outcome = controller
        .save_active("// tuned\nvoid loop() {}\n")
        .await
        .expect("save");

    assert_eq!(outcome, SaveOutcome::Saved);
    let entries = log.lock().expect("request log").clone();
    let put = entries
        .iter()
        .find(|entry| entry.starts_with("PUT /api/sketch/file/content"))
        .expect("write request");
    assert!(put.contains("\"path\":\"/sketchbook/Blink/Blink.ino\""));
    assert!(put.contains("// tuned"));

    let outcome = controller
        .save_active("// tuned\nvoid loop() {}\n")
        .await
        .expect("second save");

    assert_eq!(outcome, SaveOutcome::Unchanged);
    assert_eq!(count_with_prefix(&log, "PUT /api/sketch/file/content"), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn compile_saves_the_buffer_before_the_build() {
    let (base_url, log) = spawn_service(0);
    let client = ServiceClient::new(base_url);
    let blink = find_sketch(&client, "Blink").await;
    let mut controller = SyncController::new(client);
    controller.load_project(blink).await.expect("load Blink");

    let report = controller
        .compile_active("arduino:avr:uno", "// dirty\nvoid loop() {}\n")
        .await
        .expect("compile");

    assert!(report.success);
    assert_eq!(report.output, "Build for arduino:avr:uno finished");
    let write = position_of(&log, "PUT /api/sketch/file/content");
    let build = position_of(&log, "POST /api/compile");
    assert!(write < build, "write at {write}, build at {build}");
}

#[tokio::test(flavor = "current_thread")]
async fn new_sketch_is_created_then_loaded() {
    let (base_url, _log) = spawn_service(0);
    let client = ServiceClient::new(base_url);
    let mut controller = SyncController::new(client);

    let identity = controller
        .new_project("Gadget")
        .await
        .expect("create Gadget");

    assert_eq!(identity.path, "/sketchbook/Gadget");
    let active = controller.session().active_file().expect("active file");
    assert_eq!(active.as_str(), "/sketchbook/Gadget/Gadget.ino");
}

#[tokio::test(flavor = "current_thread")]
async fn ready_polling_rides_out_the_initializing_window() {
    let (base_url, _log) = spawn_service(2);
    let client = ServiceClient::new(base_url);

    assert!(!client.ready().await.expect("first probe"));
    client
        .wait_until_ready(5, Duration::from_millis(10))
        .await
        .expect("service becomes ready");

    let sketches = client.list_projects().await.expect("list after ready");
    assert_eq!(sketches.len(), 2);
}

#[tokio::test(flavor = "current_thread")]
async fn readiness_polling_gives_up_after_the_attempt_budget() {
    let (base_url, log) = spawn_service(usize::MAX);
    let client = ServiceClient::new(base_url);

    let err = client
        .wait_until_ready(3, Duration::from_millis(5))
        .await
        .expect_err("budget exhausted");

    match err {
        StoreError::Unavailable(message) => assert!(message.contains("did not finish")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(count_with_prefix(&log, "GET /api/sketches"), 3);
}

#[tokio::test(flavor = "current_thread")]
async fn initializing_answer_maps_to_unavailable() {
    let (base_url, _log) = spawn_service(1);
    let client = ServiceClient::new(base_url);

    let err = client
        .list_files("/sketchbook/Blink")
        .await
        .expect_err("gated request");

    match err {
        StoreError::Unavailable(message) => assert!(message.contains("initializing")),
        other => panic!("unexpected error: {other:?}"),
    }
}

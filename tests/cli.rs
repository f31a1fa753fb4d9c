use std::fs;
use std::net::TcpListener;
use std::process::Command;

use serde_json::{json, Value};

fn closed_port_url(name: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind unused port");
    let addr = listener.local_addr().expect("local addr");
    format!("http://{addr}/framerusercontent.com/{name}")
}

fn write_project(dir: &tempfile::TempDir, a: &str, b: &str) -> std::path::PathBuf {
    let path = dir.path().join("project.json");
    let doc = json!({
        "nodes": [
            { "id": "n1", "properties": { "image": a } },
            { "id": "n2", "properties": { "src": b } }
        ],
        "collections": [
            { "id": "posts", "items": [ { "id": "p1", "fieldData": { "cover": a } } ] }
        ]
    });
    fs::write(&path, doc.to_string()).expect("write project");
    path
}

fn run(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_imgusage"))
        .args(args)
        .env_remove("IMGUSAGE_PROJECT")
        .env_remove("IMGUSAGE_HOST_SUBSTRING")
        .env_remove("IMGUSAGE_FORMAT")
        .output()
        .expect("run CLI")
}

#[test]
fn scan_prints_json_records() {
    let dir = tempfile::tempdir().expect("tempdir");
    let a = closed_port_url("a.png");
    let b = closed_port_url("b.png");
    let path = write_project(&dir, &a, &b);

    let output = run(&["--project", path.to_str().unwrap(), "--format", "json", "scan"]);
    assert!(
        output.status.success(),
        "cli exited with {}: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );

    let records: Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(
        records,
        json!([
            { "url": a, "count": 2, "size": null },
            { "url": b, "count": 1, "size": null }
        ])
    );
}

#[test]
fn replace_rewrites_project_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let a = closed_port_url("a.png");
    let b = closed_port_url("b.png");
    let c = closed_port_url("c.png");
    let path = write_project(&dir, &a, &b);

    let output = run(&[
        "--project",
        path.to_str().unwrap(),
        "replace",
        "--select",
        a.as_str(),
        "--with",
        c.as_str(),
    ]);
    assert!(
        output.status.success(),
        "cli exited with {}: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );

    let saved: Value =
        serde_json::from_str(&fs::read_to_string(&path).expect("read project")).expect("json");
    assert_eq!(saved["nodes"][0]["properties"]["image"], json!(c));
    assert_eq!(saved["nodes"][0]["properties"]["src"], json!(c));
    assert_eq!(saved["nodes"][1]["properties"]["src"], json!(b));
    assert_eq!(saved["collections"][0]["items"][0]["fieldData"]["cover"], json!(c));
}

#[test]
fn replace_refuses_unknown_selection() {
    let dir = tempfile::tempdir().expect("tempdir");
    let a = closed_port_url("a.png");
    let b = closed_port_url("b.png");
    let path = write_project(&dir, &a, &b);
    let before = fs::read_to_string(&path).expect("read project");

    let output = run(&[
        "--project",
        path.to_str().unwrap(),
        "replace",
        "--select",
        "https://framerusercontent.com/not-in-project.png",
        "--with",
        b.as_str(),
    ]);
    assert!(!output.status.success());
    assert_eq!(fs::read_to_string(&path).expect("read project"), before);
}

#[test]
fn replacement_is_written_verbatim() {
    let dir = tempfile::tempdir().expect("tempdir");
    let a = closed_port_url("a.png");
    let b = closed_port_url("b.png");
    let path = write_project(&dir, &a, &b);
    let padded = format!(" {} ", closed_port_url("c.png"));

    let output = run(&[
        "--project",
        path.to_str().unwrap(),
        "replace",
        "--select",
        a.as_str(),
        "--with",
        padded.as_str(),
    ]);
    assert!(
        output.status.success(),
        "cli exited with {}: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );

    let saved: Value =
        serde_json::from_str(&fs::read_to_string(&path).expect("read project")).expect("json");
    assert_eq!(saved["nodes"][0]["properties"]["image"], json!(padded));
    assert_eq!(saved["collections"][0]["items"][0]["fieldData"]["cover"], json!(padded));
}

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use serde_json::{Value, json};
use tempfile::TempDir;

fn run_host(args: &[&str], script: &[Value]) -> (bool, Vec<Value>, String) {
	let mut child = Command::new(env!("CARGO_BIN_EXE_checkout-bridge"))
		.args(args)
		.stdin(Stdio::piped())
		.stdout(Stdio::piped())
		.stderr(Stdio::piped())
		.spawn()
		.expect("failed to spawn checkout-bridge");

	{
		let mut stdin = child.stdin.take().expect("stdin should be piped");
		for line in script {
			writeln!(stdin, "{line}").expect("write script line");
		}
	}

	let output = child.wait_with_output().expect("checkout-bridge should exit");
	let stdout = String::from_utf8_lossy(&output.stdout).to_string();
	let stderr = String::from_utf8_lossy(&output.stderr).to_string();
	let lines = stdout
		.lines()
		.map(|line| serde_json::from_str(line).unwrap_or_else(|_| json!({ "raw": line })))
		.collect();
	(output.status.success(), lines, stderr)
}

fn write_options(dir: &Path, options: Value) -> String {
	let path = dir.join("bridge.json");
	std::fs::write(&path, options.to_string()).expect("options file should be written");
	path.display().to_string()
}

#[test]
fn launch_and_failure_event() {
	let (success, lines, stderr) = run_host(
		&["--listen"],
		&[
			json!({"type": "attach", "kind": "MainActivity"}),
			json!({"type": "call", "method": "launchCheckout", "arguments": {"checkoutUrl": "https://shop.example/checkout", "config": {"colorScheme": "dark", "preload": true}}}),
			json!({"type": "engine", "outcome": "failed", "message": "network timeout"}),
			json!({"type": "call", "method": "closeCheckout"}),
			json!({"type": "call", "method": "closeCheckout"}),
		],
	);

	assert!(success, "host failed: {stderr}");
	assert_eq!(
		lines,
		vec![
			json!({"type": "reply", "method": "launchCheckout", "result": {"status": "success", "result": "Checkout Launched"}}),
			json!({"type": "event", "event": "failed", "error": "network timeout"}),
			json!({"type": "reply", "method": "closeCheckout", "result": {"status": "success", "result": "Checkout Closed"}}),
			json!({"type": "reply", "method": "closeCheckout", "result": {"status": "success", "result": "Checkout Closed"}}),
		]
	);
}

#[test]
fn launch_without_context_reports_invalid_context() {
	let (success, lines, stderr) = run_host(
		&[],
		&[json!({"type": "call", "method": "launchCheckout", "arguments": {"checkoutUrl": "https://shop.example/checkout"}})],
	);

	assert!(success, "host failed: {stderr}");
	assert_eq!(lines.len(), 1);
	assert_eq!(lines[0]["result"]["status"], "error");
	assert_eq!(lines[0]["result"]["code"], "INVALID_CONTEXT");
	assert_eq!(lines[0]["result"]["details"]["observedContext"], Value::Null);
}

#[test]
fn empty_url_reports_invalid_arguments() {
	let (success, lines, _) = run_host(
		&[],
		&[
			json!({"type": "attach", "kind": "MainActivity"}),
			json!({"type": "call", "method": "launchCheckout", "arguments": {"checkoutUrl": ""}}),
		],
	);

	assert!(success);
	assert_eq!(lines[0]["result"]["code"], "INVALID_ARGUMENTS");
}

#[test]
fn unknown_method_is_not_implemented() {
	let (success, lines, _) = run_host(&[], &[json!({"type": "call", "method": "preloadCheckout"})]);

	assert!(success);
	assert_eq!(lines, vec![json!({"type": "reply", "method": "preloadCheckout", "result": {"status": "not_implemented"}})]);
}

#[test]
fn reject_policy_from_options_file() {
	let tmp = TempDir::new().expect("temp dir should be created");
	let config = write_options(tmp.path(), json!({"relaunch": "reject"}));

	let (success, lines, stderr) = run_host(
		&["--config", &config],
		&[
			json!({"type": "attach", "kind": "MainActivity"}),
			json!({"type": "call", "method": "launchCheckout", "arguments": {"checkoutUrl": "https://shop.example/a"}}),
			json!({"type": "call", "method": "launchCheckout", "arguments": {"checkoutUrl": "https://shop.example/b"}}),
		],
	);

	assert!(success, "host failed: {stderr}");
	assert_eq!(lines[0]["result"]["status"], "success");
	assert_eq!(lines[1]["result"]["code"], "SESSION_ACTIVE");
}

#[test]
fn invalid_options_file_fails_startup() {
	let tmp = TempDir::new().expect("temp dir should be created");
	let config = write_options(tmp.path(), json!({"relaunch": "sometimes"}));

	let (success, lines, stderr) = run_host(&["--config", &config], &[]);

	assert!(!success);
	assert!(lines.is_empty());
	assert!(stderr.contains("invalid options file"), "stderr: {stderr}");
}

#[test]
fn malformed_lines_do_not_stop_processing() {
	let (success, lines, _) = run_host(
		&[],
		&[json!("not an action"), json!({"type": "call", "method": "closeCheckout"})],
	);

	assert!(success);
	assert_eq!(lines[0]["type"], "invalid_line");
	assert_eq!(lines[1]["result"]["result"], "Checkout Closed");
}

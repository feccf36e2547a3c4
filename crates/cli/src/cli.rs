use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use checkout_bridge::BridgeOptions;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "checkout-bridge")]
#[command(about = "Drive the checkout bridge with NDJSON host actions on stdin")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Bridge options file (JSON)
	#[arg(short, long, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Start with an event listener installed
	#[arg(long)]
	pub listen: bool,
}

/// Loads bridge options from `path`, or defaults when no path is given.
pub fn load_options(path: Option<&Path>) -> Result<BridgeOptions> {
	let Some(path) = path else {
		return Ok(BridgeOptions::default());
	};

	let raw = std::fs::read_to_string(path).with_context(|| format!("failed to read options file {}", path.display()))?;
	serde_json::from_str(&raw).with_context(|| format!("invalid options file {}", path.display()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use checkout_bridge::RelaunchPolicy;

	#[test]
	fn parses_flags() {
		let cli = Cli::parse_from(["checkout-bridge", "-vv", "--config", "bridge.json", "--listen"]);
		assert_eq!(cli.verbose, 2);
		assert_eq!(cli.config.as_deref(), Some(Path::new("bridge.json")));
		assert!(cli.listen);
	}

	#[test]
	fn missing_path_yields_defaults() {
		assert_eq!(load_options(None).unwrap(), BridgeOptions::default());
	}

	#[test]
	fn loads_options_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("bridge.json");
		std::fs::write(&path, r#"{"relaunch": "reject"}"#).unwrap();

		let options = load_options(Some(&path)).unwrap();
		assert_eq!(options.relaunch, RelaunchPolicy::Reject);
		assert!(!options.close_on_detach);
	}

	#[test]
	fn unreadable_file_names_path() {
		let err = load_options(Some(Path::new("/nonexistent/bridge.json"))).unwrap_err();
		assert!(err.to_string().contains("/nonexistent/bridge.json"));
	}
}

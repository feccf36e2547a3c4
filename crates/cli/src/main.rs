use checkout_bridge_cli::cli::{Cli, load_options};
use checkout_bridge_cli::host::ScriptedHost;
use checkout_bridge_cli::logging;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	if let Err(err) = run(cli).await {
		let chain = format!("{err:#}");
		error!(target = "checkout.host", error = %chain, "host failed");
		std::process::exit(1);
	}
}

async fn run(cli: Cli) -> anyhow::Result<()> {
	let mut host = ScriptedHost::new(load_options(cli.config.as_deref())?);
	let options = host.options();
	info!(target = "checkout.host", relaunch = ?options.relaunch, close_on_detach = options.close_on_detach, "bridge ready");

	if cli.listen {
		host.listen();
	}

	let mut stdin = BufReader::new(tokio::io::stdin()).lines();
	let mut stdout = tokio::io::stdout();

	while let Some(line) = stdin.next_line().await? {
		for output in host.handle_line(&line) {
			let mut encoded = serde_json::to_vec(&output)?;
			encoded.push(b'\n');
			stdout.write_all(&encoded).await?;
		}
		stdout.flush().await?;
	}

	Ok(())
}

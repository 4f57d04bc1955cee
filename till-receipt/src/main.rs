use std::io::Write;

use anyhow::{Context, bail};
use till_receipt::{Order, PrintDispatcher, ReceiptConfig, logger};

const USAGE: &str = "usage: till-receipt <print|preview> <order.json> | discover";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first, then logging from the loaded config
    let _ = dotenv::dotenv();
    let config = ReceiptConfig::from_env().context("loading printer configuration")?;
    logger::init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    tracing::debug!(config = ?config, "Configuration loaded");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let dispatcher = PrintDispatcher::from_config(&config);

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["print", path] => {
            let order = read_order(path)?;
            let ack = dispatcher.print(&order).await?;
            tracing::info!(
                endpoint = %ack.endpoint,
                bytes = ack.bytes_sent,
                path = ?ack.path,
                "Receipt printed"
            );
            println!("printed {} ({} bytes) on {}", ack.description, ack.bytes_sent, ack.endpoint);
        }
        ["preview", path] => {
            let order = read_order(path)?;
            let job = dispatcher.prepare(&order);
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(job.payload())?;
            stdout.flush()?;
        }
        ["discover"] => match dispatcher.check_connection().await {
            Some(endpoint) => println!("reachable: {}", endpoint),
            None => bail!(
                "no reachable printer among {} candidates",
                dispatcher.registry().len()
            ),
        },
        _ => bail!(USAGE),
    }

    Ok(())
}

fn read_order(path: &str) -> anyhow::Result<Order> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing order from {}", path))
}

//! Crawl Status Example
//!
//! Fires a list of target URLs in windows of three, pausing briefly between
//! windows, and prints each result as it lands:
//! - Successful fetches show their HTTP status, body size and latency
//! - Transport failures are printed as data; they never abort the run
//!
//! Usage:
//!   cargo run --example crawl_status -- https://example.com https://example.org
//!
//! With no arguments a built-in target list is used (one target is
//! deliberately unreachable to show failure handling). Set RUST_LOG=debug
//! to watch the window-by-window dispatch log.

use std::env;
use volley::{DispatchConfig, DispatchEvent, Dispatcher};

const DEFAULT_TARGETS: &[&str] = &[
    "https://example.com",
    "https://example.org",
    "https://example.net",
    "https://httpbin.org/status/404",
    "https://httpbin.org/status/503",
    // Never listening; shows a transport error riding in a result
    "http://127.0.0.1:9/unreachable",
    "https://httpbin.org/delay/1",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let mut targets: Vec<String> = env::args().skip(1).collect();
    if targets.is_empty() {
        targets = DEFAULT_TARGETS.iter().map(|t| t.to_string()).collect();
    }

    println!("=== Volley Crawl Status Demo ===\n");
    println!("Dispatching {} targets, 3 at a time, 200ms between windows\n", targets.len());

    let config = DispatchConfig::new(targets)
        .with_concurrency(3)
        .with_wait_time_ms(200);
    let dispatcher = Dispatcher::from_config(config)?;

    let mut events = dispatcher.start()?;
    let mut ok = 0usize;
    let mut failed = 0usize;

    while let Some(event) = events.recv().await {
        match event {
            DispatchEvent::Item(item) => match item.outcome {
                Ok(response) => {
                    ok += 1;
                    println!(
                        "[{:>3}] {} ({} bytes, {:?})",
                        response.status,
                        item.url,
                        response.body.len(),
                        item.elapsed
                    );
                }
                Err(e) => {
                    failed += 1;
                    println!("[err] {} ({})", item.url, e);
                }
            },
            DispatchEvent::End => println!("\nAll targets finished."),
        }
    }

    let snapshot = dispatcher.snapshot();
    println!(
        "\nSummary: {} fetched, {} failed, phase {:?}",
        ok, failed, snapshot.phase
    );
    Ok(())
}

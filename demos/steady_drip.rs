//! Steady Drip Example
//!
//! Drip-feeds a larger target list through narrow windows with a one second
//! pause, then demonstrates the runtime controls:
//! - update_wait_time tightens the pace after the first few results
//! - stop cuts the run short; in-flight calls still report their results
//!
//! Usage:
//!   cargo run --example steady_drip

use volley::{DispatchConfig, DispatchEvent, Dispatcher};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let targets: Vec<String> = (1..=12)
        .map(|page| format!("https://example.com/?page={page}"))
        .collect();

    println!("=== Volley Steady Drip Demo ===\n");
    println!("12 targets, 2 per window, starting at 1000ms between windows\n");

    let config = DispatchConfig::new(targets)
        .with_concurrency(2)
        .with_wait_time_ms(1000);
    let dispatcher = Dispatcher::from_config(config)?;

    let mut events = dispatcher.start()?;
    let mut seen = 0usize;

    while let Some(event) = events.recv().await {
        match event {
            DispatchEvent::Item(item) => {
                seen += 1;
                match &item.outcome {
                    Ok(response) => println!("#{:<2} [{:>3}] {}", seen, response.status, item.url),
                    Err(e) => println!("#{:<2} [err] {} ({})", seen, item.url, e),
                }

                if seen == 4 {
                    // Two windows in: tighten the pace for the rest
                    dispatcher.update_wait_time(250)?;
                    println!("     -> pace tightened to 250ms between windows");
                }
                if seen == 8 {
                    dispatcher.stop();
                    println!("     -> stop requested; draining in-flight calls");
                }
            }
            DispatchEvent::End => println!("\nAll targets finished."),
        }
    }

    let snapshot = dispatcher.snapshot();
    println!(
        "\nRun ended in phase {:?} after {}/{} targets",
        snapshot.phase, snapshot.finished, snapshot.total
    );
    Ok(())
}

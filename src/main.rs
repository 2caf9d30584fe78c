use std::io::BufRead;
use std::sync::Arc;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::prelude::*;
use scrape_client::{
    config::Config,
    terminal::{parse_line, run, TerminalView, HELP},
    HttpApi,
    RequestController,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_env("LOG_LEVEL")
                .unwrap_or_else(|_| "info,hyper=warn,reqwest=info".into()),
        )
        .init();

    // Load configuration
    let config = Config::load()?;
    info!("Using scraping API at {}", config.api_base);

    let view = Arc::new(Mutex::new(TerminalView::new(config.output_dir.clone())));
    let mut controller = RequestController::new(HttpApi::new(&config), view, &config);
    controller.check_health().await;

    println!("{}", HELP);

    // Blocking stdin reads get their own thread so the command loop keeps
    // seeing input while a scrape is in flight.
    let (tx, mut rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(parse_line(&line)).is_err() {
                break;
            }
        }
    });

    run(&mut controller, &mut rx).await;

    Ok(())
}

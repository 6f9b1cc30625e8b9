use std::env;
use std::error;
use anyhow::Context;
use load_rs::{driver, logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn error::Error>> {
    if let Err(e) = logging::init() {
        eprintln!("load-driver: {}", e);
    }

    if let Err(e) = start().await {
        eprintln!("{:#}", e);
        return Err(e.into());
    }

    Ok(())
}

async fn start() -> anyhow::Result<()> {
    let cfg = driver::DriverConfig::from_env(env::args().skip(1))?;
    log::info!("driving {} with mean gap {}s", cfg.program, cfg.mean);
    let summary = driver::start(cfg).await.context("load-driver")?;
    log::info!("{} launched, {} lost", summary.launched, summary.lost);
    Ok(())
}

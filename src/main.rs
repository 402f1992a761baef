//! mbox contacts - Extracts contact emails and names from Gmail mbox exports
//!
//! Writes a JSON file of `[email, [names...]]`, a JSON file of bare
//! emails and a vCard file, all sorted by reversed domain then email.

use anyhow::Result;
use clap::Parser;
use log::{error, info};
use std::time::Instant;

use mbox_contacts::cli::Args;
use mbox_contacts::{logging, Config, Processor, RunReport};

fn main() -> Result<()> {
    let args = Args::parse();

    // Convert args to config
    let config: Config = args.into();

    logging::init(&config.log_path, config.debug_mode)?;

    info!("mbox contacts - Contact Extractor");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Input: {}", config.input_path.display());

    let log_path = config.log_path.clone();
    let start = Instant::now();
    let mut report = RunReport::new();

    let result = Processor::new(config).and_then(|processor| processor.process(&mut report));

    if let Some(summary) = report.summary(&log_path) {
        info!("{summary}");
    }

    match result {
        Ok(contacts) => {
            info!(
                "Extracted {} contacts in {:?}",
                contacts.len(),
                start.elapsed()
            );
            log::logger().flush();
            Ok(())
        }
        Err(e) => {
            error!("{e}");
            log::logger().flush();
            Err(e.into())
        }
    }
}

//! Scan and watch command handlers
//!
//! `run` is the long-lived agent: one eager scan, then a rescan per burst of
//! save file changes. `scan` performs a single pass.

use crate::cli::ServerArgs;
use crate::config::Config;
use crate::transport::HttpTransport;
use crate::watch;
use anyhow::Result;
use farmlink::{discover, ScanReport, Scanner};
use std::path::Path;
use std::time::Duration;

/// Quiet period that ends a burst of save writes
const SAVE_QUIET_PERIOD: Duration = Duration::from_millis(500);

fn scanner(args: ServerArgs) -> Result<Scanner<HttpTransport>> {
    let config = Config::load()?;
    let root = config.resolve_save_root(args.root)?;
    let server = config.resolve_server(args.server)?;

    let transport = HttpTransport::new(&server, Duration::from_secs(args.timeout));
    tracing::info!("Reporting resources to {}", transport.endpoint());
    Ok(Scanner::new(root, transport))
}

fn print_report(report: &ScanReport) {
    println!(
        "Scanned {} save(s): {} failed, {} resource(s) delivered, {} delivery failure(s)",
        report.saves, report.failed_saves, report.delivered, report.failed_deliveries
    );
}

/// Handle the run command
pub fn run(args: ServerArgs) -> Result<()> {
    let scanner = scanner(args)?;
    let root = scanner.root().to_path_buf();

    if !root.is_dir() {
        tracing::warn!(
            "No Farming Simulator 2019 installation found at {}",
            root.display()
        );
        return Ok(());
    }

    tracing::info!("Found Farming Simulator 2019 installation: {}", root.display());
    scanner.scan();

    watch::watch(&root, SAVE_QUIET_PERIOD, || {
        scanner.scan();
    })
}

/// Handle the scan command
pub fn scan(args: ServerArgs, dry_run: bool) -> Result<()> {
    if dry_run {
        let config = Config::load()?;
        let root = config.resolve_save_root(args.root)?;
        return print_records(&root);
    }

    let report = scanner(args)?.scan();
    print_report(&report);
    Ok(())
}

/// Print every save's records as JSON lines
fn print_records(root: &Path) -> Result<()> {
    for slot in discover(root) {
        let resources = slot.load().and_then(|save| farmlink::inspect(&save));
        match resources {
            Ok(resources) => {
                for resource in &resources {
                    println!("{}", serde_json::to_string(resource)?);
                }
            }
            Err(e) => tracing::error!("Failed to process save {}: {}", slot.path().display(), e),
        }
    }
    Ok(())
}

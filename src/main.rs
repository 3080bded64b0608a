//! Workbook validator entry point.
//!
//! Loads the workbook and changelog, runs the suite battery, writes the XML
//! report, and exits non-zero if anything failed. Load failures are fatal:
//! no report is produced for a document that cannot be read.

#![forbid(unsafe_code)]

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use workbook_validate::cli::Cli;
use workbook_validate::engine::{Accumulator, FAIL_GLYPH};
use workbook_validate::report::{render_nunit, REPORT_FILE_NAME};
use workbook_validate::suites::{self, SuiteInput};
use workbook_validate::{document, extract, flatten};

fn main() {
    if let Err(err) = main_impl() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn main_impl() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let inputs = document::load(&cli.workbook, &cli.changelog)?;
    tracing::debug!(
        workbook = %cli.workbook.display(),
        bytes = inputs.workbook.raw.len(),
        "loaded inputs"
    );

    let items = flatten::flatten_items(inputs.workbook.items());
    let queries = extract::extract_queries(&items);
    let charts = extract::extract_charts(&items);
    tracing::debug!(
        items = items.len(),
        queries = queries.len(),
        charts = charts.len(),
        "extracted views"
    );

    let input = SuiteInput {
        workbook: &inputs.workbook,
        changelog: &inputs.changelog,
        items: &items,
        queries: &queries,
        charts: &charts,
    };
    let mut acc = Accumulator::new().quiet(cli.quiet);
    suites::run_all(&input, &mut acc);

    println!(
        "\n{} passed, {} failed, {} total",
        acc.passed(),
        acc.failed(),
        acc.total()
    );
    if acc.failed() > 0 {
        println!("\nFailing checks:");
        for record in acc.failures() {
            println!("  {FAIL_GLYPH} [{}] {}", record.suite, record.name);
            println!("      expected: {}", record.expected);
            println!("      actual:   {}", record.actual);
        }
    }

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("create output dir: {}", cli.out_dir.display()))?;
    let report_path = cli.out_dir.join(REPORT_FILE_NAME);
    let xml = render_nunit(&acc);
    std::fs::write(&report_path, xml.as_bytes())
        .with_context(|| format!("write {}", report_path.display()))?;
    println!("\nReport: {}", report_path.display());

    if acc.failed() > 0 {
        std::process::exit(1);
    }
    Ok(())
}

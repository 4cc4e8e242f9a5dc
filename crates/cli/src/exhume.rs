//! exhume - Recover the revision history of a PDF
//!
//! A command line tool that lists every object each incremental save
//! added, modified or deleted, and can write each historical version out as
//! a standalone PDF.

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use exhume_core::api::export::{
    output_stem, scrubbed_file_name, summary_file_name, versions_dir_name, write_scrubbed,
    write_versions,
};
use exhume_core::api::report::{display_info, single_version_notice, summarize};
use exhume_core::document::{LoadOptions, PDFDocument};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// A command line tool for recovering PDF revision history.
#[derive(Parser, Debug)]
#[command(name = "exhume")]
#[command(author, version, about = "Recover previous versions of an incrementally saved PDF", long_about = None)]
#[command(disable_version_flag = true)]
struct Args {
    /// Path to the PDF file
    file: PathBuf,

    /// Print version information
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: (),

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// Display creator information for each version
    #[arg(short = 'i', long = "info", action = ArgAction::SetTrue)]
    info: bool,

    /// Write each version to <name>-versions/ along with a summary
    #[arg(short = 'w', long = "write", action = ArgAction::SetTrue)]
    write: bool,

    /// Only print the number of versions
    #[arg(short = 'q', long = "quiet", action = ArgAction::SetTrue)]
    quiet: bool,

    /// Write <name>-scrubbed.pdf with stale object bodies blanked (experimental)
    #[arg(short = 's', long = "scrub", action = ArgAction::SetTrue)]
    scrub: bool,
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let options = LoadOptions {
        load_info: args.info,
        ..LoadOptions::default()
    };
    let doc = PDFDocument::open(&args.file, options)
        .with_context(|| format!("'{}' could not be loaded as a PDF", args.file.display()))?;

    tracing::debug!(
        file = %args.file.display(),
        versions = doc.valid_revision_count(),
        "loaded document"
    );
    let mut stdout = BufWriter::new(io::stdout());

    if doc.valid_revision_count() < 2 {
        if !args.quiet && !args.info {
            writeln!(stdout, "{}", single_version_notice(&doc))?;
        }
        if args.write {
            stdout.flush()?;
            return Ok(());
        }
    }

    let stem = output_stem(doc.name());

    if args.write {
        let dir = PathBuf::from(versions_dir_name(&stem));
        if dir.exists() {
            bail!(
                "directory '{}' already exists, PDF version extraction will not occur",
                dir.display()
            );
        }
        let written = write_versions(&doc, &dir, &stem)
            .with_context(|| format!("could not write versions into '{}'", dir.display()))?;
        tracing::info!(dir = %dir.display(), count = written.len(), "wrote versions");

        let summary_path = dir.join(summary_file_name(&stem));
        let file = File::create(&summary_path)
            .with_context(|| format!("could not open '{}' for writing", summary_path.display()))?;
        let mut summary = BufWriter::new(file);
        summarize(&mut summary, &doc, args.quiet)?;
        summary.flush()?;
        tracing::debug!(path = %summary_path.display(), "wrote summary");
    } else {
        summarize(&mut stdout, &doc, args.quiet)?;
    }

    if args.scrub {
        writeln!(
            stdout,
            "The scrub feature (-s) is experimental and likely not to work as expected."
        )?;
        let path = PathBuf::from(scrubbed_file_name(&stem));
        if path.exists() {
            bail!("'{}' already exists, refusing to overwrite it", path.display());
        }
        write_scrubbed(&doc, &path)
            .with_context(|| format!("could not write scrubbed document '{}'", path.display()))?;
        tracing::info!(path = %path.display(), "wrote scrubbed copy");
    }

    if args.info {
        display_info(&mut stdout, &doc)?;
    }

    stdout.flush()?;
    Ok(())
}

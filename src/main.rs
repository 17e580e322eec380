use anyhow::{Context, Result};
use clap::Parser;
use regex::Regex;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use goobj_reader::logging::init_logging;
use goobj_reader::print::{write_report, ReportOptions};
use goobj_reader::serializer::serialize_decoded;

/// Print the symbols defined in a go object file.
#[derive(Parser, Debug)]
#[command(name = "readgoobj", version)]
struct Cli {
    /// Go object file to read
    file: PathBuf,

    /// Also list every relocation
    #[arg(short = 'r', long = "relocs", default_value_t = false)]
    relocs: bool,

    /// Only show symbols whose name matches this regular expression
    #[arg(short = 'f', long = "filter")]
    filter: Option<String>,

    /// Emit JSON instead of text tables
    #[arg(short = 'j', long = "json", default_value_t = false)]
    json: bool,

    /// Enable debug output
    #[arg(short = 'd', long = "debug", default_value_t = false)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _logger = init_logging(cli.debug).context("failed to start logger")?;

    let filter = cli
        .filter
        .as_deref()
        .map(Regex::new)
        .transpose()
        .context("invalid --filter pattern")?;
    let opts = ReportOptions {
        relocations: cli.relocs,
        filter,
    };

    let file = goobj_reader::parse_path(&cli.file)
        .with_context(|| format!("failed to parse goobj file {}", cli.file.display()))?;
    log::debug!(
        "{} symbols, {} references, {} data bytes",
        file.symbols().len(),
        file.references().len(),
        file.data().len()
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if cli.json {
        let value = serialize_decoded(&file, &opts)?;
        serde_json::to_writer_pretty(&mut out, &value)?;
        writeln!(out)?;
    } else {
        write_report(&file, &opts, &mut out)?;
    }
    out.flush()?;
    Ok(())
}

use anyhow::Context;
use clap::Parser;
use is_terminal::IsTerminal;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use kvfmt::{JsonlRecordParser, LogfmtFormatter, RecordFormatter, TimestampFormat};

#[derive(Parser)]
#[command(name = "kvfmt")]
#[command(about = "Render JSON log lines as colorized logfmt")]
#[command(version)]
struct Args {
    /// Input file (default: stdin)
    input_file: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long = "output")]
    output_file: Option<PathBuf>,

    /// Force colorized keys even when not writing to a terminal
    #[arg(long, conflicts_with = "no_color")]
    color: bool,

    /// Never colorize keys
    #[arg(long)]
    no_color: bool,

    /// Quote every value
    #[arg(long)]
    force_quote: bool,

    /// Never quote values
    #[arg(long, conflicts_with = "force_quote")]
    no_quote: bool,

    /// Quote empty values
    #[arg(long)]
    quote_empty: bool,

    /// Omit the time field
    #[arg(long)]
    no_timestamp: bool,

    /// Emit user fields in input order instead of sorted
    #[arg(long)]
    no_sort: bool,

    /// strftime format for the time field
    #[arg(long, value_name = "FORMAT", conflicts_with = "micros")]
    timestamp_format: Option<String>,

    /// Use microsecond timestamp precision
    #[arg(long)]
    micros: bool,

    /// Only keep these user fields, in this order (comma-separated)
    #[arg(short = 'k', long = "keys", value_delimiter = ',')]
    keys: Vec<String>,

    /// Drop these user fields (comma-separated)
    #[arg(short = 'K', long = "remove-keys", value_delimiter = ',')]
    remove_keys: Vec<String>,

    /// Stop at the first malformed line instead of skipping it
    #[arg(long)]
    fail_fast: bool,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let use_colors = match (args.color, args.no_color) {
        (true, _) => true,
        (_, true) => false,
        // Auto-detect: colorize only when writing to a terminal
        _ => args.output_file.is_none() && io::stdout().is_terminal(),
    };

    let timestamp_format = match (&args.timestamp_format, args.micros) {
        (Some(format), _) => TimestampFormat::Custom(format.clone()),
        (None, true) => TimestampFormat::Rfc3339Micro,
        (None, false) => TimestampFormat::Rfc3339Milli,
    };

    let formatter = LogfmtFormatter {
        disable_colors: !use_colors,
        disable_sorting: args.no_sort,
        force_quote: args.force_quote,
        disable_quote: args.no_quote,
        quote_empty_fields: args.quote_empty,
        disable_timestamp: args.no_timestamp,
        timestamp_format,
        ..LogfmtFormatter::default()
    };

    let parser = JsonlRecordParser {
        keys: (!args.keys.is_empty()).then(|| args.keys.clone()),
        remove_keys: (!args.remove_keys.is_empty()).then(|| args.remove_keys.clone()),
    };

    let input: Box<dyn BufRead> = if let Some(input_path) = &args.input_file {
        let file = File::open(input_path)
            .with_context(|| format!("Failed to open input file '{}'", input_path.display()))?;
        Box::new(BufReader::new(file))
    } else {
        Box::new(BufReader::new(io::stdin()))
    };

    let mut output: Box<dyn Write> = if let Some(output_path) = &args.output_file {
        let file = File::create(output_path)
            .with_context(|| format!("Failed to create output file '{}'", output_path.display()))?;
        Box::new(BufWriter::new(file))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };

    // One line buffer reused across records
    let mut line_buffer = String::new();

    for (index, line) in input.lines().enumerate() {
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        let record = match parser.parse_line(&line, index + 1) {
            Ok(record) => record,
            Err(e) if args.fail_fast => return Err(e.into()),
            Err(e) => {
                eprintln!("Warning: {}", e);
                continue;
            }
        };

        line_buffer.clear();
        formatter.format_into(&record, &mut line_buffer);
        output
            .write_all(line_buffer.as_bytes())
            .context("Failed to write output")?;
    }

    output.flush().context("Failed to flush output")?;
    Ok(())
}

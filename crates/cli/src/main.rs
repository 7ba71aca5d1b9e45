//! RowClone trace conversion CLI.
//!
//! This binary provides a single entry point for the offline trace tools.
//! It performs:
//! 1. **Convert:** Rewrite one row-granularity trace into cache-line
//!    records, substituting same-subarray copy windows with RowClones.
//! 2. **Batch:** Slice a large trace and convert the slices concurrently.
//! 3. **Staging and inspection:** Expand row-pair traces into the staging
//!    shape, pretty-print level vectors, hex-dump addresses, and print the
//!    DDR energy estimate.

use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use rctrace_core::codec::AddressSpec;
use rctrace_core::config::GeometryConfig;
use rctrace_core::convert::{convert_reader, ConvertOptions};
use rctrace_core::{batch, energy, expand, hex, inspect};

#[derive(Parser, Debug)]
#[command(
    name = "rctrace",
    author,
    version,
    about = "Offline DRAM trace restructuring with RowClone substitution",
    long_about = "Convert row-granularity DRAM traces to cache-line granularity, \
replacing same-subarray copy patterns with bulk RowClone commands.\n\nExamples:\n  \
rctrace convert -i inputs/case0.trace -o out/case0.trace\n  \
rctrace batch -i inputs/baseline.trace -d out/ --slice 500000 --workers 4\n  \
rctrace expand4 -i inputs/pairs.trace -o inputs/staged.trace\n  \
rctrace blocks -i out/case0.trace"
)]
struct Cli {
    /// Geometry JSON file; defaults to the built-in 8 Gb / 4 KB geometry.
    #[arg(long, global = true)]
    geometry: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert one trace to cache-line granularity.
    Convert {
        /// Input row-granularity trace.
        #[arg(short, long)]
        input: PathBuf,

        /// Output trace file.
        #[arg(short, long)]
        output: PathBuf,

        /// Row budget; conversion stops after this many rows.
        #[arg(long)]
        limit: Option<u64>,

        /// Interleave source/destination cache lines instead of grouping.
        #[arg(long)]
        alternate: bool,

        /// Expand copy windows fully instead of substituting RowClones.
        #[arg(long)]
        no_rowclone: bool,
    },

    /// Slice a large trace and convert the slices concurrently.
    Batch {
        /// Input row-granularity trace.
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for slice files.
        #[arg(short = 'd', long)]
        out_dir: PathBuf,

        /// Lines per slice (rounded down to a multiple of 4).
        #[arg(long, default_value_t = 500_000)]
        slice: usize,

        /// Worker pool size.
        #[arg(long, default_value_t = 4)]
        workers: usize,

        /// Interleave source/destination cache lines instead of grouping.
        #[arg(long)]
        alternate: bool,

        /// Expand copy windows fully instead of substituting RowClones.
        #[arg(long)]
        no_rowclone: bool,
    },

    /// Expand read/write row pairs into the four-line staging shape.
    Expand4 {
        /// Input row-pair trace.
        #[arg(short, long)]
        input: PathBuf,

        /// Output staged trace.
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Pretty-print each line's level vector; validate RowClone lines.
    Blocks {
        /// Trace file to inspect.
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Hex-dump one address per line as four-digit words.
    Hex {
        /// Address list file.
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the per-rail DDR energy estimate for one copy window.
    Energy,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let spec = load_spec(cli.geometry.as_deref());

    match cli.command {
        Commands::Convert {
            input,
            output,
            limit,
            alternate,
            no_rowclone,
        } => {
            let opts = ConvertOptions {
                target_rows: limit.unwrap_or(u64::MAX),
                alternate_cachelines: alternate,
                row_clone: !no_rowclone,
            };
            cmd_convert(&spec, &input, &output, opts);
        }
        Commands::Batch {
            input,
            out_dir,
            slice,
            workers,
            alternate,
            no_rowclone,
        } => {
            let opts = batch::BatchOptions {
                slice_len: slice,
                workers,
                convert: ConvertOptions {
                    target_rows: u64::MAX,
                    alternate_cachelines: alternate,
                    row_clone: !no_rowclone,
                },
            };
            cmd_batch(&spec, &input, &out_dir, &opts);
        }
        Commands::Expand4 { input, output } => cmd_expand4(&input, &output),
        Commands::Blocks { input } => cmd_blocks(&spec, &input),
        Commands::Hex { input } => cmd_hex(&input),
        Commands::Energy => cmd_energy(),
    }
}

/// Builds the address spec from the default or a JSON geometry file.
///
/// Exits the process on an unreadable file or an invalid derivation; a bad
/// geometry is fatal before any trace is touched.
fn load_spec(geometry: Option<&std::path::Path>) -> AddressSpec {
    let config = match geometry {
        Some(path) => GeometryConfig::from_json_file(path).unwrap_or_else(|e| {
            eprintln!("[!] FATAL: could not read geometry '{}': {}", path.display(), e);
            process::exit(1);
        }),
        None => GeometryConfig::default(),
    };
    AddressSpec::new(&config).unwrap_or_else(|e| {
        eprintln!("[!] FATAL: invalid geometry: {e}");
        process::exit(1);
    })
}

/// Opens a file for buffered reading, exiting on failure.
fn open_input(path: &std::path::Path) -> BufReader<fs::File> {
    fs::File::open(path).map(BufReader::new).unwrap_or_else(|e| {
        eprintln!("[!] FATAL: could not open '{}': {}", path.display(), e);
        process::exit(1);
    })
}

/// Runs a single-file conversion and prints the run statistics.
fn cmd_convert(
    spec: &AddressSpec,
    input: &std::path::Path,
    output: &std::path::Path,
    opts: ConvertOptions,
) {
    let conversion = match convert_reader(spec, open_input(input), opts) {
        Ok(conversion) => conversion,
        Err(e) => {
            eprintln!("[!] Conversion failed: {e}");
            process::exit(1);
        }
    };

    let file = fs::File::create(output).unwrap_or_else(|e| {
        eprintln!("[!] FATAL: could not create '{}': {}", output.display(), e);
        process::exit(1);
    });
    let mut out = BufWriter::new(file);
    for record in &conversion.records {
        if let Err(e) = writeln!(out, "{record}") {
            eprintln!("[!] FATAL: write failed: {e}");
            process::exit(1);
        }
    }
    if let Err(e) = out.flush() {
        eprintln!("[!] FATAL: write failed: {e}");
        process::exit(1);
    }

    println!(
        "[*] Converted {} -> {} ({} records)",
        input.display(),
        output.display(),
        conversion.records.len()
    );
    conversion.stats.print();
}

/// Runs a slice-parallel batch conversion and prints the merged summary.
fn cmd_batch(
    spec: &AddressSpec,
    input: &std::path::Path,
    out_dir: &std::path::Path,
    opts: &batch::BatchOptions,
) {
    match batch::run(spec, input, out_dir, opts) {
        Ok(summary) => {
            println!(
                "[*] Batch complete: {} slices in {}",
                summary.slices,
                out_dir.display()
            );
            summary.stats.print();
        }
        Err(e) => {
            eprintln!("[!] Batch failed: {e}");
            process::exit(1);
        }
    }
}

/// Expands row pairs into the staging shape.
fn cmd_expand4(input: &std::path::Path, output: &std::path::Path) {
    let file = fs::File::create(output).unwrap_or_else(|e| {
        eprintln!("[!] FATAL: could not create '{}': {}", output.display(), e);
        process::exit(1);
    });
    match expand::expand4(open_input(input), BufWriter::new(file)) {
        Ok(pairs) => println!("[*] Expanded {pairs} row pairs into staging shape"),
        Err(e) => {
            eprintln!("[!] Expansion failed: {e}");
            process::exit(1);
        }
    }
}

/// Pretty-prints level vectors for each trace line.
fn cmd_blocks(spec: &AddressSpec, input: &std::path::Path) {
    match inspect::describe(spec, open_input(input)) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
        }
        Err(e) => {
            eprintln!("[!] Inspection failed: {e}");
            process::exit(1);
        }
    }
}

/// Hex-dumps one address per line.
fn cmd_hex(input: &std::path::Path) {
    match hex::dump(open_input(input)) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
        }
        Err(e) => {
            eprintln!("[!] Hex dump failed: {e}");
            process::exit(1);
        }
    }
}

/// Prints the per-rail energy estimate.
fn cmd_energy() {
    let totals = energy::estimate();
    println!("VDD1: {:.2}", totals[0]);
    println!("VDD2: {:.2}", totals[1]);
}

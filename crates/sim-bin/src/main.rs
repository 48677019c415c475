//! simatrix entrypoint: reads strings, fills the pairwise score matrix and
//! writes it out.

use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

use core_config::Config;
use core_io::{Format, read_dir_entries, read_lines, read_stdin, write_matrix};
use core_matrix::{ComputeOptions, Matrix, ProgressSink, compute, parse_range};
use core_measures::resolve;
use core_strings::{Delimiters, StrValue, symbolize_all};

/// CLI arguments. Every option overrides its configuration-file
/// counterpart.
#[derive(Parser, Debug)]
#[command(name = "simatrix", version, about = "Pairwise string similarity matrices")]
struct Args {
    /// Input file (one string per line) or directory with --dir. Reads
    /// stdin when omitted.
    pub input: Option<PathBuf>,

    /// Treat the input path as a directory: one string per file.
    #[arg(long)]
    pub dir: bool,

    /// Lines carry a `<label>,` prefix.
    #[arg(long)]
    pub labeled: bool,

    /// Measure name, e.g. dist_levenshtein, sim_jaccard, kern_spectrum.
    #[arg(short, long)]
    pub measure: Option<String>,

    /// Delimiter specification (`%HH` escapes allowed); empty keeps
    /// strings byte-level.
    #[arg(short, long)]
    pub delimiters: Option<String>,

    /// Row range `a:b` (negative b counts from the end).
    #[arg(short = 'x', long = "x-range")]
    pub x_range: Option<String>,

    /// Column range `a:b`.
    #[arg(short = 'y', long = "y-range")]
    pub y_range: Option<String>,

    /// Block shard `B:k` of the y-range, applied after narrowing.
    #[arg(short, long)]
    pub split: Option<String>,

    /// Output file; stdout when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format: text or libsvm.
    #[arg(short, long)]
    pub format: Option<String>,

    /// Score precision in the output.
    #[arg(short, long)]
    pub precision: Option<usize>,

    /// Worker threads; 0 uses all cores, 1 runs sequentially.
    #[arg(short, long, default_value_t = 0)]
    pub threads: usize,

    /// Configuration file path (overrides discovery of `simatrix.toml`).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable the progress bar.
    #[arg(long)]
    pub no_progress: bool,
}

/// Progress bar consumer for the driver's throttled updates.
struct BarSink {
    bar: ProgressBar,
}

impl BarSink {
    fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{elapsed_precise} [{bar:40}] {pos}/{len} cells ({percent}%)",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { bar }
    }
}

impl ProgressSink for BarSink {
    fn update(&self, done: usize, _total: usize) {
        self.bar.set_position(done as u64);
    }
    fn finish(&self, _total: usize) {
        self.bar.finish_and_clear();
    }
}

fn configure_logging() {
    // Stderr keeps the matrix output on stdout clean; RUST_LOG selects
    // verbosity.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_input(args: &Args) -> Result<Vec<StrValue>> {
    match (&args.input, args.dir) {
        (Some(path), true) => {
            read_dir_entries(path).with_context(|| format!("reading directory {}", path.display()))
        }
        (Some(path), false) => {
            read_lines(path, args.labeled).with_context(|| format!("reading {}", path.display()))
        }
        (None, true) => bail!("--dir requires an input path"),
        (None, false) => read_stdin(args.labeled).context("reading stdin"),
    }
}

/// Folds CLI overrides into the loaded configuration.
fn merge_config(mut cfg: Config, args: &Args) -> Config {
    if let Some(measure) = &args.measure {
        cfg.measure.name = measure.clone();
    }
    if let Some(delims) = &args.delimiters {
        cfg.tokenize.delimiters = delims.clone();
    }
    if let Some(x) = &args.x_range {
        cfg.ranges.x = x.clone();
    }
    if let Some(y) = &args.y_range {
        cfg.ranges.y = y.clone();
    }
    if let Some(split) = &args.split {
        cfg.ranges.split = split.clone();
    }
    if let Some(format) = &args.format {
        cfg.output.format = format.clone();
    }
    if let Some(precision) = args.precision {
        cfg.output.precision = precision;
    }
    cfg
}

fn main() -> Result<()> {
    configure_logging();
    let args = Args::parse();
    let cfg = merge_config(core_config::load_from(args.config.clone())?, &args);

    let mut strs = read_input(&args)?;
    if strs.is_empty() {
        bail!("no input strings");
    }
    let n = strs.len();

    if let Some(delims) = Delimiters::parse(&cfg.tokenize.delimiters) {
        symbolize_all(&mut strs, &delims);
    }

    let mut measure = resolve(&cfg.measure.name);
    measure.configure(&cfg.measure)?;

    let mut matrix = Matrix::new(&strs);
    matrix.set_x_range(parse_range(&cfg.ranges.x, n));
    matrix.set_y_range(parse_range(&cfg.ranges.y, n));
    if !cfg.ranges.split.is_empty() {
        matrix
            .split_y(&cfg.ranges.split)
            .with_context(|| format!("applying split {:?}", cfg.ranges.split))?;
    }
    matrix.allocate();

    let (xl, yl, cells) = matrix.dims();
    info!(
        target: "runtime",
        strings = n,
        measure = cfg.measure.name.as_str(),
        xl,
        yl,
        cells,
        threads = args.threads,
        "startup"
    );

    let bar = (!args.no_progress).then(|| BarSink::new(cells));
    compute(
        &mut matrix,
        &strs,
        |a, b| measure.compare(a, b),
        &ComputeOptions {
            threads: args.threads,
            sink: bar.as_ref().map(|b| b as &dyn ProgressSink),
        },
    )?;

    let format = Format::parse(&cfg.output.format);
    match &args.output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            let mut w = BufWriter::new(file);
            write_matrix(&matrix, &mut w, format, cfg.output.precision)?;
            w.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut w = BufWriter::new(stdout.lock());
            write_matrix(&matrix, &mut w, format, cfg.output.precision)?;
            w.flush()?;
        }
    }

    info!(
        target: "runtime",
        elapsed_ms = matrix.elapsed().map(|d| d.as_millis() as u64),
        "done"
    );
    Ok(())
}

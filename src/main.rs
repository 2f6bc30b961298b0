use clap::Parser;
use domain_counter::{
    ColumnSelector, CounterConfig, DomainCounter, ProcessorError, output_path_for,
    processor::sink::write_ranked,
};
use jemallocator::Jemalloc;
use log::{LevelFilter, debug};
use simple_logger::SimpleLogger;
use std::{
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    time::Instant,
};

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[derive(Parser)]
#[command(name = "domain_counter")]
#[command(about = "Count customers per e-mail domain in a CSV file, most frequent first")]
#[command(version)]
struct Cli {
    #[arg(short, long, help = "Path to the CSV file to process")]
    file: PathBuf,

    #[arg(short, long, help = "Header name of the address column [default: email]")]
    column: Option<String>,

    #[arg(
        long,
        conflicts_with = "column",
        help = "0-based position of the address column"
    )]
    column_index: Option<usize>,

    #[arg(short, long, help = "Worker count [default: 2 x available CPUs]")]
    workers: Option<usize>,

    #[arg(
        short,
        long,
        conflicts_with = "stdout",
        help = "Output file [default: <dir>/outcomes/<name>_output.csv]"
    )]
    output: Option<PathBuf>,

    #[arg(long, help = "Print the ranked domains instead of writing a file")]
    stdout: bool,

    #[arg(
        short,
        long,
        default_value = "info",
        help = "Logging level (off, trace, debug, info, warn, error)"
    )]
    log_level: LevelFilter,
}

impl Cli {
    fn config(&self) -> CounterConfig {
        let column = match (&self.column, self.column_index) {
            (_, Some(idx)) => ColumnSelector::Index(idx),
            (Some(name), None) => ColumnSelector::Named(name.clone()),
            (None, None) => ColumnSelector::default(),
        };
        CounterConfig {
            column,
            workers: self.workers,
        }
    }
}

fn validate_input(path: &Path) -> Result<(), ProcessorError> {
    if !path.is_file() {
        return Err(ProcessorError::InvalidInput(format!(
            "file does not exist: {}",
            path.display()
        )));
    }

    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(ProcessorError::InvalidInput(format!(
            "file must have a .csv extension: {}",
            path.display()
        )));
    }

    Ok(())
}

fn run(cli: &Cli) -> Result<(), ProcessorError> {
    validate_input(&cli.file)?;
    let counter = DomainCounter::with_config(cli.config());

    if cli.stdout {
        let report = counter.count(&cli.file)?;
        let stdout = std::io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        write_ranked(&mut out, &report.ranked)
            .and_then(|()| out.flush())
            .map_err(|e| ProcessorError::io("write", "<stdout>", e))?;
        return Ok(());
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| output_path_for(&cli.file));
    counter.process_to(&cli.file, &output)?;

    Ok(())
}

/// Error message followed by its cause chain, one line each
fn error_report(err: &dyn std::error::Error) -> String {
    let mut report = format!("Error processing CSV file: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        report.push_str(&format!("\n  caused by: {cause}"));
        source = cause.source();
    }
    report
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = SimpleLogger::new().with_level(cli.log_level).init() {
        eprintln!("Failed to initialise logger: {e}");
    }

    eprintln!("Processing CSV file: {}", cli.file.display());
    let start = Instant::now();

    if let Err(e) = run(&cli) {
        // stderr regardless of the log level
        eprintln!("{}", error_report(&e));
        debug!("{e:?}");
        std::process::exit(1);
    }

    eprintln!("Processing completed in: {:?}", start.elapsed());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("domain_counter").chain(args.iter().copied()))
    }

    #[test]
    fn test_missing_file_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate_input(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(
            err,
            ProcessorError::InvalidInput(msg) if msg.contains("does not exist")
        ));
    }

    #[test]
    fn test_extension_must_be_csv() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("customers.txt");
        let upper = dir.path().join("customers.CSV");
        let bare = dir.path().join("customers");
        for path in [&txt, &upper, &bare] {
            fs::write(path, "email\na@b.com\n").unwrap();
        }

        assert!(matches!(
            validate_input(&txt),
            Err(ProcessorError::InvalidInput(msg)) if msg.contains(".csv")
        ));
        assert!(validate_input(&bare).is_err());
        assert!(validate_input(&upper).is_ok());
    }

    #[test]
    fn test_column_flags_conflict() {
        assert!(parse(&["-f", "a.csv", "--column", "x", "--column-index", "1"]).is_err());
        assert!(parse(&["-f", "a.csv", "--output", "o.csv", "--stdout"]).is_err());
    }

    #[test]
    fn test_cli_config() {
        let cli = parse(&["-f", "a.csv"]).unwrap();
        assert_eq!(cli.config().column, ColumnSelector::default());
        assert_eq!(cli.config().workers, None);
        assert_eq!(cli.log_level, LevelFilter::Info);

        let cli = parse(&["-f", "a.csv", "--column-index", "2", "-w", "3", "-l", "off"]).unwrap();
        assert_eq!(cli.config().column, ColumnSelector::Index(2));
        assert_eq!(cli.config().workers, Some(3));
        assert_eq!(cli.log_level, LevelFilter::Off);

        let cli = parse(&["-f", "a.csv", "-c", "contact", "--stdout"]).unwrap();
        assert_eq!(cli.config().column, ColumnSelector::Named("contact".into()));
        assert!(cli.stdout);
    }

    #[test]
    fn test_error_report_includes_causes() {
        let err = ProcessorError::io(
            "open",
            "/data/x.csv",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        let report = error_report(&err);

        assert!(report.starts_with("Error processing CSV file: failed to open /data/x.csv"));
        assert!(report.ends_with("\n  caused by: no such file"));
    }

    #[test]
    fn test_stdout_run_writes_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("c.csv");
        fs::write(&input, "email\na@b.com\n").unwrap();

        let cli = parse(&["-f", input.to_str().unwrap(), "--stdout"]).unwrap();
        run(&cli).unwrap();
        assert!(!output_path_for(&input).exists());
    }
}

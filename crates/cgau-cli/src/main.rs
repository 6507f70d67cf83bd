use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use cgau_core::diagnostics::{TracingSink, dump_frame};
use cgau_core::{DecodeReport, FrameDecoder, device_address, make_report, parse_frame};
use clap::{Args, Parser, Subcommand};
use glob::glob;
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("CGAU_BUILD_COMMIT"),
    ", built ",
    env!("CGAU_BUILD_DATE"),
    ")"
);

const HEX_SOURCE: &str = "hex";

#[derive(Parser, Debug)]
#[command(name = "cgau")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Offline decoder for CGAU environmental-sensor frames.",
    long_about = None,
    after_help = "Examples:\n  cgau frame decode payload.bin --stdout\n  cgau frame decode --hex 43474155... --topic qingping/582D34AABBCC/up -o report.json\n  cgau frame dump payload.bin"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on captured CGAU payloads.
    Frame {
        #[command(subcommand)]
        command: FrameCommands,
    },
}

#[derive(Args, Debug)]
struct PayloadArgs {
    /// Path to a raw payload file (a glob must match exactly one file)
    #[arg(required_unless_present = "hex", conflicts_with = "hex")]
    input: Option<PathBuf>,

    /// Payload given inline as hex (whitespace ignored)
    #[arg(long)]
    hex: Option<String>,
}

#[derive(Subcommand, Debug)]
enum FrameCommands {
    /// Decode a payload and generate a versioned JSON report.
    #[command(alias = "parse")]
    Decode {
        #[command(flatten)]
        payload: PayloadArgs,

        /// Topic the payload was published on, used to label the device
        #[arg(long)]
        topic: Option<String>,

        /// Dump the frame to the log before decoding
        #[arg(long)]
        debug: bool,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,

        /// Exit with a non-zero code if no reading was decoded
        #[arg(long)]
        strict: bool,
    },
    /// Print a human-readable breakdown of a payload.
    Dump {
        #[command(flatten)]
        payload: PayloadArgs,

        /// Emit the breakdown as JSON
        #[arg(long)]
        json: bool,
    },
}

struct DecodeOptions {
    topic: Option<String>,
    debug: bool,
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    quiet: bool,
    strict: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Frame { command } => match command {
            FrameCommands::Decode {
                payload,
                topic,
                debug,
                report,
                stdout,
                pretty,
                compact,
                quiet,
                strict,
            } => {
                init_tracing(quiet);
                cmd_frame_decode(
                    payload,
                    DecodeOptions {
                        topic,
                        debug,
                        report,
                        stdout,
                        pretty,
                        compact,
                        quiet,
                        strict,
                    },
                )
            }
            FrameCommands::Dump { payload, json } => cmd_frame_dump(payload, json),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing(quiet: bool) {
    let default = if quiet { "error" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

/// Payload bytes plus a label describing where they came from.
struct LoadedPayload {
    source: String,
    path: Option<PathBuf>,
    bytes: Vec<u8>,
}

fn cmd_frame_decode(payload: PayloadArgs, opts: DecodeOptions) -> Result<(), CliError> {
    let loaded = load_payload(payload)?;
    let report_path = if opts.stdout {
        None
    } else {
        Some(opts.report.clone().ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?)
    };
    if let (Some(report_path), Some(input_path)) = (report_path.as_ref(), loaded.path.as_ref()) {
        ensure_distinct_paths(report_path, input_path)?;
    }

    let decoder = FrameDecoder::new()
        .with_debug(opts.debug)
        .with_sink(Arc::new(TracingSink));
    let received_at = OffsetDateTime::now_utc();
    let mut result = decoder.decode(Some(loaded.bytes.as_slice()));
    result.stamp(received_at);

    let decoded = !result.is_empty();
    tracing::debug!(
        source = %loaded.source,
        bytes = loaded.bytes.len(),
        decoded,
        "decoded payload"
    );
    let mut report = make_report(&loaded.source, loaded.bytes.len() as u64, result);
    report.device = opts
        .topic
        .as_deref()
        .map(|topic| device_address(topic).to_string());
    let json = serialize_report(&report, opts.pretty, opts.compact)?;

    match report_path {
        None => print!("{}", json),
        Some(path) => {
            write_report(&path, &json)?;
            if !opts.quiet {
                eprintln!("OK: report written -> {}", path.display());
            }
        }
    }

    if opts.strict && !decoded {
        let reason = parse_frame(&loaded.bytes)
            .err()
            .map(|err| err.to_string())
            .unwrap_or_else(|| "no reading".to_string());
        return Err(CliError::new(
            format!("no reading decoded: {reason}"),
            Some("use --debug to dump the payload".to_string()),
        ));
    }
    Ok(())
}

fn cmd_frame_dump(payload: PayloadArgs, json: bool) -> Result<(), CliError> {
    let loaded = load_payload(payload)?;
    let dump = dump_frame(&loaded.bytes);
    if json {
        let text = serde_json::to_string_pretty(&dump).context("JSON serialization failed")?;
        println!("{}", text);
    } else {
        for line in dump.lines() {
            println!("{}", line);
        }
    }
    Ok(())
}

fn load_payload(args: PayloadArgs) -> Result<LoadedPayload, CliError> {
    if let Some(text) = args.hex {
        let bytes = parse_hex(&text)?;
        return Ok(LoadedPayload {
            source: HEX_SOURCE.to_string(),
            path: None,
            bytes,
        });
    }

    let input = args.input.ok_or_else(|| {
        CliError::new(
            "missing payload",
            Some("pass a payload file or --hex".to_string()),
        )
    })?;
    let resolved = resolve_input_path(&input)?;
    validate_input_file(&resolved)?;
    let bytes = fs::read(&resolved)
        .with_context(|| format!("Failed to read input file: {}", resolved.display()))?;
    Ok(LoadedPayload {
        source: resolved.display().to_string(),
        path: Some(resolved),
        bytes,
    })
}

fn parse_hex(text: &str) -> Result<Vec<u8>, CliError> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let compact = compact
        .strip_prefix("0x")
        .or_else(|| compact.strip_prefix("0X"))
        .unwrap_or(&compact);
    hex::decode(compact).map_err(|err| {
        CliError::new(
            format!("invalid hex payload: {err}"),
            Some("expected an even number of hex digits, e.g. 43474155".to_string()),
        )
    })
}

fn ensure_distinct_paths(report: &Path, input: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let report_dir = match report.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // The output directory may not exist yet, in which case it cannot hold the input.
    let Ok(report_dir) = fs::canonicalize(report_dir) else {
        return Ok(());
    };
    let file_name = report
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid report path"))?;
    if report_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!("report path must differ from input: {}", report.display()),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn write_report(path: &Path, json: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(path, json).with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(())
}

fn serialize_report(report: &DecodeReport, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(report)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(report)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass a raw payload file or use --hex".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass a raw payload file or use --hex".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches); matches: {}{}",
                pattern,
                matches.len(),
                listed,
                more
            ),
            Some("pass a single payload file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}

//! CLI binary for model-upload.
//!
//! Plays the part of the upload page: flags become intake events, the form
//! is submitted once and the modal is rendered to the terminal.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use model_upload::{
    FormController, FormEvent, FormView, Icon, Locale, SelectedFile, SubmissionObserver,
    UploadConfig, DEFAULT_ENDPOINT,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── Spinner standing in for the modal loader ─────────────────────────────────

/// Shows a spinner while the upload is in flight and clears it when the
/// modal leaves the loading state.
struct CliObserver {
    bar: ProgressBar,
}

impl CliObserver {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::hidden();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Uploading");
        Arc::new(Self { bar })
    }
}

impl SubmissionObserver for CliObserver {
    fn on_state_change(&self, view: &FormView) {
        if !view.modal.loader_visible && !self.bar.is_finished() && !self.bar.is_hidden() {
            self.bar.finish_and_clear();
        }
    }

    fn on_upload_start(&self, file_name: &str, file_len: usize, output: &str) {
        self.bar
            .set_draw_target(indicatif::ProgressDrawTarget::stderr());
        self.bar.set_message(format!(
            "{file_name} {}  → {output}",
            dim(&format!("({file_len} bytes)"))
        ));
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Upload a CSV and ask for a Jupyter notebook
  model-upload --file casos.csv --email ana@example.com --output jupyter

  # English messages, local test server, 30 s timeout
  model-upload -f casos.csv -e ana@example.com -o pdf \
      --locale en --endpoint http://localhost:5000/upload_file --timeout 30

  # Machine-readable result
  model-upload -f casos.csv -e ana@example.com -o report --json

OUTPUT FORMATS:
  jupyter   Jupyter notebook (default)
  pdf       PDF document
  report    Report

ENVIRONMENT VARIABLES:
  MODEL_UPLOAD_ENDPOINT   Upload URL
  MODEL_UPLOAD_LOCALE     pt-br (default) or en
  MODEL_UPLOAD_TIMEOUT    Request timeout in seconds (default: none)
  RUST_LOG                Overrides the log filter
"#;

/// Upload a data file for model generation.
#[derive(Parser, Debug)]
#[command(
    name = "model-upload",
    version,
    about = "Upload a data file for model generation",
    long_about = "Send a data file, an output format and an email address to the model \
generation service as a multipart form. The result is delivered by email.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// File to upload. Repeat to simulate a multi-file drop (only the first is kept).
    #[arg(short, long = "file", env = "MODEL_UPLOAD_FILE")]
    files: Vec<PathBuf>,

    /// Select the file by dropping it instead of through the picker.
    #[arg(long)]
    drop: bool,

    /// Email address the result is sent to.
    #[arg(short, long, env = "MODEL_UPLOAD_EMAIL", default_value = "")]
    email: String,

    /// Output format: jupyter, pdf or report.
    #[arg(short, long, env = "MODEL_UPLOAD_OUTPUT", default_value = "jupyter")]
    output: String,

    /// Upload endpoint.
    #[arg(long, env = "MODEL_UPLOAD_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Message language: pt-br or en.
    #[arg(long, env = "MODEL_UPLOAD_LOCALE", default_value = "pt-br")]
    locale: Locale,

    /// Request timeout in seconds. No timeout when unset.
    #[arg(long, env = "MODEL_UPLOAD_TIMEOUT")]
    timeout: Option<u64>,

    /// Reject emails that do not look like an address before sending.
    #[arg(long, env = "MODEL_UPLOAD_STRICT_EMAIL")]
    strict_email: bool,

    /// Print the final form view as JSON instead of the modal text.
    #[arg(long, env = "MODEL_UPLOAD_JSON")]
    json: bool,

    /// Disable the spinner.
    #[arg(long, env = "MODEL_UPLOAD_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MODEL_UPLOAD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MODEL_UPLOAD_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner and the modal text are the user-facing output; library
    // logs stay at error level unless asked for.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let config = UploadConfig::builder()
        .endpoint(cli.endpoint.clone())
        .locale(cli.locale)
        .request_timeout_secs(cli.timeout)
        .strict_email(cli.strict_email)
        .build()
        .context("Invalid configuration")?;

    let mut form = FormController::from_config(&config).context("Failed to set up upload")?;
    if show_progress {
        form = form.with_observer(CliObserver::new());
    }

    // ── Fill in the form ─────────────────────────────────────────────────
    let mut files = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        files.push(
            SelectedFile::from_path(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?,
        );
    }

    let view = if cli.drop {
        form.drop_files(files).await
    } else {
        form.dispatch(FormEvent::PickerChanged(files)).await
    };
    if !cli.quiet && !cli.json && view.file_label.visible {
        eprintln!("{}", dim(&view.file_label.text));
    }

    form.set_email(cli.email.clone()).await;
    if !form.choose_format(&cli.output).await {
        let known: Vec<_> = config.formats.iter().map(|f| f.value.as_str()).collect();
        anyhow::bail!(
            "Unknown output format '{}' (expected one of: {})",
            cli.output,
            known.join(", ")
        );
    }

    // ── Submit ───────────────────────────────────────────────────────────
    let view = form.submit().await;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&view).context("Failed to serialise result")?
        );
    } else if !cli.quiet || view.modal.icon == Icon::Cross {
        let mark = match view.modal.icon {
            Icon::Check => green(view.modal.icon.glyph()),
            Icon::Cross => red(view.modal.icon.glyph()),
            Icon::None => String::new(),
        };
        eprintln!("{} {}", mark, bold(&view.modal.message));
    }

    Ok(if view.modal.icon == Icon::Check {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

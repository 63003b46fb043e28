//! CLI binary for pdf-rule-check.
//!
//! A terminal rendition of the form: the file argument is the selector,
//! `--rule1..--rule3` (or interactive prompts) are the rule editor, and the
//! results table is printed to stdout.

use anyhow::{Context, Result};
use clap::builder::FalseyValueParser;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf_rule_check::placeholders::SUBMITTING_LABEL;
use pdf_rule_check::{
    check_health, ClientConfig, FormController, HttpTransport, ProgressCallback, RenderOptions,
    ResultsTable, RuleSet, SubmissionProgressCallback, SubmissionState, ValidationResponse,
};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

/// Colour switch for stderr output; `Ansi(false)` passes text through.
#[derive(Debug, Clone, Copy)]
struct Ansi(bool);

impl Ansi {
    fn paint(self, code: &str, s: &str) -> String {
        if self.0 {
            format!("\x1b[{code}m{s}\x1b[0m")
        } else {
            s.to_string()
        }
    }
    fn green(self, s: &str) -> String {
        self.paint("32", s)
    }
    fn red(self, s: &str) -> String {
        self.paint("31", s)
    }
    fn dim(self, s: &str) -> String {
        self.paint("2", s)
    }
    fn bold(self, s: &str) -> String {
        self.paint("1", s)
    }
}

/// `◆ name  size`, printed once a file is selected.
fn selection_line(name: &str, size: &str, ansi: Ansi) -> String {
    format!("{} {}  {}", ansi.green("◆"), ansi.bold(name), ansi.dim(size))
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Spinner shown while a request is in flight.
struct CliProgressCallback {
    bar: ProgressBar,
    ansi: Ansi,
}

impl CliProgressCallback {
    fn new(ansi: Ansi) -> Arc<Self> {
        let bar = ProgressBar::hidden();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        Arc::new(Self { bar, ansi })
    }
}

impl SubmissionProgressCallback for CliProgressCallback {
    fn on_state_change(&self, state: &SubmissionState) {
        match state {
            SubmissionState::Submitting { .. } => {
                self.bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
                self.bar.set_prefix(SUBMITTING_LABEL);
                self.bar.enable_steady_tick(Duration::from_millis(80));
            }
            SubmissionState::Success(_) | SubmissionState::Error { .. } => {
                self.bar.finish_and_clear();
            }
            SubmissionState::Idle | SubmissionState::ValidatingLocally => {}
        }
    }

    fn on_submit_start(&self, file_name: &str, file_size: u64, _rules: &RuleSet) {
        self.bar.set_message(format!(
            "{file_name} ({:.2} MB)",
            file_size as f64 / 1024.0 / 1024.0
        ));
    }

    fn on_submit_complete(&self, response: &ValidationResponse) {
        let failed = response.failed();
        let mark = if failed == 0 {
            self.ansi.green("✔")
        } else {
            self.ansi.red("✘")
        };
        eprintln!(
            "{} {}/{} rules passed",
            mark,
            self.ansi.bold(&response.passed().to_string()),
            response.results.len()
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Check a document against three rules
  pdfcheck policy.pdf \
    --rule1 "The document must have a purpose section." \
    --rule2 "The document must mention at least one date." \
    --rule3 "The document must define at least one term."

  # Prompt for any rule not given on the command line
  pdfcheck policy.pdf --rule1 "Must be signed"

  # Raw JSON response
  pdfcheck policy.pdf --rule1 … --rule2 … --rule3 … --json > result.json

  # Is the service up?
  pdfcheck --health

LIMITS:
  PDF files only (.pdf), max 10MB. Exactly 3 rules, none blank.

ENVIRONMENT VARIABLES:
  PDF_VALIDATOR_API_URL   Validation service base URL (default http://localhost:8000)
  RUST_LOG                Override log filter (e.g. pdf_rule_check=debug)
"#;

/// Check a PDF against three rules using a remote validation service.
#[derive(Parser, Debug)]
#[command(
    name = "pdfcheck",
    version,
    about = "Check a PDF against three free-text rules using a remote validation service",
    long_about = "Upload a PDF and three free-text validation rules to a document validation \
service and print its per-rule verdicts (pass/fail, evidence, reasoning, confidence).",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file to validate (max 10MB).
    #[arg(required_unless_present = "health")]
    file: Option<PathBuf>,

    /// First validation rule.
    #[arg(long)]
    rule1: Option<String>,

    /// Second validation rule.
    #[arg(long)]
    rule2: Option<String>,

    /// Third validation rule.
    #[arg(long)]
    rule3: Option<String>,

    /// Validation service base URL.
    #[arg(long, env = "PDF_VALIDATOR_API_URL", default_value = pdf_rule_check::DEFAULT_BASE_URL)]
    api_url: String,

    /// Print the raw JSON response instead of a table.
    #[arg(long, env = "PDFCHECK_JSON", value_parser = FalseyValueParser::new())]
    json: bool,

    /// Probe the service's health endpoint and exit.
    #[arg(long)]
    health: bool,

    /// Never prompt for missing rules.
    #[arg(long, env = "PDFCHECK_NO_INPUT", value_parser = FalseyValueParser::new())]
    no_input: bool,

    /// Disable colours in the results table.
    #[arg(long, env = "NO_COLOR", value_parser = FalseyValueParser::new())]
    no_color: bool,

    /// Table width in columns.
    #[arg(long, env = "PDFCHECK_WIDTH", default_value_t = 120)]
    width: usize,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFCHECK_VERBOSE", value_parser = FalseyValueParser::new())]
    verbose: bool,

    /// Suppress all output except results and errors.
    #[arg(short, long, env = "PDFCHECK_QUIET", value_parser = FalseyValueParser::new())]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner covers the request; INFO logs would tear through it.
    let show_progress = !cli.quiet && !cli.json && io::stderr().is_terminal();
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

    let ansi = Ansi(!cli.no_color && io::stderr().is_terminal());

    let mut builder = ClientConfig::builder().base_url(cli.api_url.trim());
    if show_progress && !cli.verbose {
        builder = builder.progress_callback(CliProgressCallback::new(ansi) as ProgressCallback);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Health-only mode ─────────────────────────────────────────────────
    if cli.health {
        let health = check_health(&config)
            .await
            .with_context(|| format!("Health check against {} failed", config.base_url))?;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&health).context("Failed to serialise health")?
            );
        } else {
            println!("Service:       {}", health.service.as_deref().unwrap_or("unknown"));
            println!("Status:        {}", health.status);
            if let Some(ref p) = health.llm_provider {
                println!("LLM provider:  {}", p);
            }
        }
        if !health.is_healthy() {
            anyhow::bail!("Service reports status '{}'", health.status);
        }
        return Ok(());
    }

    // ── Fill the form ────────────────────────────────────────────────────
    let transport = HttpTransport::new(&config).context("Failed to create HTTP client")?;
    let mut form = FormController::new(&config);

    if let Some(ref path) = cli.file {
        form.select_file(path)
            .with_context(|| format!("Cannot use '{}'", path.display()))?;
        if !cli.quiet {
            let [name, size] = form.selector().label();
            eprintln!("{}", selection_line(&name, &size, ansi));
        }
    }

    let given = [cli.rule1.clone(), cli.rule2.clone(), cli.rule3.clone()];
    let interactive = !cli.no_input && io::stdin().is_terminal();
    for (i, rule) in given.into_iter().enumerate() {
        let value = match rule {
            Some(v) => v,
            None if interactive => prompt_rule(&form, i, ansi)?,
            None => String::new(),
        };
        form.edit_rule(i, value)?;
    }

    // ── Submit ───────────────────────────────────────────────────────────
    // Errors carry the exact message the form would show, so they are
    // reported without extra context.
    let response = form
        .submit(&transport)
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    if cli.json {
        let json = serde_json::to_string_pretty(response).context("Failed to serialise output")?;
        println!("{json}");
    } else {
        let opts = RenderOptions {
            color: !cli.no_color && io::stdout().is_terminal(),
            width: cli.width,
            ..RenderOptions::default()
        };
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(ResultsTable::from_response(response).to_text(&opts).as_bytes())
            .context("Failed to write to stdout")?;
    }

    Ok(())
}

/// Ask for one rule on stdin, showing the placeholder as guidance.
fn prompt_rule(form: &FormController, index: usize, ansi: Ansi) -> Result<String> {
    let editor = form.editor();
    let placeholder = editor.placeholder(index).unwrap_or_default();
    eprint!(
        "{} {}: ",
        ansi.bold(&editor.label(index)),
        ansi.dim(&format!("[e.g. {placeholder}]"))
    );
    io::stderr().flush().ok();

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read rule from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

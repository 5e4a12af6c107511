//! truth-lens CLI: submit one article to the analysis backend and write a
//! standalone HTML report (or print the view model as JSON).

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use truth_lens::{
    analyze_once, render, AnalysisFailure, ClientConfig, Orchestrator, Presentation,
    SelectedFile, Session, Theme, ThemeStore, UserInput, ValidationError, ViewModel,
};

#[derive(Parser, Debug)]
#[command(
    name = "truth-lens",
    version,
    about = "Analyze news articles for bias, political sentiment and source reliability"
)]
struct Cli {
    #[arg(long, global = true, help = "Backend base URL (overrides config and env)")]
    base_url: Option<String>,
    #[arg(long, global = true, help = "Per-call timeout in seconds")]
    timeout_secs: Option<u64>,
    #[arg(long, global = true, help = "Emit logs as JSON lines on stderr")]
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct OutputArgs {
    #[arg(long, default_value = "report.html", help = "Where to write the HTML report")]
    out: PathBuf,
    #[arg(long, help = "Print the view model as JSON on stdout")]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze an article by URL.
    Url {
        url: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Analyze pasted text.
    Text {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, conflicts_with = "from", required_unless_present = "from")]
        text: Option<String>,
        #[arg(long, help = "Read the article text from a file")]
        from: Option<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Upload a .txt or .pdf file and analyze its text.
    File {
        path: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Show or change the report theme.
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
}

#[derive(Subcommand, Debug)]
enum ThemeAction {
    Show,
    Toggle,
    Set { theme: Theme },
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("truth_lens=info,warn"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env if present; silently ignored otherwise.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut cfg = ClientConfig::load_default()?;
    cfg.override_with(cli.base_url, cli.timeout_secs)?;
    let themes = ThemeStore::new(cfg.theme_path.clone());

    let (input, output) = match cli.command {
        Command::Theme { action } => return run_theme(&themes, action),
        Command::Url { url, output } => (UserInput::Url(url), output),
        Command::Text {
            title,
            text,
            from,
            output,
        } => {
            let text = match (text, from) {
                (Some(t), _) => t,
                (None, Some(p)) => fs::read_to_string(&p)
                    .with_context(|| format!("reading article text from {}", p.display()))?,
                (None, None) => String::new(),
            };
            (UserInput::Manual { title, text }, output)
        }
        Command::File { path, output } => match SelectedFile::from_path(&path) {
            Ok(file) => (UserInput::File(Some(file)), output),
            Err(e) => match e.downcast::<ValidationError>() {
                Ok(v) => return present_failure(&AnalysisFailure::from(v), themes.load(), &output),
                Err(other) => return Err(other),
            },
        },
    };

    let orch = Orchestrator::from_config(&cfg)?;
    tracing::debug!(base_url = %cfg.base_url, timeout = ?orch.timeout(), "backend configured");

    let session = analyze_once(&orch, Session::new(), input).await;
    let theme = themes.load();
    match session.presentation() {
        Presentation::Showing(vm) => present_result(vm, theme, &output),
        Presentation::Failed { message } => present_message(message, theme, &output),
        // analyze_once always settles its own ticket.
        Presentation::Idle | Presentation::Loading { .. } => Ok(ExitCode::FAILURE),
    }
}

fn run_theme(store: &ThemeStore, action: Option<ThemeAction>) -> Result<ExitCode> {
    let theme = match action.unwrap_or(ThemeAction::Show) {
        ThemeAction::Show => store.load(),
        ThemeAction::Toggle => store.toggle()?,
        ThemeAction::Set { theme } => {
            store.save(theme)?;
            theme
        }
    };
    println!("{theme}");
    Ok(ExitCode::SUCCESS)
}

fn write_report(path: &Path, html: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    fs::write(path, html).with_context(|| format!("writing report to {}", path.display()))
}

fn present_result(vm: &ViewModel, theme: Theme, output: &OutputArgs) -> Result<ExitCode> {
    write_report(&output.out, &render::document(vm, theme))?;
    if output.json {
        println!("{}", serde_json::to_string_pretty(vm)?);
    } else {
        println!("{}", vm.title.unescape());
        println!(
            "  bias: {}  polarity: {}  subjectivity: {}",
            vm.metrics.label.unescape(),
            vm.metrics
                .polarity
                .map(|p| format!("{p:.3}"))
                .unwrap_or_else(|| "N/A".into()),
            vm.metrics
                .subjectivity
                .map(|s| format!("{s:.3}"))
                .unwrap_or_else(|| "N/A".into()),
        );
        match &vm.reliability {
            truth_lens::view::ReliabilityBlock::Available { score, label, tier } => println!(
                "  reliability: {score}/100 ({}) {}",
                tier.as_str(),
                label.unescape()
            ),
            truth_lens::view::ReliabilityBlock::Unavailable { placeholder } => {
                println!("  reliability: {}", placeholder.unescape())
            }
        }
        println!("report written to {}", output.out.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn present_message(message: &str, theme: Theme, output: &OutputArgs) -> Result<ExitCode> {
    write_report(&output.out, &render::error_document(message, theme))?;
    if output.json {
        println!("{}", serde_json::json!({ "error": message }));
    } else {
        eprintln!("error: {message}");
    }
    Ok(ExitCode::FAILURE)
}

fn present_failure(failure: &AnalysisFailure, theme: Theme, output: &OutputArgs) -> Result<ExitCode> {
    present_message(&failure.user_message(), theme, output)
}

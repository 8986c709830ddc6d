mod echo;

use std::fs;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::Shell;
use owo_colors::OwoColorize;
use precis_core::markers::view;
use precis_core::{
    ArticleRequest, Config, LlmSummarizer, MarkdownConfig, Provider, Reader, ReaderConfig, fetch_file, fetch_stdin,
};
use tracing_subscriber::EnvFilter;

use crate::echo::{format_size, print_banner, print_info, print_step, print_success, print_timing, print_warning};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Which lines of the document to print
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ViewMode {
    /// Every line, with visibility markers for a toggle-aware pager
    Encoded,
    /// Summary and "show more" label only
    Collapsed,
    /// Summary followed by the full article
    Expanded,
}

/// Read web articles in the terminal with a collapsible AI summary
#[derive(Parser, Debug)]
#[command(name = "precis")]
#[command(version, about = "Read web articles in the terminal", long_about = None)]
struct Args {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT", required_unless_present = "completions")]
    input: Option<String>,

    /// Summarize the article and collapse the full text below the summary
    #[arg(short, long)]
    summarize: bool,

    /// Title shown in the header (default: the page title)
    #[arg(short, long)]
    title: Option<String>,

    /// Target width in terminal columns
    #[arg(short, long, value_name = "COLS")]
    width: Option<usize>,

    /// Indentation prefix for every line
    #[arg(long, value_name = "STR")]
    indent: Option<String>,

    /// Which lines to print
    #[arg(long, value_enum, default_value_t = ViewMode::Collapsed)]
    view: ViewMode,

    /// HTTP timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Strip images from the article
    #[arg(long)]
    no_images: bool,

    /// Append a numbered list of every link in the article
    #[arg(long)]
    references: bool,

    /// Disable ANSI styling
    #[arg(long)]
    plain: bool,

    /// Summary provider (gemini, openai)
    #[arg(long, value_name = "NAME")]
    provider: Option<Provider>,

    /// Summary model (default depends on the provider)
    #[arg(long, value_name = "MODEL")]
    model: Option<String>,

    /// Config file (default: ./precis.toml, then the user config directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("precis_core=debug,precis=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();

    if let Err(err) = init_result {
        eprintln!("tracing already initialized: {}", err);
    }
}

/// Merge the config file, environment and flags; flags win
fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = Config::load(args.config.as_deref()).context("Failed to load config")?;

    if let Some(provider) = args.provider {
        config.set_provider(provider);
    }
    config.apply_api_keys(std::env::var("GEMINI_API_KEY").ok(), std::env::var("OPENAI_API_KEY").ok());

    if let Some(model) = &args.model {
        config.summary.model = Some(model.clone());
    }
    if let Some(width) = args.width {
        config.reader.width = width;
    }
    if let Some(indent) = &args.indent {
        config.reader.indent = indent.clone();
    }
    if let Some(timeout) = args.timeout {
        config.reader.timeout = timeout;
    }
    if let Some(user_agent) = &args.user_agent {
        config.reader.user_agent = Some(user_agent.clone());
    }

    Ok(config)
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "precis", &mut io::stdout());
        return Ok(());
    }

    init_tracing(args.verbose);

    if args.verbose {
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
    }

    let input = args.input.clone().unwrap_or_default();
    let config = load_config(&args)?;
    let styled = !args.plain && config.reader.styled && args.output.is_none() && io::stdout().is_terminal();

    if args.summarize && config.summary.api_key.is_none() {
        print_warning(&format!("No API key configured for {}; showing the full article", config.summary.provider));
    }

    let reader_config = ReaderConfig {
        fetch: config.reader.fetch_config(),
        markdown: MarkdownConfig { strip_images: args.no_images, include_references: args.references },
        styled,
    };
    let summarizer = LlmSummarizer::new(config.summary.clone()).context("Failed to create summarizer")?;
    let reader = Reader::with_summarizer(reader_config, summarizer);

    let source = if input == "-" { "stdin".to_string() } else { input.clone() };
    let request = ArticleRequest::new(source, args.title.clone().unwrap_or_default())
        .width(config.reader.width)
        .indent(config.reader.indent.clone())
        .summarize(args.summarize);

    let started = Instant::now();

    let document = if is_url(&input) {
        if args.verbose {
            print_step(1, 2, &format!("Reading {}", input.bright_white().underline()));
        }
        reader.read(&request).await?
    } else {
        if args.verbose {
            print_step(1, 2, &format!("Reading {}", if input == "-" { "stdin" } else { input.as_str() }));
        }
        let html = (if input == "-" { fetch_stdin() } else { fetch_file(&input) })
            .with_context(|| format!("Failed to read input: {}", input))?;
        if args.verbose {
            eprintln!("  {} {}", "Size:".dimmed(), format_size(html.len()).bright_white());
        }
        reader.read_html(&html, &request).await?
    };

    let output = match args.view {
        ViewMode::Encoded => document,
        ViewMode::Collapsed => view(&document, false),
        ViewMode::Expanded => view(&document, true),
    };

    if args.verbose {
        print_step(2, 2, &format!("Writing {:?} view", args.view));
        print_timing("Total", started.elapsed());
        eprintln!();
    }

    match args.output {
        Some(path) => {
            fs::write(&path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            print!("{}", output);
        }
    }

    Ok(())
}

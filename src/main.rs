//! askweb: answers questions from live web search results
//!
//! This is the main entry point for the application.

use anyhow::{bail, Context, Result};
use askweb::{
    config,
    pipeline::Pipeline,
    web::{create_router, AppState},
    Research, Settings,
};
use std::io::{self, BufRead, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    verbose: bool,
    serve: bool,
    question: Vec<String>,
}

enum Command {
    Run(Args),
    Help,
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = match parse_args(std::env::args().skip(1))? {
        Command::Run(args) => args,
        Command::Help => {
            print_usage();
            return Ok(());
        }
        Command::Version => {
            println!("askweb {}", askweb::VERSION);
            return Ok(());
        }
    };

    let settings = config::load(args.config.as_deref())?;
    init_logging(args.verbose || settings.general.debug);
    info!("Starting askweb v{}", askweb::VERSION);

    if args.serve {
        serve(settings).await
    } else {
        ask(settings, &args).await
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

async fn ask(settings: Settings, args: &Args) -> Result<()> {
    let question = if args.question.is_empty() {
        prompt_question()?
    } else {
        args.question.join(" ")
    };

    let pipeline = Pipeline::from_settings(&settings)?;
    let research = pipeline.research(&question).await?;

    println!("{}", research.answer);
    if args.verbose {
        print_sources(&research);
    }
    Ok(())
}

async fn serve(settings: Settings) -> Result<()> {
    let addr = SocketAddr::new(
        settings
            .server
            .bind_address
            .parse()
            .with_context(|| format!("Invalid bind address {}", settings.server.bind_address))?,
        settings.server.port,
    );

    let state = AppState::from_settings(settings)?;
    let app = create_router(state);

    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn prompt_question() -> Result<String> {
    print!("Enter a prompt: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn print_sources(research: &Research) {
    println!();
    println!("Search query: {}", research.search_query);
    println!("Sources:");
    for source in &research.sources {
        println!("  [{}] {}", source.result_number, source.url);
    }
    for dropped in &research.dropped {
        println!("  [{}] {} (skipped: {})", dropped.result_number, dropped.url, dropped.reason);
    }
}

fn parse_args<I>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = Args::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "-v" | "--verbose" => parsed.verbose = true,
            "--serve" => parsed.serve = true,
            "-c" | "--config" => match args.next() {
                Some(path) => parsed.config = Some(PathBuf::from(path)),
                None => bail!("{} requires a file path", arg),
            },
            "--" => parsed.question.extend(args.by_ref()),
            flag if flag.starts_with('-') && flag.len() > 1 => {
                bail!("Unknown option {}; see --help", flag)
            }
            _ => parsed.question.push(arg),
        }
    }

    Ok(Command::Run(parsed))
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
askweb v{}
Answers questions from live web search results, with citations

USAGE:
    askweb [OPTIONS] [QUESTION...]

OPTIONS:
    -c, --config <FILE>    Path to configuration file
    -v, --verbose          Debug logging and a list of sources after the answer
        --serve            Run the HTTP API instead of answering one question
    -h, --help             Print help information
    -V, --version          Print version information

Without a question, askweb prompts for one on stdin.

ENVIRONMENT VARIABLES:
    ASKWEB_SETTINGS_PATH   Path to settings.yml
    ASKWEB_API_KEY         API key for the generation service (or OPENAI_API_KEY)
    ASKWEB_LLM_BASE_URL    Base URL of an OpenAI-compatible service
    ASKWEB_ENGINE          Search engine: google or duckduckgo
    ASKWEB_SOURCE_COUNT    Number of sources per question
    ASKWEB_DEBUG           Enable debug logging (true/false)
    ASKWEB_PORT            Server port
    ASKWEB_BIND_ADDRESS    Bind address
    RUST_LOG               Log filter, overrides the defaults above
"#,
        askweb::VERSION
    );
}

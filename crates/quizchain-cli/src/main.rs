use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use quizchain_cli::OutputFormat;
use quizchain_cli::commands::{self, TranscriptionArgs};
use quizchain_engine::SolveRequest;
use quizchain_engine::config::DEFAULT_TIMEOUT_SECS;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quizchain")]
#[command(author, version, long_about = None)]
#[command(
    about = "Solves chains of web-hosted quiz pages",
    long_about = "Quizchain visits a quiz page in a headless browser, derives an answer from its \
                  text and linked files, finds where to submit it, and follows each response \
                  to the next page until the chain ends or time runs out."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a quiz chain starting at a URL
    Solve {
        /// First quiz page
        #[arg(long)]
        url: String,

        /// Email sent with every answer
        #[arg(long, env = "QUIZ_EMAIL")]
        email: String,

        /// Secret sent with every answer
        #[arg(long, env = "QUIZ_SECRET", hide_env_values = true)]
        secret: String,

        /// Reject the run unless --secret matches this value
        #[arg(long, env = "QUIZ_EXPECTED_SECRET", hide_env_values = true)]
        expected_secret: Option<String>,

        /// Overall time budget in seconds
        #[arg(long, env = "WORKER_TIMEOUT_SECONDS", default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout: u64,

        /// Dump every visited page into this directory
        #[arg(long, env = "QUIZCHAIN_DUMP_DIR", value_name = "DIR")]
        dump_dir: Option<PathBuf>,

        /// Dump pages into the default debug directory
        #[arg(long, conflicts_with = "dump_dir")]
        dump: bool,

        /// Path to the Chrome or Chromium binary
        #[arg(long, env = "QUIZCHAIN_CHROME_PATH")]
        chrome_path: Option<PathBuf>,

        /// Show the browser window
        #[arg(long)]
        visible: bool,

        #[command(flatten)]
        transcription: TranscriptionArgs,
    },

    /// Derive an answer from saved page text and local files
    Derive {
        /// File holding the page's visible text
        #[arg(value_name = "TEXT_FILE")]
        file: PathBuf,

        /// Linked file (csv, pdf, wav, mp3); repeatable
        #[arg(long = "asset", value_name = "FILE")]
        assets: Vec<PathBuf>,

        #[command(flatten)]
        transcription: TranscriptionArgs,
    },

    /// Find the submit endpoint in a saved page
    Resolve {
        /// Saved page HTML
        #[arg(value_name = "HTML_FILE")]
        file: PathBuf,

        /// URL the page was served from
        #[arg(long)]
        page_url: String,
    },

    /// Generate shell completion scripts
    #[command(after_help = "SUPPORTED SHELLS:\n  \
        bash, zsh, fish, powershell, elvish\n\n\
        INSTALLATION:\n  \
        bash:  quizchain completion --shell bash >> ~/.bashrc\n  \
        zsh:   quizchain completion --shell zsh > ~/.zfunc/_quizchain\n  \
        fish:  quizchain completion --shell fish > ~/.config/fish/completions/quizchain.fish")]
    Completion {
        /// Target shell
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Solve {
            url,
            email,
            secret,
            expected_secret,
            timeout,
            dump_dir,
            dump,
            chrome_path,
            visible,
            transcription,
        } => commands::solve::execute(
            commands::solve::SolveOptions {
                request: SolveRequest::new(email, secret, url),
                expected_secret,
                timeout_secs: timeout,
                dump_dir,
                dump,
                chrome_path,
                visible,
                transcription,
            },
            cli.format,
        ),
        Commands::Derive {
            file,
            assets,
            transcription,
        } => commands::derive::execute(&file, &assets, &transcription, cli.format),
        Commands::Resolve { file, page_url } => {
            commands::resolve::execute(&file, &page_url, cli.format)
        }
        Commands::Completion { shell } => commands::completion::execute(shell, &mut Cli::command()),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new(
            "quizchain=debug,quizchain_cli=debug,quizchain_engine=debug,quizchain_core=debug,\
             quizchain_fetch=debug,quizchain_browser=debug,quizchain_detectors=debug",
        )
    } else {
        EnvFilter::new("quizchain=info,quizchain_cli=info,quizchain_engine=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use vocart_cli::OutputFormat;
use vocart_cli::commands;
use vocart_cli::config::{MarketplaceArgs, RunArgs};

#[derive(Parser)]
#[command(name = "vocart")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "A voice-driven shopping assistant for Amazon",
    long_about = "vocart signs you in to Amazon by voice, searches for the products you ask for, \
                  reads out their title and price, adds them to your cart on request, and saves \
                  every product you looked at to a CSV file."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive shopping session
    Run(RunArgs),

    /// Extract product details from a saved product page
    Extract {
        /// Path to the saved HTML page
        #[arg(value_name = "HTML")]
        file: PathBuf,

        /// URL the page was saved from
        #[arg(long)]
        url: String,

        #[command(flatten)]
        marketplace: MarketplaceArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "pretty")]
        format: OutputFormat,
    },

    /// Generate shell completion scripts
    #[command(long_about = "Generate shell completion scripts for vocart.

SUPPORTED SHELLS:
    bash, zsh, fish, powershell, elvish

INSTALLATION:
    Bash:
        vocart completion --shell bash > ~/.local/share/bash-completion/completions/vocart
        # or add to ~/.bashrc:
        eval \"$(vocart completion --shell bash)\"

    Zsh:
        vocart completion --shell zsh > \"${fpath[1]}/_vocart\"
        # or add to ~/.zshrc:
        eval \"$(vocart completion --shell zsh)\"

    Fish:
        vocart completion --shell fish > ~/.config/fish/completions/vocart.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Run(args) => commands::run::execute(&args),
        Commands::Extract {
            file,
            url,
            marketplace,
            format,
        } => commands::extract::execute(&file, &url, &marketplace, format),
        Commands::Completion { shell } => commands::completion::execute(shell, &mut Cli::command()),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::new(
        ["vocart", "vocart_cli", "vocart_core", "vocart_voice", "vocart_browser"]
            .map(|target| format!("{}={}", target, level))
            .join(","),
    );

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

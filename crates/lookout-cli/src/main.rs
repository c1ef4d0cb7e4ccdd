use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "lookout")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Checks a classifieds site for a specific listing and reports to a webhook",
    long_about = "Lookout drives a headless browser through a login/navigate/search \
                  sequence against a classifieds site, decides whether a target listing \
                  is still published, and POSTs the outcome to a webhook."
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
    /// Run one check invocation and print the JSON response
    Check {
        /// Run the browser with a visible window
        #[arg(long)]
        headed: bool,

        /// Capture a full-page screenshot of the listing page
        #[arg(long)]
        screenshot: bool,
    },

    /// Serve an HTTP trigger endpoint; every request runs one check
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Check { headed, screenshot } => commands::check::execute(headed, screenshot),
        Commands::Serve { port } => commands::serve::execute(port),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new(
            "lookout=debug,lookout_core=debug,lookout_detect=debug,\
             lookout_browser=debug,lookout_server=debug",
        )
    } else {
        EnvFilter::new("lookout=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

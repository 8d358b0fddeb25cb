use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lostfound_client::commands::{self, ReportForm};
use lostfound_client::config::Config;
use lostfound_client::Result;
use lostfound_common::ReportKind;

const HELP_TEXT: &str = r#"
  Examples
    $ lf lost ./wallet.jpg --title "Black wallet" --location-type transit --time-frame today
    $ lf found ./umbrella.png --title Umbrella --location-type outdoor \
        --location-detail "park bench" --time-frame yesterday
    $ lf history
    $ lf health
    $ lf config --server http://10.0.2.2:8000
    $ lf reset --yes
"#;

#[derive(Parser)]
#[command(
    name = "lf",
    version = env!("CARGO_PKG_VERSION"),
    about = "Report lost and found items and review suggested matches",
    after_help = HELP_TEXT
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report an item you lost
    Lost(ReportArgs),

    /// Report an item you found
    Found(ReportArgs),

    /// Show previous reports and their matches
    History,

    /// Delete every report on the server
    Reset {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Check that the server is reachable
    Health,

    /// Show or update configuration
    Config {
        /// Set the server URL
        #[arg(long, value_name = "URL")]
        server: Option<String>,
    },
}

#[derive(Args)]
struct ReportArgs {
    /// Photo of the item
    image: PathBuf,

    /// Short title
    #[arg(short = 't', long)]
    title: String,

    /// Longer description
    #[arg(short = 'd', long)]
    description: Option<String>,

    /// Kind of place (e.g. indoor, outdoor, transit)
    #[arg(short = 'l', long)]
    location_type: String,

    /// Where exactly
    #[arg(long)]
    location_detail: Option<String>,

    /// When it happened (e.g. today, yesterday, this_week)
    #[arg(short = 'w', long)]
    time_frame: String,
}

impl From<ReportArgs> for ReportForm {
    fn from(args: ReportArgs) -> Self {
        Self {
            image: args.image,
            title: args.title,
            description: args.description,
            location_type: args.location_type,
            location_detail: args.location_detail,
            time_frame: args.time_frame,
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Lost(args) => {
            let config = Config::load()?;
            commands::report(&config, ReportKind::Lost, args.into()).await
        }
        Command::Found(args) => {
            let config = Config::load()?;
            commands::report(&config, ReportKind::Found, args.into()).await
        }
        Command::History => commands::history(&Config::load()?).await,
        Command::Reset { yes } => commands::reset(&Config::load()?, yes).await,
        Command::Health => commands::health(&Config::load_or_default()).await,
        Command::Config { server } => {
            let mut config = Config::load()?;
            commands::configure(&mut config, server)
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{}", e);
        process::exit(1);
    }
}

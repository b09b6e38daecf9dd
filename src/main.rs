use clap::{
    CommandFactory, Parser, Subcommand, ValueEnum,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use tunebridge::{cli, config, error, types::Provider};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with a streaming platform
    Auth(AuthOptions),

    /// Convert a playlist between Spotify and YouTube
    Convert(ConvertOptions),

    /// Show past conversions
    History,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ProviderArg {
    Spotify,
    Youtube,
}

impl From<ProviderArg> for Provider {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Spotify => Provider::Spotify,
            ProviderArg::Youtube => Provider::YouTube,
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct AuthOptions {
    /// Platform to authorize with
    pub provider: ProviderArg,

    /// User id to store the token under
    #[clap(long)]
    pub user: String,
}

#[derive(Parser, Debug, Clone)]
pub struct ConvertOptions {
    /// Source playlist URL; the direction is inferred from it
    pub source: String,

    /// Existing destination playlist URL (a new playlist is created otherwise)
    #[clap(long)]
    pub destination: Option<String>,

    /// User id whose tokens to use; anonymous one-off session otherwise
    #[clap(long)]
    pub user: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth(opt) => cli::auth(opt.provider.into(), opt.user).await,
        Command::Convert(opt) => cli::convert(opt.source, opt.destination, opt.user).await,
        Command::History => cli::history().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

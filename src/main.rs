use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use moodmix::{
    cli::{self, RecommendOptions},
    config, error, utils,
};

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
    /// Run the web server
    Serve(ServeOptions),

    /// Show current weather and its genres for a location
    Weather(WeatherOptions),

    /// Suggest locations for a partial name or coordinates
    Suggest(SuggestOptions),

    /// Show the genre mapping for a weather description
    Mapping(MappingOptions),

    #[clap(about = "Find tracks for a weather description, a mood or genres")]
    Recommend(RecommendArgs),

    /// Ask the mood assistant which music fits a message
    Chat(ChatOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeOptions {
    /// Address to bind, overrides SERVER_ADDRESS
    #[clap(long)]
    addr: Option<String>,

    /// Open the UI in the default browser
    #[clap(long)]
    open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct WeatherOptions {
    /// City or place name, e.g. "Austin, TX"
    location: String,
}

#[derive(Parser, Debug, Clone)]
pub struct SuggestOptions {
    /// Partial location name
    query: Option<String>,

    #[clap(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    #[clap(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,
}

#[derive(Parser, Debug, Clone)]
pub struct MappingOptions {
    /// Weather description, e.g. "light rain"
    description: String,
}

#[derive(Parser, Debug, Clone)]
pub struct RecommendArgs {
    /// Weather description to match
    #[clap(long)]
    weather: Option<String>,

    /// Mood to search for instead of the weather
    #[clap(long)]
    mood: Option<String>,

    /// Comma separated genre seeds, e.g. "indie pop,jazz"
    #[clap(long, value_parser = utils::parse_genre_list)]
    genres: Option<utils::GenreList>,

    /// Maximum number of tracks to show
    #[clap(long, default_value_t = 20)]
    limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct ChatOptions {
    /// What you feel like or what you are doing
    message: String,

    #[clap(long)]
    weather: Option<String>,

    #[clap(long)]
    location: Option<String>,
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
        Command::Serve(opt) => cli::serve(opt.addr, opt.open).await,
        Command::Weather(opt) => cli::weather(opt.location).await,
        Command::Suggest(opt) => cli::suggest(opt.query, opt.lat, opt.lon).await,
        Command::Mapping(opt) => cli::mapping(opt.description).await,
        Command::Recommend(opt) => {
            cli::recommend(RecommendOptions {
                weather: opt.weather,
                mood: opt.mood,
                genres: opt.genres,
                limit: opt.limit,
            })
            .await
        }
        Command::Chat(opt) => cli::chat(opt.message, opt.weather, opt.location).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

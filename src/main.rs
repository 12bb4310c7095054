use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use covergen::{
    cli,
    collage::{CollageConfig, TitlePosition},
    config, error, fetcher,
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
    /// Generate a cover collage from a Goodreads export
    Generate(GenerateOptions),

    /// Inspect or clear the local cover cache
    Cache(CacheOptions),

    /// Manually manage single covers
    Cover(CoverOptions),

    /// Export per-book cover thumbnails
    Export(ExportOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateOptions {
    /// Path to the Goodreads CSV export
    pub input_file: PathBuf,

    /// Output image path
    #[clap(short, long, default_value = "collage.png")]
    pub output: PathBuf,

    /// Filter to books finished in this year
    #[clap(long)]
    pub year: Option<i32>,

    /// Image width in pixels
    #[clap(long, default_value_t = 1440)]
    pub width: u32,

    /// Image height in pixels (auto-calculated if omitted)
    #[clap(long)]
    pub height: Option<u32>,

    /// Number of columns in the grid
    #[clap(long, default_value_t = 7)]
    pub columns: u32,

    /// Padding between covers in pixels
    #[clap(long, default_value_t = 20)]
    pub padding: u32,

    /// Outer margin in pixels
    #[clap(long, default_value_t = 40)]
    pub margin: u32,

    /// Background color (hex)
    #[clap(long, default_value = "#ffffff")]
    pub background: String,

    /// Title text overlay (optional)
    #[clap(long)]
    pub title: Option<String>,

    /// Title text color (hex)
    #[clap(long, default_value = "#000000")]
    pub title_color: String,

    /// Title position
    #[clap(long, value_enum, default_value_t = TitlePosition::Top)]
    pub title_position: TitlePosition,

    /// Title font size
    #[clap(long, default_value_t = 48)]
    pub title_size: u32,

    /// Number of parallel cover downloads
    #[clap(long, default_value_t = fetcher::DEFAULT_CONCURRENCY)]
    pub concurrency: usize,
}

#[derive(Parser, Debug, Clone)]
#[command(
    about = "Inspect or clear the local cover cache",
    args_conflicts_with_subcommands = true
)]
pub struct CacheOptions {
    /// Subcommands under `cache` (e.g., `clear`)
    #[command(subcommand)]
    pub command: Option<CacheSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CacheSubcommand {
    /// Remove all cached covers
    Clear,
}

#[derive(Parser, Debug, Clone)]
pub struct CoverOptions {
    #[command(subcommand)]
    pub command: CoverSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CoverSubcommand {
    /// Add a cover to the cache for a book
    Add(AddCoverOpts),
}

#[derive(Parser, Debug, Clone)]
pub struct AddCoverOpts {
    /// ISBN (10 or 13) of the book
    #[clap(long)]
    pub isbn: Option<String>,

    /// Book title (used if no ISBN)
    #[clap(long)]
    pub title: Option<String>,

    /// Book author (used with title)
    #[clap(long)]
    pub author: Option<String>,

    /// URL of the cover image to download
    #[clap(long, conflicts_with = "file")]
    pub url: Option<String>,

    /// Local image file to use as the cover
    #[clap(long)]
    pub file: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct ExportOptions {
    /// Path to the Goodreads CSV export
    pub input_file: PathBuf,

    /// Directory to write thumbnails into
    #[clap(long, default_value = "covers")]
    pub out_dir: PathBuf,

    /// Filter to books finished in this year
    #[clap(long)]
    pub year: Option<i32>,

    /// Maximum thumbnail height in pixels
    #[clap(long, default_value_t = 600)]
    pub max_height: u32,

    /// Number of parallel cover downloads
    #[clap(long, default_value_t = fetcher::DEFAULT_CONCURRENCY)]
    pub concurrency: usize,
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
        Command::Generate(opt) => {
            let collage_config = CollageConfig {
                width: opt.width,
                height: opt.height,
                columns: opt.columns,
                padding: opt.padding,
                margin: opt.margin,
                background: opt.background,
                title: opt.title,
                title_color: opt.title_color,
                title_position: opt.title_position,
                title_size: opt.title_size,
            };
            cli::generate(
                opt.input_file,
                opt.output,
                opt.year,
                collage_config,
                opt.concurrency,
            )
            .await
        }

        Command::Cache(opt) => match opt.command {
            Some(CacheSubcommand::Clear) => cli::cache_clear().await,
            None => cli::cache_info().await,
        },

        Command::Cover(opt) => match opt.command {
            CoverSubcommand::Add(add) => {
                cli::add_cover(add.isbn, add.title, add.author, add.url, add.file).await
            }
        },

        Command::Export(opt) => {
            cli::export(
                opt.input_file,
                opt.out_dir,
                opt.year,
                opt.max_height,
                opt.concurrency,
            )
            .await
        }

        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

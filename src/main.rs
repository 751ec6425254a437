use anime_title_resolver::{AnimeEntry, Config, TitleResolver};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Resolve anime release titles against TMDB
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve a title and print its display name
    Resolve {
        /// Raw title, e.g. "Hunter x Hunter (2011)"
        title: String,

        /// Search movies instead of series
        #[arg(long)]
        movie: bool,
    },

    /// Resolve a series title and print the episode titles of a season
    Episodes {
        /// Raw series title
        title: String,

        /// Season to list
        #[arg(long, default_value_t = 1)]
        season: u32,

        /// List titles even if the rename template does not use them
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let resolver = match TitleResolver::from_config(&config) {
        Ok(resolver) => resolver,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match cli.command {
        Command::Resolve { title, movie } => {
            let mut entry = AnimeEntry::new(title).with_single_release(movie);
            let name = resolver.resolve_display_name(&mut entry);

            println!("{}", name);

            if let Some(record) = entry.media_record() {
                println!("  TMDB id: {}", record.id);
                match record.release_date {
                    Some(date) => println!("  Released: {}", date),
                    None => println!("  Released: unknown"),
                }
            }
        }
        Command::Episodes {
            title,
            season,
            force,
        } => {
            let mut entry = AnimeEntry::new(title).with_season(season);

            let Some(record) = resolver.resolve(&mut entry) else {
                eprintln!("No match found for '{}'", entry.title);
                process::exit(1);
            };

            let titles = if force {
                resolver.fetch_episode_titles(&record, season)
            } else {
                resolver.episode_titles(&entry)
            };

            println!("{} - Season {}", record.name, season);
            if titles.is_empty() {
                println!("  No episode titles available.");
            }
            for (episode, name) in &titles {
                println!("  E{:02} - {}", episode, name);
            }
        }
    }
}

// src/main.rs
//
// Command line front end over the Synchronizer.
//
// Reads an optional `.env`, then MOVIESYNC_* from the environment.
// `--memory` skips the remote store entirely (demos, smoke tests).

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::debug;

use moviesync::application::ToErrorResponse;
use moviesync::{Movie, MovieDetails, StoreConfig, Synchronizer};

#[derive(Parser)]
#[command(name = "moviesync", version, about = "Sync favorites, saved movies and search counters")]
struct Cli {
    /// Run against a throwaway in-memory store
    #[arg(long, global = true)]
    memory: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the most searched movies
    Trending,

    /// Count a search and remember its top result
    RecordSearch {
        term: String,
        #[arg(long)]
        movie_id: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        poster_path: Option<String>,
    },

    /// Save a movie for later
    Save {
        #[arg(long)]
        user: String,
        #[arg(long)]
        movie_id: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        poster_path: Option<String>,
        #[arg(long)]
        release_date: Option<String>,
        #[arg(long)]
        vote_average: Option<f64>,
    },

    /// List a user's saved movies, newest first
    Saved {
        #[arg(long)]
        user: String,
    },

    /// Check whether a movie is saved
    IsSaved {
        #[arg(long)]
        user: String,
        #[arg(long)]
        movie_id: i64,
    },

    /// Remove a saved movie
    Unsave {
        #[arg(long)]
        user: String,
        #[arg(long)]
        movie_id: i64,
    },

    /// Store a profile image URL
    UploadImage {
        #[arg(long)]
        user: String,
        url: String,
    },

    /// Print a user's profile image URL
    Image {
        #[arg(long)]
        user: String,
    },

    /// Manage favorites
    Favorite {
        #[command(subcommand)]
        action: FavoriteAction,
    },
}

#[derive(Subcommand)]
enum FavoriteAction {
    Add {
        #[arg(long)]
        user: String,
        movie_id: i64,
    },
    Remove {
        #[arg(long)]
        user: String,
        movie_id: i64,
    },
    Check {
        #[arg(long)]
        user: String,
        movie_id: i64,
    },
    List {
        #[arg(long)]
        user: String,
    },
    Toggle {
        #[arg(long)]
        user: String,
        movie_id: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. ENVIRONMENT
    dotenv::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();

    // 2. SYNCHRONIZER
    let sync = if cli.memory {
        debug!("Using in-memory store");
        Synchronizer::in_memory()
    } else {
        let config = StoreConfig::from_env().context("loading store configuration")?;
        Synchronizer::from_config(&config).context("building store client")?
    };

    // 3. DISPATCH
    run(&sync, cli.command)
        .await
        .map_err(|message| anyhow::anyhow!(message))
}

/// Executes one command. Errors come back as serialized ErrorResponse JSON.
async fn run(sync: &Synchronizer, command: Command) -> Result<(), String> {
    match command {
        Command::Trending => {
            let trending = sync.list_trending().await;
            if trending.is_empty() {
                println!("No trending searches yet");
            }
            for (rank, entry) in trending.iter().enumerate() {
                println!(
                    "{}. {} ({} searches for '{}') {}",
                    rank + 1,
                    entry.title,
                    entry.count,
                    entry.search_term,
                    entry.poster_url
                );
            }
        }

        Command::RecordSearch {
            term,
            movie_id,
            title,
            poster_path,
        } => {
            let movie = Movie {
                id: movie_id,
                title,
                poster_path,
            };
            let counter = sync.record_search(&term, &movie).await.to_error_response()?;
            println!("'{}' searched {} time(s)", counter.search_term, counter.count);
        }

        Command::Save {
            user,
            movie_id,
            title,
            poster_path,
            release_date,
            vote_average,
        } => {
            let details = MovieDetails {
                id: movie_id,
                title,
                poster_path,
                release_date,
                vote_average,
            };
            if sync.save_movie(&details, &user).await.to_error_response()? {
                println!("Saved {}", movie_id);
            } else {
                println!("{} was already saved", movie_id);
            }
        }

        Command::Saved { user } => match sync.list_saved_movies(&user).await {
            Some(saved) if saved.is_empty() => println!("Nothing saved"),
            Some(saved) => {
                for movie in saved {
                    let saved_at = movie
                        .saved_at
                        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_default();
                    println!("{}\t{}\t{}", movie.movie_id, movie.title, saved_at);
                }
            }
            None => return Err("Saved movies are unavailable right now".to_string()),
        },

        Command::IsSaved { user, movie_id } => {
            println!("{}", sync.is_movie_saved(movie_id, &user).await);
        }

        Command::Unsave { user, movie_id } => {
            if sync.remove_saved_movie(movie_id, &user).await.to_error_response()? {
                println!("Removed {}", movie_id);
            } else {
                println!("{} was not saved", movie_id);
            }
        }

        Command::UploadImage { user, url } => {
            sync.upload_user_image(&user, &url).await.to_error_response()?;
            println!("Profile image updated");
        }

        Command::Image { user } => match sync.get_user_image(&user).await.to_error_response()? {
            Some(url) => println!("{}", url),
            None => println!("No profile image"),
        },

        Command::Favorite { action } => run_favorite(sync, action).await?,
    }
    Ok(())
}

async fn run_favorite(sync: &Synchronizer, action: FavoriteAction) -> Result<(), String> {
    match action {
        FavoriteAction::Add { user, movie_id } => {
            sync.add_to_favorites(&user, movie_id).await.to_error_response()?;
            println!("Added {}", movie_id);
        }
        FavoriteAction::Remove { user, movie_id } => {
            sync.remove_from_favorites(&user, movie_id).await.to_error_response()?;
            println!("Removed {}", movie_id);
        }
        FavoriteAction::Check { user, movie_id } => {
            println!("{}", sync.is_favorite(&user, movie_id).await.to_error_response()?);
        }
        FavoriteAction::List { user } => {
            for movie_id in sync.list_favorites(&user).await.to_error_response()? {
                println!("{}", movie_id);
            }
        }
        FavoriteAction::Toggle { user, movie_id } => {
            let now_favorite = sync.toggle_favorite(&user, movie_id).await.to_error_response()?;
            println!("{} is {}a favorite", movie_id, if now_favorite { "now " } else { "no longer " });
        }
    }
    Ok(())
}

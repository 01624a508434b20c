//! thread-prep - Prepare rich text for social platforms
//!
//! Unix-style tool over the threadcast text pipeline: style transcoding,
//! length counting, chunking, mention resolution, and full previews.

use std::io::Read;

use clap::{Parser, Subcommand};
use libthreadcast::logging::{LogFormat, LoggingConfig};
use libthreadcast::platform::Platform;
use libthreadcast::{Config, InMemoryDirectory, Result, TextService, ThreadcastError};

#[derive(Parser, Debug)]
#[command(name = "thread-prep")]
#[command(version)]
#[command(about = "Prepare rich text for social platforms")]
#[command(long_about = "\
thread-prep - Prepare rich text for social platforms

DESCRIPTION:
    thread-prep runs the threadcast text pipeline from the command line:
    convert **bold** and _italic_ markup to Unicode styled glyphs, count
    content against a platform's limit, split long content into chunks,
    resolve @{Name} mentions, or preview the fully processed result.

    Content is taken from the first argument, or from stdin when omitted.

COMMANDS:
    format   Convert emphasis markup to Unicode styled glyphs
    count    Count content against a platform's limit
    chunk    Split content into platform-legal chunks
    tags     Resolve @{Name} mentions for a platform
    preview  Resolve tags, apply style, and report length standing

USAGE EXAMPLES:
    # Convert markup
    thread-prep format \"**Launch** day is _finally_ here\"

    # Count against Bluesky's grapheme-based limit
    echo \"Some draft text\" | thread-prep count --platform bluesky

    # Chunk a long post for Twitter, JSON output for scripting
    thread-prep chunk --platform twitter --format json < draft.txt

    # Premium account limits
    thread-prep count --platform twitter --premium \"$(cat draft.txt)\"

    # Resolve mentions using the people in your config
    thread-prep tags --platform mastodon \"Thanks @{Jane Doe}!\"

    # Full preview
    thread-prep preview --platform linkedin < draft.txt

CONFIGURATION:
    Configuration file: ~/.config/threadcast/config.toml

    Override with environment variables:
        THREADCAST_CONFIG      - Path to config file
        THREADCAST_LOG_LEVEL   - Log level filter (default: error)

    [defaults]
    platforms = [\"twitter\"]
    premium = false

    [mastodon]
    character_limit = 500

    [[people]]
    name = \"Jane Doe\"
    twitter = \"janed\"
    bluesky = \"jane.example.com\"

EXIT CODES:
    0 - Success
    1 - Operation or configuration error
    3 - Invalid input (empty content, malformed markup)
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    #[arg(help = "Enable verbose logging to stderr (useful for debugging)")]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert emphasis markup to Unicode styled glyphs
    Format {
        /// Content to format (reads from stdin if not provided)
        content: Option<String>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        #[arg(value_parser = ["text", "json"])]
        format: String,
    },

    /// Count content against a platform's limit
    Count {
        /// Content to count (reads from stdin if not provided)
        content: Option<String>,

        /// Target platform (linkedin, twitter, bluesky, mastodon)
        #[arg(short, long)]
        platform: Option<String>,

        /// Count against the premium limit (Twitter only)
        #[arg(long)]
        premium: bool,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        #[arg(value_parser = ["text", "json"])]
        format: String,
    },

    /// Split content into platform-legal chunks
    Chunk {
        /// Content to chunk (reads from stdin if not provided)
        content: Option<String>,

        /// Target platform (linkedin, twitter, bluesky, mastodon)
        #[arg(short, long)]
        platform: Option<String>,

        /// Chunk against the premium limit (Twitter only)
        #[arg(long)]
        premium: bool,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        #[arg(value_parser = ["text", "json"])]
        format: String,
    },

    /// Resolve @{Name} mentions for a platform
    Tags {
        /// Content to process (reads from stdin if not provided)
        content: Option<String>,

        /// Target platform (linkedin, twitter, bluesky, mastodon)
        #[arg(short, long)]
        platform: Option<String>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        #[arg(value_parser = ["text", "json"])]
        format: String,
    },

    /// Resolve tags, apply style, and report length standing
    Preview {
        /// Content to preview (reads from stdin if not provided)
        content: Option<String>,

        /// Target platform (linkedin, twitter, bluesky, mastodon)
        #[arg(short, long)]
        platform: Option<String>,

        /// Preview against the premium limit (Twitter only)
        #[arg(long)]
        premium: bool,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        #[arg(value_parser = ["text", "json"])]
        format: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let format = std::env::var("THREADCAST_LOG_FORMAT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(LogFormat::Text);
    let level = std::env::var("THREADCAST_LOG_LEVEL").unwrap_or_else(|_| "error".to_string());
    LoggingConfig::new(format, level, cli.verbose).init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

/// Load the config, falling back to defaults when no file exists yet
fn load_config() -> Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(ThreadcastError::Config(libthreadcast::error::ConfigError::ReadError(_))) => {
            tracing::debug!("no config file found, using defaults");
            Ok(Config::default_config())
        }
        Err(e) => Err(e),
    }
}

/// Resolve the content argument, reading stdin when absent
fn read_content(arg: Option<String>) -> Result<String> {
    match arg {
        Some(content) => Ok(content),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| ThreadcastError::InvalidInput(format!("Failed to read stdin: {}", e)))?;
            Ok(buffer.trim_end_matches('\n').to_string())
        }
    }
}

/// Pick the target platform: flag first, then the config default
fn resolve_platform(flag: Option<String>, config: &Config) -> Platform {
    let name = flag
        .or_else(|| config.defaults.platforms.first().cloned())
        .unwrap_or_else(|| "twitter".to_string());
    Platform::parse_lenient(&name)
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config()?;
    let service = TextService::new(config.length_policy());
    let directory: InMemoryDirectory = config.directory();

    match cli.command {
        Commands::Format { content, format } => {
            let outcome = service.format_text(&read_content(content)?)?;
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("{}", outcome.formatted);
            }
        }

        Commands::Count {
            content,
            platform,
            premium,
            format,
        } => {
            let platform = resolve_platform(platform, &config);
            let premium = premium || config.defaults.premium;
            let outcome = service.count_for_platform(&read_content(content)?, platform, premium)?;
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                let status = if outcome.exceeds_limit { "OVER" } else { "OK" };
                println!(
                    "{}/{} ({} remaining) [{}]",
                    outcome.count, outcome.limit, outcome.remaining, status
                );
            }
        }

        Commands::Chunk {
            content,
            platform,
            premium,
            format,
        } => {
            let platform = resolve_platform(platform, &config);
            let premium = premium || config.defaults.premium;
            let outcome = service.chunk_for_platform(&read_content(content)?, platform, premium)?;
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                for (i, chunk) in outcome.chunks.iter().enumerate() {
                    if outcome.needs_threading {
                        println!("--- chunk {}/{} ---", i + 1, outcome.total_chunks);
                    }
                    println!("{}", chunk);
                }
            }
        }

        Commands::Tags {
            content,
            platform,
            format,
        } => {
            let platform = resolve_platform(platform, &config);
            let outcome = service.resolve_tags(&read_content(content)?, platform, &directory)?;
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("{}", outcome.processed);
            }
        }

        Commands::Preview {
            content,
            platform,
            premium,
            format,
        } => {
            let platform = resolve_platform(platform, &config);
            let premium = premium || config.defaults.premium;
            let outcome = service.preview_for_platform(
                &read_content(content)?,
                platform,
                premium,
                &directory,
            )?;
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("{}", outcome.processed);
                eprintln!(
                    "{}: {}/{} ({} remaining){}",
                    platform,
                    outcome.count,
                    outcome.limit,
                    outcome.remaining,
                    if outcome.needs_chunking {
                        " - needs chunking"
                    } else {
                        ""
                    }
                );
            }
        }
    }

    Ok(())
}

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use console::style;
use dialoguer::{Input, Password, theme::ColorfulTheme};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use tunelink_config::{
    TunelinkConfig, config_exists, config_path, get_config_value, load_config, load_dotenv,
    open_in_editor, resolve_credentials, resolve_endpoint, resolve_log_level,
    resolve_timeout_secs, save_config, set_config_value,
};
use tunelink_core::{ConversionResult, TargetService, TunelinkError, TunelinkResult};
use tunelink_music::{Direction, LinkConverter, render_reply};

#[derive(Subcommand, Debug)]
enum Commands {
    /// Connect to Discord and answer slash commands
    Run,
    /// Register the slash commands with Discord
    Deploy,
    /// Convert links from the terminal
    Convert(ConvertArgs),
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Open config file in editor
    Edit,
    /// Prompt for the bot token and application id
    Init,
}

#[derive(Debug, clap::Args)]
struct ConvertArgs {
    /// Target service (spotify or youtube_music); detected from the link when omitted
    #[arg(long)]
    to: Option<String>,
    /// Read links from a file, one per line
    #[arg(long)]
    input: Option<String>,
    /// Print only the matched URL
    #[arg(long)]
    simple: bool,
    /// Also print the alternate matches
    #[arg(long)]
    all: bool,
    #[arg(value_name = "URL")]
    urls: Vec<String>,
}

#[derive(Debug, Parser)]
#[command(name = "tunelink")]
#[command(version, about = "Spotify / YouTube Music link converter bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    // `.env` may point TUNELINK_CONFIG elsewhere, so it loads first.
    let dotenv = load_dotenv();

    let outcome = match cli.command {
        Commands::Config { action } => handle_config_command(action),
        Commands::Run => run(&prepare(dotenv)).await,
        Commands::Deploy => deploy(&prepare(dotenv)).await,
        Commands::Convert(args) => convert(&prepare(dotenv), &args).await,
    };

    if let Err(err) = outcome {
        exit_with(err);
    }
}

/// Loads the config file and installs logging for the long-running commands.
fn prepare(dotenv: TunelinkResult<Option<PathBuf>>) -> TunelinkConfig {
    let config = load_config().unwrap_or_else(|err| exit_with(err));
    init_logging(&config);

    match dotenv {
        Ok(Some(path)) => debug!(path = %path.display(), "loaded .env"),
        Ok(None) => {}
        Err(err) => warn!(error = %err, "ignoring .env"),
    }
    config
}

fn exit_with(err: TunelinkError) -> ! {
    eprintln!("{} {err}", style("Error:").red());
    std::process::exit(1);
}

fn init_logging(config: &TunelinkConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(resolve_log_level(config)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_converter(config: &TunelinkConfig) -> TunelinkResult<LinkConverter> {
    let timeout = resolve_timeout_secs(config)?.map(Duration::from_secs);
    LinkConverter::new(&resolve_endpoint(config), timeout)
}

async fn run(config: &TunelinkConfig) -> TunelinkResult<()> {
    let credentials = resolve_credentials(config)?;
    let converter = build_converter(config)?;
    tunelink_discord::run_bot(&credentials, converter).await
}

async fn deploy(config: &TunelinkConfig) -> TunelinkResult<()> {
    let credentials = resolve_credentials(config)?;
    println!("Registering slash commands...");
    let count = tunelink_discord::register_commands(&credentials).await?;
    println!(
        "{} Registered {count} slash commands",
        style("✓").green()
    );
    Ok(())
}

async fn convert(config: &TunelinkConfig, args: &ConvertArgs) -> TunelinkResult<()> {
    let target = match &args.to {
        Some(value) => Some(TargetService::normalize(value).ok_or_else(|| {
            TunelinkError::InvalidInput(format!(
                "unknown target: {value} (expected spotify or youtube_music)"
            ))
        })?),
        None => None,
    };

    let urls = gather_inputs(args)?;
    if urls.is_empty() {
        return Err(TunelinkError::InvalidInput(
            "no input URLs provided".to_string(),
        ));
    }

    let converter = build_converter(config)?;
    let mut success = 0usize;
    let mut failed = 0usize;

    for url in &urls {
        match process_url(&converter, url, target, args).await {
            Ok(()) => success += 1,
            Err(message) => {
                failed += 1;
                eprintln!("{} {url}\n{message}", style("Failed").red());
            }
        }
    }

    print_summary(success + failed, success, failed);
    Ok(())
}

async fn process_url(
    converter: &LinkConverter,
    url: &str,
    target: Option<TargetService>,
    args: &ConvertArgs,
) -> Result<(), String> {
    let direction = match target {
        Some(target) => Direction::toward(target),
        None => Direction::detect(url).ok_or_else(|| {
            "❌ That doesn't look like a Spotify or YouTube Music URL.".to_string()
        })?,
    };

    let url = direction.accept(url).map_err(str::to_string)?;
    let result = converter.convert(&url, direction.target()).await;
    debug!(url = %url, target = %direction.target(), "converted");

    if result.is_failure() {
        return Err(render_reply(direction, &result));
    }
    print_result(direction, &result, args);
    Ok(())
}

fn gather_inputs(args: &ConvertArgs) -> TunelinkResult<Vec<String>> {
    let mut urls = args.urls.clone();

    if let Some(path) = &args.input {
        let content = fs::read_to_string(path).map_err(|err| {
            TunelinkError::InvalidInput(format!("failed to read input file: {err}"))
        })?;
        urls.extend(parse_lines(&content));
    }

    if urls.is_empty() && !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|err| TunelinkError::InvalidInput(format!("failed to read stdin: {err}")))?;
        urls.extend(parse_lines(&buffer));
    }

    Ok(urls)
}

fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.to_string())
        .collect()
}

fn print_result(direction: Direction, result: &ConversionResult, args: &ConvertArgs) {
    if args.simple {
        if let Some(line) = simple_line(result) {
            println!("{line}");
        }
        return;
    }

    println!(
        "{} {}",
        style(format!("{}:", direction.target().display_name())).green(),
        render_reply(direction, result)
    );

    if args.all
        && let ConversionResult::Match { alternates, .. } = result
    {
        for item in alternates {
            println!("  {} {} {}", style("alt").dim(), item.display_text(), item.url);
        }
    }

    println!();
}

/// One bare URL per conversion: the match, or the manual search fallback.
fn simple_line(result: &ConversionResult) -> Option<&str> {
    match result {
        ConversionResult::Match { top, .. } => Some(top.url.as_str()),
        ConversionResult::NoMatch { manual_search_link } => Some(manual_search_link.as_str()),
        ConversionResult::Failure { .. } => None,
    }
}

fn print_summary(total: usize, success: usize, failed: usize) {
    println!(
        "{} Total: {} | Success: {} | Failed: {}",
        style("Summary:").bold(),
        total,
        success,
        failed
    );
}

fn handle_config_command(action: ConfigAction) -> TunelinkResult<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = load_config()?;
            match get_config_value(&config, &key)? {
                Some(value) => println!("{key} = {}", display_value(&key, &value)),
                None => println!("{key} = <null>"),
            }
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            set_config_value(&key, &value)?;
            println!(
                "{} Set {key} = {}",
                style("✓").green(),
                display_value(&key, &value)
            );
            Ok(())
        }
        ConfigAction::List => {
            let config = load_config()?;
            println!("Current configuration ({}):", config_path()?.display());
            println!("\n[discord]");
            println!(
                "token = {}",
                config
                    .discord
                    .token
                    .as_deref()
                    .map(mask_secret)
                    .unwrap_or_else(|| "<null>".to_string())
            );
            println!(
                "application_id = {}",
                config.discord.application_id.as_deref().unwrap_or("<null>")
            );
            println!("\n[api]");
            println!(
                "endpoint = {}",
                config.api.endpoint.as_deref().unwrap_or("<null>")
            );
            println!(
                "timeout_secs = {}",
                config
                    .api
                    .timeout_secs
                    .map(|secs| secs.to_string())
                    .unwrap_or_else(|| "<null>".to_string())
            );
            println!("\n[log]");
            println!("level = {}", config.log.level.as_deref().unwrap_or("<null>"));
            Ok(())
        }
        ConfigAction::Edit => open_in_editor(),
        ConfigAction::Init => init_config(),
    }
}

fn init_config() -> TunelinkResult<()> {
    let mut config = if config_exists()? {
        load_config()?
    } else {
        TunelinkConfig::default()
    };

    let theme = ColorfulTheme::default();
    println!(
        "{} Let's configure your bot credentials",
        style("Setup:").bold().cyan()
    );

    let token = Password::with_theme(&theme)
        .with_prompt("Discord bot token")
        .interact()
        .map_err(|err| TunelinkError::InvalidInput(format!("prompt failed: {err}")))?;

    let application_id: String = Input::with_theme(&theme)
        .with_prompt("Discord application id")
        .validate_with(|input: &String| -> Result<(), &str> {
            match input.trim().parse::<u64>() {
                Ok(id) if id != 0 => Ok(()),
                _ => Err("application id must be a non-zero integer"),
            }
        })
        .interact_text()
        .map_err(|err| TunelinkError::InvalidInput(format!("prompt failed: {err}")))?;

    config.discord.token = Some(token.trim().to_string());
    config.discord.application_id = Some(application_id.trim().to_string());
    save_config(&config)?;

    println!(
        "{} Config written to {}",
        style("✓").green(),
        config_path()?.display()
    );
    Ok(())
}

fn display_value(key: &str, value: &str) -> String {
    if key == "discord.token" {
        mask_secret(value)
    } else {
        value.to_string()
    }
}

fn mask_secret(value: &str) -> String {
    let visible: String = value.chars().take(4).collect();
    if value.chars().count() <= 8 {
        "********".to_string()
    } else {
        format!("{visible}********")
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use tunelink_core::{ConversionResult, SearchResultItem};

    use super::{Cli, Commands, ConfigAction, display_value, mask_secret, parse_lines, simple_line};

    #[test]
    fn subcommands_parse() {
        let cli = Cli::try_parse_from(["tunelink", "config", "list"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::List
            }
        ));

        let cli = Cli::try_parse_from([
            "tunelink",
            "convert",
            "--to",
            "spotify",
            "--simple",
            "https://music.youtube.com/watch?v=abc",
        ])
        .unwrap();
        match cli.command {
            Commands::Convert(args) => {
                assert_eq!(args.to.as_deref(), Some("spotify"));
                assert!(args.simple);
                assert_eq!(args.urls, vec!["https://music.youtube.com/watch?v=abc"]);
            }
            other => panic!("expected Convert, got {other:?}"),
        }

        assert!(matches!(
            Cli::try_parse_from(["tunelink", "deploy"]).unwrap().command,
            Commands::Deploy
        ));
    }

    #[test]
    fn simple_output_falls_back_to_manual_search_link() {
        let no_match = ConversionResult::NoMatch {
            manual_search_link: "https://music.youtube.com/search?q=Song".to_string(),
        };
        assert_eq!(
            simple_line(&no_match),
            Some("https://music.youtube.com/search?q=Song")
        );

        let top = SearchResultItem {
            url: "https://open.spotify.com/track/1".to_string(),
            uri: String::new(),
            art_url: String::new(),
            description1: "Song".to_string(),
            description2: None,
            description3: None,
            description4: None,
        };
        let matched = ConversionResult::Match {
            top,
            alternates: Vec::new(),
        };
        assert_eq!(simple_line(&matched), Some("https://open.spotify.com/track/1"));

        let failure = ConversionResult::Failure {
            message: "boom".to_string(),
        };
        assert_eq!(simple_line(&failure), None);
    }

    #[test]
    fn parse_lines_skips_blanks_and_comments() {
        let content = "https://open.spotify.com/track/a\n\n  # later\n  https://music.youtube.com/watch?v=b  \n";
        assert_eq!(
            parse_lines(content),
            vec![
                "https://open.spotify.com/track/a".to_string(),
                "https://music.youtube.com/watch?v=b".to_string()
            ]
        );
    }

    #[test]
    fn mask_secret_hides_most_of_the_token() {
        assert_eq!(mask_secret("short"), "********");
        assert_eq!(mask_secret("MTIzNDU2Nzg5.abc.def"), "MTIz********");
    }

    #[test]
    fn only_the_token_is_masked() {
        assert_eq!(display_value("log.level", "debug"), "debug");
        assert_eq!(display_value("discord.token", "abcdefghijkl"), "abcd********");
    }
}

use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use papo_social::api::ApiServer;
use papo_social::onboarding::{
    DEFAULT_STEPS, StepNavigator, compute_level, extract, format_phone, level_achievements,
    render_prompt, validate_phone,
};
use papo_social::theme::{DocumentRoot, FileStore, THEME_ATTRIBUTE, Theme, ThemeContext};
use papo_social::voice::{
    LogSynthesizer, Narrator, RecognitionConfig, ScriptedRecognizer, SpeechCapture,
};
use papo_social::{Config, OnboardingClient, XpRequest, abort_pair};

/// Papo Social - voice-first onboarding service
#[derive(Parser)]
#[command(name = "papo", version, about)]
struct Cli {
    /// Port to listen on (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Address to bind (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the onboarding API (default)
    Serve,
    /// Extract a name from a transcript
    Extract {
        /// Spoken introduction, e.g. "oi, me chamo maria"
        transcript: String,
    },
    /// Show the level reached after an XP change
    Level {
        /// XP added to the base of 50
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Format and validate a phone number
    Phone {
        /// Digits or a partially formatted number
        number: String,
    },
    /// Read or change the saved theme
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
    /// Run the onboarding flow with a scripted voice
    Simulate {
        /// What the user says on the welcome step
        #[arg(default_value = "Olá, me chamo Maria Silva")]
        utterance: String,
        /// Phone number typed on the phone step
        #[arg(long, default_value = "11987654321")]
        phone: String,
        /// XP awarded once the phone is confirmed
        #[arg(long, default_value_t = 60, allow_hyphen_values = true)]
        xp: i64,
        /// Start a throwaway server on a random port instead of using the configured URL
        #[arg(long)]
        local: bool,
        /// Skip spoken prompts
        #[arg(long)]
        mute: bool,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Print the current theme
    Get,
    /// Save a theme (lemonade, forest, system)
    Set { theme: Theme },
    /// Switch between light and dark
    Toggle,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info,papo_social=info",
        1 => "info,papo_social=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load();
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    tracing::debug!(?config, "loaded configuration");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config).await,
        Command::Extract { transcript } => cmd_extract(&transcript),
        Command::Level { delta } => cmd_level(delta),
        Command::Phone { number } => cmd_phone(&number),
        Command::Theme { action } => cmd_theme(&config, action),
        Command::Simulate {
            utterance,
            phone,
            xp,
            local,
            mute,
        } => simulate(&config, &utterance, &phone, xp, local, mute).await,
    }
}

async fn serve(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        "starting papo social"
    );
    ApiServer::new(&config.server).run().await?;
    Ok(())
}

fn cmd_extract(transcript: &str) -> anyhow::Result<()> {
    let Some(extraction) = extract(transcript) else {
        bail!("could not extract a name from {transcript:?}");
    };
    println!("{}", extraction.name);
    tracing::debug!(strategy = ?extraction.strategy, "name extracted");
    Ok(())
}

fn cmd_level(delta: i64) -> anyhow::Result<()> {
    let level = compute_level(delta).context("total XP cannot be negative")?;
    let achievements = level_achievements(level.level);

    let out = serde_json::json!({ "level": level, "achievements": achievements });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn cmd_phone(number: &str) -> anyhow::Result<()> {
    let formatted = format_phone(number);
    println!("{formatted}");
    validate_phone(&formatted).map_err(|e| anyhow::anyhow!(e.message()))?;
    Ok(())
}

fn cmd_theme(config: &Config, action: ThemeAction) -> anyhow::Result<()> {
    let store = FileStore::new(&config.theme_store_path);
    let mut ctx = ThemeContext::load(store, DocumentRoot::new(), Theme::default())?;

    match action {
        ThemeAction::Get => {}
        ThemeAction::Set { theme } => ctx.set_theme(theme)?,
        ThemeAction::Toggle => {
            ctx.toggle_theme()?;
        }
    }

    println!(
        "{} (dark: {}, {}={})",
        ctx.theme(),
        ctx.is_dark(),
        THEME_ATTRIBUTE,
        ctx.root().attribute(THEME_ATTRIBUTE).unwrap_or_default()
    );
    Ok(())
}

async fn simulate(
    config: &Config,
    utterance: &str,
    raw_phone: &str,
    xp: i64,
    local: bool,
    mute: bool,
) -> anyhow::Result<()> {
    let mut client_config = config.client.clone();
    let mut local_server = None;

    if local {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        let server = ApiServer::new(&config.server);
        let handle = tokio::spawn(server.serve(listener, async move {
            let _ = stop_rx.await;
        }));
        client_config.base_url = format!("http://{addr}/api");
        local_server = Some((stop_tx, handle));
    }

    let client = OnboardingClient::new(&client_config)?;
    let (abort, signal) = abort_pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            abort.abort();
        }
    });

    let mut narrator = if mute {
        Narrator::unavailable()
    } else {
        Narrator::new(Box::new(LogSynthesizer), config.speech_lang.clone())
    };
    let mut steps = StepNavigator::new(&DEFAULT_STEPS);

    // Welcome: capture the spoken introduction
    if let Some(step) = steps.current() {
        narrator.say(step.voice_prompt)?;
    }
    let mut capture = SpeechCapture::new(
        Box::new(ScriptedRecognizer::new([utterance])),
        RecognitionConfig::with_lang(config.speech_lang.clone()),
    );
    capture.start();
    let Some(transcript) = capture.run_until_idle().await else {
        bail!(capture.last_error().unwrap_or("no transcript captured"));
    };

    let profile = client.submit_transcript(&transcript, &signal).await?;
    println!("{}", serde_json::to_string_pretty(&profile)?);

    // Phone
    if let Some(step) = steps.advance() {
        narrator.say(step.voice_prompt)?;
    }
    let phone = format_phone(raw_phone);
    validate_phone(&phone).map_err(|e| anyhow::anyhow!(e.message()))?;

    // Confirmation
    if let Some(step) = steps.advance() {
        narrator.say(&render_prompt(step.voice_prompt, &profile.name, &phone))?;
    }

    let request = XpRequest {
        xp,
        phone: Some(phone),
        name: Some(profile.name.clone()),
    };
    let updated = client.update_xp(&profile.id, &request, &signal).await?;

    // Success
    if let Some(step) = steps.advance() {
        narrator.say(step.voice_prompt)?;
    }
    println!("{}", serde_json::to_string_pretty(&updated)?);

    if let Some((stop, handle)) = local_server {
        let _ = stop.send(());
        handle.await??;
    }
    Ok(())
}

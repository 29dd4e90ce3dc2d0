//! Genly CLI
//!
//! Headless front end for the generation core: submits a request to a
//! provider, streams progress to stderr, and prints the normalized result
//! as JSON. Provider API keys come from the environment.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use genly_core::generative::{
    effects_by_category, CancelToken, EffectCategory, GenerateOptions, GenerationEngine,
    GenerationRequest, MediaKind, ProviderConfig, RunwareProvider, Sora2Provider, Veo3Provider,
    VIDEO_EFFECTS,
};
use genly_core::CoreError;

/// Environment variable holding the Runware API key
const ENV_RUNWARE_KEY: &str = "GENLY_RUNWARE_API_KEY";

/// Environment variable holding the CometAPI key (sora2 + veo3)
const ENV_COMET_KEY: &str = "GENLY_COMET_API_KEY";

#[derive(Parser)]
#[command(name = "genly", version, about = "Generative media job orchestration")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a generation request and wait for the media URL
    Generate {
        /// Text prompt describing the desired media
        prompt: String,

        /// Provider ID (see `genly providers`)
        #[arg(long, short)]
        provider: String,

        /// Media kind: video or image
        #[arg(long, default_value = "video")]
        kind: MediaKind,

        /// Style preset (none, anime, 3d_animation, clay, comic, cyberpunk)
        #[arg(long)]
        style: Option<String>,

        /// Desired duration in seconds (snapped per provider)
        #[arg(long)]
        duration: Option<f64>,

        /// Aspect ratio, e.g. 16:9, 9:16, 1:1
        #[arg(long)]
        aspect_ratio: Option<String>,

        /// Reference media URL (repeatable)
        #[arg(long = "reference")]
        references: Vec<String>,

        /// Video effect ID (see `genly effects`)
        #[arg(long)]
        effect: Option<String>,

        /// Suppress the progress line on stderr
        #[arg(long)]
        quiet: bool,
    },

    /// List registered providers and their availability
    Providers,

    /// List the video effect catalog
    Effects {
        /// Filter by category (transformation, thematic, creative, animation)
        #[arg(long)]
        category: Option<EffectCategory>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let engine = build_engine()?;

    match cli.command {
        Command::Generate {
            prompt,
            provider,
            kind,
            style,
            duration,
            aspect_ratio,
            references,
            effect,
            quiet,
        } => {
            let registered = engine
                .provider(&provider)
                .with_context(|| format!("Unknown provider '{}'", provider))?;
            if !registered.is_available() {
                bail!(
                    "Provider '{}' is not configured; set {} or {}",
                    provider,
                    ENV_RUNWARE_KEY,
                    ENV_COMET_KEY
                );
            }

            let mut request = GenerationRequest::new(prompt).with_kind(kind);
            if let Some(style) = style {
                request = request.with_style(style);
            }
            if let Some(duration) = duration {
                request = request.with_duration(duration);
            }
            if let Some(ratio) = aspect_ratio {
                request = request.with_aspect_ratio(ratio);
            }
            for reference in references {
                request = request.with_reference_media(reference);
            }
            if let Some(effect) = effect {
                request = request.with_setting("effect", effect);
            }

            let token = CancelToken::new();
            let ctrl_c_token = token.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    eprintln!("\ncancellation requested, no further status calls will be made");
                    ctrl_c_token.cancel();
                }
            });

            let mut options = GenerateOptions::new().with_cancel_token(token);
            if !quiet {
                options = options.with_progress(Box::new(|pct| {
                    eprint!("\rgenerating... {:3.0}%", pct);
                    if pct >= 100.0 {
                        eprintln!();
                    }
                }));
            }

            match engine.generate_with_options(&provider, request, options).await {
                Ok(result) => {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                    Ok(())
                }
                Err(CoreError::Cancelled) => {
                    eprintln!("generation cancelled; the upstream job was not retracted");
                    std::process::exit(130);
                }
                Err(error) => Err(error).context("generation failed"),
            }
        }

        Command::Providers => {
            for info in engine.providers() {
                let kinds: Vec<String> = info.kinds.iter().map(|k| k.to_string()).collect();
                println!(
                    "{:<10} kinds: {:<14} {}",
                    info.id,
                    kinds.join(", "),
                    if info.available { "available" } else { "not configured" }
                );
            }
            Ok(())
        }

        Command::Effects { category } => {
            let effects: Vec<_> = match category {
                Some(category) => effects_by_category(category),
                None => VIDEO_EFFECTS.iter().collect(),
            };
            for effect in effects {
                let refs = if effect.requires_reference {
                    format!("needs 1-{} reference(s)", effect.max_references)
                } else {
                    "no reference".to_string()
                };
                println!(
                    "{:<22} {:<18} [{}] {} — {}",
                    effect.id, effect.name, effect.category, refs, effect.description
                );
            }
            Ok(())
        }
    }
}

/// Builds the engine from environment-supplied API keys.
///
/// Providers are always registered so `providers` can report what exists;
/// availability reflects whether the matching key is set. Base URL and model
/// overrides are optional and share one variable per upstream.
fn build_engine() -> Result<GenerationEngine> {
    let runware = provider_config(ENV_RUNWARE_KEY, "GENLY_RUNWARE_BASE_URL");
    let comet = provider_config(ENV_COMET_KEY, "GENLY_COMET_BASE_URL");

    let mut engine = GenerationEngine::new();
    engine.register(Arc::new(RunwareProvider::from_config(&runware)?));
    engine.register(Arc::new(Sora2Provider::from_config(&comet)?));
    engine.register(Arc::new(Veo3Provider::from_config(&comet)?));
    Ok(engine)
}

/// Reads a provider configuration from the environment.
fn provider_config(key_var: &str, base_url_var: &str) -> ProviderConfig {
    let mut config = ProviderConfig::with_api_key(std::env::var(key_var).unwrap_or_default());
    if let Ok(base_url) = std::env::var(base_url_var) {
        config = config.with_base_url(base_url);
    }
    config
}

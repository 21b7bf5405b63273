//! hfgen: command-line form for hosted text generation

use std::io::Read;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{debug, error, info, warn};

use hfgen::config::{
  AppConfig, ClientSettings, Credentials, MAX_TEMPERATURE, MIN_TEMPERATURE
};
use hfgen::display;
use hfgen::providers::HfInferenceClient;
use hfgen::GenerationRequest;

#[derive(Parser, Debug)]
#[command(
  name = "hfgen",
  version,
  about = "Generate text using Hugging Face models",
  after_help = display::FOOTER
)]
struct Cli
{   /// Your prompt; read from stdin when omitted
    prompt: Option<String>

  , /// Model to use (must be one of the configured models)
    #[arg(short, long)]
    model: Option<String>

  , /// Maximum number of new tokens to generate
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=2000))]
    max_new_tokens: Option<u32>

  , /// Controls randomness in generation
    #[arg(short, long, value_parser = parse_temperature)]
    temperature: Option<f32>

  , /// Backend provider that serves the request
    #[arg(long, conflicts_with = "no_provider")]
    provider: Option<String>

  , /// Use the service's default routing instead of a named provider
    #[arg(long)]
    no_provider: bool

  , /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>

  , /// TOML secrets file holding HF_TOKEN
    #[arg(long)]
    secrets: Option<PathBuf>

  , /// Check model access on the Hub before generating (logged only)
    #[arg(long)]
    probe: bool

  , /// Enable debug logging
    #[arg(short, long)]
    verbose: bool
}

fn parse_temperature(s: &str) -> Result<f32, String>
{   let value: f32 = s.parse()
      .map_err(|_| format!("'{}' is not a number", s))?;
    if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&value)
    {   return Err(format!(
          "must be between {:.1} and {:.1}",
          MIN_TEMPERATURE, MAX_TEMPERATURE
        ));
    }
    Ok(value)
}

#[tokio::main]
async fn main()
{   let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(
      env_logger::Env::default().default_filter_or(log_level)
    ).init();

    if dotenvy::dotenv().is_ok()
    {   debug!("Loaded .env file");
    }

    process::exit(run(cli).await);
}

async fn run(cli: Cli) -> i32
{   let config = match AppConfig::load(cli.config.as_deref())
    {   Ok(config) => config
      , Err(e) => {
          error!("Failed to load configuration: {}", e);
          eprint!("{}", display::render_config_error(&e));
          return 1;
        }
    };

    let secrets_path = cli.secrets.clone()
      .unwrap_or_else(|| config.secrets_path.clone());
    let credentials = match Credentials::resolve(&secrets_path)
    {   Ok(credentials) => credentials
      , Err(e) => {
          error!("{}", e);
          eprint!("{}", display::render_config_error(&e));
          return 1;
        }
    };

    let model = cli.model.clone()
      .unwrap_or_else(|| config.form.default_model().to_string());
    if !config.form.offers_model(&model)
    {   eprintln!(
          "❌ Unknown model '{}'. Available: {}",
          model,
          config.form.models.join(", ")
        );
        return 2;
    }

    let prompt = match cli.prompt.clone()
    {   Some(prompt) => prompt
      , None => {
          let mut buf = String::new();
          if let Err(e) = std::io::stdin().read_to_string(&mut buf)
          {   error!("Failed to read prompt from stdin: {}", e);
              return 1;
          }
          buf
        }
    };

    let mut request = GenerationRequest::new(prompt, &config.form)
      .with_model(model)
      .with_max_new_tokens(
        cli.max_new_tokens.unwrap_or(config.form.max_new_tokens)
      )
      .with_temperature(
        cli.temperature.unwrap_or(config.form.temperature)
      );
    if cli.no_provider
    {   request = request.with_provider(None);
    } else if cli.provider.is_some()
    {   request = request.with_provider(cli.provider.clone());
    }

    debug!("Token: {}", credentials.redacted());
    debug!("Model: {}", request.model);
    debug!("Provider: {}", request.provider_label());

    if cli.probe && request.validate().is_ok()
    {   probe_access(&credentials, &config.client, &request.model).await;
    }

    info!("Generating response...");
    let result = hfgen::generate(&request, &credentials, &config.client)
      .await;

    let rendered = display::render_result(&result, &request);
    if result.is_success()
    {   print!("{}", rendered);
        0
    } else
    {   eprint!("{}", rendered);
        1
    }
}

/// Logged only; never stops the real request
async fn probe_access(
  credentials: &Credentials
, settings: &ClientSettings
, model: &str
)
{   let outcome = match HfInferenceClient::new(credentials, settings)
    {   Ok(client) => client.probe_model_access(model).await
      , Err(e) => Err(e)
    };
    if let Err(e) = outcome
    {   warn!("Direct HF access failed: {}", e);
    }
}

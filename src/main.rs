use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use propval::client::PredictionClient;
use propval::config::AppConfig;
use propval::dataset::{KnownSuburbs, DEFAULT_SUBURB};
use propval::models::{FeatureRecord, PredictionResponse, PropertyType};
use propval::{api, PredictionService};

#[derive(Parser)]
#[command(name = "propval")]
#[command(about = "Property price prediction from a pre-trained model")]
struct Cli {
    /// Path to a JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the prediction form and JSON API
    Serve {
        #[command(flatten)]
        source: SourceArgs,

        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port for HTTP
        #[arg(short, long)]
        port: Option<u16>,

        /// Pass unknown suburbs and out-of-range values through to the model
        #[arg(long)]
        lenient: bool,
    },
    /// Predict the price of one property
    Predict {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        features: FeatureArgs,

        /// Ask a running server instead of loading the model locally
        /// (defaults to `PROPVAL_URL` when set)
        #[arg(long)]
        url: Option<String>,

        /// Print the prediction as JSON
        #[arg(long)]
        json: bool,

        /// Pass unknown suburbs and out-of-range values through to the model
        #[arg(long)]
        lenient: bool,
    },
    /// List the suburbs the model knows about
    Suburbs {
        #[command(flatten)]
        source: SourceArgs,

        /// Ask a running server instead of reading the dataset locally
        /// (defaults to `PROPVAL_URL` when set)
        #[arg(long)]
        url: Option<String>,
    },
    /// Show what the loaded model artifact contains
    Inspect {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Model artifact path
    #[arg(long)]
    model: Option<PathBuf>,

    /// Reference dataset path
    #[arg(long)]
    dataset: Option<PathBuf>,
}

impl SourceArgs {
    fn apply(self, config: &mut AppConfig) {
        if let Some(model) = self.model {
            config.model_path = model;
        }
        if let Some(dataset) = self.dataset {
            config.dataset_path = dataset;
        }
    }
}

#[derive(Args)]
struct FeatureArgs {
    /// Land size (m²)
    #[arg(long, default_value_t = 500.0)]
    landsize: f64,

    /// Building area (m²)
    #[arg(long, default_value_t = 150.0)]
    building_area: f64,

    #[arg(long, default_value_t = 3)]
    bedrooms: u32,

    #[arg(long, default_value_t = 2)]
    bathrooms: u32,

    /// Car spaces
    #[arg(long, default_value_t = 1)]
    car: u32,

    /// Property type: h (house), u (unit) or t (townhouse)
    #[arg(long = "type", default_value = "h")]
    property_type: PropertyType,

    #[arg(long, default_value = DEFAULT_SUBURB)]
    suburb: String,
}

impl From<FeatureArgs> for FeatureRecord {
    fn from(args: FeatureArgs) -> Self {
        FeatureRecord {
            landsize: args.landsize,
            property_type: args.property_type,
            bedroom2: args.bedrooms,
            suburb: args.suburb,
            car: args.car,
            bathroom: args.bathrooms,
            building_area: args.building_area,
        }
        .clamp()
    }
}

/// Client for `--url`, or for `PROPVAL_URL` when the flag is absent.
fn remote_client(url: Option<String>) -> Option<PredictionClient> {
    match url {
        Some(url) => Some(PredictionClient::new(url)),
        None => PredictionClient::from_env_if_set(),
    }
}

/// Initialize tracing with output to stderr (one-shot commands) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "propval=info,tower_http=debug".into()),
    );

    if use_stderr {
        // Keep stdout for command output
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn load_service(config: &AppConfig) -> anyhow::Result<PredictionService> {
    let service = PredictionService::initialize(&config.model_path, &config.dataset_path)
        .context("Failed to initialize prediction service")?;
    Ok(service.with_strict_validation(config.strict_validation))
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let service = load_service(&config)?;
    let app = api::create_router(Arc::new(service));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!("propval listening on http://{}", address);

    axum::serve(listener, app).await?;
    Ok(())
}

fn print_prediction(response: &PredictionResponse, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
    } else {
        println!("Estimated Property Price: {}", response.formatted);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let use_stderr = !matches!(cli.command, None | Some(Commands::Serve { .. }));
    init_tracing(use_stderr);

    let mut config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Serve {
            source,
            host,
            port,
            lenient,
        }) => {
            source.apply(&mut config);
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if lenient {
                config.strict_validation = false;
            }
            serve(config).await?;
        }
        Some(Commands::Predict {
            source,
            features,
            url,
            json,
            lenient,
        }) => {
            let record = FeatureRecord::from(features);
            let response = match remote_client(url) {
                Some(client) => client.predict(&record).await?,
                None => {
                    source.apply(&mut config);
                    if lenient {
                        config.strict_validation = false;
                    }
                    let price = load_service(&config)?.predict(&record)?;
                    PredictionResponse::from_price(price)
                }
            };
            print_prediction(&response, json)?;
        }
        Some(Commands::Suburbs { source, url }) => {
            let suburbs = match remote_client(url) {
                Some(client) => client.list_suburbs().await?,
                None => {
                    source.apply(&mut config);
                    KnownSuburbs::load(&config.dataset_path)?
                        .as_slice()
                        .to_vec()
                }
            };
            for suburb in suburbs {
                println!("{}", suburb);
            }
        }
        Some(Commands::Inspect { source }) => {
            source.apply(&mut config);
            let service = load_service(&config)?;
            println!("{}", serde_json::to_string_pretty(service.model_info())?);
        }
        None => serve(config).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(args: &[&str]) -> FeatureRecord {
        let mut argv = vec!["propval", "predict"];
        argv.extend_from_slice(args);
        match Cli::parse_from(argv).command {
            Some(Commands::Predict { features, .. }) => features.into(),
            _ => panic!("expected predict command"),
        }
    }

    #[test]
    fn predict_defaults_match_the_form() {
        assert_eq!(features(&[]), FeatureRecord::form_defaults(DEFAULT_SUBURB));
    }

    #[test]
    fn predict_arguments_are_clamped() {
        let record = features(&[
            "--landsize",
            "20000",
            "--building-area=-5",
            "--bedrooms",
            "12",
            "--type",
            "u",
            "--suburb",
            "Carlton",
        ]);

        assert_eq!(record.landsize, 10_000.0);
        assert_eq!(record.building_area, 0.0);
        assert_eq!(record.bedroom2, 10);
        assert_eq!(record.property_type, PropertyType::Unit);
        assert_eq!(record.suburb, "Carlton");
    }

    #[test]
    fn explicit_url_wins() {
        let client = remote_client(Some("http://example.test:9000/api/v1/".into()));
        assert_eq!(
            client.map(|c| c.base_url().to_string()),
            Some("http://example.test:9000/api/v1".to_string())
        );
    }
}

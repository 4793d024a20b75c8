//! Raffle-Ticket PIX Checkout
//!
//! A terminal checkout counter that prices a ticket selection, opens a PIX
//! transaction and waits for it to settle.

mod config;
mod render;
mod shutdown;

use clap::Parser;
use compact_str::CompactString;
use config::ConfigLoader;
use render::watch_until_terminal;
use rpix_core::entities::ContactInfo;
use rpix_core::events::CheckoutState;
use rpix_core::processors::{AttributionSink, CheckoutSession};
use rpix_sdk::client::{AttributionClient, GatewayClient};
use rpix_sdk::objects::TrackingParameters;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

/// Raffle-ticket PIX checkout counter
#[derive(Parser, Debug)]
#[command(name = "rpix")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./rpix-config.toml")]
    config: PathBuf,

    /// Override the gateway base URL (e.g. a sandbox endpoint)
    #[arg(long)]
    gateway_url: Option<Url>,

    /// Ticket quantity, snapped into the catalog ladder
    #[arg(short, long)]
    quantity: Option<u32>,

    /// Add an order bump by id (repeatable)
    #[arg(long = "add-on")]
    add_ons: Vec<String>,

    /// Buyer name
    #[arg(long)]
    name: String,

    /// Buyer email
    #[arg(long)]
    email: String,

    /// Buyer phone
    #[arg(long)]
    phone: String,

    /// UTM source tag reported to the attribution service
    #[arg(long)]
    utm_source: Option<String>,

    /// UTM medium tag
    #[arg(long)]
    utm_medium: Option<String>,

    /// UTM campaign tag
    #[arg(long)]
    utm_campaign: Option<String>,

    /// UTM content tag
    #[arg(long)]
    utm_content: Option<String>,

    /// UTM term tag
    #[arg(long)]
    utm_term: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting rpix v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = ConfigLoader::new(&args.config, args.gateway_url.clone());
    let config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    tracing::info!("Configuration loaded from {:?}", args.config);

    // Build the service clients over one pooled HTTP client. The total
    // timeout bounds how long a create call can hold the session in
    // Submitting.
    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new());
    let gateway = Arc::new(
        GatewayClient::new(
            config.gateway.url.clone(),
            config.gateway.api_key.as_str(),
            config.gateway.api_secret.as_str(),
        )
        .with_http_client(http.clone()),
    );
    let attribution = match &config.attribution {
        Some(attribution) => AttributionSink::new(Arc::new(
            AttributionClient::new(attribution.url.clone(), attribution.api_token.as_str())
                .with_http_client(http),
        )),
        None => {
            tracing::info!("No attribution endpoint configured, order reporting disabled");
            AttributionSink::disabled()
        }
    };

    // Spawn the checkout session; the renderer keeps its own catalog copy.
    let catalog = config.catalog.clone();
    let (session, handle) = CheckoutSession::new(
        config.catalog,
        config.merchant,
        config.checkout,
        gateway,
        attribution,
        tracking_from_args(&args),
    );
    let session_task = tokio::spawn(session.run());

    // Drive the scripted buyer: selection first, then contact, then submit.
    if let Some(quantity) = args.quantity {
        handle.set_quantity(quantity).await?;
    }
    for add_on in &args.add_ons {
        handle.toggle_add_on(add_on.as_str()).await?;
    }
    handle
        .set_contact(ContactInfo::new(args.name, args.email, args.phone))
        .await?;
    handle.submit().await?;

    // Render until the checkout settles, or bail out on a signal.
    let exit = tokio::select! {
        state = watch_until_terminal(handle.snapshots(), &catalog) => exit_code_for(state),
        () = shutdown::shutdown_signal() => {
            let _ = handle.close().await;
            ExitCode::from(130)
        }
    };

    drop(handle);
    let _ = session_task.await;

    Ok(exit)
}

fn exit_code_for(state: CheckoutState) -> ExitCode {
    match state {
        CheckoutState::Approved => ExitCode::SUCCESS,
        CheckoutState::Failed | CheckoutState::Expired => ExitCode::from(1),
        // A validation refusal; the scripted buyer cannot edit the form.
        _ => ExitCode::from(2),
    }
}

/// Build tracking parameters from the UTM flags, with "direct" fallbacks.
fn tracking_from_args(args: &Args) -> TrackingParameters {
    let tag = |value: &Option<String>| {
        value
            .as_deref()
            .map(CompactString::from)
            .unwrap_or_else(|| CompactString::const_new("direct"))
    };
    TrackingParameters {
        utm_source: tag(&args.utm_source),
        utm_medium: tag(&args.utm_medium),
        utm_campaign: tag(&args.utm_campaign),
        utm_content: tag(&args.utm_content),
        utm_term: tag(&args.utm_term),
    }
}

/// Initialize the tracing subscriber with environment-based filtering.
///
/// Logs go to stderr so stdout stays clean for the PIX code.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

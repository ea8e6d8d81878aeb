//! otpc
//!
//! Terminal front end for an OTP-gated checkout: verifies the customer's
//! phone or email, then takes the payment through the gateway widget.

mod checkout;
mod config;
mod prompt;
mod render;
mod signals;
mod widget;

use std::path::PathBuf;

use checkout::{Driver, Outcome};
use clap::Parser;
use config::runtime::WidgetSettings;
use config::{ConfigLoader, Overrides};
use otpc_core::events::flow_event_channel;
use otpc_core::{CheckoutOtpFlow, FlowSettings, PaymentWidget};
use otpc_sdk::client::CheckoutClient;
use prompt::Prompt;
use render::OutputFormat;
use signals::{WidgetStep, spawn_interrupt_handler};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;
use widget::{SimulatedWidget, TerminalWidget};

/// OTP-gated checkout from the terminal
#[derive(Parser, Debug)]
#[command(name = "otpc")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./otpc.toml")]
    config: PathBuf,

    /// Override the backend base URL (e.g., http://localhost:5000)
    #[arg(long, env = "OTPC_BASE_URL")]
    base_url: Option<Url>,

    /// Complete payments with a locally signed test payment
    #[arg(long, default_value = "false")]
    simulate: bool,

    /// How flow events are printed on stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    tracing::info!("Starting otpc v{}", env!("CARGO_PKG_VERSION"));

    let config_loader = ConfigLoader::new(
        &args.config,
        Overrides {
            base_url: args.base_url.clone(),
            simulate: args.simulate,
        },
    );
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    tracing::info!("Configuration loaded from {:?}", args.config);

    let backend = loaded_config.backend;
    let client = CheckoutClient::new(backend.base_url.clone(), backend.timeout)
        .map_err(|e| {
            tracing::error!("Failed to build HTTP client: {}", e);
            e
        })?
        .with_endpoints(backend.endpoints);
    tracing::info!("Using backend at {}", backend.base_url);

    let prompt = Prompt::stdin();
    let outcome = match loaded_config.widget {
        WidgetSettings::Terminal => {
            let widget = TerminalWidget::new(prompt.clone());
            run_checkout(client, widget, loaded_config.flow, &prompt, args.output).await?
        }
        WidgetSettings::Simulated { key_secret } => {
            tracing::warn!("Simulated widget enabled; payments are signed locally");
            let widget = SimulatedWidget::new(key_secret);
            run_checkout(client, widget, loaded_config.flow, &prompt, args.output).await?
        }
    };

    match outcome {
        Outcome::Paid {
            payment_id,
            redirect,
        } => {
            tracing::info!(%payment_id, "Checkout complete, continuing at {}", redirect);
            Ok(())
        }
        Outcome::GaveUp => {
            eprintln!("Checkout not completed.");
            std::process::exit(1);
        }
    }
}

async fn run_checkout<W: PaymentWidget>(
    client: CheckoutClient,
    widget: W,
    settings: FlowSettings,
    prompt: &Prompt,
    format: OutputFormat,
) -> anyhow::Result<Outcome> {
    let (tx, rx) = flow_event_channel();
    let mut flow = CheckoutOtpFlow::new(client, widget, settings).with_events(tx);

    let widget_step = WidgetStep::default();
    let shutdown_notify = spawn_interrupt_handler(flow.canceller(), widget_step.clone());

    let mut driver = Driver {
        prompt,
        events: rx,
        format,
        widget_step,
    };
    let result = driver.run(&mut flow).await;

    shutdown_notify.notify_one();
    tracing::debug!(session_id = %flow.session().id(), "Checkout session finished");

    result
}

/// Initialize the tracing subscriber with environment-based filtering.
///
/// Logs go to stderr; stdout is reserved for flow events.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,otpc_cli=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

use std::path::PathBuf;
use std::time::Duration;

use showme::subscriptions::commands;
use showme::{TerminalPresenter, ToastConfig, service};
use showme_config::CONFIG_ENV;
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = load_config();
    info!("starting showme with {config:?}");
    let exit_transition = Duration::from_millis(u64::from(config.exit_transition_ms));

    let (client, service) = service(config, |tx| {
        TerminalPresenter::new(std::io::stderr()).with_exit_transitions(tx, exit_transition)
    });

    let stdin = BufReader::new(tokio::io::stdin());
    let (_, result) = tokio::join!(
        service.run(),
        commands::run(client, stdin, tokio::io::stdout())
    );
    result
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    #[cfg(feature = "systemd")]
    let journald = tracing_journald::layer().ok();
    #[cfg(not(feature = "systemd"))]
    let journald: Option<tracing_subscriber::layer::Identity> = None;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(journald)
        .init();
}

/// Config file from the first argument or `$SHOWME_CONFIG`, defaults otherwise.
fn load_config() -> ToastConfig {
    let Some(path) = std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os(CONFIG_ENV))
        .map(PathBuf::from)
    else {
        return ToastConfig::default();
    };

    match ToastConfig::load(&path) {
        Ok(config) => config,
        Err(err) => {
            warn!("Failed to load config from {}: {err}, using defaults", path.display());
            ToastConfig::default()
        }
    }
}

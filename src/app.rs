use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::application::PayrollBatchUseCase;
use crate::domain::error::Result;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::mailer::SmtpMailer;
use crate::infrastructure::pdf::ReceiptRenderer;
use crate::infrastructure::security::CredentialStore;
use crate::interfaces::http::{start_server, HttpState};

pub async fn run() -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config = AppConfig::load().map_err(|err| {
        error!(error = %err, "Failed to load configuration");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string())
    })?;

    let state = build_state(&config).map_err(|err| {
        error!(error = %err, "Failed to initialise payroll service");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string())
    })?;

    if state.credentials.is_empty() {
        error!("No API users configured; every /process request will be rejected");
    }

    info!(
        host = %config.bind_host,
        port = config.bind_port,
        smtp_host = %config.smtp_host,
        "Starting payroll API"
    );

    start_server(
        state,
        config.assets_dir.clone(),
        (config.bind_host.clone(), config.bind_port),
    )?
    .await
}

pub fn build_state(config: &AppConfig) -> Result<HttpState> {
    let mailer = SmtpMailer::new(&config.smtp())?;
    let payroll = PayrollBatchUseCase::new(
        Arc::new(ReceiptRenderer::new()),
        Arc::new(mailer),
        config.validation_policy()?,
    );

    Ok(HttpState {
        payroll: Arc::new(payroll),
        credentials: CredentialStore::from_lists(&config.users, &config.passwords),
        max_upload_bytes: config.max_upload_bytes,
    })
}

use clap::Parser;
use notecraft_node::{
    api,
    config::Config,
    extractors::{ExtractorRegistry, TesseractOcr},
    prompts::PromptBuilder,
    services::{OpenAiClient, ProcessingService},
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notecraft_node=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();
    config.validate()?;

    info!("Starting notecraft-node server");
    info!(
        model = %config.model,
        base_url = %config.base_url,
        max_upload_bytes = config.max_upload_bytes,
        max_prompt_chars = config.max_prompt_chars,
        "configuration loaded"
    );

    let llm = OpenAiClient::new(config.llm_settings())?;
    let ocr = TesseractOcr::new(config.tesseract_bin.clone(), config.ocr_lang.clone());
    let service = ProcessingService::new(
        ExtractorRegistry::new(Arc::new(ocr), config.extraction_timeout()),
        PromptBuilder::new(config.max_prompt_chars),
        Arc::new(llm),
        config.llm_timeout(),
    );

    let app = api::create_router(api::AppState::new(service, config.max_upload_bytes));

    info!("Server listening on {}", config.listen);

    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

use std::sync::Arc;

use workout_extractor::{
    config::Config, extract::Extractor, ollama::OllamaClient, server, youtube::YoutubeClient,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::from_env();

    let youtube = Arc::new(YoutubeClient::new(config.insecure_ssl)?);
    let ollama = OllamaClient::new(
        config.ollama_url.as_str(),
        config.ollama_model.as_str(),
        config.ollama_timeout,
    )?;
    tracing::info!(url = %config.ollama_url, model = ollama.model(), "using Ollama");

    let extractor = Extractor::new(youtube.clone(), youtube, Arc::new(ollama));
    let app = server::router(extractor);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

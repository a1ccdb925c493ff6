use tracing_subscriber::EnvFilter;

use crate::{error, info, server, warning};

const DEFAULT_LOG_FILTER: &str = "moodmix=info,tower_http=info";

pub async fn serve(addr: Option<String>, open: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let mut config = super::load_config();
    if let Some(addr) = addr {
        if config.public_base_url == format!("http://{}", config.server_addr) {
            config.public_base_url = format!("http://{addr}");
            config.spotify_redirect_uri = format!("{}/api/auth/callback", config.public_base_url);
        }
        config.server_addr = addr;
    }

    info!("Serving moodmix on {}", config.public_base_url);
    if open {
        if let Err(e) = webbrowser::open(&config.public_base_url) {
            warning!("Could not open browser. Err: {}", e);
        }
    }

    if let Err(e) = server::start_api_server(config).await {
        error!("Server stopped. Err: {}", e);
    }
}

use crate::{config::Settings, error, info, server::start_api_server};

pub async fn serve(mut settings: Settings, addr: Option<String>) {
    if let Some(addr) = addr {
        settings.server_address = addr;
    }

    info!("Starting Clouder API on {}", settings.server_address);

    if let Err(e) = start_api_server(settings).await {
        error!("Server stopped. Err: {}", e);
    }
}

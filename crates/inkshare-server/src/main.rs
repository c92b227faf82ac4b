//! InkShare persistence server binary.

use inkshare_core::{BlobStore, FileBlobStore};
use inkshare_server::{AppState, ServerConfig, create_router};
use std::error::Error;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkshare_server=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let blobs = match &config.data_dir {
        Some(dir) => FileBlobStore::new(dir.clone(), config.public_url.clone())?,
        None => FileBlobStore::default_location(config.public_url.clone())?,
    };
    info!("Storing uploads in {}", blobs.base_path().display());
    let blobs: Arc<dyn BlobStore> = Arc::new(blobs);

    let state = Arc::new(AppState::new(blobs));
    let app = create_router(state, &config);

    info!("InkShare server listening on {}", config.addr);
    info!("Uploads served at {}", config.public_url);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

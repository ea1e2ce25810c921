//! Albumview
//!
//! Entry point: sets up logging, initializes GTK/Libadwaita and runs the
//! application main loop.

use {
    albumview::ui::AlbumViewApplication,
    tracing_subscriber::{EnvFilter, fmt},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    AlbumViewApplication::init_toolkit()?;

    let app = AlbumViewApplication::new().await?;
    app.run();

    Ok(())
}

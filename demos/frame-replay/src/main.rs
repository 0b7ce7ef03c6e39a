//! Replays a frame capture through the synchronizer.
//!
//! A capture is a file of `u32` little-endian length-prefixed frames, each
//! a complete frame with its header. Every event is printed as one JSON
//! line on stdout, followed by a summary of the caches.
//!
//! ```text
//! frame-replay capture.bin [config.json]
//! RUST_LOG=steamsync=debug frame-replay capture.bin
//! ```

use std::error::Error;

use steamsync::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: frame-replay <capture> [config.json]");
        std::process::exit(2);
    };
    let config = match args.next() {
        Some(config_path) => {
            let text = tokio::fs::read_to_string(&config_path).await?;
            serde_json::from_str(&text)?
        }
        None => ClientConfig::default(),
    };

    let file = tokio::fs::File::open(&path).await?;
    let conn = StreamConnection::new(file, config.decode.max_frame_len);
    let client = SocialClient::new(conn, config);
    let mut events = client.social().subscribe();

    tracing::info!(%path, "replaying capture");
    let reason = client.run().await?;

    for event in events.drain() {
        println!("{}", serde_json::to_string(&event)?);
    }

    let social = client.social();
    tracing::info!(
        ?reason,
        friends = social.friends().count(),
        groups = social.groups().count(),
        persona = %social.persona_name(),
        "replay finished"
    );
    println!("{}", serde_json::to_string(&social.stats())?);
    Ok(())
}

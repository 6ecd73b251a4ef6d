//! Thin CLI entrypoint: build a `Scavenger` from an optional config file,
//! pull results until the pipeline finishes, print them and exit.

use std::path::PathBuf;

use scavenger::builder::ScavengerBuilder;
use scavenger::config::ScavengerFileConfig;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);

    let builder = match config_path {
        Some(path) => match ScavengerFileConfig::load(&path) {
            Ok(file_config) => file_config.apply(ScavengerBuilder::new()),
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to load config, using defaults");
                ScavengerBuilder::new()
            }
        },
        None => ScavengerBuilder::new(),
    };

    let mut scavenger = match builder.build().await {
        Ok(scavenger) => scavenger,
        Err(e) => {
            error!(error = %e, "failed to start scavenger pipeline");
            std::process::exit(1);
        }
    };

    info!(
        author = scavenger.result_author(),
        id = scavenger.result_image_id(),
        "first flagged image"
    );

    loop {
        if scavenger.has_next_result() {
            if let Err(e) = scavenger.load_next_result() {
                error!(error = %e, "unexpected error loading next result");
                break;
            }
            info!(
                author = scavenger.result_author(),
                id = scavenger.result_image_id(),
                details = scavenger.result_details(),
                "flagged image"
            );
        } else if scavenger.is_finished() {
            break;
        } else {
            tokio::select! {
                _ = tokio::time::sleep(std::time::Duration::from_millis(100)) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("ctrl-c received, shutting down");
                    break;
                }
            }
        }
    }

    scavenger.print_results_and_exit();
}

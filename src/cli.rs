use clap::{Parser, Subcommand};
use std::sync::Arc;

/// Top-level CLI interface for cropmind
#[derive(Parser)]
#[command(
    name = "cropmind",
    version = "0.1.0",
    about = "Crop advisory web service"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the HTTP API (auth, prediction, weather, forum, health endpoints)
    Serve {
        /// Host/IP to bind; overrides the configured value
        #[arg(long)]
        host: Option<String>,
        /// Port to bind; overrides the configured value
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run one offline prediction from seven measurements
    /// (N P K temperature humidity pH rainfall)
    Predict {
        #[arg(num_args = 7, value_name = "VALUE")]
        values: Vec<f64>,
    },
}

pub fn dispatch(cli: Cli) {
    match cli.command {
        Commands::Serve { host, port } => {
            let config = match crate::config_loader::load_config() {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Failed to load config: {e}");
                    return;
                }
            };

            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{host}:{port}");

            let state = Arc::new(crate::app_state::AppState::new(config));
            if state.artifacts.is_none() {
                eprintln!("Warning: prediction artifacts missing; /api/predict will be unavailable");
            }
            let app = crate::advisorweb::build_router(state);

            let rt = match tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    eprintln!("Failed to build Tokio runtime: {e}");
                    return;
                }
            };

            rt.block_on(async move {
                let socket_addr: std::net::SocketAddr = match addr.parse() {
                    Ok(a) => a,
                    Err(e) => {
                        eprintln!("Invalid bind address {addr}: {e}");
                        return;
                    }
                };
                match tokio::net::TcpListener::bind(socket_addr).await {
                    Ok(listener) => {
                        println!("HTTP server listening on http://{addr}");
                        if let Err(e) = axum::serve(listener, app).await {
                            eprintln!("Server error: {e}");
                        }
                    }
                    Err(e) => eprintln!("Failed to bind {addr}: {e}"),
                }
            });
        }
        Commands::Predict { values } => {
            let config = match crate::config_loader::load_config() {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Failed to load config: {e}");
                    return;
                }
            };

            let artifacts = match crate::model_artifacts::load_artifacts(std::path::Path::new(
                &config.model_dir,
            )) {
                Ok(artifacts) => artifacts,
                Err(e) => {
                    eprintln!("Failed to load model artifacts: {e}");
                    return;
                }
            };

            let features = match crate::feature_pipeline::FeatureVector::from_slice(&values) {
                Ok(features) => features,
                Err(e) => {
                    eprintln!("Invalid features: {e}");
                    return;
                }
            };

            match artifacts.predict_crop(&features) {
                Some(crop) => println!("Recommended crop: {crop}"),
                None => println!("No crop recommendation could be made for these measurements"),
            }
        }
    }
}

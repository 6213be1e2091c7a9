use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use image_transcoder::config::PipelineConfig;
use image_transcoder::infrastructure::storage;
use image_transcoder::models::Request;
use image_transcoder::{AppState, build_pipeline, create_app};
use std::io::Read;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process a single event and print the result
    Invoke {
        /// Event JSON, e.g. '{"image": "https://...", "bucket": "..."}'. Read from stdin when omitted
        #[arg(long, conflicts_with_all = ["image", "bucket"])]
        event: Option<String>,

        /// Source image URL
        #[arg(long, requires = "bucket")]
        image: Option<String>,

        /// Destination bucket
        #[arg(long, requires = "image")]
        bucket: Option<String>,
    },
    /// Accept events over HTTP on POST /invoke
    Serve {
        /// Port for the HTTP listener (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn read_event(
    event: Option<String>,
    image: Option<String>,
    bucket: Option<String>,
) -> anyhow::Result<Request> {
    if let (Some(image), Some(bucket)) = (image, bucket) {
        return Ok(Request::new(image, bucket));
    }

    let raw = match event {
        Some(raw) => raw,
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read event from stdin")?;
            raw
        }
    };

    if raw.trim().is_empty() {
        bail!("no event given: pass --event, --image/--bucket or JSON on stdin");
    }
    serde_json::from_str(&raw).context("event must look like {\"image\": ..., \"bucket\": ...}")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment & Logging Setup
    dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "image_transcoder=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // 2. Process-wide configuration and storage client; failures here are fatal
    let config = PipelineConfig::from_env();
    info!(
        "🗂️  Staging: dir={}, keep files={}",
        config.staging_dir.display(),
        config.keep_staging_files
    );

    let storage_service = storage::setup_storage(&config)
        .await
        .context("storage client setup failed")?;
    let pipeline = Arc::new(build_pipeline(&config, storage_service)?);

    match args.command {
        Command::Invoke {
            event,
            image,
            bucket,
        } => {
            let req = read_event(event, image, bucket)?;
            let token = pipeline.handle(&req).await?;
            println!("{}", token);
            Ok(())
        }
        Command::Serve { port } => {
            let state = AppState::new(pipeline);

            let trace_layer = TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                })
                .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
                    info!("📥 {} {}", request.method(), request.uri());
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        info!(
                            "📤 Finished in {:?} with status {}",
                            latency,
                            response.status()
                        );
                    },
                );

            let app = create_app(state).layer(trace_layer);
            let addr = SocketAddr::from(([0, 0, 0, 0], port.unwrap_or(config.port)));
            let listener = tokio::net::TcpListener::bind(addr).await?;

            info!("✅ Listening for invocations on http://{}/invoke", addr);

            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            info!("🛑 Server shut down gracefully.");
            Ok(())
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("⌨️  Ctrl+C received, starting graceful shutdown...");
        },
        _ = terminate => {
            info!("💤 SIGTERM received, starting graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_from_flags() {
        let req = read_event(
            None,
            Some("https://example.com/a.jpg".to_string()),
            Some("out".to_string()),
        )
        .unwrap();
        assert_eq!(req, Request::new("https://example.com/a.jpg", "out"));
    }

    #[test]
    fn test_event_from_json() {
        let req = read_event(
            Some(r#"{"image": "https://example.com/b.jpg", "bucket": "thumbs"}"#.to_string()),
            None,
            None,
        )
        .unwrap();
        assert_eq!(req.bucket_name, "thumbs");
    }

    #[test]
    fn test_malformed_event() {
        assert!(read_event(Some("{}".to_string()), None, None).is_err());
        assert!(read_event(Some("  ".to_string()), None, None).is_err());
    }

    #[test]
    fn test_cli_parses() {
        let args = Args::try_parse_from(["image-transcoder", "serve", "--port", "8080"]).unwrap();
        assert!(matches!(args.command, Command::Serve { port: Some(8080) }));

        assert!(Args::try_parse_from(["image-transcoder", "invoke", "--image", "x"]).is_err());
    }
}

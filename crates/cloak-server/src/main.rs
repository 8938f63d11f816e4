//! Cloak: PII detection, abstraction and redaction server.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use cloak_core::CloakConfig;
use cloak_redact::{HttpImageRedactor, RedactionJob, RedactionOutcome};
use cloak_server::{build_http_client, build_router, AppState};

async fn redact_pdf(config: &CloakConfig, input: PathBuf, output: PathBuf) -> anyhow::Result<i32> {
    let http = build_http_client(config)?;
    let mut job = RedactionJob::new(
        cloak_redact::create_rasterizer(),
        Arc::new(HttpImageRedactor::new(http, &config.redact_url)),
    );

    match job.run(&input, &output).await? {
        RedactionOutcome::Written {
            path,
            pages,
            dropped,
        } => {
            println!(
                "Redacted PDF saved to '{}' ({} page(s), {} dropped)",
                path.display(),
                pages.len(),
                dropped.len()
            );
            for failure in dropped {
                println!("  page {} dropped: {}", failure.page, failure.reason);
            }
            Ok(0)
        }
        RedactionOutcome::NoOutput { dropped } => {
            println!("No images were redacted ({} page(s) failed).", dropped.len());
            Ok(2)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    // Handle CLI subcommands
    if args.len() > 1 {
        match args[1].as_str() {
            "redact-pdf" => {
                if args.len() < 4 {
                    eprintln!("Usage: cloak redact-pdf <input.pdf> <output.pdf>");
                    std::process::exit(1);
                }
                let config = CloakConfig::load()?;
                let input = PathBuf::from(&args[2]);
                let output = PathBuf::from(&args[3]);
                let code = match redact_pdf(&config, input, output).await {
                    Ok(code) => code,
                    Err(e) => {
                        eprintln!("Redaction failed: {}", e);
                        1
                    }
                };
                std::process::exit(code);
            }
            "--help" | "-h" | "help" => {
                println!("Cloak: PII detection, abstraction and redaction server");
                println!();
                println!("Usage: cloak [command]");
                println!();
                println!("Commands:");
                println!("  (none)                        Start the server");
                println!("  redact-pdf <input> <output>   Redact a scanned PDF page by page");
                println!("  help                          Show this help message");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'cloak help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    // Normal server startup
    let config = CloakConfig::load()?;
    let port = config.port;
    info!(
        "Inference at {}, analyzer at {}, anonymizer at {}, segment length {}",
        config.inference_url, config.analyze_url, config.anonymize_url, config.max_segment_length
    );

    let http = build_http_client(&config)?;
    let state = Arc::new(AppState::new(config, http));
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Cloak server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

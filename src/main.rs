use std::io;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use mood_recommender::{
    app::{self, ComponentRegistry, build_router},
    chat,
    cli::{Cli, Command},
    config::Config,
    observability::Telemetry,
    query::render_reply,
};

fn main() -> anyhow::Result<()> {
    std::panic::set_hook(Box::new(|panic_info| {
        let thread = std::thread::current();
        let thread_name = thread.name().unwrap_or("unnamed");
        let message = panic_info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| {
                panic_info
                    .payload()
                    .downcast_ref::<String>()
                    .map(String::as_str)
            })
            .unwrap_or("unknown panic payload");

        if let Some(location) = panic_info.location() {
            error!(
                thread = thread_name,
                file = location.file(),
                line = location.line(),
                column = location.column(),
                message,
                "panic occurred"
            );
        } else {
            error!(
                thread = thread_name,
                message, "panic occurred without location information"
            );
        }
    }));

    let cli = Cli::parse();
    let config = cli.apply(Config::from_env().context("failed to load configuration")?);

    match cli.command {
        Command::Enrich { input, output } => {
            let output = output.unwrap_or_else(|| config.catalog_path().clone());
            let telemetry = Telemetry::new()?;
            let pipeline = app::build_enrichment_pipeline(&config, &telemetry)
                .context("failed to build enrichment pipeline")?;
            let summary = pipeline
                .run(&input, &output)
                .with_context(|| format!("failed to enrich {}", input.display()))?;
            println!(
                "{} movies enriched ({} without emotion) -> {}",
                summary.rows,
                summary.unlabeled,
                output.display()
            );
        }
        Command::Ask { utterance } => {
            let registry = build_registry(config)?;
            match registry.engine().answer(&utterance.join(" ")) {
                Some(answer) => println!("{}", render_reply(&answer)),
                None => warn!("blank utterance, nothing to answer"),
            }
        }
        Command::Chat => {
            let registry = build_registry(config)?;
            let answered = chat::run_chat(registry.engine(), io::stdin().lock(), io::stdout())
                .context("chat session failed")?;
            info!(answered, "chat session ended");
        }
        Command::Serve { .. } => {
            let bind_addr = config.http_bind();
            // Built outside the runtime: the blocking HTTP clients must not be
            // created or dropped on an async worker.
            let registry = Arc::new(build_registry(config)?);
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("failed to start tokio runtime")?;
            runtime.block_on(serve(Arc::clone(&registry), bind_addr))?;
            drop(runtime);
            drop(registry);
        }
        Command::Labels => {
            let registry = build_registry(config)?;
            for (label, count) in registry.index().labels() {
                println!(
                    "{} {label}: {count}",
                    mood_recommender::emotion::glyph_for(label)
                );
            }
        }
    }

    Ok(())
}

fn build_registry(config: Config) -> anyhow::Result<ComponentRegistry> {
    ComponentRegistry::build(config).context("failed to build component registry")
}

async fn serve(registry: Arc<ComponentRegistry>, bind_addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let router = build_router(registry);

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind listener on {bind_addr}"))?;

    info!(%bind_addr, "listening");

    if let Err(error) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        warn!(error = %error, "server exited with error");
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use tokio::{signal, sync::broadcast};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use traycal::cli::{Cli, Commands, GridArgs, OutputFormat};
use traycal::output::{format_output, Render};
use traycal::sources::{DemoSource, JsonFileSource};
use traycal::{Config, EventCache, EventCacheConfig, MonthGrid, MonthView};
use traycal_core::source::CalendarSource;

/// How often `watch` checks whether the day changed.
const TICK_INTERVAL: std::time::Duration = std::time::Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output stays parseable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "traycal=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = cli.apply(Config::from_env());
    tracing::debug!(?config, "Configuration loaded");

    let source: Arc<dyn CalendarSource> = match &config.events_file {
        Some(path) => {
            tracing::info!(path = %path.display(), "Using JSON event store");
            Arc::new(JsonFileSource::new(path))
        }
        None => {
            tracing::info!("No event store configured, using demo calendars");
            Arc::new(DemoSource::new())
        }
    };
    source.setup().await?;

    match &cli.command {
        Commands::Calendars => {
            let calendars = source.list_calendars().await?;
            print(&calendars, cli.format)?;
        }
        Commands::Show(args) => {
            let view = month_view(source, &config, args)?;
            // The first pass only starts the fetches.
            view.refresh();
            view.cache().wait_idle().await;
            print(&view.refresh(), cli.format)?;
        }
        Commands::Watch(args) => {
            let view = month_view(source, &config, args)?;
            watch(view, cli.format).await;
        }
    }

    Ok(())
}

fn month_view(
    source: Arc<dyn CalendarSource>,
    config: &Config,
    args: &GridArgs,
) -> Result<MonthView> {
    let cache = EventCache::new(
        source,
        EventCacheConfig {
            fetch_timeout: config.fetch_timeout(),
        },
    )?;
    let today = Local::now().date_naive();
    let view = MonthView::new(cache, today, config.week_start, config.row_capacity);
    Ok(match args.month {
        Some(month) => view.with_month(month),
        None => view,
    })
}

fn print<T: Render>(value: &T, format: OutputFormat) -> Result<()> {
    println!("{}", format_output(value, format)?);
    Ok(())
}

/// Prints a grid while watching; a failed print is logged, not fatal.
fn print_grid(grid: &MonthGrid, format: OutputFormat) {
    match format_output(grid, format) {
        Ok(output) if format == OutputFormat::Pretty => println!("{}\n", output),
        Ok(output) => println!("{}", output),
        Err(err) => tracing::error!(error = %err, "Failed to format month grid"),
    }
}

/// Prints the grid whenever a month finishes fetching or the day changes,
/// until Ctrl+C or SIGTERM.
async fn watch(mut view: MonthView, format: OutputFormat) {
    let mut updates = view.cache().subscribe();
    let mut ticks = tokio::time::interval(TICK_INTERVAL);
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    print_grid(&view.refresh(), format);

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Ok(update) => {
                    tracing::debug!(month = %update.month, "Cache updated");
                    print_grid(&view.refresh(), format);
                }
                Err(broadcast::error::RecvError::Lagged(_)) => {
                    print_grid(&view.refresh(), format);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            _ = ticks.tick() => {
                if let Some(grid) = view.tick(Local::now().naive_local()).await {
                    print_grid(&grid, format);
                }
            }
            _ = &mut shutdown => break,
        }
    }

    view.cache().wait_idle().await;
    tracing::info!("Stopped watching");
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}

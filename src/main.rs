mod cli;

use cli::{CliOptions, OutputFormat};
use log::{error, info, warn};
use rlex_status::config::Config;
use rlex_status::{FetchError, MemorySurface, StatusFetcher, StatusView, TerminalSurface};
use std::io::{self, Write};
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Where a fetched snapshot ends up.
enum Output<W: Write> {
    Text(StatusView<TerminalSurface<W>>),
    Json {
        view: StatusView<MemorySurface>,
        out: W,
    },
}

impl<W: Write> Output<W> {
    fn new(format: OutputFormat, out: W) -> Self {
        match format {
            OutputFormat::Text => Output::Text(StatusView::new(TerminalSurface::new(out))),
            OutputFormat::Json => Output::Json {
                view: StatusView::new(MemorySurface::new()),
                out,
            },
        }
    }

    async fn refresh(&mut self, fetcher: &StatusFetcher) -> Result<(), FetchError> {
        match self {
            Output::Text(view) => fetcher.fetch_and_render(view).await,
            Output::Json { view, out } => {
                let status = fetcher.fetch().await?;
                // Written before apply so a failed write leaves the last snapshot alone.
                let line = serde_json::to_string(&status)
                    .map_err(|e| FetchError::Display(io::Error::other(e)))?;
                out.write_all(format!("{}\n", line).as_bytes())?;
                out.flush()?;
                view.apply(status)
            }
        }
    }
}

async fn watch<W: Write>(
    fetcher: &StatusFetcher,
    output: &mut Output<W>,
    interval: Duration,
    count: Option<u64>,
) -> anyhow::Result<()> {
    info!(
        "watching {} every {}s",
        fetcher.url(),
        interval.as_secs()
    );
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // One listener for the whole loop; it must also cover in-flight fetches.
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut attempts: u64 = 0;
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut ctrl_c => {
                info!("interrupted, stopping");
                return Ok(());
            }
        }
        attempts += 1;
        let res = tokio::select! {
            res = output.refresh(fetcher) => res,
            _ = &mut ctrl_c => {
                info!("interrupted during fetch, stopping");
                return Ok(());
            }
        };
        if let Err(e) = res {
            // Previous output stays on screen; try again next tick.
            warn!("unable to check pull limit [{}]: {}", e.code(), e);
        }
        if count.is_some_and(|n| attempts >= n) {
            return Ok(());
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches();
    let opts = CliOptions::from_matches(&matches);

    cli::init_logging(opts.log_level.as_deref());

    if opts.version {
        println!("rlex-status {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut cfg = Config::from_env();
    opts.apply_to(&mut cfg);
    let fetcher = StatusFetcher::from_config(&cfg)?;
    let mut output = Output::new(opts.format, io::stdout());

    if opts.watch {
        let interval = cfg.interval()?;
        return watch(&fetcher, &mut output, interval, opts.count).await;
    }

    if let Err(e) = output.refresh(&fetcher).await {
        error!("unable to check pull limit from {} [{}]", fetcher.url(), e.code());
        return Err(e.into());
    }
    Ok(())
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use market_data_ingestor::{
    providers::{investing_rss::InvestingRssProvider, moex::MoexProvider},
    requests::HttpFetcher,
};
use news_sync::{
    config::{Config, load_config, resolve_config_path},
    context::RunContext,
    dedup,
    export::ExportFormat,
    pipeline::{self, ExportSettings, export::require_existing},
    store::{BarStore, NewsStore},
    telemetry,
};
use tracing::info;

#[derive(Parser)]
#[command(version, about = "News and futures bar collector")]
struct Cli {
    /// TOML config; defaults apply when the file does not exist.
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Daily futures bars.
    Bars(BarsCmd),
    /// Headline collection and store maintenance.
    News(NewsCmd),
    /// Write one artifact per bar window plus `current`.
    Export {
        #[arg(long, value_name = "PATH")]
        bars_db: Option<PathBuf>,
        #[arg(long, value_name = "PATH")]
        news_db: Option<PathBuf>,
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
        #[arg(long, value_enum)]
        format: Option<ExportFormat>,
    },
}

#[derive(Args)]
struct BarsCmd {
    #[command(subcommand)]
    sub: BarsSub,
}

#[derive(Subcommand)]
enum BarsSub {
    /// Backfill bars up to yesterday.
    Sync {
        #[arg(long, value_name = "PATH")]
        bars_db: Option<PathBuf>,
        #[arg(long)]
        symbol: Option<String>,
    },
}

#[derive(Args)]
struct NewsCmd {
    #[command(subcommand)]
    sub: NewsSub,
}

#[derive(Subcommand)]
enum NewsSub {
    /// Fetch all feeds, store and purge duplicates.
    Collect {
        #[arg(long, value_name = "PATH")]
        news_db: Option<PathBuf>,
    },
    /// Purge duplicate captures and compact the store.
    Dedup {
        #[arg(long, value_name = "PATH")]
        news_db: Option<PathBuf>,
    },
    /// List duplicate captures without changing anything.
    Duplicates {
        #[arg(long, value_name = "PATH")]
        news_db: Option<PathBuf>,
    },
}

fn http(cfg: &Config) -> Result<HttpFetcher> {
    HttpFetcher::new(cfg.http.retry_policy()).context("building HTTP client")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = load_config(cli.config.as_deref())?;
    let _telemetry = telemetry::init(cfg.paths.log_dir.as_deref())?;
    let config_path = resolve_config_path(cli.config.as_deref());
    if config_path.exists() {
        info!(path = %config_path.display(), "config loaded");
    } else {
        info!(path = %config_path.display(), "no config file, using defaults");
    }
    let ctx = RunContext::now();

    match cli.cmd {
        Cmd::Bars(BarsCmd {
            sub: BarsSub::Sync { bars_db, symbol },
        }) => {
            let path = bars_db.unwrap_or(cfg.paths.bars_db.clone());
            let symbol = symbol.unwrap_or(cfg.bars.symbol.clone());
            let mut store = BarStore::open(&path)
                .with_context(|| format!("opening bar store {}", path.display()))?;
            let provider = MoexProvider::new(http(&cfg)?, cfg.bars.moex_base_url.clone());
            let today = ctx.today_in(cfg.export.cutoff_zone);
            pipeline::sync_bars(&mut store, &provider, &symbol, cfg.bars.start_date, today).await?;
        }
        Cmd::News(NewsCmd { sub }) => match sub {
            NewsSub::Collect { news_db } => {
                let path = news_db.unwrap_or(cfg.paths.news_db.clone());
                let mut store = NewsStore::open(&path)
                    .with_context(|| format!("opening news store {}", path.display()))?;
                let source =
                    InvestingRssProvider::new(http(&cfg)?, cfg.news.feed_zone, cfg.export.store_zone);
                let today = ctx.today_in(cfg.export.store_zone);
                pipeline::collect_news(
                    &mut store,
                    &source,
                    &cfg.news.portal_url,
                    cfg.news.prefilter_lookback_days,
                    today,
                )
                .await?;
            }
            NewsSub::Dedup { news_db } => {
                let path = news_db.unwrap_or(cfg.paths.news_db.clone());
                require_existing(&path, "news store")?;
                let mut store = NewsStore::open(&path)?;
                let report = dedup::purge(&mut store)?;
                println!(
                    "rows before: {}, deleted: {}, compacted: {}",
                    report.rows_before, report.deleted, report.compacted
                );
            }
            NewsSub::Duplicates { news_db } => {
                let path = news_db.unwrap_or(cfg.paths.news_db.clone());
                require_existing(&path, "news store")?;
                let mut store = NewsStore::open(&path)?;
                let groups = dedup::find_duplicates(&mut store)?;
                for g in &groups {
                    println!("{}\t{}\t{}", g.day, g.copies, g.title);
                }
                info!(groups = groups.len(), "duplicate report done");
            }
        },
        Cmd::Export {
            bars_db,
            news_db,
            out_dir,
            format,
        } => {
            if let Some(p) = bars_db {
                cfg.paths.bars_db = p;
            }
            if let Some(p) = news_db {
                cfg.paths.news_db = p;
            }
            if let Some(p) = out_dir {
                cfg.paths.out_dir = p;
            }
            if let Some(f) = format {
                cfg.export.format = f;
            }
            require_existing(&cfg.paths.bars_db, "bar store")?;
            require_existing(&cfg.paths.news_db, "news store")?;

            let mut bars = BarStore::open(&cfg.paths.bars_db)?;
            let mut news = NewsStore::open(&cfg.paths.news_db)?;
            let settings = ExportSettings {
                out_dir: cfg.paths.out_dir.clone(),
                cutoff: cfg.export.cutoff(),
                format: cfg.export.format,
            };
            let report = pipeline::run_export(&mut bars, &mut news, &settings, &ctx)?;
            println!(
                "{} window artifact(s) written to {}",
                report.windows.len(),
                settings.out_dir.display()
            );
        }
    }

    Ok(())
}

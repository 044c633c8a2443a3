use anyhow::Result;
use clap::{Arg, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use subtidex::captions::{CaptionResolver, HttpCaptionFetcher};
use subtidex::config::Config;
use subtidex::host::{FsDownloader, NullTabHost};
use subtidex::messaging::{MessageRelay, PageChannel, Request, Status};
use subtidex::notify::NotificationKind;
use subtidex::orchestrator::Orchestrator;
use subtidex::page::{HttpPageInspector, VideoContext};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("SubtideX")
        .version("0.1.0")
        .about("Extract YouTube subtitles to CSV")
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .value_name("URL")
                .help("YouTube watch page URL")
                .required(true),
        )
        .arg(
            Arg::new("output-dir")
                .short('o')
                .long("output-dir")
                .value_name("DIR")
                .help("Output directory for CSV files"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");
    tracing_subscriber::fmt()
        .with_env_filter(if verbose {
            "subtidex=debug"
        } else {
            "subtidex=info,warn"
        })
        .init();

    let url = matches.get_one::<String>("url").unwrap();

    let mut config = Config::load().unwrap_or_default();
    if let Some(dir) = matches.get_one::<String>("output-dir") {
        config.output.output_dir = PathBuf::from(dir);
    }

    info!("🚀 SubtideX starting");

    let context = VideoContext::from_url(url);
    if !context.is_video_page {
        error!("Not a YouTube video page: {}", url);
        return Err(anyhow::anyhow!("Not a YouTube video page"));
    }

    // Capability wiring: live HTTP page fetch, filesystem downloads
    let inspector = Arc::new(
        HttpPageInspector::fetch(
            url,
            &config.network.user_agent,
            config.network.request_timeout_seconds,
        )
        .await?,
    );
    let fetcher = Arc::new(HttpCaptionFetcher::new(
        &config.network.user_agent,
        config.network.request_timeout_seconds,
    ));
    let resolver = Arc::new(CaptionResolver::new(fetcher, config.cue_settle_delay()));
    let downloader = Arc::new(FsDownloader::new(config.output.output_dir.clone()));

    let (relay, relay_rx) = MessageRelay::channel(16);
    let (orchestrator, mut notifications) = Orchestrator::new(
        resolver,
        inspector,
        downloader,
        Arc::new(NullTabHost),
        Arc::new(relay.clone()),
        &config,
    );

    orchestrator.on_navigation(context).await;
    tokio::spawn(orchestrator.clone().serve(relay_rx));

    let response = relay.request(Request::StartExtraction).await?;
    match response.status {
        Status::Started => {}
        Status::Busy => return Err(anyhow::anyhow!("An extraction is already in progress")),
        _ => {
            return Err(anyhow::anyhow!(
                response.error.unwrap_or_else(|| "Extraction rejected".to_string())
            ))
        }
    }

    // The attempt runs in the background; its outcome arrives as the next
    // terminal notification.
    while let Some(notification) = notifications.recv().await {
        match notification.kind {
            NotificationKind::Success => {
                info!("🎉 {}", notification.message);
                return Ok(());
            }
            NotificationKind::Error => {
                error!("{}", notification.message);
                return Err(anyhow::anyhow!(notification.message));
            }
            NotificationKind::Info => info!("{}", notification.message),
        }
    }

    Err(anyhow::anyhow!("Extraction ended without a result"))
}

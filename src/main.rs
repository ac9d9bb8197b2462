use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use transcript_fetcher::{
    output, utils, Cli, Config, FetcherError, TranscriptResponse, TranscriptSelector, YoutubeClient,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // Usage errors exit with 1; --help and --version are not errors
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // Initialize tracing on stderr so stdout stays machine-readable
    let default_filter = if cli.verbose {
        "transcript_fetcher=debug"
    } else {
        "transcript_fetcher=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", console::style("error:").red().bold(), e);
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = Config::load(cli.config.as_deref())?;
    let pretty = config.output.pretty && !cli.compact;

    let Some(video_id) = utils::extract_video_id(&cli.video) else {
        let error = FetcherError::InvalidVideoId(cli.video.clone());
        let response = TranscriptResponse::failed(None, &error, None);
        emit(&cli, &response, pretty)?;
        return Ok(ExitCode::from(1));
    };

    let client = match YoutubeClient::new(&config.http) {
        Ok(client) => client,
        Err(e) => {
            let response = TranscriptResponse::failed(Some(&video_id), &e, None);
            emit(&cli, &response, pretty)?;
            return Ok(ExitCode::from(1));
        }
    };

    let progress = spinner(cli.quiet);

    let response = if cli.list_only {
        progress.set_message(format!("Listing transcripts for {}...", video_id));
        transcript_fetcher::list_transcripts(&client, &video_id).await
    } else {
        let selector = TranscriptSelector::from_config(&config.languages, &cli.languages);
        tracing::info!(
            "Fetching transcript for {} (preferred: {})",
            video_id,
            selector.preferred().join(", ")
        );
        progress.set_message(format!("Fetching transcript for {}...", video_id));
        transcript_fetcher::fetch_transcript(&client, &video_id, &selector).await
    };

    progress.finish_and_clear();

    if !response.success {
        eprintln!(
            "{} {}",
            console::style("⚠️").yellow(),
            response.error.as_deref().unwrap_or("Unknown error")
        );
    }

    emit(&cli, &response, pretty)?;
    Ok(ExitCode::SUCCESS)
}

fn spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new_spinner();
    if let Ok(style) =
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")
    {
        progress.set_style(style);
    }
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

fn emit(cli: &Cli, response: &TranscriptResponse, pretty: bool) -> Result<()> {
    let content = output::render(response, &cli.format, pretty)?;

    match &cli.output {
        Some(path) => {
            output::save_to_file(&content, path)?;
            eprintln!("Output saved to: {}", path.display());
        }
        None => output::print_to_console(&content),
    }

    Ok(())
}

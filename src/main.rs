//! mediagrab - CLI entry point.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use mediagrab::{
    cli::{Args, Command, DownloadArgs, InstagramCommand},
    config::{validate_config, Config, DownloadMode},
    download::{JobController, JobOutcome, JobRequest},
    error::{exit_codes, Error, Result},
    fs::{device_id, prepare_download_root},
    output::{
        create_job_bar, create_spinner, print_banner, print_error, print_final_status,
        print_info, print_job_summary, print_json, print_success, print_warning, update_job_bar,
    },
};

/// Interval between status polls while a job runs.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Cancelled => ExitCode::from(exit_codes::CANCELLED as u8),
                Error::Config(_)
                | Error::ConfigValidation { .. }
                | Error::MissingConfig(_)
                | Error::InvalidInput(_)
                | Error::InvalidPath(_)
                | Error::TomlParse(_) => ExitCode::from(exit_codes::CONFIG_ERROR as u8),
                Error::Resolve(_) | Error::Http(_) | Error::Json(_) => {
                    ExitCode::from(exit_codes::API_ERROR as u8)
                }
                Error::Download(_)
                | Error::Extraction(_)
                | Error::ExtractorNotFound(_)
                | Error::JobActive => ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8),
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    // Load configuration
    let config_path = args.config.clone();
    let mut config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        tracing::debug!(
            "Configuration file not found: {}, using defaults",
            config_path.display()
        );
        Config::default()
    };

    args.merge_into_config(&mut config);
    validate_config(&config)?;

    let root = config.download_directory();
    if prepare_download_root(&root)? {
        print_info(&format!("Created download directory: {}", root.display()));
    }

    match args.command {
        Command::DeviceId => {
            println!("{}", device_id(&root));
            Ok(())
        }
        Command::Title { url } => {
            let controller = JobController::from_config(&config)?;
            let info = controller.fetch_title(&url).await;
            if !info.success {
                return Err(Error::Extraction(info.title));
            }
            print_success(&info.title);
            if let Some(thumbnail) = info.thumbnail {
                print_info(&format!("Thumbnail: {}", thumbnail));
            }
            Ok(())
        }
        Command::Thumbnail { url, folder } => {
            let controller = JobController::from_config(&config)?;
            let spinner = create_spinner("Downloading thumbnail...");
            let result = controller.download_thumbnail(&url, folder.as_deref()).await;
            spinner.finish_and_clear();

            let folder = result?;
            print_success(&format!(
                "Thumbnail downloaded successfully! ({})",
                folder.display()
            ));
            Ok(())
        }
        Command::Download(download) => {
            print_banner();
            let controller = JobController::from_config(&config)?;
            run_download(&controller, download).await
        }
        Command::Instagram(command) => {
            let controller = JobController::from_config(&config)?;
            run_instagram(&controller, command).await
        }
    }
}

async fn run_download(controller: &JobController, args: DownloadArgs) -> Result<()> {
    let mode = DownloadMode::from(args.mode);

    if !args.no_title {
        let spinner = create_spinner("Fetching title...");
        let info = controller.fetch_title(&args.url).await;
        spinner.finish_and_clear();
        if info.success {
            print_info(&format!("Title: {}", info.title));
        } else {
            print_warning(&info.title);
        }
    }

    print_job_summary(
        &args.url,
        &mode.to_string(),
        &args.quality.to_string(),
        args.folder.as_deref().unwrap_or("."),
    );

    let admission = controller
        .submit(JobRequest {
            url: args.url,
            quality: args.quality,
            mode,
            folder: args.folder,
            platform: args.platform,
        })
        .await;
    if !admission.is_accepted() {
        return Err(Error::InvalidInput(admission.message.unwrap_or_default()));
    }

    follow_job(controller).await
}

async fn run_instagram(controller: &JobController, command: InstagramCommand) -> Result<()> {
    match command {
        InstagramCommand::Info { url } => {
            let listing = controller.media_info(&url).await;
            if !listing.success {
                return Err(Error::Resolve(listing.message.unwrap_or_default()));
            }
            print_json(&listing);
            Ok(())
        }
        InstagramCommand::Post { url, folder } => {
            let spinner = create_spinner("Downloading post...");
            let result = controller.download_post(&url, folder.as_deref()).await;
            spinner.finish_and_clear();

            let post = result?;
            print_success(&post.message());
            for file in &post.files {
                print_info(file);
            }
            print_info(&format!("Caption: {}", post.caption));
            Ok(())
        }
        InstagramCommand::Fetch { urls, folder } => {
            let admission = controller.submit_bulk(urls, folder.as_deref()).await;
            if !admission.is_accepted() {
                return Err(Error::InvalidInput(admission.message.unwrap_or_default()));
            }
            follow_job(controller).await
        }
        InstagramCommand::Single { url, kind, folder } => {
            let path = controller
                .download_single(&url, kind.into(), folder.as_deref())
                .await?;
            print_success(&format!("Media downloaded successfully! ({})", path.display()));
            Ok(())
        }
    }
}

/// Mirror the running job on a progress bar until it ends.
///
/// Ctrl-C toggles pause, which stops the current attempt.
async fn follow_job(controller: &JobController) -> Result<()> {
    let bar = create_job_bar();
    let mut ticker = tokio::time::interval(POLL_INTERVAL);
    let mut listen_ctrl_c = true;

    let wait = controller.wait();
    tokio::pin!(wait);

    let outcome = loop {
        tokio::select! {
            outcome = &mut wait => break outcome,
            _ = ticker.tick() => update_job_bar(&bar, &controller.status()),
            signal = tokio::signal::ctrl_c(), if listen_ctrl_c => {
                if let Err(e) = signal {
                    tracing::warn!("Could not listen for Ctrl-C: {}", e);
                    listen_ctrl_c = false;
                    continue;
                }
                let paused = controller.toggle_pause();
                bar.println(if paused { "Pausing..." } else { "Resuming..." });
            }
        }
    };

    let status = controller.status();
    update_job_bar(&bar, &status);
    bar.finish_and_clear();

    match outcome {
        Some(JobOutcome::Succeeded { .. }) => {
            print_final_status(&status);
            Ok(())
        }
        Some(JobOutcome::Cancelled) => Err(Error::Cancelled),
        Some(JobOutcome::Failed(message)) => Err(Error::Download(message)),
        None => Err(Error::Download("job ended unexpectedly".to_string())),
    }
}

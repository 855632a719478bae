//! Application runners for the menu and the subcommands

use std::io;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use colored::Colorize;
use tracing::debug;

use crate::application::ports::ConfigStore;
use crate::application::{
    list_audio_sources, RecordCallbacks, RecordError, RecordInput, RecordMixUseCase, SessionPlan,
    SourceListing,
};
use crate::domain::audio::OutputFormat;
use crate::domain::config::AppConfig;
use crate::domain::error::UnsupportedFormatError;
use crate::domain::recording::RecordingDuration;
use crate::infrastructure::{create_backend, CpalBackend, FileAudioWriter, XdgConfigStore};

use super::args::RecordArgs;
use super::presenter::Presenter;
use super::prompt::Prompter;
use super::signals::{idle_interrupt, CancelSignal};

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Run the interactive menu until the user exits, stdin closes, or Ctrl+C
/// arrives while no recording is running
pub async fn run_interactive() -> ExitCode {
    let busy = Arc::new(AtomicBool::new(false));

    tokio::select! {
        code = menu_loop(Arc::clone(&busy)) => code,
        _ = idle_interrupt(busy) => {
            Presenter::new().error("Aborted!");
            // A pending stdin read would block runtime shutdown
            std::process::exit(i32::from(EXIT_ERROR));
        }
    }
}

/// Menu loop; `busy` is set while a recording runs
async fn menu_loop(busy: Arc<AtomicBool>) -> ExitCode {
    let mut presenter = Presenter::new();
    let mut prompter = Prompter::new();
    let backend = Arc::new(create_backend());

    loop {
        presenter.menu();

        let choice = match prompter.ask_parsed::<u32>("Choose an option", None).await {
            Ok(Some(choice)) => choice,
            Ok(None) => return ExitCode::from(EXIT_SUCCESS),
            Err(e) => {
                presenter.error(&format!("Failed to read input: {}", e));
                return ExitCode::from(EXIT_ERROR);
            }
        };

        match choice {
            1 => {
                show_sources(backend.as_ref(), &presenter);
            }
            2 => {
                let config = load_merged_config(AppConfig::empty()).await;
                let input = match prompt_record_input(
                    backend.as_ref(),
                    &presenter,
                    &mut prompter,
                    RecordArgs::default(),
                    &config,
                )
                .await
                {
                    Ok(Some(input)) => input,
                    Ok(None) => return ExitCode::from(EXIT_SUCCESS),
                    Err(e) => {
                        presenter.error(&format!("Failed to read input: {}", e));
                        return ExitCode::from(EXIT_ERROR);
                    }
                };

                busy.store(true, Ordering::SeqCst);
                // Errors are reported and the menu continues
                let _ = record(Arc::clone(&backend), input, &mut presenter).await;
                busy.store(false, Ordering::SeqCst);
            }
            3 => {
                presenter.output("Goodbye!");
                return ExitCode::from(EXIT_SUCCESS);
            }
            _ => presenter.warn("Invalid option. Try again."),
        }
    }
}

/// Print the available audio sources
pub fn run_devices() -> ExitCode {
    let presenter = Presenter::new();
    let backend = create_backend();

    let listing = show_sources(&backend, &presenter);
    if listing.diagnostic.is_some() {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}

/// Record with options from the command line, config and prompts
pub async fn run_record(args: RecordArgs) -> ExitCode {
    let mut presenter = Presenter::new();

    if let Some(ref duration) = args.duration {
        if let Err(e) = duration.parse::<RecordingDuration>() {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    }

    let config = load_merged_config(args.to_config()).await;
    let backend = Arc::new(create_backend());
    let mut prompter = Prompter::new();

    // Configured values stand in for missing flags without prompting
    let preset = RecordArgs {
        mic: config.mic_device,
        system: config.system_device,
        duration: config.duration.clone(),
        format: config.format.clone(),
        output: args.output,
    };

    let input = match prompt_record_input(
        backend.as_ref(),
        &presenter,
        &mut prompter,
        preset,
        &config,
    )
    .await
    {
        Ok(Some(input)) => input,
        Ok(None) => {
            presenter.error("Missing recording options and no input to prompt from");
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
        Err(e) => {
            presenter.error(&format!("Failed to read input: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match record(backend, input, &mut presenter).await {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(_) => ExitCode::from(EXIT_ERROR),
    }
}

/// List sources through the presenter
fn show_sources(backend: &CpalBackend, presenter: &Presenter) -> SourceListing {
    let listing = list_audio_sources(backend);

    if let Some(ref e) = listing.diagnostic {
        presenter.error(&format!(
            "Unable to access audio devices ({}). Make sure a sound card is configured in the environment running this program.",
            e
        ));
        return listing;
    }

    if listing.is_empty() {
        presenter.info("No audio sources currently available");
        return listing;
    }

    for device in &listing.devices {
        presenter.output(&device.listing_line());
    }

    listing
}

/// Prompt for every option `preset` leaves open, offering config values
/// as defaults.
///
/// Returns `None` when stdin closes before every answer is in.
async fn prompt_record_input(
    backend: &CpalBackend,
    presenter: &Presenter,
    prompter: &mut Prompter,
    args: RecordArgs,
    config: &AppConfig,
) -> io::Result<Option<RecordInput>> {
    if args.mic.is_none() || args.system.is_none() {
        show_sources(backend, presenter);
    }

    let mic_index = match args.mic {
        Some(index) => index,
        None => match prompter
            .ask_parsed("Microphone index (input)", config.mic_device)
            .await?
        {
            Some(index) => index,
            None => return Ok(None),
        },
    };

    let system_index = match args.system {
        Some(index) => index,
        None => match prompter
            .ask_parsed("System audio index (output)", config.system_device)
            .await?
        {
            Some(index) => index,
            None => return Ok(None),
        },
    };

    let duration = match args.duration.as_deref().map(str::parse::<RecordingDuration>) {
        Some(Ok(duration)) => duration,
        _ => match prompter
            .ask_parsed("Recording duration", Some(config.duration_or_default()))
            .await?
        {
            Some(duration) => duration,
            None => return Ok(None),
        },
    };

    let format = match args.format {
        Some(format) => format,
        None => {
            let default = config.format_or_default();
            match prompter
                .ask_or("Output format (wav or mp3)", default.as_str())
                .await?
            {
                Some(format) => format,
                None => return Ok(None),
            }
        }
    };

    let output = match args.output {
        Some(output) => output,
        None => {
            let default = default_output_name(&format);
            match prompter.ask_or("Output file name", &default).await? {
                Some(output) => output,
                None => return Ok(None),
            }
        }
    };

    Ok(Some(RecordInput {
        mic_index,
        system_index,
        duration,
        format,
        output: config.resolve_output_path(&output),
    }))
}

/// File name suggested for a requested format
fn default_output_name(format: &str) -> String {
    let resolved = OutputFormat::resolve(format);
    format!("recording.{}", resolved.format.extension())
}

/// Run one recording, reporting progress and the outcome
async fn record(
    backend: Arc<CpalBackend>,
    input: RecordInput,
    presenter: &mut Presenter,
) -> Result<(), RecordError> {
    let use_case = RecordMixUseCase::new(backend, FileAudioWriter::new());

    let cancel = CancelSignal::new(use_case.running_flag());
    let listener = cancel.setup();

    presenter.start_spinner("Opening audio devices...");
    let callbacks = record_callbacks(presenter, input.duration);

    let result = use_case.execute(input, callbacks).await;
    listener.abort();

    match result {
        Ok(output) => {
            presenter.spinner_success("Recording complete!");
            if cancel.is_cancelled() {
                debug!("countdown was interrupted, recording kept running to the end");
            }
            presenter.info(&format!(
                "{:.1}s at {} Hz, {}",
                output.duration_secs,
                output.sample_rate,
                output.format.as_str().to_uppercase()
            ));
            presenter.success(&format!("File saved as {}", output.path.display()));
            Ok(())
        }
        Err(e) => {
            presenter.spinner_fail("Recording failed");
            presenter.error(&e.to_string());
            Err(e)
        }
    }
}

/// Callbacks that drive the spinner from the session's threads
fn record_callbacks(presenter: &Presenter, duration: RecordingDuration) -> RecordCallbacks {
    let total = duration.as_secs();
    let spinner = presenter.spinner_handle();

    let plan_spinner = spinner.clone();
    let progress_spinner = spinner.clone();
    let end_spinner = spinner.clone();
    let warn_spinner = spinner;

    RecordCallbacks {
        on_plan: Some(Box::new(move |plan: &SessionPlan| {
            if let Some(ref bar) = plan_spinner {
                for line in plan_lines(plan, total) {
                    bar.println(line);
                }
                bar.set_message(Presenter::countdown_message(total, total));
            }
        })),
        on_progress: Some(Arc::new(move |remaining: u64, total: u64| {
            if let Some(ref bar) = progress_spinner {
                bar.set_message(Presenter::countdown_message(remaining, total));
            }
        })),
        on_recording_end: Some(Box::new(move || {
            if let Some(ref bar) = end_spinner {
                bar.set_message("Saving...");
            }
        })),
        on_format_warning: Some(Box::new(move |warning: &UnsupportedFormatError| {
            if let Some(ref bar) = warn_spinner {
                bar.println(format!("{} {}", "⚠".yellow(), warning));
            }
        })),
    }
}

/// Device summary printed before capture starts
fn plan_lines(plan: &SessionPlan, total_secs: u64) -> Vec<String> {
    let mut lines = vec![
        format!("Mic device: {}", plan.mic.details_line()),
        format!("System device: {}", plan.system.details_line()),
    ];
    if plan.has_rate_mismatch() {
        lines.push(format!(
            "{} System device runs at {} Hz; recording both at {} Hz",
            "⚠".yellow(),
            plan.system.sample_rate,
            plan.sample_rate
        ));
    }
    lines.push(format!("Recording for {} seconds...", total_secs));
    lines
}

/// Load and merge configuration from defaults, file and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            debug!(error = %e, path = %store.path().display(), "ignoring unreadable config");
            AppConfig::empty()
        }
    };

    // Merge: defaults < file < cli
    AppConfig::defaults().merge(file_config).merge(cli_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audio::{AudioDevice, DeviceDirection};

    fn plan(system_rate: u32) -> SessionPlan {
        SessionPlan {
            mic: AudioDevice::new(0, "Mic", DeviceDirection::Input, 44100, 1),
            system: AudioDevice::new(3, "Speakers", DeviceDirection::Output, system_rate, 2),
            sample_rate: 44100,
        }
    }

    #[test]
    fn plan_lines_describe_both_devices() {
        let lines = plan_lines(&plan(44100), 10);
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Mic device: Mic, channels: 1, default samplerate: 44100"
        );
        assert!(lines[1].starts_with("System device: Speakers"));
        assert_eq!(lines[2], "Recording for 10 seconds...");
    }

    #[test]
    fn plan_lines_warn_on_rate_mismatch() {
        let lines = plan_lines(&plan(48000), 5);
        assert_eq!(lines.len(), 4);
        assert!(lines[2].contains("48000 Hz"));
    }

    #[test]
    fn default_output_name_follows_format() {
        assert_eq!(default_output_name("mp3"), "recording.mp3");
        assert_eq!(default_output_name("WAV"), "recording.wav");
        assert_eq!(default_output_name("ogg"), "recording.wav");
    }
}

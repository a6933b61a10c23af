use std::path::Path;
use std::sync::Arc;

use blocking_prefs::{MemoryPreferences, PreferenceFile};
use blocking_settings::{SettingsSynchronizer, SynchronizerDeps, event_channel};
use blocking_telemetry::HostSpanGuard;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::cli::Cli;
use crate::commands::{Command, HELP};
use crate::console::{ConsoleBlockingClient, ConsoleSpamReset, ConsoleSurface};
use crate::error::{AppError, AppResult};

/// Entry point for the console host.
///
/// # Errors
///
/// Returns an error if logging cannot be installed, the preference file
/// cannot be read or written, or standard input fails.
pub async fn run_app(cli: Cli) -> AppResult<()> {
    blocking_telemetry::init_logging(&cli.logging())
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;
    let _span = HostSpanGuard::enter("console", &cli.prefs);

    info!(prefs = %cli.prefs.display(), "blocking settings console starting");
    let prefs = PreferenceFile::load(&cli.prefs)
        .map_err(|err| AppError::prefs("preference_file.load", err))?;

    let surface = ConsoleSurface::stdout();
    surface.print_line("type `help` for commands");
    run_console(&cli.prefs, prefs, BufReader::new(tokio::io::stdin()), surface).await
}

/// Drive the settings screen from `input` until `quit` or end of input,
/// saving `prefs` to `path` after every command and on exit.
///
/// # Errors
///
/// Returns an error if reading `input` or saving the preference file fails,
/// or if the synchronizer stops unexpectedly.
pub async fn run_console<R>(
    path: &Path,
    prefs: MemoryPreferences,
    input: R,
    surface: Arc<ConsoleSurface>,
) -> AppResult<()>
where
    R: AsyncBufRead + Unpin,
{
    let deps = SynchronizerDeps::new(
        Arc::new(prefs.clone()),
        Arc::new(ConsoleBlockingClient::new(surface.clone())),
        Arc::new(ConsoleSpamReset::new(surface.clone())),
    );
    let (events, receiver) = event_channel();
    let handle = SettingsSynchronizer::new(deps).start(surface.clone(), receiver);

    let mut lines = input.lines();
    loop {
        let line = lines.next_line().await.map_err(|source| AppError::Io {
            operation: "console.read_line",
            path: None,
            source,
        })?;
        let Some(line) = line else {
            info!("console input closed");
            break;
        };

        match Command::parse(&line) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(Command::Help)) => surface.print_line(HELP),
            Ok(Some(Command::State)) => {
                if !handle.flush().await {
                    return Err(AppError::SynchronizerStopped {
                        operation: "console.state",
                    });
                }
                surface.print_state(&handle.state());
            }
            Ok(Some(Command::Event(event))) => {
                if events.send(event).await.is_err() || !handle.flush().await {
                    return Err(AppError::SynchronizerStopped {
                        operation: "console.send_event",
                    });
                }
                save(path, &prefs)?;
            }
            Err(err) => {
                warn!(error = %err, line = %line, "console command rejected");
                surface.print_line(&format!("{err}: {}", line.trim()));
            }
        }
    }

    if !handle.flush().await {
        warn!("settings synchronizer stopped before shutdown");
    }
    handle.stop().await;
    save(path, &prefs)?;
    info!(prefs = %path.display(), "blocking settings console stopped");
    Ok(())
}

fn save(path: &Path, prefs: &MemoryPreferences) -> AppResult<()> {
    PreferenceFile::save(path, prefs).map_err(|err| AppError::prefs("preference_file.save", err))
}

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use blocking_app::console::ConsoleSurface;
use blocking_app::run_console;
use blocking_prefs::{MemoryPreferences, PrefKey, PrefValue, PreferenceFile, PreferenceStore};

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Capture {
    fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock().unwrap_or_else(PoisonError::into_inner))
            .lines()
            .map(str::to_string)
            .collect()
    }
}

async fn run_script(prefs: MemoryPreferences, script: &str) -> anyhow::Result<(Vec<String>, MemoryPreferences)> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("blocking-prefs.json");
    let capture = Capture::default();
    let surface = ConsoleSurface::new(Box::new(capture.clone()));

    run_console(&path, prefs, script.as_bytes(), surface).await?;
    let saved = PreferenceFile::load(&path)?;
    Ok((capture.lines(), saved))
}

#[tokio::test]
async fn commands_are_applied_and_saved() -> anyhow::Result<()> {
    let script = "drop\nqueue-size 2\npause-time 1\nquit\n";
    let (output, saved) = run_script(MemoryPreferences::new(), script).await?;

    assert_eq!(saved.get(PrefKey::Drop), PrefValue::Bool(true));
    assert_eq!(saved.get(PrefKey::QueueSize), PrefValue::Int(2));
    assert_eq!(saved.get(PrefKey::QueueSizeValue), PrefValue::Int(10));
    assert_eq!(saved.get(PrefKey::PauseTimeValue), PrefValue::Int(3_600_000));
    assert!(
        output
            .iter()
            .any(|line| line.contains("queue size 10") && line.contains("drop on"))
    );
    Ok(())
}

#[tokio::test]
async fn external_manager_hands_off_instead_of_navigating() -> anyhow::Result<()> {
    let prefs = MemoryPreferences::with_values([(PrefKey::BlockingManager, PrefValue::Int(1))])?;
    let (output, _) = run_script(prefs, "numbers\nmessages\n").await?;

    let navigations: Vec<_> = output
        .iter()
        .filter(|line| line.starts_with("navigate: "))
        .collect();
    assert_eq!(
        navigations,
        vec![
            "navigate: external blocking app settings",
            "navigate: blocked messages"
        ]
    );
    Ok(())
}

#[tokio::test]
async fn spam_switch_reset_is_reported_before_disabling() -> anyhow::Result<()> {
    let prefs = MemoryPreferences::with_values([(PrefKey::SpamSwitch, PrefValue::Bool(true))])?;
    let (output, saved) = run_script(prefs, "spam\n").await?;

    let reset = output
        .iter()
        .position(|line| line == "spam filter: detection state reset");
    let disabled = output
        .iter()
        .rposition(|line| line.contains("spam filter off"));
    assert!(matches!((reset, disabled), (Some(r), Some(d)) if r < d));
    assert_eq!(saved.get(PrefKey::SpamSwitch), PrefValue::Bool(false));
    Ok(())
}

#[tokio::test]
async fn bad_lines_are_reported_and_skipped() -> anyhow::Result<()> {
    let (output, saved) = run_script(
        MemoryPreferences::new(),
        "ringtone\nreceive-window x\nreceive-window 9\nreceive-window 1\nstate\n",
    )
    .await?;

    assert!(output.iter().any(|line| line == "unknown command: ringtone"));
    assert!(
        output
            .iter()
            .any(|line| line == "invalid option index: receive-window x")
    );
    assert!(output.iter().any(|line| line.contains("\"selected_index\": 1")));
    assert_eq!(saved.get(PrefKey::ReceiveWindow), PrefValue::Int(1));
    assert_eq!(saved.get(PrefKey::ReceiveWindowValue), PrefValue::Int(300_000));
    Ok(())
}

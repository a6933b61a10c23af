use std::sync::Arc;

use blocking_prefs::{
    MANAGER_CODE_QKSMS, MANAGER_CODE_SIA, MemoryPreferences, PrefKey, PrefValue, PreferenceStore,
    PreferenceStoreExt,
};
use blocking_settings::{
    DialogKind, ManagerKind, NavTarget, OBSERVED_KEYS, SettingsEvent, SettingsSynchronizer,
    SyncHandle, TuningKind, TuningSelection, event_channel,
};
use blocking_test_support::fixtures::{
    Harness, WAIT_TIMEOUT, seeded_store, settle, small_tables, wait_until, within,
};
use blocking_test_support::mocks::RecordingSurface;
use tokio::sync::mpsc;

struct Running {
    harness: Harness,
    surface: Arc<RecordingSurface>,
    events: mpsc::Sender<SettingsEvent>,
    handle: SyncHandle,
}

async fn start(prefs: MemoryPreferences) -> Running {
    let harness = Harness::new(prefs);
    let surface = RecordingSurface::shared();
    let (events, receiver) = event_channel();
    let handle = SettingsSynchronizer::new(harness.deps()).start(surface.clone(), receiver);
    let replayed = wait_until(WAIT_TIMEOUT, || {
        surface.render_count() >= OBSERVED_KEYS.len()
    })
    .await;
    assert!(replayed, "initial values were not replayed");
    Running {
        harness,
        surface,
        events,
        handle,
    }
}

#[tokio::test]
async fn start_renders_replayed_preferences() {
    let running = start(MemoryPreferences::new()).await;

    let state = running.handle.state();
    assert_eq!(
        state.queue_size,
        TuningSelection {
            summary_label: "10".into(),
            selected_index: 0,
        }
    );
    assert_eq!(state.blocking_manager_label, "QKSMS");
    assert!(!state.drop_enabled);
    assert!(!state.spam_filter_enabled);
    assert_eq!(running.surface.last_render(), Some(state));
    assert_eq!(running.surface.render_count(), OBSERVED_KEYS.len());
}

#[tokio::test]
async fn every_valid_index_resolves_label_and_derived_value() -> anyhow::Result<()> {
    let running = start(MemoryPreferences::new()).await;
    let tables = small_tables();

    for kind in TuningKind::ALL {
        for (index, option) in tables.get(kind).options().iter().enumerate() {
            running
                .harness
                .prefs
                .set_int(kind.index_key(), i64::try_from(index)?)?;
            let resolved = wait_until(WAIT_TIMEOUT, || {
                running.handle.state().tuning(kind)
                    == &TuningSelection {
                        summary_label: option.label.clone(),
                        selected_index: index,
                    }
            })
            .await;
            assert!(resolved, "{} index {index} not rendered", kind.name());
            assert_eq!(
                running.harness.prefs.get(kind.value_key()),
                PrefValue::Int(option.stored_value)
            );
        }
    }
    Ok(())
}

#[tokio::test]
async fn manager_codes_map_to_labels_with_fallback() -> anyhow::Result<()> {
    let running = start(MemoryPreferences::new()).await;

    let cases = ManagerKind::ALL
        .iter()
        .map(|kind| (kind.code(), kind.default_label()))
        .chain([(17, "QKSMS"), (-3, "QKSMS")]);
    for (code, label) in cases {
        running.harness.prefs.set_int(PrefKey::BlockingManager, code)?;
        let rendered = wait_until(WAIT_TIMEOUT, || {
            running
                .surface
                .last_render()
                .is_some_and(|state| state.blocking_manager_label == label)
        })
        .await;
        assert!(rendered, "code {code} did not render {label}");
    }
    Ok(())
}

#[tokio::test]
async fn drop_clicked_twice_restores_preference() -> anyhow::Result<()> {
    let running = start(MemoryPreferences::new()).await;

    running.events.send(SettingsEvent::DropRowClicked).await?;
    assert!(wait_until(WAIT_TIMEOUT, || running.handle.state().drop_enabled).await);
    assert!(running.harness.prefs.get_bool(PrefKey::Drop)?);
    assert!(!running.handle.state().messages_row_enabled());

    running.events.send(SettingsEvent::DropRowClicked).await?;
    assert!(wait_until(WAIT_TIMEOUT, || !running.handle.state().drop_enabled).await);
    assert!(!running.harness.prefs.get_bool(PrefKey::Drop)?);
    Ok(())
}

#[tokio::test]
async fn numbers_row_defers_to_external_manager() -> anyhow::Result<()> {
    let prefs = seeded_store(&[(PrefKey::BlockingManager, PrefValue::Int(MANAGER_CODE_SIA))]);
    let running = start(prefs).await;

    running.events.send(SettingsEvent::NumbersRowClicked).await?;
    assert!(wait_until(WAIT_TIMEOUT, || running.harness.blocking_client.calls() == 1).await);
    settle().await;

    assert_eq!(running.harness.blocking_client.calls(), 1);
    assert!(running.surface.navigations().is_empty());
    Ok(())
}

#[tokio::test]
async fn numbers_row_opens_builtin_list_for_qksms() -> anyhow::Result<()> {
    let prefs = seeded_store(&[(PrefKey::BlockingManager, PrefValue::Int(MANAGER_CODE_QKSMS))]);
    let running = start(prefs).await;

    running.events.send(SettingsEvent::NumbersRowClicked).await?;
    assert!(
        wait_until(WAIT_TIMEOUT, || {
            running.surface.navigations() == vec![NavTarget::NumbersScreen]
        })
        .await
    );
    settle().await;
    assert_eq!(running.harness.blocking_client.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn navigation_rows_and_dialogs_reach_the_surface() -> anyhow::Result<()> {
    let running = start(MemoryPreferences::new()).await;

    for event in [
        SettingsEvent::ManagerRowClicked,
        SettingsEvent::MessagesRowClicked,
        SettingsEvent::QueueSizeRowClicked,
        SettingsEvent::ReceiveWindowRowClicked,
        SettingsEvent::PauseTimeRowClicked,
    ] {
        running.events.send(event).await?;
    }

    assert!(wait_until(WAIT_TIMEOUT, || running.surface.dialogs().len() == 3).await);
    assert_eq!(
        running.surface.navigations(),
        vec![NavTarget::ManagerChooser, NavTarget::MessagesScreen]
    );
    assert_eq!(
        running.surface.dialogs(),
        vec![
            DialogKind::QueueSize,
            DialogKind::ReceiveWindow,
            DialogKind::PauseTime
        ]
    );
    Ok(())
}

#[tokio::test]
async fn spam_switch_resets_then_disables() -> anyhow::Result<()> {
    let prefs = seeded_store(&[(PrefKey::SpamSwitch, PrefValue::Bool(true))]);
    let running = start(prefs).await;
    assert!(running.handle.state().tuning_rows_enabled());

    running.events.send(SettingsEvent::SpamSwitchClicked).await?;
    assert!(wait_until(WAIT_TIMEOUT, || !running.handle.state().spam_filter_enabled).await);

    assert_eq!(running.harness.spam_filter.calls(), 1);
    assert_eq!(running.harness.spam_filter.switch_at_reset(), vec![true]);
    assert!(!running.harness.prefs.get_bool(PrefKey::SpamSwitch)?);
    assert_eq!(running.harness.log.entries(), vec!["reset_block"]);
    Ok(())
}

#[tokio::test]
async fn enabling_spam_switch_does_not_reset() -> anyhow::Result<()> {
    let running = start(MemoryPreferences::new()).await;

    running.events.send(SettingsEvent::SpamSwitchClicked).await?;
    assert!(wait_until(WAIT_TIMEOUT, || running.handle.state().spam_filter_enabled).await);
    assert_eq!(running.harness.spam_filter.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn dialog_selection_flows_back_into_state() -> anyhow::Result<()> {
    let running = start(MemoryPreferences::new()).await;

    running
        .events
        .send(SettingsEvent::PauseTimeSelected(2))
        .await?;
    assert!(
        wait_until(WAIT_TIMEOUT, || {
            running.handle.state().pause_time.summary_label == "1 week"
        })
        .await
    );
    assert_eq!(running.harness.prefs.get(PrefKey::PauseTime), PrefValue::Int(2));
    assert_eq!(
        running.harness.prefs.get(PrefKey::PauseTimeValue),
        PrefValue::Int(604_800_000)
    );
    Ok(())
}

#[tokio::test]
async fn derived_writes_do_not_feed_back() -> anyhow::Result<()> {
    let running = start(MemoryPreferences::new()).await;
    settle().await;
    let baseline = running.surface.render_count();

    running.harness.prefs.set_int(PrefKey::QueueSizeValue, 999)?;
    running.harness.prefs.set_int(PrefKey::PauseTimeValue, 999)?;
    settle().await;
    assert_eq!(running.surface.render_count(), baseline);

    running.harness.prefs.set_int(PrefKey::QueueSize, 1)?;
    assert!(wait_until(WAIT_TIMEOUT, || running.surface.render_count() == baseline + 1).await);
    settle().await;
    assert_eq!(running.surface.render_count(), baseline + 1);
    assert_eq!(running.harness.prefs.get(PrefKey::QueueSizeValue), PrefValue::Int(20));
    Ok(())
}

#[tokio::test]
async fn out_of_range_index_is_skipped_without_stopping() -> anyhow::Result<()> {
    let prefs = seeded_store(&[(PrefKey::ReceiveWindow, PrefValue::Int(9))]);
    let harness = Harness::new(prefs);
    let surface = RecordingSurface::shared();
    let (events, receiver) = event_channel();
    let handle = SettingsSynchronizer::new(harness.deps()).start(surface.clone(), receiver);

    let others_rendered = wait_until(WAIT_TIMEOUT, || {
        surface.render_count() == OBSERVED_KEYS.len() - 1
    })
    .await;
    assert!(others_rendered);
    assert_eq!(handle.state().receive_window.summary_label, "1 minute");
    assert_eq!(harness.prefs.get(PrefKey::ReceiveWindowValue), PrefValue::Int(0));

    events.send(SettingsEvent::DropRowClicked).await?;
    assert!(wait_until(WAIT_TIMEOUT, || handle.state().drop_enabled).await);
    assert!(handle.is_running());
    Ok(())
}

#[tokio::test]
async fn stop_releases_every_subscription() {
    let running = start(MemoryPreferences::new()).await;
    for key in OBSERVED_KEYS {
        assert_eq!(running.harness.prefs.subscriber_count(key), 1, "{key}");
    }

    within(running.handle.stop()).await;
    for key in OBSERVED_KEYS {
        assert_eq!(running.harness.prefs.subscriber_count(key), 0, "{key}");
    }
}

#[tokio::test]
async fn dropping_the_handle_releases_subscriptions() {
    let prefs = MemoryPreferences::new();
    let running = start(prefs.clone()).await;
    drop(running);

    let released = wait_until(WAIT_TIMEOUT, || {
        OBSERVED_KEYS
            .iter()
            .all(|key| prefs.subscriber_count(*key) == 0)
    })
    .await;
    assert!(released);
}

#[tokio::test]
async fn closed_event_stream_keeps_state_in_sync() -> anyhow::Result<()> {
    let running = start(MemoryPreferences::new()).await;
    let Running {
        harness,
        events,
        handle,
        ..
    } = running;
    drop(events);
    settle().await;

    harness.prefs.set_bool(PrefKey::SpamSwitch, true)?;
    assert!(wait_until(WAIT_TIMEOUT, || handle.state().spam_filter_enabled).await);
    assert!(handle.is_running());
    Ok(())
}

#[tokio::test]
async fn observers_of_the_store_see_writes_from_events() -> anyhow::Result<()> {
    let running = start(MemoryPreferences::new()).await;
    let mut watcher = running.handle.watch_state();

    running.events.send(SettingsEvent::QueueSizeSelected(1)).await?;
    within(watcher.wait_for(|state| state.queue_size.selected_index == 1)).await?;

    let store: &dyn PreferenceStore = &running.harness.prefs;
    assert_eq!(store.get(PrefKey::QueueSize), PrefValue::Int(1));
    Ok(())
}

#[tokio::test]
async fn flush_waits_for_events_and_their_writes() -> anyhow::Result<()> {
    let running = start(MemoryPreferences::new()).await;

    running.events.send(SettingsEvent::DropRowClicked).await?;
    running
        .events
        .send(SettingsEvent::ReceiveWindowSelected(1))
        .await?;
    assert!(within(running.handle.flush()).await);

    let state = running.handle.state();
    assert!(state.drop_enabled);
    assert_eq!(state.receive_window.summary_label, "5 minutes");
    assert_eq!(
        running.harness.prefs.get(PrefKey::ReceiveWindowValue),
        PrefValue::Int(300_000)
    );
    Ok(())
}

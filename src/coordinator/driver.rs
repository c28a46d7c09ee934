// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polling and reconciliation driver.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use tokio::sync::{Mutex, Notify, watch};
use tokio::time::MissedTickBehavior;

use super::{CoordinatorConfig, DriverPhase};
use crate::command::ControlRequest;
use crate::device::{Device, RefreshMode};
use crate::error::Error;
use crate::preferences::{PersistedPreferences, PreferenceStore};
use crate::protocol::Protocol;
use crate::state::{DeviceState, StateChange};
use crate::subscription::{Subscribable, SubscriptionId};

/// Drives periodic polling of one appliance and publishes its state.
///
/// The coordinator owns a [`Device`] and a [`PreferenceStore`]. Each refresh
/// cycle either polls the appliance or, right after a command, re-derives
/// the state from the optimistically patched snapshot and then schedules a
/// real poll.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use zephyr_lan::Device;
/// use zephyr_lan::coordinator::{Coordinator, CoordinatorConfig};
/// use zephyr_lan::preferences::JsonFileStore;
///
/// # async fn example() -> zephyr_lan::Result<()> {
/// let (device, state) = Device::http("192.168.1.100").build().await?;
/// let store = JsonFileStore::for_device("/var/lib/zephyr", state.device_id());
/// let coordinator = Arc::new(Coordinator::new(
///     device,
///     store,
///     CoordinatorConfig::for_host("192.168.1.100"),
/// ));
///
/// let runner = coordinator.clone();
/// let task = tokio::spawn(async move { runner.run().await });
///
/// // ...
///
/// coordinator.shutdown();
/// # let _ = task;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Coordinator<P: Protocol, S: PreferenceStore> {
    device: Device<P>,
    store: S,
    config: CoordinatorConfig,
    phase: RwLock<DriverPhase>,
    /// Set by `status_refresh`; makes the next cycle a reconciliation.
    from_callback: AtomicBool,
    /// Last copy written to (or loaded from) the store; `None` until loaded.
    saved: Mutex<Option<PersistedPreferences>>,
    data: watch::Sender<Option<DeviceState>>,
    last_update_success: AtomicBool,
    refresh_requested: Notify,
    shutdown: watch::Sender<bool>,
}

impl<P: Protocol, S: PreferenceStore> Coordinator<P, S> {
    /// Creates a coordinator.
    ///
    /// If the device was already refreshed (for instance by
    /// [`HttpDeviceBuilder::build`](crate::HttpDeviceBuilder::build)),
    /// its state becomes the initial data.
    #[must_use]
    pub fn new(device: Device<P>, store: S, config: CoordinatorConfig) -> Self {
        let (data, _) = watch::channel(device.state());
        let (shutdown, _) = watch::channel(false);
        Self {
            device,
            store,
            config,
            phase: RwLock::new(DriverPhase::Idle),
            from_callback: AtomicBool::new(false),
            saved: Mutex::new(None),
            data,
            last_update_success: AtomicBool::new(false),
            refresh_requested: Notify::new(),
            shutdown,
        }
    }

    /// Returns the device.
    #[must_use]
    pub fn device(&self) -> &Device<P> {
        &self.device
    }

    /// Returns the preference store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> DriverPhase {
        *self.phase.read()
    }

    /// Returns the last published state.
    #[must_use]
    pub fn data(&self) -> Option<DeviceState> {
        self.data.borrow().clone()
    }

    /// Creates a watch receiver for published states.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Option<DeviceState>> {
        self.data.subscribe()
    }

    /// Returns `true` if the last refresh cycle succeeded.
    #[must_use]
    pub fn last_update_success(&self) -> bool {
        self.last_update_success.load(Ordering::Acquire)
    }

    // ========== Refresh cycle ==========

    /// Runs one refresh cycle.
    ///
    /// A pending reconciliation flag (set by [`status_refresh`](Self::status_refresh))
    /// turns the cycle into a from-cache derivation, after which a real poll
    /// is requested. Preferences are loaded before the first cycle and saved
    /// whenever they differ from the last saved copy.
    ///
    /// On failure the error is published to *update failed* observers and
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns the device or store error that ended the cycle.
    pub async fn refresh(&self) -> Result<DeviceState, Error> {
        let from_cache = self.from_callback.swap(false, Ordering::AcqRel);
        let (mode, phase) = if from_cache {
            (RefreshMode::FromCache, DriverPhase::Reconciling)
        } else {
            (RefreshMode::Fetch, DriverPhase::Polling)
        };
        self.set_phase(phase);

        let result = self.refresh_and_persist(mode).await;
        self.set_phase(DriverPhase::Idle);

        match result {
            Ok(state) => {
                self.publish(&state);
                if from_cache {
                    self.request_refresh();
                }
                Ok(state)
            }
            Err(e) => {
                tracing::warn!(coordinator = %self.config.name, error = %e, "Refresh failed");
                self.last_update_success.store(false, Ordering::Release);
                self.device.callbacks().dispatch_update_failed(&e);
                Err(e)
            }
        }
    }

    async fn refresh_and_persist(&self, mode: RefreshMode) -> Result<DeviceState, Error> {
        let mut saved = self.saved.lock().await;
        if saved.is_none() {
            let loaded = self.store.load().await?.unwrap_or_default();
            tracing::debug!(coordinator = %self.config.name, preferences = ?loaded, "Loaded preferences");
            self.device.set_preferences(loaded.clone());
            *saved = Some(loaded);
        }

        let state = self.device.refresh(mode).await?;

        let current = self.device.preferences();
        if saved.as_ref() != Some(&current) {
            self.store.save(&current).await?;
            tracing::info!(coordinator = %self.config.name, preferences = ?current, "Saved preferences");
            *saved = Some(current);
        }
        Ok(state)
    }

    /// Publishes a from-cache derivation right away and schedules a
    /// reconciliation cycle.
    ///
    /// Called after a command so observers see its effect before the next
    /// poll.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotInitialized` before the first successful poll, or
    /// `Error::Parse` if the patched snapshot no longer derives.
    pub async fn status_refresh(&self) -> Result<DeviceState, Error> {
        tracing::debug!(coordinator = %self.config.name, "Status refresh");
        let state = self.device.refresh(RefreshMode::FromCache).await?;
        self.publish(&state);
        self.from_callback.store(true, Ordering::Release);
        self.request_refresh();
        Ok(state)
    }

    /// Wakes up [`run`](Self::run) for an extra cycle.
    ///
    /// Requests made before the loop gets to them coalesce into one cycle.
    pub fn request_refresh(&self) {
        self.refresh_requested.notify_one();
    }

    /// Applies control intents and reconciles.
    ///
    /// # Errors
    ///
    /// See [`Device::control`] and [`status_refresh`](Self::status_refresh).
    pub async fn control(&self, group_id: &str, request: &ControlRequest) -> Result<(), Error> {
        self.device.control(group_id, request).await?;
        self.status_refresh().await?;
        Ok(())
    }

    // ========== Run loop ==========

    /// Polls on a fixed interval and on request until [`shutdown`](Self::shutdown).
    ///
    /// The first tick fires immediately. Failed cycles are reported to
    /// observers and do not stop the loop.
    pub async fn run(&self) {
        let mut shutdown = self.shutdown.subscribe();
        if *shutdown.borrow_and_update() {
            return;
        }

        let mut ticker = tokio::time::interval(self.config.update_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::debug!(
            coordinator = %self.config.name,
            interval = ?self.config.update_interval,
            "Coordinator started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                () = self.refresh_requested.notified() => {
                    ticker.reset();
                }
                _ = shutdown.changed() => break,
            }
            // Errors were already published to observers.
            let _ = self.refresh().await;
        }

        tracing::debug!(coordinator = %self.config.name, "Coordinator stopped");
    }

    /// Stops [`run`](Self::run) after the current cycle.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    // ========== Diagnostics ==========

    /// Returns a JSON dump of the published data, the raw snapshot and the
    /// preferences.
    #[must_use]
    pub fn diagnostics(&self) -> serde_json::Value {
        let mut coordinator_data = serde_json::Map::new();
        if let Some(state) = self.data() {
            coordinator_data.insert(
                state.group_id().to_string(),
                serde_json::to_value(&state).unwrap_or_default(),
            );
        }
        let raw_data = self
            .device
            .raw_data()
            .and_then(|raw| serde_json::to_value(raw.as_ref()).ok())
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));
        serde_json::json!({
            "coordinator_data": coordinator_data,
            "raw_data": raw_data,
            "preferences": serde_json::to_value(self.device.preferences()).unwrap_or_default(),
        })
    }

    // ========== Helpers ==========

    fn set_phase(&self, phase: DriverPhase) {
        let previous = std::mem::replace(&mut *self.phase.write(), phase);
        if previous != phase {
            tracing::debug!(coordinator = %self.config.name, from = %previous, to = %phase, "Phase change");
        }
    }

    fn publish(&self, state: &DeviceState) {
        self.last_update_success.store(true, Ordering::Release);
        self.data.send_replace(Some(state.clone()));
        self.device.callbacks().dispatch_updated(state);
    }
}

impl<P: Protocol, S: PreferenceStore> Subscribable for Coordinator<P, S> {
    fn on_updated<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceState) + Send + Sync + 'static,
    {
        self.device.callbacks().on_updated(callback)
    }

    fn on_update_failed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Error) + Send + Sync + 'static,
    {
        self.device.callbacks().on_update_failed(callback)
    }

    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        self.device.callbacks().on_state_changed(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.device.callbacks().unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::DeviceCommand;
    use crate::error::ProtocolError;
    use crate::preferences::MemoryStore;
    use crate::protocol::CommandResponse;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    const PAGE: &str = "\
<p><b>Device ID:</b> A1B2C3</p>
<p><b>Version:</b> 3.2.0</p>
<p><b>Model:</b> BSK-Zephyr-Mini-V1</p>
<p><b>SSID:</b> home</p>
<p><b>RSSI:</b> -71 dBm</p>
<p><b>IP:</b> 192.168.1.51</p>
<p><b>Power:</b> 1</p>
<p><b>Buzzer:</b> 0</p>
<p><b>Fan Speed:</b> 30</p>
<p><b>Operation Mode:</b> intake</p>
<p><b>Temperature:</b> 19.0 °C</p>
<p><b>Humidity:</b> 61 %</p>
<p><b>Set Humidity:</b> 70</p>
<p><b>Humidity Boost:</b> 0</p>
<p><b>Filter Timer:</b> 10 h</p>
<p><b>Hygiene Status:</b> 0</p>";

    #[derive(Debug)]
    struct FakeProtocol {
        page: parking_lot::Mutex<String>,
        fetches: AtomicUsize,
    }

    impl FakeProtocol {
        fn new(page: &str) -> Self {
            Self {
                page: parking_lot::Mutex::new(page.to_string()),
                fetches: AtomicUsize::new(0),
            }
        }
    }

    impl Protocol for FakeProtocol {
        async fn fetch_status(&self) -> Result<String, ProtocolError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.page.lock().clone())
        }

        async fn send_command(
            &self,
            _command: &DeviceCommand,
        ) -> Result<CommandResponse, ProtocolError> {
            Ok(CommandResponse::new(200, String::new()))
        }
    }

    fn coordinator(store: MemoryStore) -> Coordinator<FakeProtocol, MemoryStore> {
        Coordinator::new(
            Device::new(FakeProtocol::new(PAGE)),
            store,
            CoordinatorConfig::for_host("test"),
        )
    }

    #[tokio::test]
    async fn first_refresh_loads_and_saves_once() {
        let coordinator = coordinator(MemoryStore::new());

        coordinator.refresh().await.unwrap();
        coordinator.refresh().await.unwrap();

        assert_eq!(coordinator.store().saves(), 1);
        assert_eq!(
            coordinator.store().stored(),
            Some(PersistedPreferences {
                humidity_boost_level_last: Some(70),
                humidity_boost_level_max: Some(98),
            })
        );
        assert!(coordinator.last_update_success());
        assert_eq!(coordinator.phase(), DriverPhase::Idle);
    }

    #[tokio::test]
    async fn unchanged_preferences_are_not_saved() {
        let coordinator = coordinator(MemoryStore::with_preferences(PersistedPreferences {
            humidity_boost_level_last: Some(70),
            humidity_boost_level_max: Some(98),
        }));

        coordinator.refresh().await.unwrap();

        assert_eq!(coordinator.store().saves(), 0);
    }

    #[tokio::test]
    async fn loaded_preferences_feed_derivation() {
        let page = PAGE.replace("<b>Set Humidity:</b> 70", "<b>Set Humidity:</b> 99");
        let coordinator = Coordinator::new(
            Device::new(FakeProtocol::new(&page)),
            MemoryStore::with_preferences(PersistedPreferences {
                humidity_boost_level_last: Some(52),
                humidity_boost_level_max: None,
            }),
            CoordinatorConfig::default(),
        );

        let state = coordinator.refresh().await.unwrap();

        assert!(!state.humidity_boost_enabled());
        assert_eq!(state.humidity_boost_level(), 52);
        assert_eq!(coordinator.store().saves(), 1);
    }

    #[tokio::test]
    async fn status_refresh_reconciles_then_polls() {
        let coordinator = coordinator(MemoryStore::new());
        coordinator.refresh().await.unwrap();
        let fetches = || coordinator.device().protocol().fetches.load(Ordering::SeqCst);
        assert_eq!(fetches(), 1);

        let request = ControlRequest::new().with_power(false);
        coordinator.control("A1B2C3_group", &request).await.unwrap();
        assert!(!coordinator.data().unwrap().power());
        assert_eq!(fetches(), 1);

        // Reconciliation cycle: no fetch, then a poll is requested.
        let state = coordinator.refresh().await.unwrap();
        assert!(!state.power());
        assert_eq!(fetches(), 1);

        // The follow-up poll returns whatever the appliance reports.
        let state = coordinator.refresh().await.unwrap();
        assert!(state.power());
        assert_eq!(fetches(), 2);
    }

    #[tokio::test]
    async fn failure_is_published() {
        let coordinator = Coordinator::new(
            Device::new(FakeProtocol::new("<html>Login</html>")),
            MemoryStore::new(),
            CoordinatorConfig::default(),
        );
        let failures = Arc::new(AtomicUsize::new(0));
        let counter = failures.clone();
        coordinator.on_update_failed(move |error| {
            assert!(matches!(error, Error::Parse(_)));
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(coordinator.refresh().await.is_err());

        assert_eq!(failures.load(Ordering::SeqCst), 1);
        assert!(!coordinator.last_update_success());
        assert!(coordinator.data().is_none());
        assert_eq!(coordinator.phase(), DriverPhase::Idle);
    }

    #[tokio::test]
    async fn observers_see_each_published_state() {
        let coordinator = coordinator(MemoryStore::new());
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let id = coordinator.on_updated(move |state| {
            seen_clone.lock().push(state.fan_speed());
        });

        coordinator.refresh().await.unwrap();
        coordinator
            .control("A1B2C3_group", &ControlRequest::new().with_fan_speed(80))
            .await
            .unwrap();
        assert!(coordinator.unsubscribe(id));
        coordinator.refresh().await.unwrap();

        assert_eq!(*seen.lock(), vec![30, 80]);
    }

    #[tokio::test]
    async fn diagnostics_dump() {
        let coordinator = coordinator(MemoryStore::new());
        coordinator.refresh().await.unwrap();

        let dump = coordinator.diagnostics();

        assert_eq!(dump["coordinator_data"]["A1B2C3_group"]["device_name"], "BSK-Zephyr-Mini");
        assert_eq!(dump["coordinator_data"]["A1B2C3_group"]["_id"], "A1B2C3");
        assert_eq!(dump["raw_data"]["operation_mode"], "intake");
        assert_eq!(dump["raw_data"]["humidity_boost_level_raw"], 70);
        assert_eq!(dump["preferences"]["humidity_boost_level_max"], 98);
    }

    #[tokio::test(start_paused = true)]
    async fn run_polls_on_interval_until_shutdown() {
        let coordinator = Arc::new(coordinator(MemoryStore::new()));
        let runner = coordinator.clone();
        let task = tokio::spawn(async move { runner.run().await });

        tokio::time::sleep(CoordinatorConfig::DEFAULT_UPDATE_INTERVAL * 2 + std::time::Duration::from_secs(1)).await;
        coordinator.shutdown();
        task.await.unwrap();

        assert_eq!(coordinator.device().protocol().fetches.load(Ordering::SeqCst), 3);
    }
}

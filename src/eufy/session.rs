use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::commands::CommandBuilder;
use super::envelope::Target;
use super::state::ApplianceState;
use super::tracker::ApplianceTracker;
use super::transport::{self, Connection, Credentials, LinkState, TransportError, TransportEvent};
use super::{DeviceCommand, DpsMap, Params};

const INITIAL_BACKOFF: Duration = Duration::from_secs(5);
const MAX_BACKOFF: Duration = Duration::from_secs(60);
const COMMAND_QUEUE: usize = 50;

type StateCallback = Box<dyn Fn(&ApplianceState) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub name: String,
    pub target: Target,
    pub openudid: String,
    pub credentials_file: PathBuf,
    pub ca_file: PathBuf,
    pub dock_debounce: Duration,
    pub seed: Option<DpsMap>,
}

/// Host-side handle to a running [`Session`].
#[derive(Clone)]
pub struct SessionHandle {
    name: String,
    commands: mpsc::Sender<DeviceCommand>,
    state: watch::Receiver<ApplianceState>,
    link: watch::Receiver<LinkState>,
    callbacks: Arc<Mutex<Vec<StateCallback>>>,
}

impl SessionHandle {
    /// Queues an action. Never waits; a full queue drops the command.
    pub fn send(&self, action: &str, params: Params) {
        let cmd = DeviceCommand {
            action: action.to_string(),
            params,
        };
        if let Err(e) = self.commands.try_send(cmd) {
            warn!("Dropping {} command for {}: {}", action, self.name, e);
        }
    }

    pub fn current_state(&self) -> ApplianceState {
        self.state.borrow().clone()
    }

    /// Runs `callback` now with the current state, then on every visible change.
    pub fn on_state_changed<F>(&self, callback: F)
    where
        F: Fn(&ApplianceState) + Send + Sync + 'static,
    {
        callback(&self.current_state());
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(callback));
    }

    pub fn link_state(&self) -> watch::Receiver<LinkState> {
        self.link.clone()
    }
}

enum SessionEnd {
    /// Every handle is gone.
    Shutdown,
    /// An established connection dropped.
    Lost(String),
}

/// Owns one appliance: its cloud connection and its tracker.
pub struct Session {
    settings: SessionSettings,
    tracker: ApplianceTracker,
    commands: mpsc::Receiver<DeviceCommand>,
    state: watch::Sender<ApplianceState>,
    link: watch::Sender<LinkState>,
    callbacks: Arc<Mutex<Vec<StateCallback>>>,
}

impl Session {
    pub fn new(settings: SessionSettings) -> (Session, SessionHandle) {
        let mut tracker = ApplianceTracker::new(settings.dock_debounce);
        let initial = match &settings.seed {
            Some(dps) if !dps.is_empty() => {
                info!("Seeding {} from {} cached DPS", settings.name, dps.len());
                tracker.seed(dps).state
            }
            _ => tracker.visible(),
        };

        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_QUEUE);
        let (state_tx, state_rx) = watch::channel(initial);
        let (link_tx, link_rx) = watch::channel(LinkState::Connecting);
        let callbacks = Arc::new(Mutex::new(Vec::new()));

        let handle = SessionHandle {
            name: settings.name.clone(),
            commands: cmd_tx,
            state: state_rx,
            link: link_rx,
            callbacks: Arc::clone(&callbacks),
        };
        let session = Session {
            settings,
            tracker,
            commands: cmd_rx,
            state: state_tx,
            link: link_tx,
            callbacks,
        };
        (session, handle)
    }

    /// Connects, drives the connection until it drops, and reconnects with
    /// backoff. Returns once every handle has been dropped.
    pub async fn run(mut self) {
        let mut backoff = INITIAL_BACKOFF;

        loop {
            info!(
                "Connecting to cloud for {} ({})",
                self.settings.name, self.settings.target.device_id
            );
            self.link.send_replace(LinkState::Connecting);

            let delay = match self.run_session().await {
                Ok(SessionEnd::Shutdown) => {
                    info!("Session for {} stopped", self.settings.name);
                    self.link
                        .send_replace(LinkState::Disconnected("shutdown".into()));
                    return;
                }
                Ok(SessionEnd::Lost(reason)) => {
                    warn!(
                        "Connection for {} lost: {}. Reconnecting in {:?}",
                        self.settings.name, reason, INITIAL_BACKOFF
                    );
                    self.link.send_replace(LinkState::Disconnected(reason));
                    backoff = INITIAL_BACKOFF;
                    backoff
                }
                Err(e) => {
                    error!(
                        "Session for {} failed: {}. Reconnecting in {:?}",
                        self.settings.name, e, backoff
                    );
                    self.link.send_replace(LinkState::Disconnected(e.to_string()));
                    let delay = backoff;
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                    delay
                }
            };

            if !self.idle(delay).await {
                info!("Session for {} stopped", self.settings.name);
                return;
            }
        }
    }

    async fn run_session(&mut self) -> Result<SessionEnd, TransportError> {
        // re-read every attempt so refreshed credentials are picked up
        let creds = Credentials::load(&self.settings.credentials_file)?;
        let ca = transport::read_ca(&self.settings.ca_file)?;

        let (events_tx, mut events) = mpsc::unbounded_channel();
        let mut conn = Connection::open(
            &creds,
            &self.settings.openudid,
            ca,
            &self.settings.target,
            events_tx,
        );
        drop(creds);
        let mut connected = false;

        loop {
            let deadline = self.tracker.deadline();
            tokio::select! {
                event = events.recv() => match event {
                    Some(TransportEvent::Connected) => {
                        info!("Cloud session for {} established", self.settings.name);
                        connected = true;
                        self.link.send_replace(LinkState::Connected);
                    }
                    Some(TransportEvent::Dps(dps)) => self.apply(&dps),
                    Some(TransportEvent::Closed(reason)) => {
                        return if connected {
                            Ok(SessionEnd::Lost(reason))
                        } else {
                            Err(TransportError::Closed(reason))
                        };
                    }
                    None => return Err(TransportError::Closed("network task ended".into())),
                },
                _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.fire();
                }
                cmd = self.commands.recv() => match cmd {
                    Some(cmd) => self.dispatch(&mut conn, cmd).await,
                    None => {
                        conn.close().await;
                        return Ok(SessionEnd::Shutdown);
                    }
                },
            }
        }
    }

    /// Waits out the reconnect delay. Dock commits still happen; commands are
    /// dropped. Returns false when every handle is gone.
    async fn idle(&mut self, delay: Duration) -> bool {
        let until = Instant::now() + delay;
        loop {
            let deadline = self.tracker.deadline();
            tokio::select! {
                _ = tokio::time::sleep_until(until) => return true,
                _ = tokio::time::sleep_until(deadline.unwrap_or(until)), if deadline.is_some() => {
                    self.fire();
                }
                cmd = self.commands.recv() => match cmd {
                    Some(cmd) => warn!(
                        "Not connected, dropping {} command for {}",
                        cmd.action, self.settings.name
                    ),
                    None => return false,
                },
            }
        }
    }

    fn apply(&mut self, dps: &DpsMap) {
        let visible = self.tracker.apply(dps, Instant::now());
        debug!("{} updated fields: {:?}", self.settings.name, visible.changed);
        self.publish(visible.state);
    }

    fn fire(&mut self) {
        if let Some(state) = self.tracker.fire(Instant::now()) {
            debug!(
                "{} dock status settled: {:?}",
                self.settings.name, state.dock_status
            );
            self.publish(state);
        }
    }

    fn publish(&self, state: ApplianceState) {
        if *self.state.borrow() == state {
            return;
        }
        for callback in self
            .callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
        {
            callback(&state);
        }
        self.state.send_replace(state);
    }

    async fn dispatch(&mut self, conn: &mut Connection, cmd: DeviceCommand) {
        if self.tracker.generation().is_none() {
            debug!("No DPS seen from {} yet, assuming the novel schema", self.settings.name);
        }
        let params = prepare_params(&cmd.action, cmd.params, self.tracker.computed());
        let builder = CommandBuilder::new(self.tracker.schema().generation);
        let writes = builder.build(&cmd.action, &params);
        info!(
            "Sending {} to {} ({} write(s))",
            cmd.action,
            self.settings.name,
            writes.len()
        );
        for write in &writes {
            if let Err(e) = conn.publish(write).await {
                warn!("Failed to send {} to {}: {}", cmd.action, self.settings.name, e);
                break;
            }
        }
    }
}

/// Fills in what the host may leave out: the current map for room actions,
/// and the rest of the dock automation settings for `set_auto_cfg`.
fn prepare_params(action: &str, mut params: Params, state: &ApplianceState) -> Params {
    match action.trim().to_ascii_lowercase().as_str() {
        "room_clean" | "set_room_custom" => {
            if !params.contains_key("map_id") && state.map_id != 0 {
                params.insert("map_id".into(), Value::from(state.map_id));
            }
            params
        }
        "set_auto_cfg" => {
            let current = state.dock_auto_cfg.unwrap_or_default();
            let mut merged = match serde_json::to_value(current) {
                Ok(Value::Object(map)) => map,
                _ => Params::new(),
            };
            merged.extend(params);
            merged
        }
        _ => params,
    }
}

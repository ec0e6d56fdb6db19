mod config;
mod eufy;
mod mqtt;

use std::collections::HashMap;

use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

use eufy::envelope::Target;
use eufy::session::{Session, SessionHandle, SessionSettings};
use eufy::transport::LinkState;
use eufy::{DeviceUpdate, Params};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match config::Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Starting eufy-clean-mqtt bridge (mqtt={}:{}, devices={})",
        config.mqtt.broker_host,
        config.mqtt.broker_port,
        config.devices.len(),
    );

    for device in &config.devices {
        info!(
            "  Device: {} ({} {}), {} cached DPS",
            device.name,
            device.device_model,
            device.device_id,
            device.seed.as_ref().map_or(0, |s| s.len()),
        );
    }

    // Channels
    let (mqtt_cmd_tx, mut mqtt_cmd_rx) = mpsc::channel::<mqtt::client::MqttMessage>(100);
    let (update_tx, update_rx) = mpsc::channel::<DeviceUpdate>(200);

    // Host broker loop: command intake and state publishing
    let mqtt_client = mqtt::client::MqttClient::new(&config);
    let mqtt_handle = tokio::spawn(async move {
        mqtt_client.run(mqtt_cmd_tx, update_rx).await;
    });

    // One cloud session per appliance, keyed by topic_name for command routing
    let mut sessions: HashMap<String, SessionHandle> = HashMap::new();
    let mut tasks = Vec::new();

    for device in &config.devices {
        let (session, handle) = Session::new(SessionSettings {
            name: device.name.clone(),
            target: Target {
                device_id: device.device_id.clone(),
                device_model: device.device_model.clone(),
            },
            openudid: config.eufy.openudid.clone(),
            credentials_file: config.eufy.credentials_file.clone(),
            ca_file: config.eufy.ca_file.clone(),
            dock_debounce: config.eufy.dock_debounce(),
            seed: device.seed.clone(),
        });

        let state_tx = update_tx.clone();
        let topic_name = device.topic_name.clone();
        handle.on_state_changed(move |state| {
            let value = match serde_json::to_string(state) {
                Ok(v) => v,
                Err(e) => {
                    warn!("Failed to serialize state for {}: {}", topic_name, e);
                    return;
                }
            };
            let update = DeviceUpdate {
                topic_name: topic_name.clone(),
                channel: "state",
                value,
            };
            if let Err(e) = state_tx.try_send(update) {
                warn!("Dropping state update for {}: {}", topic_name, e);
            }
        });

        tasks.push(tokio::spawn(forward_link(
            device.topic_name.clone(),
            handle.link_state(),
            update_tx.clone(),
        )));
        tasks.push(tokio::spawn(session.run()));
        sessions.insert(device.topic_name.clone(), handle);
    }

    // Only sessions and forwarders hold senders from here on
    drop(update_tx);

    let topic_prefix = config.mqtt.topic_prefix.clone();

    // Main loop: route MQTT commands to sessions + handle shutdown
    loop {
        tokio::select! {
            Some(msg) = mqtt_cmd_rx.recv() => {
                // Parse topic: {prefix}/{topic_name}/command/{action}
                let Some((topic_name, action)) = parse_command_topic(&msg.topic, &topic_prefix) else {
                    continue;
                };
                let Some(handle) = sessions.get(topic_name) else {
                    warn!("Unknown device in command topic: {}", topic_name);
                    continue;
                };
                match parse_params(&msg.payload) {
                    Ok(params) => handle.send(action, params),
                    Err(e) => warn!("Ignoring {} command for {}: {}", action, topic_name, e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received SIGINT, shutting down");
                break;
            }
            _ = async {
                let mut sigterm = tokio::signal::unix::signal(
                    tokio::signal::unix::SignalKind::terminate()
                ).expect("Failed to register SIGTERM handler");
                sigterm.recv().await;
            } => {
                info!("Received SIGTERM, shutting down");
                break;
            }
        }
    }

    // Cleanup
    for task in tasks {
        task.abort();
    }
    mqtt_handle.abort();
    info!("eufy-clean-mqtt bridge stopped");
}

/// Mirrors a session's link state onto the host broker.
async fn forward_link(
    topic_name: String,
    mut link: watch::Receiver<LinkState>,
    update_tx: mpsc::Sender<DeviceUpdate>,
) {
    loop {
        let label = link.borrow_and_update().label();
        let update = DeviceUpdate {
            topic_name: topic_name.clone(),
            channel: "link",
            value: label.to_string(),
        };
        if update_tx.send(update).await.is_err() || link.changed().await.is_err() {
            return;
        }
    }
}

/// Parse a command topic into (topic_name, action).
/// Expected format: {prefix}/{topic_name}/command/{action}
fn parse_command_topic<'a>(topic: &'a str, prefix: &str) -> Option<(&'a str, &'a str)> {
    let rest = topic.strip_prefix(prefix)?.strip_prefix('/')?;
    // rest = "{topic_name}/command/{action}"
    let (topic_name, rest) = rest.split_once('/')?;
    let action = rest.strip_prefix("command/")?;
    if topic_name.is_empty() || action.is_empty() || action.contains('/') {
        return None;
    }
    Some((topic_name, action))
}

/// Command payloads are a JSON object of parameters; empty means none.
fn parse_params(payload: &str) -> Result<Params, serde_json::Error> {
    if payload.trim().is_empty() {
        return Ok(Params::new());
    }
    serde_json::from_str(payload)
}

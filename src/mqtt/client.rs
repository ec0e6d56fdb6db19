use std::collections::HashMap;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, Incoming, MqttOptions, QoS};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::eufy::DeviceUpdate;

pub struct MqttMessage {
    pub topic: String,
    pub payload: String,
}

/// Connection to the local (host) broker.
pub struct MqttClient {
    client: AsyncClient,
    eventloop: EventLoop,
    config: Config,
}

impl MqttClient {
    pub fn new(config: &Config) -> Self {
        let mut mqttopts = MqttOptions::new(
            &config.mqtt.client_id,
            &config.mqtt.broker_host,
            config.mqtt.broker_port,
        );
        mqttopts.set_keep_alive(Duration::from_secs(30));
        // full state documents carry the raw DPS mirror
        mqttopts.set_max_packet_size(256 * 1024, 256 * 1024);

        if let (Some(user), Some(pass)) = (&config.mqtt.username, &config.mqtt.password) {
            mqttopts.set_credentials(user, pass);
        }

        mqttopts.set_last_will(rumqttc::LastWill::new(
            lwt_topic(config),
            "offline".as_bytes().to_vec(),
            QoS::AtLeastOnce,
            true,
        ));

        let (client, eventloop) = AsyncClient::new(mqttopts, 100);

        Self {
            client,
            eventloop,
            config: config.clone(),
        }
    }

    /// Run the host broker loop. Announces the bridge and subscribes to
    /// command topics on every connect, forwards incoming publishes through
    /// `command_tx`, and publishes appliance updates from `update_rx` as
    /// retained messages, skipping repeats.
    pub async fn run(
        mut self,
        command_tx: mpsc::Sender<MqttMessage>,
        mut update_rx: mpsc::Receiver<DeviceUpdate>,
    ) {
        let mut last_values: HashMap<String, String> = HashMap::new();

        loop {
            tokio::select! {
                event = self.eventloop.poll() => match event {
                    Ok(Event::Incoming(Incoming::ConnAck(_))) => {
                        info!("Connected to MQTT broker");
                        // the request queue only drains while poll() runs
                        tokio::spawn(announce(self.client.clone(), self.config.clone()));
                    }
                    Ok(Event::Incoming(Incoming::Publish(publish))) => {
                        let msg = MqttMessage {
                            topic: publish.topic.clone(),
                            payload: String::from_utf8_lossy(&publish.payload).to_string(),
                        };
                        if command_tx.send(msg).await.is_err() {
                            warn!("Command channel closed");
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!("MQTT connection error: {}. Reconnecting...", e);
                        tokio::time::sleep(Duration::from_secs(5)).await;
                    }
                },
                Some(update) = update_rx.recv() => {
                    let topic = update_topic(&self.config, &update);
                    if last_values.get(&topic) == Some(&update.value) {
                        continue;
                    }
                    debug!("Publishing {} ({} bytes)", topic, update.value.len());
                    match self
                        .client
                        .try_publish(&topic, QoS::AtMostOnce, true, update.value.as_bytes())
                    {
                        Ok(()) => {
                            last_values.insert(topic, update.value);
                        }
                        Err(e) => warn!("Failed to publish {}: {}", topic, e),
                    }
                }
            }
        }
    }
}

/// Marks every device online and subscribes to its command topics.
async fn announce(client: AsyncClient, config: Config) {
    for device in &config.devices {
        let status = config.device_status_topic(&device.topic_name);
        if let Err(e) = client
            .publish(&status, QoS::AtLeastOnce, true, "online")
            .await
        {
            error!("Failed to publish online status: {}", e);
        }

        let commands = config.device_command_topic(&device.topic_name);
        if let Err(e) = client.subscribe(&commands, QoS::AtLeastOnce).await {
            error!("Failed to subscribe to {}: {}", commands, e);
        }
    }
}

/// Single-device setups share the device's status topic; otherwise the
/// bridge gets its own.
fn lwt_topic(config: &Config) -> String {
    match config.devices.as_slice() {
        [device] => config.device_status_topic(&device.topic_name),
        _ => format!("{}/bridge_status", config.mqtt.topic_prefix),
    }
}

fn update_topic(config: &Config, update: &DeviceUpdate) -> String {
    format!(
        "{}/{}/{}",
        config.mqtt.topic_prefix, update.topic_name, update.channel
    )
}

use serde::Deserialize;
use std::collections::HashSet;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::eufy::DpsMap;

#[derive(Debug, Clone)]
pub struct Config {
    pub mqtt: MqttConfig,
    pub eufy: EufyConfig,
    pub devices: Vec<DeviceConfig>,
}

#[derive(Debug, Clone)]
pub struct MqttConfig {
    pub broker_host: String,
    pub broker_port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub topic_prefix: String,
    pub client_id: String,
}

#[derive(Debug, Clone)]
pub struct EufyConfig {
    /// Credential bundle, re-read on every reconnect.
    pub credentials_file: PathBuf,
    pub ca_file: PathBuf,
    pub openudid: String,
    pub dock_debounce_ms: u64,
}

impl EufyConfig {
    pub fn dock_debounce(&self) -> Duration {
        Duration::from_millis(self.dock_debounce_ms)
    }
}

#[derive(Debug, Clone)]
pub struct DeviceConfig {
    pub device_id: String,
    pub device_model: String,
    pub name: String,
    /// Sanitized name for use in MQTT topics (lowercase, spaces to underscores)
    pub topic_name: String,
    /// Cached DPS snapshot applied before the first push arrives.
    pub seed: Option<DpsMap>,
}

// Device list as written by the cloud login helper
#[derive(Deserialize)]
struct RawDevice {
    device_id: String,
    device_model: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    dps: Option<DpsMap>,
}

fn env_required(key: &str) -> Result<String, String> {
    env::var(key).map_err(|_| format!("{key} environment variable is required"))
}

fn env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_or_default<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let devices_file = env_or_default("DEVICES_FILE", "devices.json".to_string());
        let devices = load_devices(&devices_file)?;

        let config = Self {
            mqtt: MqttConfig {
                broker_host: env_required("MQTT_BROKER_HOST")?,
                broker_port: env_or_default("MQTT_BROKER_PORT", 1883),
                username: env_optional("MQTT_USERNAME"),
                password: env_optional("MQTT_PASSWORD"),
                topic_prefix: env_or_default("MQTT_TOPIC_PREFIX", "eufy".to_string()),
                client_id: env_or_default("MQTT_CLIENT_ID", "eufy-clean-mqtt".to_string()),
            },
            eufy: EufyConfig {
                credentials_file: env_or_default(
                    "EUFY_CREDENTIALS_FILE",
                    PathBuf::from("credentials.json"),
                ),
                ca_file: env_or_default(
                    "EUFY_CA_FILE",
                    PathBuf::from("/etc/ssl/certs/ca-certificates.crt"),
                ),
                openudid: env_required("EUFY_OPENUDID")?,
                dock_debounce_ms: env_or_default("DOCK_DEBOUNCE_MS", 2000),
            },
            devices,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.mqtt.broker_host.is_empty() {
            return Err("MQTT_BROKER_HOST must not be empty".into());
        }
        if self.eufy.openudid.is_empty() {
            return Err("EUFY_OPENUDID must not be empty".into());
        }
        if self.devices.is_empty() {
            return Err("No devices found in devices file".into());
        }
        let mut seen = HashSet::new();
        for device in &self.devices {
            if device.topic_name.is_empty() {
                return Err(format!("Device {} has no usable topic name", device.device_id));
            }
            if !seen.insert(device.topic_name.as_str()) {
                return Err(format!("Duplicate device topic name: {}", device.topic_name));
            }
        }
        Ok(())
    }

    pub fn device_status_topic(&self, topic_name: &str) -> String {
        format!("{}/{}/bridge_status", self.mqtt.topic_prefix, topic_name)
    }

    pub fn device_command_topic(&self, topic_name: &str) -> String {
        format!("{}/{}/command/#", self.mqtt.topic_prefix, topic_name)
    }
}

fn load_devices(path: &str) -> Result<Vec<DeviceConfig>, String> {
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read {path}: {e}"))?;

    let raw_devices: Vec<RawDevice> =
        serde_json::from_str(&content).map_err(|e| format!("Failed to parse {path}: {e}"))?;

    raw_devices
        .into_iter()
        .map(|raw| {
            if raw.device_id.is_empty() || raw.device_model.is_empty() {
                return Err(format!(
                    "Device entry needs both device_id and device_model (got {:?}/{:?})",
                    raw.device_id, raw.device_model
                ));
            }
            let name = raw.name.unwrap_or_else(|| raw.device_id.clone());
            let topic_name = sanitize_topic_name(&name);

            Ok(DeviceConfig {
                name,
                device_id: raw.device_id,
                device_model: raw.device_model,
                topic_name,
                seed: raw.dps,
            })
        })
        .collect()
}

/// Convert a device name into a safe MQTT topic segment.
/// "Downstairs Vac" → "downstairs_vac"
fn sanitize_topic_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim_matches('_')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn devices_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn config(devices: Vec<DeviceConfig>) -> Config {
        Config {
            mqtt: MqttConfig {
                broker_host: "localhost".into(),
                broker_port: 1883,
                username: None,
                password: None,
                topic_prefix: "eufy".into(),
                client_id: "eufy-clean-mqtt".into(),
            },
            eufy: EufyConfig {
                credentials_file: "credentials.json".into(),
                ca_file: "ca.pem".into(),
                openudid: "udid".into(),
                dock_debounce_ms: 2000,
            },
            devices,
        }
    }

    #[test]
    fn sanitizes_names() {
        assert_eq!(sanitize_topic_name("Downstairs Vac"), "downstairs_vac");
        assert_eq!(sanitize_topic_name("  X-10 (2) "), "x_10__2");
        assert_eq!(sanitize_topic_name("!!!"), "");
    }

    #[test]
    fn loads_devices_with_seed() {
        let file = devices_file(
            r#"[
                {"device_id": "AMP123", "device_model": "T2320", "name": "Downstairs Vac",
                 "dps": {"163": "90", "160": false}},
                {"device_id": "AMP456", "device_model": "T2261"}
            ]"#,
        );
        let devices = load_devices(file.path().to_str().unwrap()).unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].topic_name, "downstairs_vac");
        assert_eq!(devices[0].seed.as_ref().unwrap()["163"], serde_json::json!("90"));
        assert_eq!(devices[1].name, "AMP456");
        assert_eq!(devices[1].topic_name, "amp456");
        assert!(devices[1].seed.is_none());
    }

    #[test]
    fn device_file_errors() {
        assert!(load_devices("/nonexistent/devices.json").unwrap_err().contains("Failed to read"));

        let file = devices_file(r#"[{"device_id": "AMP123"}]"#);
        let err = load_devices(file.path().to_str().unwrap()).unwrap_err();
        assert!(err.contains("Failed to parse"));

        let file = devices_file(r#"[{"device_id": "", "device_model": "T2320"}]"#);
        assert!(load_devices(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn validation() {
        let device = |name: &str| DeviceConfig {
            device_id: "AMP".into(),
            device_model: "T2320".into(),
            name: name.into(),
            topic_name: sanitize_topic_name(name),
            seed: None,
        };
        assert!(config(vec![device("One")]).validate().is_ok());
        assert!(config(vec![]).validate().is_err());
        assert!(config(vec![device("Vac 1"), device("vac_1")]).validate().is_err());
        assert!(config(vec![device("???")]).validate().is_err());

        let mut c = config(vec![device("One")]);
        c.eufy.openudid.clear();
        assert!(c.validate().is_err());
    }

    #[test]
    fn topics() {
        let c = config(vec![]);
        assert_eq!(c.device_status_topic("vac"), "eufy/vac/bridge_status");
        assert_eq!(c.device_command_topic("vac"), "eufy/vac/command/#");
        assert_eq!(c.eufy.dock_debounce(), Duration::from_millis(2000));
    }
}

//! Two-layer JSON envelope used on the cloud broker.
//!
//! Outbound: an outer object with a fixed `head` and a `payload` string that
//! holds the inner `{account_id, data, device_sn, protocol, t}` object as JSON
//! text. Inbound messages carry the same shape, but `payload` may be an
//! object or a string.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::DpsMap;

const COMMAND_CODE: u32 = 65537;
const COMMAND_STATUS: u32 = 2;
const PROTOCOL: u32 = 2;
const VERSION: &str = "1.0.0.1";

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} is not a JSON object")]
    NotAnObject(&'static str),
}

/// Account side of the client identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub app_name: String,
    pub openudid: String,
}

impl Identity {
    /// Stable id used in the envelope head.
    pub fn client_id(&self) -> String {
        format!(
            "android-{}-eufy_android_{}_{}",
            self.app_name, self.openudid, self.user_id
        )
    }

    /// MQTT client id for one connection instance.
    pub fn connection_id(&self, epoch_millis: u64) -> String {
        format!("{}-{}", self.client_id(), epoch_millis)
    }
}

/// The appliance a session talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub device_id: String,
    pub device_model: String,
}

impl Target {
    pub fn request_topic(&self) -> String {
        format!("cmd/eufy_home/{}/{}/req", self.device_model, self.device_id)
    }

    pub fn response_topic(&self) -> String {
        format!("cmd/eufy_home/{}/{}/res", self.device_model, self.device_id)
    }
}

#[derive(Serialize)]
struct Head<'a> {
    client_id: &'a str,
    cmd: u32,
    cmd_status: u32,
    msg_seq: u64,
    seed: &'a str,
    sess_id: &'a str,
    sign_code: u32,
    timestamp: u64,
    version: &'a str,
}

#[derive(Serialize)]
struct Outbound<'a> {
    head: Head<'a>,
    payload: String,
}

#[derive(Serialize)]
struct Inner<'a> {
    account_id: &'a str,
    data: &'a DpsMap,
    device_sn: &'a str,
    protocol: u32,
    t: u64,
}

/// Wraps DPS writes for one appliance. Sequence numbers start at 1 and
/// increase with every wrapped message.
#[derive(Debug)]
pub struct Envelope {
    client_id: String,
    account_id: String,
    device_sn: String,
    seq: u64,
}

impl Envelope {
    pub fn new(identity: &Identity, target: &Target) -> Self {
        Self {
            client_id: identity.client_id(),
            account_id: identity.user_id.clone(),
            device_sn: target.device_id.clone(),
            seq: 0,
        }
    }

    pub fn wrap(&mut self, data: &DpsMap, epoch_millis: u64) -> Result<Vec<u8>, EnvelopeError> {
        let payload = serde_json::to_string(&Inner {
            account_id: &self.account_id,
            data,
            device_sn: &self.device_sn,
            protocol: PROTOCOL,
            t: epoch_millis,
        })?;
        self.seq += 1;
        let outer = Outbound {
            head: Head {
                client_id: &self.client_id,
                cmd: COMMAND_CODE,
                cmd_status: COMMAND_STATUS,
                msg_seq: self.seq,
                seed: "",
                sess_id: &self.client_id,
                sign_code: 0,
                timestamp: epoch_millis,
                version: VERSION,
            },
            payload,
        };
        Ok(serde_json::to_vec(&outer)?)
    }
}

/// Extracts the DPS map from an inbound message. `Ok(None)` when the message
/// carries no data.
pub fn unwrap(bytes: &[u8]) -> Result<Option<DpsMap>, EnvelopeError> {
    let outer: Value = serde_json::from_slice(bytes)?;
    let Value::Object(mut outer) = outer else {
        return Err(EnvelopeError::NotAnObject("envelope"));
    };
    let payload = match outer.remove("payload") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(text)) => match serde_json::from_str(&text)? {
            // some firmware double-encodes the payload
            Value::String(inner) => serde_json::from_str(&inner)?,
            other => other,
        },
        Some(other) => other,
    };
    let Value::Object(mut payload) = payload else {
        return Err(EnvelopeError::NotAnObject("payload"));
    };
    match payload.remove("data") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(data)) if data.is_empty() => Ok(None),
        Some(Value::Object(data)) => Ok(Some(data.into_iter().collect())),
        Some(_) => Err(EnvelopeError::NotAnObject("data")),
    }
}

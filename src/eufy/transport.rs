//! One TLS connection to the cloud broker for one appliance.
//!
//! The connection never retries. Its network task reports what happens on
//! an unbounded channel and ends on the first connection error; the owner
//! decides when to open a new one.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rumqttc::{
    AsyncClient, ClientError, Event, EventLoop, Incoming, MqttOptions, QoS, TlsConfiguration,
    Transport,
};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::DpsMap;
use super::envelope::{self, Envelope, EnvelopeError, Identity, Target};

const BROKER_PORT: u16 = 8883;
const KEEP_ALIVE: Duration = Duration::from_secs(60);
const MAX_PACKET_SIZE: usize = 256 * 1024;
const CLOSE_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid credentials in {path}: {source}")]
    Credentials {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("envelope: {0}")]
    Envelope(#[from] EnvelopeError),
    #[error("client: {0}")]
    Client(#[from] ClientError),
    #[error("connection closed before it was established: {0}")]
    Closed(String),
}

/// Cloud credential bundle as written by the login collaborator.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub user_id: String,
    pub app_name: String,
    pub thing_name: String,
    pub certificate_pem: String,
    pub private_key: String,
    pub endpoint_addr: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_id", &self.user_id)
            .field("app_name", &self.app_name)
            .field("thing_name", &self.thing_name)
            .field("endpoint_addr", &self.endpoint_addr)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    pub fn load(path: &Path) -> Result<Self, TransportError> {
        let content = std::fs::read_to_string(path).map_err(|source| TransportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| TransportError::Credentials {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn identity(&self, openudid: &str) -> Identity {
        Identity {
            user_id: self.user_id.clone(),
            app_name: self.app_name.clone(),
            openudid: openudid.to_string(),
        }
    }
}

pub fn read_ca(path: &Path) -> Result<Vec<u8>, TransportError> {
    std::fs::read(path).map_err(|source| TransportError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    Connecting,
    Connected,
    Disconnected(String),
}

impl LinkState {
    pub fn label(&self) -> &'static str {
        match self {
            LinkState::Connecting => "connecting",
            LinkState::Connected => "connected",
            LinkState::Disconnected(_) => "disconnected",
        }
    }
}

#[derive(Debug)]
pub enum TransportEvent {
    Connected,
    Dps(DpsMap),
    Closed(String),
}

/// Owns the network task. Dropping it aborts the task, which releases the
/// TLS session and the key material it holds.
pub struct Connection {
    client: AsyncClient,
    task: JoinHandle<()>,
    envelope: Envelope,
    request_topic: String,
}

impl Connection {
    pub fn open(
        creds: &Credentials,
        openudid: &str,
        ca: Vec<u8>,
        target: &Target,
        events: mpsc::UnboundedSender<TransportEvent>,
    ) -> Connection {
        let identity = creds.identity(openudid);
        let client_id = identity.connection_id(epoch_millis());
        debug!("Opening cloud connection as {}", client_id);

        let mut opts = MqttOptions::new(&client_id, &creds.endpoint_addr, BROKER_PORT);
        opts.set_keep_alive(KEEP_ALIVE);
        opts.set_credentials(&creds.thing_name, "");
        opts.set_max_packet_size(MAX_PACKET_SIZE, MAX_PACKET_SIZE);
        opts.set_transport(Transport::tls_with_config(TlsConfiguration::Simple {
            ca,
            alpn: None,
            client_auth: Some((
                creds.certificate_pem.as_bytes().to_vec(),
                creds.private_key.as_bytes().to_vec(),
            )),
        }));

        let (client, eventloop) = AsyncClient::new(opts, 10);
        let task = tokio::spawn(drive(
            eventloop,
            client.clone(),
            target.response_topic(),
            events,
        ));

        Connection {
            client,
            task,
            envelope: Envelope::new(&identity, target),
            request_topic: target.request_topic(),
        }
    }

    /// Queues one DPS write at QoS 0. Returns once rumqttc has accepted it.
    pub async fn publish(&mut self, dps: &DpsMap) -> Result<(), TransportError> {
        let bytes = self.envelope.wrap(dps, epoch_millis())?;
        debug!("Publishing to {}: {:?}", self.request_topic, dps);
        self.client
            .publish(&self.request_topic, QoS::AtMostOnce, false, bytes)
            .await?;
        Ok(())
    }

    /// Sends DISCONNECT and gives the network task a moment to flush it.
    pub async fn close(mut self) {
        if self.client.try_disconnect().is_ok() {
            let _ = tokio::time::timeout(CLOSE_GRACE, &mut self.task).await;
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn drive(
    mut eventloop: EventLoop,
    client: AsyncClient,
    topic: String,
    events: mpsc::UnboundedSender<TransportEvent>,
) {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Incoming::ConnAck(_))) => {
                info!("Connected to cloud broker, subscribing to {}", topic);
                if let Err(e) = client.try_subscribe(&topic, QoS::AtMostOnce) {
                    error!("Failed to subscribe to {}: {}", topic, e);
                }
                if events.send(TransportEvent::Connected).is_err() {
                    return;
                }
            }
            Ok(Event::Incoming(Incoming::Publish(publish))) => match envelope::unwrap(&publish.payload) {
                Ok(Some(dps)) => {
                    if events.send(TransportEvent::Dps(dps)).is_err() {
                        return;
                    }
                }
                Ok(None) => debug!("Message on {} carried no data", publish.topic),
                Err(e) => warn!("Dropping malformed message on {}: {}", publish.topic, e),
            },
            Ok(_) => {}
            Err(e) => {
                error!("Cloud connection error: {}", e);
                let _ = events.send(TransportEvent::Closed(e.to_string()));
                return;
            }
        }
    }
}

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

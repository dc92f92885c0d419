//! Mail delivery.
//!
//! The back office does not speak SMTP. Messages are published as JSON on a
//! ZeroMQ PUB socket and the mail relay subscribed to it does the delivery.

use std::sync::Mutex;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;

use crate::notifications::NotificationError;

#[derive(Clone, Debug, PartialEq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

impl Attachment {
    pub fn pdf(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: "application/pdf".into(),
            content,
        }
    }

    pub fn csv(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: "text/csv".into(),
            content,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OutgoingEmail {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<Attachment>,
}

#[derive(Serialize)]
struct WireAttachment<'a> {
    filename: &'a str,
    content_type: &'a str,
    content_base64: String,
}

#[derive(Serialize)]
struct WireEmail<'a> {
    recipients: &'a [String],
    subject: &'a str,
    body: &'a str,
    attachments: Vec<WireAttachment<'a>>,
}

impl OutgoingEmail {
    /// JSON payload understood by the mail relay.
    pub fn to_json(&self) -> Result<Vec<u8>, NotificationError> {
        let wire = WireEmail {
            recipients: &self.recipients,
            subject: &self.subject,
            body: &self.body,
            attachments: self
                .attachments
                .iter()
                .map(|a| WireAttachment {
                    filename: &a.filename,
                    content_type: &a.content_type,
                    content_base64: STANDARD.encode(&a.content),
                })
                .collect(),
        };
        Ok(serde_json::to_vec(&wire)?)
    }
}

pub trait Mailer: Send + Sync {
    fn send(&self, email: &OutgoingEmail) -> Result<(), NotificationError>;
}

/// Publishes messages to the mail relay over ZeroMQ.
pub struct ZmqMailer {
    socket: Mutex<zmq::Socket>,
}

impl ZmqMailer {
    pub fn connect(endpoint: &str) -> Result<Self, NotificationError> {
        let context = zmq::Context::new();
        let socket = context
            .socket(zmq::PUB)
            .map_err(|e| NotificationError::Transport(format!("cannot create socket: {e}")))?;
        socket.connect(endpoint).map_err(|e| {
            NotificationError::Transport(format!("cannot connect to {endpoint}: {e}"))
        })?;
        // a PUB socket drops messages until the subscriber handshake is done
        std::thread::sleep(Duration::from_millis(200));

        log::info!("Mailer connected to {endpoint}");
        Ok(Self {
            socket: Mutex::new(socket),
        })
    }
}

impl Mailer for ZmqMailer {
    fn send(&self, email: &OutgoingEmail) -> Result<(), NotificationError> {
        let payload = email.to_json()?;
        let socket = self
            .socket
            .lock()
            .map_err(|_| NotificationError::Transport("mailer socket lock poisoned".into()))?;
        socket
            .send(payload, 0)
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        log::info!(
            "Queued email '{}' for {}",
            email.subject,
            email.recipients.join(", ")
        );
        Ok(())
    }
}

/// Keeps messages in memory instead of delivering them.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    failure: Option<String>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every send fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: Some(message.into()),
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

impl Mailer for RecordingMailer {
    fn send(&self, email: &OutgoingEmail) -> Result<(), NotificationError> {
        if let Some(message) = &self.failure {
            return Err(NotificationError::Transport(message.clone()));
        }
        self.sent
            .lock()
            .map_err(|_| NotificationError::Transport("recording mailer lock poisoned".into()))?
            .push(email.clone());
        Ok(())
    }
}

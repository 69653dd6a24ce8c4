use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Once,
    },
    thread::JoinHandle,
};

use crossbeam_channel::{Receiver, Sender};
use msfswebapi::{Frame, Incoming, SimVarRequest, WebApiConnection};
use serde_json::Value;

use crate::{settings::Config, Command, CommandSink, WireRequest};

/// Frames a subscriber may fall behind by before the reader thread waits.
pub const FRAME_QUEUE_CAP: usize = 64;

/// Outbound commands and inbound variable feeds for one simulator.
///
/// Cloning is cheap; clones share the command sender thread.
#[derive(Clone)]
pub struct Gateway {
    connected: Option<Arc<Connected>>,
    unconfigured_notice: Arc<Once>,
}

struct Connected {
    connection: Arc<WebApiConnection>,
    commands: Sender<WireRequest>,
}

impl Gateway {
    pub fn new(config: &Config) -> Self {
        let Some(connection) = &config.connection else {
            return Self::disconnected();
        };

        match Self::connect(&connection.root_url) {
            Ok(gateway) => gateway,
            Err(e) => {
                tracing::error!(root_url = %connection.root_url, "cannot use simulator api: {e}");
                Self::disconnected()
            }
        }
    }

    pub fn connect(root_url: &str) -> Result<Self, msfswebapi::Error> {
        let connection = Arc::new(WebApiConnection::open(root_url)?);
        let (tx, rx) = crossbeam_channel::unbounded();

        {
            let connection = connection.clone();
            std::thread::spawn(move || send_commands(&connection, rx));
        }

        tracing::info!(root_url, "gateway ready");
        Ok(Self {
            connected: Some(Arc::new(Connected {
                connection,
                commands: tx,
            })),
            unconfigured_notice: Arc::new(Once::new()),
        })
    }

    /// A gateway for an unconfigured panel: every call is a logged no-op.
    pub fn disconnected() -> Self {
        Self {
            connected: None,
            unconfigured_notice: Arc::new(Once::new()),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.is_some()
    }

    pub fn subscribe(&self, input: impl Into<SubscriptionInput>) -> Option<Subscription> {
        let Some(connected) = self.live("subscribe") else {
            return None;
        };

        let requests = normalize(input.into());
        if requests.is_empty() {
            tracing::warn!("subscription resolved to no variables, not registering");
            return None;
        }

        let (tx, rx) = crossbeam_channel::bounded(FRAME_QUEUE_CAP);
        let shutdown = Arc::new(AtomicBool::new(false));

        let join_handle = {
            let connection = connected.connection.clone();
            let requests = requests.clone();
            let shutdown = shutdown.clone();
            std::thread::spawn(move || read_frames(&connection, &requests, tx, &shutdown))
        };

        Some(Subscription {
            frames: rx,
            requests,
            shutdown,
            _reader: join_handle,
        })
    }

    fn live(&self, operation: &str) -> Option<&Connected> {
        if self.connected.is_none() {
            self.unconfigured_notice.call_once(|| {
                tracing::warn!(operation, "no simulator configured, gateway calls are ignored");
            });
        }

        self.connected.as_deref()
    }
}

impl CommandSink for Gateway {
    fn issue_command(&self, command: Command) {
        let Some(connected) = self.live("issue_command") else {
            return;
        };

        let request = match command.to_wire() {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(?command, "dropping unencodable command: {e}");
                return;
            }
        };
        tracing::debug!(path = %request.path, "queueing command");
        if connected.commands.send(request).is_err() {
            tracing::error!("command sender has stopped");
        }
    }
}

fn send_commands(connection: &WebApiConnection, rx: Receiver<WireRequest>) {
    for request in rx {
        if let Err(e) = connection.post(&request.path, &request.body) {
            tracing::warn!(path = %request.path, "command failed: {e}");
        }
    }
}

fn read_frames(
    connection: &WebApiConnection,
    requests: &[SimVarRequest],
    tx: Sender<Frame>,
    shutdown: &AtomicBool,
) {
    let mut registration = match connection.register(requests) {
        Ok(registration) => registration,
        Err(e) => {
            tracing::warn!("push channel failed to open: {e}");
            return;
        }
    };

    while !shutdown.load(Ordering::Relaxed) {
        match registration.read() {
            Ok(Incoming::Frame(frame)) => {
                if tx.send(frame).is_err() {
                    break;
                }
            }
            Ok(Incoming::Malformed(e)) => {
                tracing::warn!("dropping malformed frame: {e}");
            }
            Ok(Incoming::Idle) => {}
            Ok(Incoming::Closed) => {
                tracing::info!("push channel closed by simulator");
                break;
            }
            Err(e) => {
                tracing::warn!("push channel error: {e}");
                break;
            }
        }
    }

    registration.close();
}

/// An open push channel. Frames arrive on [`Subscription::frames`] in the
/// order the channel received them; the queue disconnects when the channel
/// ends. Dropping the handle stops deliveries.
pub struct Subscription {
    frames: Receiver<Frame>,
    requests: Vec<SimVarRequest>,
    shutdown: Arc<AtomicBool>,
    _reader: JoinHandle<()>,
}

impl Subscription {
    pub fn frames(&self) -> &Receiver<Frame> {
        &self.frames
    }

    pub fn requests(&self) -> &[SimVarRequest] {
        &self.requests
    }

    pub fn close(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

/// The shapes a caller may describe its variables in.
#[derive(Debug, Clone, PartialEq)]
pub enum SubscriptionInput {
    Name(String),
    Names(Vec<String>),
    Requests(Vec<SimVarRequest>),
    /// Loosely typed entries, e.g. from a profile file. Strings are names,
    /// objects are requests, anything else is skipped.
    Mixed(Vec<Value>),
}

impl From<&str> for SubscriptionInput {
    fn from(name: &str) -> Self {
        SubscriptionInput::Name(name.to_string())
    }
}

impl From<String> for SubscriptionInput {
    fn from(name: String) -> Self {
        SubscriptionInput::Name(name)
    }
}

impl From<Vec<String>> for SubscriptionInput {
    fn from(names: Vec<String>) -> Self {
        SubscriptionInput::Names(names)
    }
}

impl From<Vec<&str>> for SubscriptionInput {
    fn from(names: Vec<&str>) -> Self {
        SubscriptionInput::Names(names.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<SimVarRequest>> for SubscriptionInput {
    fn from(requests: Vec<SimVarRequest>) -> Self {
        SubscriptionInput::Requests(requests)
    }
}

impl From<Vec<Value>> for SubscriptionInput {
    fn from(entries: Vec<Value>) -> Self {
        SubscriptionInput::Mixed(entries)
    }
}

pub fn normalize(input: SubscriptionInput) -> Vec<SimVarRequest> {
    match input {
        SubscriptionInput::Name(name) => named(name).into_iter().collect(),
        SubscriptionInput::Names(names) => names.into_iter().filter_map(named).collect(),
        SubscriptionInput::Requests(requests) => requests,
        SubscriptionInput::Mixed(entries) => entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match entry {
                Value::String(name) => named(name),
                Value::Object(fields) => Some(SimVarRequest::from_object(fields)),
                other => {
                    tracing::warn!(index, entry = %other, "skipping unrecognized subscription entry");
                    None
                }
            })
            .collect(),
    }
}

fn named(name: String) -> Option<SimVarRequest> {
    if name.trim().is_empty() {
        tracing::warn!("skipping empty simvar name");
        None
    } else {
        Some(SimVarRequest::named(name))
    }
}

mod command;
mod dispatch;
mod gateway;
mod server;
mod types;

pub mod msfs;
pub mod panels;
pub mod profiles;
pub mod settings;

pub use command::{Command, CommandSink, WireRequest, DEFAULT_EVENT_PATH};
pub use dispatch::ButtonTable;
pub use gateway::{normalize, Gateway, Subscription, SubscriptionInput, FRAME_QUEUE_CAP};
pub use server::{Bridge, Server};
pub use settings::{Config, MenuMode, SettingsStore};
pub use types::{ClientBoundMessage, ClientId, ConnectionStatus, PanelKind, ServerBoundMessage};

pub use msfswebapi::{Frame, Reading, ReadingKey, SimVarRequest};

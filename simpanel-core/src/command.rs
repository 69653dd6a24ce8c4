use msfswebapi::{SimVarValue, SET_MULTIPLE_PATH};
use serde_json::{json, Value};

pub const CAMERA_STATE: &str = "CAMERA STATE";
pub const CAMERA_VIEW_TYPE_AND_INDEX_0: &str = "CAMERA VIEW TYPE AND INDEX:0";
pub const CAMERA_VIEW_TYPE_AND_INDEX_1: &str = "CAMERA VIEW TYPE AND INDEX:1";
pub const CAMERA_REQUEST_ACTION: &str = "CAMERA REQUEST ACTION";

pub const DEFAULT_EVENT_PATH: &str = "event/trigger";

/// Something a panel or button asks the simulator to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Sent verbatim to `/api/{path}`.
    Passthrough { path: String, body: Value },
    /// Camera state plus the two view type/index slots. `reset_view` also asks
    /// the simulator to reset tilt/heading for the preset.
    View {
        view_indexes: [i64; 3],
        reset_view: bool,
    },
}

impl Command {
    pub fn passthrough(path: impl Into<String>, body: Value) -> Self {
        Command::Passthrough {
            path: path.into(),
            body,
        }
    }

    pub fn view(view_indexes: [i64; 3]) -> Self {
        Command::View {
            view_indexes,
            reset_view: false,
        }
    }

    pub fn view_with_reset(view_indexes: [i64; 3]) -> Self {
        Command::View {
            view_indexes,
            reset_view: true,
        }
    }

    pub fn event(path: &str, event: &str, value: Option<i64>) -> Self {
        let body = match value {
            Some(value) => json!({ "event": event, "value": value }),
            None => json!({ "event": event }),
        };
        Command::passthrough(path, body)
    }

    pub fn to_wire(&self) -> Result<WireRequest, serde_json::Error> {
        Ok(match self {
            Command::Passthrough { path, body } => WireRequest {
                path: path.clone(),
                body: body.clone(),
            },
            Command::View {
                view_indexes,
                reset_view,
            } => WireRequest {
                path: SET_MULTIPLE_PATH.to_string(),
                body: serde_json::to_value(view_body(*view_indexes, *reset_view))?,
            },
        })
    }
}

fn view_body(view_indexes: [i64; 3], reset_view: bool) -> Vec<SimVarValue> {
    let [state, view_type_0, view_type_1] = view_indexes;
    let mut items = vec![
        SimVarValue::new(CAMERA_STATE, state),
        SimVarValue::new(CAMERA_VIEW_TYPE_AND_INDEX_0, view_type_0),
        SimVarValue::new(CAMERA_VIEW_TYPE_AND_INDEX_1, view_type_1),
    ];

    if reset_view {
        items.push(SimVarValue::new(CAMERA_REQUEST_ACTION, 1));
    }

    items
}

/// A command resolved to the single POST it is sent as.
#[derive(Debug, Clone, PartialEq)]
pub struct WireRequest {
    pub path: String,
    pub body: Value,
}

/// Where panels and buttons hand their commands off. Delivery is
/// fire-and-forget.
pub trait CommandSink {
    fn issue_command(&self, command: Command);
}

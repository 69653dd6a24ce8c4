use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of a registration handshake.
///
/// Usually just `{"simVarName": "..."}`, but callers may attach any extra keys
/// the web API understands (units, indexes, ...). Those are sent as-is.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct SimVarRequest(Map<String, Value>);

impl SimVarRequest {
    pub const NAME_KEY: &'static str = "simVarName";

    pub fn named(name: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(Self::NAME_KEY.to_string(), Value::String(name.into()));
        Self(fields)
    }

    pub fn from_object(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get(Self::NAME_KEY).and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Entry of a `simvar/setMultiple` body.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SimVarValue {
    #[serde(rename = "simVarName")]
    pub name: String,
    pub value: Value,
}

impl SimVarValue {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReadingKey {
    Name(String),
    Index(usize),
}

impl std::fmt::Display for ReadingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadingKey::Name(name) => f.write_str(name),
            ReadingKey::Index(index) => write!(f, "#{index}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub key: ReadingKey,
    pub value: f64,
}

/// One pushed message, aligned positionally with the registered requests.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    readings: Vec<Reading>,
}

impl Frame {
    pub fn new(readings: Vec<Reading>) -> Self {
        Self { readings }
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn value(&self, index: usize) -> Option<f64> {
        self.readings.get(index).map(|reading| reading.value)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.readings
            .iter()
            .find(|reading| matches!(&reading.key, ReadingKey::Name(n) if n == name))
            .map(|reading| reading.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.readings.iter()
    }
}

#[derive(Deserialize)]
struct RawReading {
    #[serde(rename = "Value")]
    value: RawValue,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(f64),
    Flag(bool),
}

impl RawValue {
    fn as_f64(&self) -> f64 {
        match self {
            RawValue::Number(value) => *value,
            RawValue::Flag(true) => 1.0,
            RawValue::Flag(false) => 0.0,
        }
    }
}

/// Decodes a pushed payload (`[{"Value": ...}, ...]`).
///
/// Readings take the name of the request at the same position, or their index
/// when the request carried no name or the server sent more entries than were
/// registered.
pub fn decode_frame(payload: &[u8], requests: &[SimVarRequest]) -> Result<Frame, serde_json::Error> {
    let raw: Vec<RawReading> = serde_json::from_slice(payload)?;

    let readings = raw
        .into_iter()
        .enumerate()
        .map(|(index, reading)| Reading {
            key: requests
                .get(index)
                .and_then(SimVarRequest::name)
                .map(|name| ReadingKey::Name(name.to_string()))
                .unwrap_or(ReadingKey::Index(index)),
            value: reading.value.as_f64(),
        })
        .collect();

    Ok(Frame::new(readings))
}

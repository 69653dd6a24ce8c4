use std::{net::TcpStream, time::Duration};

use tungstenite::{handshake::HandshakeError, Message, WebSocket};
use url::Url;

use crate::{decode_frame, Error, Frame, SimVarRequest};

pub const SET_MULTIPLE_PATH: &str = "simvar/setMultiple";
pub const REGISTER_PATH: &str = "simvar/register?interval=1";

// Keeps reads short enough for the owning thread to notice a shutdown request
const READ_POLL: Duration = Duration::from_millis(100);

pub struct WebApiConnection {
    root: Url,
    http: reqwest::blocking::Client,
}

impl WebApiConnection {
    pub fn open(root_url: &str) -> Result<Self, Error> {
        let root = Url::parse(root_url)?;
        match root.scheme() {
            "http" | "https" => {}
            other => return Err(Error::UnsupportedScheme(other.to_string())),
        }

        let http = reqwest::blocking::Client::builder().build()?;
        Ok(Self { root, http })
    }

    pub fn root_url(&self) -> &Url {
        &self.root
    }

    /// `{root}/api/{path}`, keeping any path prefix of the root.
    pub fn api_url(&self, path: &str) -> Result<Url, Error> {
        let url = format!(
            "{}/api/{}",
            self.root.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok(Url::parse(&url)?)
    }

    pub fn register_url(&self) -> Result<Url, Error> {
        let mut url = self.api_url(REGISTER_PATH)?;
        let scheme = match url.scheme() {
            "https" => "wss",
            _ => "ws",
        };
        url.set_scheme(scheme)
            .map_err(|_| Error::UnsupportedScheme(scheme.to_string()))?;
        Ok(url)
    }

    pub fn post(&self, path: &str, body: &serde_json::Value) -> Result<(), Error> {
        let url = self.api_url(path)?;
        tracing::debug!(%url, "POST");

        let response = self.http.post(url.clone()).json(body).send()?;
        if !response.status().is_success() {
            return Err(Error::BadStatus {
                url: url.to_string(),
                status: response.status(),
            });
        }

        Ok(())
    }

    /// Opens the push channel and sends `requests` as its handshake message.
    pub fn register(&self, requests: &[SimVarRequest]) -> Result<Registration, Error> {
        let url = self.register_url()?;
        if url.scheme() != "ws" {
            return Err(Error::UnsupportedScheme(url.scheme().to_string()));
        }

        let host = url
            .host_str()
            .ok_or_else(|| Error::MissingHost(url.to_string()))?;
        let port = url.port_or_known_default().unwrap_or(80);

        let stream = TcpStream::connect((host, port))?;
        let _ = stream.set_nodelay(true);

        let (mut socket, _) = tungstenite::client(url.as_str(), stream).map_err(|e| match e {
            HandshakeError::Failure(e) => Error::WebSocket(e),
            HandshakeError::Interrupted(_) => Error::HandshakeInterrupted,
        })?;

        socket.get_ref().set_read_timeout(Some(READ_POLL))?;

        let handshake = serde_json::to_string(requests)?;
        socket.send(Message::Text(handshake.into()))?;
        tracing::debug!(%url, count = requests.len(), "registered simvars");

        Ok(Registration {
            socket,
            requests: requests.to_vec(),
        })
    }
}

#[derive(Debug)]
pub enum Incoming {
    Frame(Frame),
    Malformed(serde_json::Error),
    /// Nothing arrived within the poll interval.
    Idle,
    Closed,
}

pub struct Registration {
    socket: WebSocket<TcpStream>,
    requests: Vec<SimVarRequest>,
}

impl Registration {
    pub fn read(&mut self) -> Result<Incoming, Error> {
        match self.socket.read() {
            Ok(Message::Text(text)) => Ok(self.decode(text.as_bytes())),
            Ok(Message::Binary(bytes)) => Ok(self.decode(&bytes)),
            Ok(Message::Close(_)) => Ok(Incoming::Closed),
            Ok(_) => Ok(Incoming::Idle),
            Err(tungstenite::Error::Io(e))
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                Ok(Incoming::Idle)
            }
            Err(tungstenite::Error::ConnectionClosed) | Err(tungstenite::Error::AlreadyClosed) => {
                Ok(Incoming::Closed)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn close(mut self) {
        let _ = self.socket.close(None);
        let _ = self.socket.flush();
    }

    fn decode(&self, payload: &[u8]) -> Incoming {
        match decode_frame(payload, &self.requests) {
            Ok(frame) => Incoming::Frame(frame),
            Err(e) => Incoming::Malformed(e),
        }
    }
}

use simpanel::msfs::Feed;
use simpanel::panels::{GearPanel, LegState, LeverPosition, Panel};
use simpanel::{
    profiles, ClientBoundMessage, ClientId, Command, CommandSink, ConnectionStatus, Gateway, PanelKind,
    Server, ServerBoundMessage,
};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::time::{Duration, Instant};
use tungstenite::Message;

/// Accepts one push channel, reports its handshake, then sends `frames`.
fn spawn_simulator_feed<S: Into<String>>(frames: Vec<S>) -> (String, mpsc::Receiver<String>) {
    let frames: Vec<String> = frames.into_iter().map(Into::into).collect();
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut ws = tungstenite::accept(stream).expect("ws accept");

        if let Ok(Message::Text(handshake)) = ws.read() {
            let _ = tx.send(handshake.to_string());
        }

        for frame in frames {
            if ws.send(Message::Text(frame.into())).is_err() {
                return;
            }
        }

        // Keep the channel open until the client goes away
        while ws.read().is_ok() {}
    });

    (format!("http://{addr}"), rx)
}

/// Pushes a frame every few milliseconds until the client closes the channel,
/// then reports when that close was seen.
fn spawn_endless_feed() -> (String, mpsc::Receiver<Instant>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut ws = tungstenite::accept(stream).expect("ws accept");
        let _ = ws.read();

        ws.get_ref()
            .set_read_timeout(Some(Duration::from_millis(5)))
            .expect("read timeout");

        loop {
            if ws.send(Message::Text(r#"[{"Value": 1}]"#.into())).is_err() {
                break;
            }

            match ws.read() {
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(tungstenite::Error::Io(e))
                    if matches!(
                        e.kind(),
                        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
                    ) => {}
                Err(_) => break,
            }
        }

        let _ = tx.send(Instant::now());
    });

    (format!("http://{addr}"), rx)
}

fn spawn_http_responder() -> (String, mpsc::Receiver<(String, serde_json::Value)>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

        let mut request_line = String::new();
        reader.read_line(&mut request_line).expect("request line");

        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("header line");
            if line == "\r\n" || line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.trim().eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().expect("content length");
                }
            }
        }

        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).expect("body");

        let mut stream = stream;
        let _ = stream.write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");

        let _ = tx.send((
            request_line.trim_end().to_string(),
            serde_json::from_slice(&body).expect("json body"),
        ));
    });

    (format!("http://{addr}"), rx)
}

#[test]
fn gear_panel_follows_pushed_frames() {
    let (root, handshakes) = spawn_simulator_feed(vec![
        r#"[{"Value": 1.0}, {"Value": 1.0}, {"Value": 1.0}]"#,
        "garbage",
        r#"[{"Value": 0.5}, {"Value": 0.5}, {"Value": 0.5}]"#,
        r#"[{"Value": 0.02}, {"Value": 0.01}, {"Value": 0.03}]"#,
    ]);

    let gateway = Gateway::connect(&root).expect("gateway");
    let mut panel = GearPanel::new(profiles::msfs_ga().gear);
    let subscription = gateway.subscribe(panel.subscription()).expect("subscription");

    let handshake = handshakes
        .recv_timeout(Duration::from_secs(2))
        .expect("handshake");
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&handshake).unwrap(),
        serde_json::json!([
            {"simVarName": "GEAR CENTER POSITION"},
            {"simVarName": "GEAR LEFT POSITION"},
            {"simVarName": "GEAR RIGHT POSITION"},
        ])
    );

    let mut levers = Vec::new();
    for _ in 0..3 {
        let frame = subscription
            .frames()
            .recv_timeout(Duration::from_secs(2))
            .expect("frame");
        panel.apply_frame(&frame);
        levers.push(panel.lever());
    }

    assert_eq!(
        levers,
        vec![LeverPosition::Down, LeverPosition::Down, LeverPosition::Up]
    );
    assert_eq!(panel.legs(), Some([LegState::Up; 3]));

    subscription.close();
}

#[test]
fn view_command_posts_set_multiple() {
    let (root, requests) = spawn_http_responder();
    let gateway = Gateway::connect(&root).expect("gateway");

    gateway.issue_command(Command::view_with_reset([2, 1, 1]));

    let (request_line, body) = requests
        .recv_timeout(Duration::from_secs(2))
        .expect("request");
    assert_eq!(request_line, "POST /api/simvar/setMultiple HTTP/1.1");
    assert_eq!(
        body,
        serde_json::json!([
            {"simVarName": "CAMERA STATE", "value": 2},
            {"simVarName": "CAMERA VIEW TYPE AND INDEX:0", "value": 1},
            {"simVarName": "CAMERA VIEW TYPE AND INDEX:1", "value": 1},
            {"simVarName": "CAMERA REQUEST ACTION", "value": 1},
        ])
    );
}

#[test]
fn feed_relays_frames_through_server() {
    let (root, _handshakes) = spawn_simulator_feed(vec![r#"[{"Value": 1}]"#]);
    let gateway = Gateway::connect(&root).expect("gateway");
    let (seen_tx, seen_rx) = mpsc::channel();

    let mut server = Server::new();
    let feed = Feed::new(
        PanelKind::ParkingBrake,
        gateway,
        "BRAKE PARKING POSITION".into(),
    );
    server.spawn_feed(feed);
    server.spawn_client(ClientId::Ui, move |bridge| loop {
        match bridge.recv() {
            ClientBoundMessage::Shutdown => break,
            ClientBoundMessage::UpdatePanel(kind, frame) => {
                let _ = seen_tx.send((kind, frame.value(0)));
                bridge.send(ServerBoundMessage::Shutdown);
            }
            ClientBoundMessage::UpdateConnectionStatus(kind, status) => {
                assert_eq!(kind, PanelKind::ParkingBrake);
                assert_eq!(status, ConnectionStatus::Connected);
            }
            _ => {}
        }
    });

    server.run();

    let (kind, value) = seen_rx.recv_timeout(Duration::from_secs(1)).expect("frame");
    assert_eq!(kind, PanelKind::ParkingBrake);
    assert_eq!(value, Some(1.0));
}

#[test]
fn unconfigured_feed_reports_disconnected() {
    let (seen_tx, seen_rx) = mpsc::channel();
    let mut server = Server::new();

    let feed = Feed::new(PanelKind::Flaps, Gateway::disconnected(), "X".into());
    server.spawn_feed(feed);
    server.spawn_client(ClientId::Ui, move |bridge| loop {
        match bridge.recv() {
            ClientBoundMessage::Shutdown => break,
            ClientBoundMessage::UpdateConnectionStatus(kind, status) => {
                let _ = seen_tx.send((kind, status));
                bridge.send(ServerBoundMessage::Shutdown);
            }
            _ => {}
        }
    });

    server.run();

    assert_eq!(
        seen_rx.recv_timeout(Duration::from_secs(1)).expect("status"),
        (PanelKind::Flaps, ConnectionStatus::Disconnected)
    );
}

#[test]
fn closing_subscription_releases_push_channel() {
    let (root, closed) = spawn_endless_feed();
    let gateway = Gateway::connect(&root).expect("gateway");
    let subscription = gateway.subscribe("BRAKE PARKING POSITION").expect("subscription");

    let frames = subscription.frames().clone();
    for _ in 0..3 {
        frames.recv_timeout(Duration::from_secs(2)).expect("frame");
    }

    let closed_at = Instant::now();
    subscription.close();

    let seen = closed.recv_timeout(Duration::from_secs(2)).expect("server saw close");
    assert!(seen.duration_since(closed_at) < Duration::from_secs(2));

    // Whatever was already queued drains, then the queue disconnects
    let deadline = Instant::now() + Duration::from_secs(2);
    loop {
        match frames.recv_timeout(Duration::from_millis(100)) {
            Ok(_) => assert!(Instant::now() < deadline, "frames kept arriving after close"),
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                panic!("frame queue still open after close")
            }
        }
    }
}

#[test]
fn slow_consumer_sees_every_frame_in_order() {
    let frames: Vec<String> = (0..100).map(|i| format!(r#"[{{"Value": {i}}}]"#)).collect();
    let (root, _handshakes) = spawn_simulator_feed(frames);
    let gateway = Gateway::connect(&root).expect("gateway");
    let (seen_tx, seen_rx) = mpsc::channel();

    let mut server = Server::new();
    server.spawn_feed(Feed::new(PanelKind::Gear, gateway, "GEAR CENTER POSITION".into()));
    server.spawn_client(ClientId::Ui, move |bridge| {
        let mut seen = 0;
        loop {
            match bridge.recv() {
                ClientBoundMessage::Shutdown => break,
                ClientBoundMessage::UpdatePanel(_, frame) => {
                    std::thread::sleep(Duration::from_millis(2));
                    let _ = seen_tx.send(frame.value(0));
                    seen += 1;
                    if seen == 100 {
                        bridge.send(ServerBoundMessage::Shutdown);
                    }
                }
                _ => {}
            }
        }
    });

    server.run();

    let values: Vec<_> = seen_rx.try_iter().collect();
    let expected: Vec<_> = (0..100).map(|i| Some(i as f64)).collect();
    assert_eq!(values, expected);
}

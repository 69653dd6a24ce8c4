use std::{fs::File, path::PathBuf, sync::Mutex};

use app::{App, Header};
use simpanel::{
    msfs,
    panels::{FlapsPanel, GearPanel, Panel, ParkingBrakePanel},
    profiles, ClientBoundMessage, ClientId, Gateway, PanelKind, Server, SettingsStore,
};
use tracing_subscriber::{fmt::writer::BoxMakeWriter, EnvFilter};

mod app;
mod ui;

const SETTINGS_ENV: &str = "SIMPANEL_SETTINGS";
const DEFAULT_SETTINGS_FILE: &str = "simpanel.json";
const LOG_FILE: &str = "simpanel.log";

fn settings_path() -> PathBuf {
    let mut args = std::env::args().skip_while(|arg| arg != "--settings");
    if let Some(path) = args.nth(1) {
        return path.into();
    }

    std::env::var_os(SETTINGS_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
}

fn init_logging(non_interactive: bool) {
    // The terminal UI owns stdout, so interactive runs log to a file
    let writer = if non_interactive {
        BoxMakeWriter::new(std::io::stderr)
    } else {
        match File::create(LOG_FILE) {
            Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
            Err(_) => BoxMakeWriter::new(std::io::sink),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(writer)
        .with_ansi(false)
        .init();
}

fn main() {
    let non_interactive = std::env::args().any(|arg| arg == "--non-interactive");
    init_logging(non_interactive);

    let settings = SettingsStore::open(settings_path());
    let config = settings.resolve();
    let gateway = Gateway::new(&config);

    let header = Header {
        selection: config
            .profile
            .as_ref()
            .map(|profile| format!("{} / {}", profile.simulator, profile.plane)),
        menu_mode: config.menu_mode,
    };

    // Unconfigured runs still draw a panel set, it just never updates
    let profile = config.profile.unwrap_or_else(profiles::msfs_ga);

    let flaps = match FlapsPanel::new(profile.flaps) {
        Ok(flaps) => flaps,
        Err(e) => {
            tracing::error!("invalid flaps configuration: {e}");
            return;
        }
    };
    let gear = GearPanel::new(profile.gear);
    let parking_brake = ParkingBrakePanel::new(profile.parking_brake);

    let mut server = Server::new();

    for (kind, input) in [
        (PanelKind::Flaps, flaps.subscription()),
        (PanelKind::Gear, gear.subscription()),
        (PanelKind::ParkingBrake, parking_brake.subscription()),
    ] {
        server.spawn_feed(msfs::Feed::new(kind, gateway.clone(), input));
    }

    server.spawn_commander(msfs::Commander::new(gateway));

    server.spawn_client(ClientId::Ui, move |bridge| {
        if non_interactive {
            loop {
                match bridge.recv() {
                    ClientBoundMessage::Shutdown => {
                        break;
                    }
                    message => {
                        println!("{:?}", message);
                    }
                }
            }
        } else {
            let app = App::new(header, flaps, gear, parking_brake, profile.buttons);
            if let Err(e) = app.run(bridge) {
                tracing::error!("terminal error: {e}");
            }
        }
    });

    server.run();
}

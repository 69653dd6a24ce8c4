use serde_json::json;

use crate::{
    command::DEFAULT_EVENT_PATH,
    panels::{FlapsConfig, FlapsSource, GearConfig, ParkingBrakeConfig, FLAPS_RANGE_MAX},
    ButtonTable, Command,
};

pub const MSFS: &str = "MSFS";
pub const XPLANE: &str = "X-Plane";

/// Simulators and the planes each one offers.
pub const CATALOG: &[(&str, &[&str])] = &[(XPLANE, &["Zibo 737"]), (MSFS, &["GA", "737 MAX"])];

const FLAP_DETENTS: [f64; 7] = [0.0, 1.0, 5.0, 10.0, 15.0, 30.0, 40.0];

/// Everything panels and buttons need to know about one aircraft.
#[derive(Debug, Clone, PartialEq)]
pub struct AircraftProfile {
    pub simulator: String,
    pub plane: String,
    pub flaps: FlapsConfig,
    pub gear: GearConfig,
    pub parking_brake: ParkingBrakeConfig,
    pub buttons: ButtonTable,
}

/// Profile for a catalog entry; `None` for planes without an MSFS gateway.
pub fn lookup(simulator: &str, plane: &str) -> Option<AircraftProfile> {
    match (simulator, plane) {
        (MSFS, "GA") => Some(msfs_ga()),
        (MSFS, "737 MAX") => Some(msfs_737()),
        _ => None,
    }
}

pub fn is_listed(simulator: &str, plane: &str) -> bool {
    CATALOG
        .iter()
        .any(|(sim, planes)| *sim == simulator && planes.contains(&plane))
}

pub fn msfs_ga() -> AircraftProfile {
    AircraftProfile {
        simulator: MSFS.to_string(),
        plane: "GA".to_string(),
        flaps: flaps(FlapsSource::Ratio {
            variable: "TRAILING EDGE FLAPS LEFT PERCENT".to_string(),
        }),
        gear: gear(),
        parking_brake: parking_brake(),
        buttons: ButtonTable::new()
            .with("Pilot", Command::view_with_reset([2, 0, 0]))
            .with("Pause", Command::passthrough("simvar/set", json!({}))),
    }
}

pub fn msfs_737() -> AircraftProfile {
    AircraftProfile {
        simulator: MSFS.to_string(),
        plane: "737 MAX".to_string(),
        flaps: flaps(FlapsSource::Angles {
            left: "TRAILING EDGE FLAPS LEFT ANGLE".to_string(),
            right: "TRAILING EDGE FLAPS RIGHT ANGLE".to_string(),
        }),
        gear: gear(),
        parking_brake: parking_brake(),
        buttons: ButtonTable::new()
            .with("Pilot", Command::view_with_reset([2, 1, 1]))
            .with("Copilot", Command::view_with_reset([2, 1, 4]))
            .with("Tablet", Command::view([2, 2, 2]))
            .with("FMC", Command::view([2, 2, 3]))
            .with("Overhead", Command::view([2, 2, 4]))
            .with("After overhead", Command::view([2, 2, 5]))
            .with("Pedestal", Command::view([2, 2, 7]))
            // Custom view 0; the simulator does not always honor it
            .with("Cockpit", Command::view([2, 1, 7]))
            .with("Fly by", Command::view([3, 4, 4]))
            .with("Chase", Command::view([3, 0, 0]))
            .with("From left", Command::view([3, 4, 0]))
            .with("From right", Command::view([3, 4, 2]))
            .with("Front", Command::view([3, 4, 1]))
            .with("Pause", Command::passthrough("simvar/set", json!({}))),
    }
}

fn flaps(source: FlapsSource) -> FlapsConfig {
    FlapsConfig {
        source,
        detents: FLAP_DETENTS.to_vec(),
        event_path: DEFAULT_EVENT_PATH.to_string(),
        event: "FLAPS_SET".to_string(),
        range_max: FLAPS_RANGE_MAX,
    }
}

fn gear() -> GearConfig {
    GearConfig {
        variables: [
            "GEAR CENTER POSITION".to_string(),
            "GEAR LEFT POSITION".to_string(),
            "GEAR RIGHT POSITION".to_string(),
        ],
        up: Command::event(DEFAULT_EVENT_PATH, "GEAR_UP", None),
        down: Command::event(DEFAULT_EVENT_PATH, "GEAR_DOWN", None),
    }
}

fn parking_brake() -> ParkingBrakeConfig {
    ParkingBrakeConfig {
        variable: "BRAKE PARKING POSITION".to_string(),
        toggle: Command::event(DEFAULT_EVENT_PATH, "PARKING_BRAKES", None),
    }
}

mod command_view;
mod connection_view;
mod flaps_view;
mod gear_view;
mod parking_brake_view;

pub use command_view::CommandView;
pub use connection_view::ConnectionView;
pub use flaps_view::FlapsView;
pub use gear_view::GearView;
pub use parking_brake_view::ParkingBrakeView;

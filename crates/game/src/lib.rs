//! Rotorlift gameplay: flight controller, session coordinator, scenes and the driver loop.

pub mod config;
pub mod driver;
pub mod effects;
pub mod flight;
pub mod level;
pub mod scene;
pub mod session;
pub mod vehicle;
pub mod view;

pub use config::GameConfig;
pub use driver::GameLoop;
pub use flight::{FlightController, FlightInput, FlightPhase, Outcome};
pub use session::{Session, SessionRequest, SessionSlot};
pub use vehicle::VehicleState;

pub mod controller;
pub mod messages;

pub use controller::{AppState, Controller, Submission};
pub use messages::Notification;

mod accessory;
mod client;
mod error;
mod logger;
mod protocol;
mod reconcile;
mod token;
mod types;

pub use accessory::{HeaterSwitch, Thermostat};
pub use client::{HeatzyClient, HeatzyClientBuilder};
pub use error::{Error, Result};
pub use logger::MessageLogMode;
pub use types::*;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical operating mode, independent of the Heatzy wire vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Off,
    Heat,
    Eco,
    /// Device follows its onboard schedule (`timer_switch` flag).
    Program,
}

impl Mode {
    /// Wire value for a direct mode write. Program has none: it is
    /// expressed purely via the timer flag.
    pub fn as_heatzy_str(&self) -> Option<&'static str> {
        match self {
            Mode::Off => Some("stop"),
            Mode::Heat => Some("cft"),
            Mode::Eco => Some("eco"),
            Mode::Program => None,
        }
    }

    /// Unknown values map to Off; the vendor vocabulary is fixed and
    /// anything outside it is treated as not heating.
    pub fn from_heatzy_str(s: &str) -> Self {
        match s {
            "cft" => Mode::Heat,
            "eco" => Mode::Eco,
            _ => Mode::Off,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::Off => "off",
            Mode::Heat => "heat",
            Mode::Eco => "eco",
            Mode::Program => "program",
        };
        write!(f, "{s}")
    }
}

/// Raw attributes as reported by `GET /devdata/{did}/latest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceAttributes {
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub timer_switch: u8,
}

impl DeviceAttributes {
    /// What the device is actually doing right now. Deliberately
    /// ignores the timer flag: a scheduled device still reports the
    /// mode the schedule put it in.
    pub fn current_mode(&self) -> Mode {
        Mode::from_heatzy_str(&self.mode)
    }

    /// What the device is set to. The timer flag wins over `mode`:
    /// this check must stay first or Program detection breaks.
    pub fn target_mode(&self) -> Mode {
        if self.timer_switch == 1 {
            Mode::Program
        } else {
            Mode::from_heatzy_str(&self.mode)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

/// Events emitted when a poll observes an externally-driven change.
#[derive(Debug, Clone)]
pub enum Event {
    CurrentModeChanged { from: Mode, to: Mode },
    TargetModeChanged { from: Mode, to: Mode },
}

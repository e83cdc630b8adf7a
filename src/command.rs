//! Commands and the direction vocabulary used throughout hyprnear.
//!
//! [`Command`] describes every action the navigator can perform and is the
//! unit that travels over the command socket, one JSON value per line.
//! Directions are parsed leniently so that key-bind helpers can pass
//! whatever is most convenient ("left", "Left", "h").

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Cardinal direction for focus and window movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Left,
    Down,
    Up,
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Down => write!(f, "down"),
            Direction::Up => write!(f, "up"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// Parse a direction string (case-insensitive; accepts vim keys `h j k l`).
pub fn parse_direction(s: &str) -> Option<Direction> {
    match s.trim().to_lowercase().as_str() {
        "left" | "h" => Some(Direction::Left),
        "down" | "j" => Some(Direction::Down),
        "up" | "k" => Some(Direction::Up),
        "right" | "l" => Some(Direction::Right),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_direction(&s).ok_or_else(|| DeError::custom(format!("invalid direction: {:?}", s)))
    }
}

/// Every action hyprnear can perform.
///
/// Commands are produced by [`CommandSource`](crate::traits::CommandSource)
/// implementations and consumed by the [`Navigator`](crate::navigator::Navigator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Focus the nearest window in the given direction, on any screen.
    ///
    /// Falls back to focusing the nearest screen in that direction when no
    /// window qualifies.
    FocusSmart(Direction),

    /// Move the focused window to the group shown on the nearest screen in
    /// the given direction and follow it there.
    SwapScreen(Direction),

    /// Show the per-screen group with this label on the current screen.
    ///
    /// Label `"3"` on screen 1 refers to the group named `"31"`.
    ShowGroup(String),

    /// Send the focused window to the per-screen group with this label on
    /// the current screen, without following it.
    SendToGroup(String),

    /// A new window with this address has been mapped.
    ///
    /// Emitted by the compositor event source; applies the
    /// fullscreen-on-arrival policy.
    WindowOpened(String),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::FocusSmart(dir) => write!(f, "focus {}", dir),
            Command::SwapScreen(dir) => write!(f, "swap {}", dir),
            Command::ShowGroup(label) => write!(f, "show group {}", label),
            Command::SendToGroup(label) => write!(f, "send to group {}", label),
            Command::WindowOpened(addr) => write!(f, "window opened {}", addr),
        }
    }
}

/// Error from turning command-line words into a [`Command`].
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseCommandError {
    #[error("missing argument for {0:?}")]
    MissingArgument(String),
    #[error("invalid direction: {0:?}")]
    InvalidDirection(String),
    #[error("unknown command: {0:?}")]
    Unknown(String),
}

impl Command {
    /// Build a command from a verb and its argument, as typed on the
    /// command line (`focus left`, `swap l`, `show 3`, `send 3`).
    pub fn from_words(verb: &str, arg: Option<&str>) -> Result<Self, ParseCommandError> {
        let required = || arg.ok_or_else(|| ParseCommandError::MissingArgument(verb.to_string()));
        let dir = |s: &str| {
            parse_direction(s).ok_or_else(|| ParseCommandError::InvalidDirection(s.to_string()))
        };
        match verb {
            "focus" => Ok(Command::FocusSmart(dir(required()?)?)),
            "swap" => Ok(Command::SwapScreen(dir(required()?)?)),
            "show" => Ok(Command::ShowGroup(required()?.to_string())),
            "send" => Ok(Command::SendToGroup(required()?.to_string())),
            other => Err(ParseCommandError::Unknown(other.to_string())),
        }
    }
}

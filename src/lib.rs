//! **hyprnear**: nearest-window directional focus across monitors.
//!
//! Pressing "focus left" moves focus to the closest window to the left of
//! the focused one, whichever monitor it is on.  When no window qualifies,
//! focus moves to the closest monitor in that direction instead.  Windows
//! can be thrown to the neighbouring monitor the same way, and a newly
//! opened window takes fullscreen over from the one already fullscreen on
//! its screen.
//!
//! # Architecture
//!
//! * [`model`]: a read-only [`Snapshot`](model::Snapshot) of screens,
//!   groups and windows.
//! * [`select`]: pure planners that pick a target from a snapshot.
//! * [`navigator`]: executes plans against a
//!   [`traits::WindowManager`].
//! * [`traits::CommandSource`]: abstracts where commands come from.
//!
//! Concrete implementations live in [`hyprland`] (Hyprland IPC and event
//! stream) and [`ipc`] (Unix-socket command listener).

pub mod command;
pub mod config;
pub mod hyprland;
pub mod ipc;
pub mod model;
pub mod navigator;
pub mod select;
pub mod traits;

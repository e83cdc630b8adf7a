//! Core traits that decouple hyprnear from any specific window manager or
//! transport mechanism.
//!
//! The [`Navigator`](crate::navigator::Navigator) only depends on these
//! abstractions; Hyprland lives behind them in [`hyprland`](crate::hyprland).

use crate::command::Command;
use crate::model::{GroupTarget, Screen, Snapshot};
use std::sync::mpsc;

/// Abstraction over a window manager that can report its state and move
/// focus and windows around.
///
/// An implementation might talk to Hyprland via IPC, or it might be a
/// recording stub used in tests.
pub trait WindowManager {
    /// The error type produced by this window manager.
    type Error: std::error::Error + Send + 'static;

    /// Capture the current screens, windows and focus.
    fn snapshot(&self) -> Result<Snapshot, Self::Error>;

    /// Focus `screen`.  When `warp` is `false` the pointer stays where it is.
    fn focus_screen(&self, screen: &Screen, warp: bool) -> Result<(), Self::Error>;

    /// Focus the window at `address` within its group.  When `warp` is
    /// `false` the pointer stays where it is.
    fn focus_window(&self, address: &str, warp: bool) -> Result<(), Self::Error>;

    /// Move the window at `address` to `group` without following it.
    fn move_window_to_group(&self, address: &str, group: &GroupTarget) -> Result<(), Self::Error>;

    /// Turn fullscreen on or off for the window at `address`.  Never moves
    /// the pointer.
    fn set_fullscreen(&self, address: &str, fullscreen: bool) -> Result<(), Self::Error>;

    /// Display `group` on `screen`.
    fn show_group_on_screen(&self, screen: &Screen, group: &GroupTarget) -> Result<(), Self::Error>;
}

/// A source of [`Command`]s.
///
/// Implementations listen on some transport (a Unix socket, the
/// compositor's event stream, an in-memory channel) and forward parsed
/// commands into the provided [`mpsc::Sender`].
///
/// # Contract
///
/// * [`run`](CommandSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received command must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait CommandSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming [`Command`] into `sink`.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Direction;

    #[derive(Debug, thiserror::Error)]
    #[error("mock error")]
    struct MockError;

    /// A test double that emits a fixed sequence of commands.
    struct MockSource {
        commands: Vec<Command>,
    }

    impl CommandSource for MockSource {
        type Error = MockError;

        fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), MockError> {
            for cmd in self.commands.drain(..) {
                let _ = sink.send(cmd);
            }
            Ok(())
        }
    }

    #[test]
    fn mock_source_emits_commands() {
        let mut src = MockSource {
            commands: vec![
                Command::FocusSmart(Direction::Right),
                Command::ShowGroup("2".into()),
            ],
        };
        let (tx, rx) = mpsc::channel();
        src.run(tx).unwrap();
        let cmds: Vec<Command> = rx.try_iter().collect();
        assert_eq!(
            cmds,
            vec![
                Command::FocusSmart(Direction::Right),
                Command::ShowGroup("2".into()),
            ]
        );
    }
}

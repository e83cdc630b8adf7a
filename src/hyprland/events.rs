//! Translates Hyprland's event stream into hyprnear [`Command`]s.
//!
//! Hyprland broadcasts events on socket2 at
//! `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket2.sock`, one
//! `EVENT>>DATA\n` line each.  The only event hyprnear cares about is
//!
//! | Event        | Payload                             |
//! |--------------|-------------------------------------|
//! | `openwindow` | `<address>,<workspace>,<class>,<title>` |
//!
//! which becomes [`Command::WindowOpened`].  The address arrives without
//! the `0x` prefix that `j/clients` uses, so it is added here.

use crate::command::Command;
use crate::traits::CommandSource;
use log::{debug, error, info, warn};
use std::io::{BufRead, BufReader};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::sync::mpsc;

/// A [`CommandSource`] that listens to Hyprland's event socket.
#[derive(Debug, Default)]
pub struct HyprlandEventSource;

impl HyprlandEventSource {
    pub fn new() -> Self {
        Self
    }
}

/// Error from the Hyprland event source.
#[derive(Debug, thiserror::Error)]
#[error("hyprland event error: {0}")]
pub struct EventSourceError(String);

fn socket2_path() -> Result<PathBuf, EventSourceError> {
    Ok(super::instance_dir()
        .map_err(EventSourceError)?
        .join(".socket2.sock"))
}

/// Parse a single event line from socket2.
fn parse_event_line(line: &str) -> Option<(&str, &str)> {
    line.split_once(">>")
}

/// Map an event to a command, if it is one we react to.
fn event_command(event: &str, data: &str) -> Option<Command> {
    match event {
        "openwindow" => {
            let address = data.split(',').next()?.trim();
            if address.is_empty() {
                return None;
            }
            let address = if address.starts_with("0x") {
                address.to_string()
            } else {
                format!("0x{}", address)
            };
            Some(Command::WindowOpened(address))
        }
        _ => None,
    }
}

impl CommandSource for HyprlandEventSource {
    type Error = EventSourceError;

    /// Connect to socket2 and forward window events.
    ///
    /// This method **blocks** until the compositor closes the socket.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error> {
        let path = socket2_path()?;
        let stream = UnixStream::connect(&path)
            .map_err(|e| EventSourceError(format!("connect to {}: {}", path.display(), e)))?;
        info!("event source connected to {}", path.display());

        for line in BufReader::new(stream).lines() {
            match line {
                Ok(line) if line.is_empty() => continue,
                Ok(line) => {
                    let Some((event, data)) = parse_event_line(&line) else {
                        continue;
                    };
                    if let Some(cmd) = event_command(event, data) {
                        debug!("event {} → {:?}", event, cmd);
                        if sink.send(cmd).is_err() {
                            info!("sink closed, shutting down");
                            return Ok(());
                        }
                    }
                }
                Err(e) => {
                    error!("socket2 read error: {}", e);
                    return Err(EventSourceError(format!("read error: {}", e)));
                }
            }
        }

        warn!("socket2 stream ended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_event_line_valid() {
        assert_eq!(
            parse_event_line("openwindow>>80e62df0,2,kitty,~"),
            Some(("openwindow", "80e62df0,2,kitty,~"))
        );
        assert_eq!(parse_event_line("workspace>>3"), Some(("workspace", "3")));
    }

    #[test]
    fn parse_event_line_no_separator() {
        assert_eq!(parse_event_line("garbage"), None);
    }

    #[test]
    fn openwindow_becomes_window_opened() {
        assert_eq!(
            event_command("openwindow", "80e62df0,2,kitty,~"),
            Some(Command::WindowOpened("0x80e62df0".into()))
        );
    }

    #[test]
    fn prefixed_address_is_kept() {
        assert_eq!(
            event_command("openwindow", "0xabc,1,mpv,movie.mkv"),
            Some(Command::WindowOpened("0xabc".into()))
        );
    }

    #[test]
    fn title_with_commas_is_fine() {
        assert_eq!(
            event_command("openwindow", "abc,1,firefox,a, b, c"),
            Some(Command::WindowOpened("0xabc".into()))
        );
    }

    #[test]
    fn empty_address_is_ignored() {
        assert_eq!(event_command("openwindow", ""), None);
        assert_eq!(event_command("openwindow", ",1,x,y"), None);
    }

    #[test]
    fn other_events_ignored() {
        assert_eq!(event_command("workspace", "2"), None);
        assert_eq!(event_command("activewindow", "kitty,~"), None);
        assert_eq!(event_command("closewindow", "80e62df0"), None);
    }
}

//! Unix-socket [`CommandSource`] implementation.
//!
//! Binds a Unix stream socket and accepts one connection at a time.
//! Each line received is parsed as a JSON-encoded [`Command`].
//!
//! # Wire format
//!
//! Every message is a single line of JSON followed by `\n`:
//!
//! ```json
//! {"FocusSmart":"left"}
//! {"SwapScreen":"right"}
//! {"ShowGroup":"3"}
//! {"SendToGroup":"3"}
//! ```

use crate::command::Command;
use crate::traits::CommandSource;
use log::{debug, error, info, warn};
use std::io::{BufRead, BufReader};
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// A [`CommandSource`] that listens on a Unix stream socket for
/// JSON-encoded commands.
pub struct UnixSocketListener {
    path: PathBuf,
}

/// Errors produced by the Unix socket listener.
#[derive(Debug, thiserror::Error)]
pub enum UnixSocketError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl UnixSocketListener {
    /// Create a listener for `path`.  Nothing is bound until
    /// [`run`](CommandSource::run).
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

/// Whether the listener should keep accepting after a connection ends.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    SinkClosed,
}

/// Forward every well-formed line of `reader` into `sink`.
///
/// Blank lines are skipped, malformed ones are logged and skipped.
fn forward_commands(reader: impl BufRead, sink: &mpsc::Sender<Command>) -> Flow {
    for line in reader.lines() {
        let text = match line {
            Ok(text) => text,
            Err(e) => {
                error!("read error: {}", e);
                break;
            }
        };
        if text.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Command>(&text) {
            Ok(cmd) => {
                debug!("received {:?}", cmd);
                if sink.send(cmd).is_err() {
                    return Flow::SinkClosed;
                }
            }
            Err(e) => warn!("bad command {:?}: {}", text, e),
        }
    }
    Flow::Continue
}

impl CommandSource for UnixSocketListener {
    type Error = UnixSocketError;

    /// Bind the socket and start accepting connections.
    ///
    /// This method **blocks** until the sink is dropped.  The socket file is
    /// removed on the way out.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error> {
        // Stale socket from a previous run.
        let _ = std::fs::remove_file(&self.path);

        let listener = UnixListener::bind(&self.path)?;
        info!("listening on {}", self.path.display());

        for stream in listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    error!("accept error: {}", e);
                    continue;
                }
            };
            debug!("client connected");
            if forward_commands(BufReader::new(stream), &sink) == Flow::SinkClosed {
                info!("sink closed, shutting down");
                break;
            }
            debug!("client disconnected");
        }

        let _ = std::fs::remove_file(&self.path);
        Ok(())
    }
}

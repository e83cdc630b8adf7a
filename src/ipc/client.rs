//! Sending side of the command socket, used by `hyprnear focus left` and
//! friends.

use crate::command::Command;
use crate::ipc::listener::UnixSocketError;
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::Path;

/// Write `cmd` as one JSON line to the daemon listening at `path`.
pub fn send_command(path: &Path, cmd: &Command) -> Result<(), UnixSocketError> {
    let mut line = serde_json::to_string(cmd)?;
    line.push('\n');
    let mut stream = UnixStream::connect(path)?;
    stream.write_all(line.as_bytes())?;
    stream.shutdown(std::net::Shutdown::Write)?;
    Ok(())
}

//! Command socket.
//!
//! Key-bind helpers connect to the socket and send newline-delimited JSON
//! commands; [`client`] is the sending side used by the CLI.

pub mod client;
pub mod listener;

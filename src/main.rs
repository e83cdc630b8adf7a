//! Entry point for **hyprnear**.
//!
//! `hyprnear` (or `hyprnear daemon`) runs the daemon: command sources are
//! spawned on background threads and every command is handled on the main
//! thread, one at a time.
//!
//! Any other invocation is a client call that forwards one command to the
//! running daemon, for use in key binds:
//!
//! ```text
//! bind = SUPER, h, exec, hyprnear focus left
//! bind = SUPER SHIFT, l, exec, hyprnear swap right
//! bind = SUPER, 3, exec, hyprnear show 3
//! bind = SUPER SHIFT, 3, exec, hyprnear send 3
//! ```

use hyprnear::command::Command;
use hyprnear::config::Config;
use hyprnear::hyprland::events::HyprlandEventSource;
use hyprnear::hyprland::wm::HyprlandWm;
use hyprnear::ipc::client::send_command;
use hyprnear::ipc::listener::UnixSocketListener;
use hyprnear::navigator::Navigator;
use hyprnear::traits::CommandSource;
use log::{error, info};
use std::path::PathBuf;
use std::sync::mpsc;

const USAGE: &str = "usage: hyprnear [daemon]
       hyprnear focus <left|down|up|right>
       hyprnear swap <left|down|up|right>
       hyprnear show <label>
       hyprnear send <label>";

/// Default socket path for the command listener.
fn socket_path() -> PathBuf {
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
    PathBuf::from(runtime).join("hyprnear.sock")
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/hyprnear`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("hyprnear")
}

/// Try to load the config from `$XDG_CONFIG_HOME/hyprnear/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("daemon") => run_daemon(),
        Some("-h") | Some("--help") => println!("{}", USAGE),
        Some(verb) => run_client(verb, args.get(1).map(String::as_str)),
    }
}

/// Send one command to the daemon and exit.
fn run_client(verb: &str, arg: Option<&str>) {
    let cmd = match Command::from_words(verb, arg) {
        Ok(cmd) => cmd,
        Err(e) => {
            eprintln!("{}\n{}", e, USAGE);
            std::process::exit(2);
        }
    };
    let path = socket_path();
    if let Err(e) = send_command(&path, &cmd) {
        error!("failed to reach daemon at {}: {}", path.display(), e);
        std::process::exit(1);
    }
}

/// Daemon mode.
fn run_daemon() {
    let config = load_config();
    let mut navigator = Navigator::new(HyprlandWm::new(), &config);

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    spawn_command_sources(cmd_tx);

    info!("hyprnear running");
    for cmd in cmd_rx {
        if let Err(e) = navigator.handle(cmd) {
            error!("command error: {}", e);
        }
    }
    info!("all command sources closed, exiting");
}

fn spawn_command_sources(tx: mpsc::Sender<Command>) {
    {
        let tx = tx.clone();
        let path = socket_path();
        std::thread::spawn(move || {
            let mut source = UnixSocketListener::new(&path);
            if let Err(e) = source.run(tx) {
                error!("socket listener error: {}", e);
            }
        });
    }

    {
        let tx = tx.clone();
        std::thread::spawn(move || {
            let mut source = HyprlandEventSource::new();
            if let Err(e) = source.run(tx) {
                error!("event source error: {}", e);
            }
        });
    }

    drop(tx);
}

//! [`WindowManager`] implementation backed by Hyprland IPC.
//!
//! Communicates directly with Hyprland through its Unix socket at
//! `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket.sock`.
//! Every call opens a short-lived request; nothing is cached.

use crate::model::{Group, GroupTarget, Point, Screen, Snapshot, Window};
use crate::traits::WindowManager;
use log::debug;
use serde::{Deserialize, Deserializer};
use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;

/// Hyprland-backed window manager.
#[derive(Debug, Default)]
pub struct HyprlandWm;

/// Errors that can occur when talking to Hyprland.
#[derive(Debug, thiserror::Error)]
#[error("hyprland IPC error: {0}")]
pub struct HyprlandWmError(String);

impl HyprlandWm {
    pub fn new() -> Self {
        Self
    }
}

//  Direct Hyprland IPC helpers

fn socket_path() -> Result<PathBuf, HyprlandWmError> {
    Ok(super::instance_dir()
        .map_err(HyprlandWmError)?
        .join(".socket.sock"))
}

/// Send a raw request to the Hyprland command socket and return the
/// response as a string.
fn ipc_request(request: &str) -> Result<String, HyprlandWmError> {
    let path = socket_path()?;
    let mut stream = UnixStream::connect(&path)
        .map_err(|e| HyprlandWmError(format!("connect to {}: {}", path.display(), e)))?;

    stream
        .write_all(request.as_bytes())
        .map_err(|e| HyprlandWmError(format!("write: {}", e)))?;

    let mut response = Vec::new();
    stream
        .read_to_end(&mut response)
        .map_err(|e| HyprlandWmError(format!("read: {}", e)))?;

    String::from_utf8(response).map_err(|e| HyprlandWmError(format!("utf-8: {}", e)))
}

/// Send a JSON data query (`j/<command>`) and return the raw JSON string.
fn ipc_json(data_command: &str) -> Result<String, HyprlandWmError> {
    ipc_request(&format!("j/{}", data_command))
}

/// Whether a (possibly batched) response consists of nothing but `ok`s.
fn all_ok(response: &str) -> bool {
    !response.trim().is_empty() && response.replace("ok", "").trim().is_empty()
}

/// Send a dispatch command and check for `"ok"`.
fn ipc_dispatch(args: &str) -> Result<(), HyprlandWmError> {
    debug!("dispatch {}", args);
    let response = ipc_request(&format!("/dispatch {}", args))?;
    if all_ok(&response) {
        Ok(())
    } else {
        Err(HyprlandWmError(format!("dispatch error: {}", response)))
    }
}

/// Run several requests (`dispatch ...`, `keyword ...`) as one batch.
fn ipc_batch(requests: &[String]) -> Result<(), HyprlandWmError> {
    let batch = requests.join(";");
    debug!("batch {}", batch);
    let response = ipc_request(&format!("[[BATCH]]{}", batch))?;
    if all_ok(&response) {
        Ok(())
    } else {
        Err(HyprlandWmError(format!("batch error: {}", response)))
    }
}

//  Minimal serde structs for the JSON we care about

/// Hyprland's id for "no workspace".
const WORKSPACE_INVALID: i32 = -1;

#[derive(Deserialize)]
struct WorkspaceRef {
    id: i32,
    name: String,
}

/// Subset of the JSON object returned by `j/monitors`.
#[derive(Deserialize)]
struct MonitorJson {
    id: i64,
    name: String,
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    #[serde(default)]
    focused: bool,
    #[serde(default)]
    disabled: bool,
    #[serde(rename = "activeWorkspace")]
    active_workspace: Option<WorkspaceRef>,
}

fn mapped_default() -> bool {
    true
}

/// Subset of the JSON object returned by `j/clients`.
#[derive(Deserialize)]
struct ClientJson {
    address: String,
    #[serde(default = "mapped_default")]
    mapped: bool,
    #[serde(default)]
    hidden: bool,
    at: [i32; 2],
    workspace: WorkspaceRef,
    #[serde(default)]
    floating: bool,
    #[serde(default, deserialize_with = "fullscreen_flag")]
    fullscreen: bool,
    #[serde(default)]
    class: String,
    #[serde(default)]
    title: String,
}

/// Subset of the JSON object returned by `j/activewindow`.
#[derive(Deserialize)]
struct ActiveWindowJson {
    address: String,
}

/// Subset of the JSON object returned by `j/getoption`.
#[derive(Deserialize)]
struct OptionJson {
    #[serde(default)]
    int: i64,
}

/// Older Hyprland reports `fullscreen` as a bool; newer releases report a
/// bitmask where `2` is real fullscreen and `1` is maximized.
fn fullscreen_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{Error as DeError, Visitor};
    use std::fmt;

    struct V;
    impl<'de> Visitor<'de> for V {
        type Value = bool;
        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "bool or fullscreen mode integer")
        }
        fn visit_bool<E>(self, b: bool) -> Result<bool, E> {
            Ok(b)
        }
        fn visit_u64<E>(self, n: u64) -> Result<bool, E> {
            Ok(n & 2 != 0)
        }
        fn visit_i64<E>(self, n: i64) -> Result<bool, E>
        where
            E: DeError,
        {
            if n < 0 {
                return Err(DeError::custom(format!("negative fullscreen mode {}", n)));
            }
            Ok(n & 2 != 0)
        }
    }
    deserializer.deserialize_any(V)
}

fn parse<'a, T: Deserialize<'a>>(what: &str, json: &'a str) -> Result<T, HyprlandWmError> {
    serde_json::from_str(json).map_err(|e| HyprlandWmError(format!("parse {}: {}", what, e)))
}

fn group_of(ws: WorkspaceRef) -> Option<Group> {
    (ws.id != WORKSPACE_INVALID).then(|| Group::new(ws.id, ws.name))
}

/// Assemble a [`Snapshot`] from the raw `j/monitors`, `j/clients` and
/// `j/activewindow` responses.
///
/// Screens are indexed in monitor-id order.  Fullscreen clients are
/// reported as floating: they sit above the tiled layout and hide it.
/// Unmapped and hidden clients are left out.
pub(crate) fn build_snapshot(
    monitors_json: &str,
    clients_json: &str,
    active_json: &str,
) -> Result<Snapshot, HyprlandWmError> {
    let mut monitors: Vec<MonitorJson> = parse("monitors", monitors_json)?;
    monitors.sort_by_key(|m| m.id);
    let clients: Vec<ClientJson> = parse("clients", clients_json)?;

    let current_screen = monitors.iter().position(|m| m.focused);
    let screens = monitors
        .into_iter()
        .enumerate()
        .map(|(index, m)| {
            let usable = !m.disabled && m.width > 0 && m.height > 0;
            Screen {
                index,
                name: m.name,
                position: usable.then(|| Point::new(m.x, m.y)),
                group: m.active_workspace.and_then(group_of),
            }
        })
        .collect();

    let windows = clients
        .into_iter()
        .filter(|c| c.mapped && !c.hidden)
        .map(|c| Window {
            address: c.address,
            name: c.title,
            class: c.class,
            position: Point::new(c.at[0], c.at[1]),
            fullscreen: c.fullscreen,
            floating: c.floating || c.fullscreen,
            group: group_of(c.workspace),
        })
        .collect();

    // `{}` when nothing is focused.
    let current_window = if active_json.trim() == "{}" || active_json.trim().is_empty() {
        None
    } else {
        let w: ActiveWindowJson = parse("activewindow", active_json)?;
        Some(w.address)
    };

    Ok(Snapshot {
        screens,
        windows,
        current_screen,
        current_window,
    })
}

/// Current value of `cursor:no_warps`.
fn no_warps() -> Result<i64, HyprlandWmError> {
    let json = ipc_json("getoption cursor:no_warps")?;
    let option: OptionJson = parse("getoption", &json)?;
    Ok(option.int)
}

/// Wrap `dispatches` in a batch that sets `cursor:no_warps` for their
/// duration and then restores `previous`.
///
/// `focusmonitor` and `focuswindow` move the pointer unless the option is set.
fn no_warp_batch(previous: i64, dispatches: &[String]) -> Vec<String> {
    let mut batch = Vec::with_capacity(dispatches.len() + 2);
    batch.push("keyword cursor:no_warps 1".to_string());
    batch.extend(dispatches.iter().map(|d| format!("dispatch {}", d)));
    batch.push(format!("keyword cursor:no_warps {}", previous));
    batch
}

fn focus_window_dispatch(address: &str) -> String {
    format!("focuswindow address:{}", address)
}

fn move_dispatch(address: &str, group: &GroupTarget) -> String {
    format!("movetoworkspacesilent {},address:{}", group, address)
}

/// Dispatch `dispatch` as-is when `warp` is set, otherwise inside a
/// no-warp batch.
fn dispatch_maybe_warping(dispatch: String, warp: bool) -> Result<(), HyprlandWmError> {
    if warp {
        ipc_dispatch(&dispatch)
    } else {
        ipc_batch(&no_warp_batch(no_warps()?, &[dispatch]))
    }
}

//  WindowManager implementation

impl WindowManager for HyprlandWm {
    type Error = HyprlandWmError;

    fn snapshot(&self) -> Result<Snapshot, Self::Error> {
        let monitors = ipc_json("monitors")?;
        let clients = ipc_json("clients")?;
        let active = ipc_json("activewindow")?;
        build_snapshot(&monitors, &clients, &active)
    }

    fn focus_screen(&self, screen: &Screen, warp: bool) -> Result<(), Self::Error> {
        dispatch_maybe_warping(format!("focusmonitor {}", screen.name), warp)
    }

    fn focus_window(&self, address: &str, warp: bool) -> Result<(), Self::Error> {
        dispatch_maybe_warping(focus_window_dispatch(address), warp)
    }

    fn move_window_to_group(&self, address: &str, group: &GroupTarget) -> Result<(), Self::Error> {
        ipc_dispatch(&move_dispatch(address, group))
    }

    fn set_fullscreen(&self, address: &str, fullscreen: bool) -> Result<(), Self::Error> {
        // fullscreenstate acts on the active window, so focus it first.
        let mode = if fullscreen { 2 } else { 0 };
        ipc_batch(&no_warp_batch(
            no_warps()?,
            &[
                focus_window_dispatch(address),
                format!("fullscreenstate {} -1", mode),
            ],
        ))
    }

    fn show_group_on_screen(&self, screen: &Screen, group: &GroupTarget) -> Result<(), Self::Error> {
        ipc_batch(&[
            format!("dispatch focusmonitor {}", screen.name),
            format!("dispatch focusworkspaceoncurrentmonitor {}", group),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Direction;
    use crate::select::plan_swap;

    const MONITORS: &str = r#"[
        {
            "id": 1, "name": "HDMI-A-1", "width": 1920, "height": 1080,
            "x": 2560, "y": 0, "focused": false,
            "activeWorkspace": { "id": 2, "name": "11" }
        },
        {
            "id": 0, "name": "DP-1", "width": 2560, "height": 1440,
            "x": 0, "y": 0, "focused": true,
            "activeWorkspace": { "id": 1, "name": "10" }
        }
    ]"#;

    const CLIENTS: &str = r#"[
        {
            "address": "0x1", "mapped": true, "hidden": false, "at": [10, 20],
            "size": [800, 600], "workspace": { "id": 1, "name": "10" },
            "floating": false, "fullscreen": 0, "monitor": 0,
            "class": "kitty", "title": "~"
        },
        {
            "address": "0x2", "mapped": true, "hidden": false, "at": [2560, 0],
            "size": [1920, 1080], "workspace": { "id": 2, "name": "11" },
            "floating": false, "fullscreen": 2, "monitor": 1,
            "class": "kodi", "title": "Kodi"
        },
        {
            "address": "0x3", "mapped": false, "hidden": false, "at": [0, 0],
            "size": [0, 0], "workspace": { "id": -1, "name": "" },
            "floating": false, "fullscreen": 0, "monitor": -1,
            "class": "ghost", "title": ""
        },
        {
            "address": "0x4", "mapped": true, "hidden": false, "at": [5, 5],
            "size": [100, 100], "workspace": { "id": -1, "name": "" },
            "floating": true, "fullscreen": false, "monitor": 0,
            "class": "popup", "title": "new"
        }
    ]"#;

    #[test]
    fn builds_snapshot_from_hyprland_json() {
        let snap = build_snapshot(MONITORS, CLIENTS, r#"{"address": "0x1"}"#).unwrap();

        assert_eq!(snap.screens.len(), 2);
        assert_eq!(snap.screens[0].name, "DP-1");
        assert_eq!(snap.screens[0].index, 0);
        assert_eq!(snap.screens[1].name, "HDMI-A-1");
        assert_eq!(snap.screens[1].position, Some(Point::new(2560, 0)));
        assert_eq!(snap.screens[1].group, Some(Group::new(2, "11")));
        assert_eq!(snap.current_screen, Some(0));
        assert_eq!(snap.current_window.as_deref(), Some("0x1"));

        let addrs: Vec<&str> = snap.windows.iter().map(|w| w.address.as_str()).collect();
        assert_eq!(addrs, vec!["0x1", "0x2", "0x4"], "unmapped client dropped");

        let kitty = snap.window("0x1").unwrap();
        assert_eq!(kitty.position, Point::new(10, 20));
        assert!(!kitty.floating);
        assert!(!kitty.fullscreen);

        let kodi = snap.window("0x2").unwrap();
        assert_eq!(kodi.name, "Kodi");
        assert!(kodi.fullscreen);
        assert!(kodi.floating, "fullscreen clients count as floating");

        assert_eq!(snap.window("0x4").unwrap().group, None);
    }

    #[test]
    fn empty_active_window_means_no_focus() {
        let snap = build_snapshot(MONITORS, "[]", "{}").unwrap();
        assert_eq!(snap.current_window, None);
        assert!(snap.windows.is_empty());
    }

    #[test]
    fn disabled_monitor_has_no_position() {
        let json = r#"[{
            "id": 0, "name": "DP-3", "width": 1920, "height": 1080,
            "x": 0, "y": 0, "focused": false, "disabled": true,
            "activeWorkspace": { "id": 1, "name": "1" }
        }]"#;
        let snap = build_snapshot(json, "[]", "{}").unwrap();
        assert_eq!(snap.screens[0].position, None);
        assert_eq!(snap.current_screen, None);
    }

    #[test]
    fn fullscreen_flag_accepts_bool_and_mode() {
        #[derive(Deserialize)]
        struct W {
            #[serde(deserialize_with = "fullscreen_flag")]
            fullscreen: bool,
        }
        let f = |s: &str| serde_json::from_str::<W>(s).map(|w| w.fullscreen);
        assert!(f(r#"{"fullscreen": true}"#).unwrap());
        assert!(!f(r#"{"fullscreen": false}"#).unwrap());
        assert!(!f(r#"{"fullscreen": 0}"#).unwrap());
        assert!(!f(r#"{"fullscreen": 1}"#).unwrap(), "maximized is not fullscreen");
        assert!(f(r#"{"fullscreen": 2}"#).unwrap());
        assert!(f(r#"{"fullscreen": 3}"#).unwrap());
        assert!(f(r#"{"fullscreen": "yes"}"#).is_err());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = build_snapshot("not json", "[]", "{}").unwrap_err();
        assert!(err.to_string().contains("parse monitors"));
    }

    #[test]
    fn ok_responses() {
        assert!(all_ok("ok"));
        assert!(all_ok("ok\n"));
        assert!(all_ok("ok\n\nok\n\nok"));
        assert!(all_ok("okok"));
        assert!(!all_ok(""));
        assert!(!all_ok("Invalid dispatcher"));
        assert!(!all_ok("ok\n\nNo such window found"));
    }

    #[test]
    fn named_workspaces_are_moved_to_by_name() {
        let monitors = r#"[
            {
                "id": 0, "name": "DP-1", "width": 1920, "height": 1080,
                "x": 0, "y": 0, "focused": true,
                "activeWorkspace": { "id": -1337, "name": "10" }
            },
            {
                "id": 1, "name": "DP-2", "width": 1920, "height": 1080,
                "x": 1920, "y": 0, "focused": false,
                "activeWorkspace": { "id": -1338, "name": "11" }
            }
        ]"#;
        let clients = r#"[
            {
                "address": "0xa", "at": [100, 100],
                "workspace": { "id": -1337, "name": "10" },
                "floating": false, "fullscreen": 0, "class": "kitty", "title": "~"
            }
        ]"#;
        let snap = build_snapshot(monitors, clients, r#"{"address": "0xa"}"#).unwrap();
        let plan = plan_swap(&snap, Direction::Right).unwrap();

        assert_eq!(plan.group, Group::new(-1338, "11"));
        assert_eq!(
            move_dispatch(&plan.window, &GroupTarget::from(&plan.group)),
            "movetoworkspacesilent name:11,address:0xa"
        );
    }

    #[test]
    fn special_workspace_keeps_its_name() {
        let target = GroupTarget::from(&Group::new(-98, "special:magic"));
        assert_eq!(
            move_dispatch("0xa", &target),
            "movetoworkspacesilent special:magic,address:0xa"
        );
    }

    #[test]
    fn no_warp_batch_brackets_the_dispatches() {
        let batch = no_warp_batch(0, &[focus_window_dispatch("0xb")]);
        assert_eq!(
            batch,
            vec![
                "keyword cursor:no_warps 1",
                "dispatch focuswindow address:0xb",
                "keyword cursor:no_warps 0",
            ]
        );

        let batch = no_warp_batch(
            1,
            &[focus_window_dispatch("0xc"), "fullscreenstate 2 -1".to_string()],
        );
        assert_eq!(batch.first().map(String::as_str), Some("keyword cursor:no_warps 1"));
        assert_eq!(batch[1], "dispatch focuswindow address:0xc");
        assert_eq!(batch[2], "dispatch fullscreenstate 2 -1");
        assert_eq!(batch.last().map(String::as_str), Some("keyword cursor:no_warps 1"));
    }

    #[test]
    fn missing_environment_is_reported() {
        // Only meaningful outside a Hyprland session.
        if std::env::var("HYPRLAND_INSTANCE_SIGNATURE").is_ok() {
            return;
        }
        assert!(socket_path().is_err());
    }
}

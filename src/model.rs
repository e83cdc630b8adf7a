//! Read-only snapshot of the window manager state.
//!
//! A [`Snapshot`] is taken fresh every time a command is handled.  Nothing
//! in here is ever mutated on behalf of the compositor; the planners in
//! [`select`](crate::select) read it and describe what should happen.

use std::fmt;

/// A point on the virtual desktop, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: Point) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        dx.hypot(dy)
    }
}

/// A workspace ("group") that windows belong to and that a screen displays.
///
/// Groups compare by id only; the name is informational.
#[derive(Debug, Clone, Eq)]
pub struct Group {
    pub id: i32,
    pub name: String,
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Group {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// How a group is addressed when asking the window manager to move a window
/// or show a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupTarget {
    /// An existing group, by numeric id.
    Id(i32),
    /// A group by name; the window manager creates it on demand.
    Name(String),
    /// A special (scratchpad) group, by its full `special:...` name.
    Special(String),
}

impl From<&Group> for GroupTarget {
    /// Named and special groups have negative ids, which Hyprland would
    /// read as a relative offset, so those are addressed by name.
    fn from(group: &Group) -> Self {
        if group.id > 0 {
            GroupTarget::Id(group.id)
        } else if group.name.starts_with("special") {
            GroupTarget::Special(group.name.clone())
        } else {
            GroupTarget::Name(group.name.clone())
        }
    }
}

impl fmt::Display for GroupTarget {
    /// Formats the target in Hyprland's workspace syntax (`3`, `name:31`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupTarget::Id(id) => write!(f, "{}", id),
            GroupTarget::Name(name) => write!(f, "name:{}", name),
            GroupTarget::Special(name) => write!(f, "{}", name),
        }
    }
}

/// A client window.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    /// Window manager address (`0x...`).
    pub address: String,
    /// Title, used as the identifying name.
    pub name: String,
    /// Application class.
    pub class: String,
    /// Top-left corner.
    pub position: Point,
    pub fullscreen: bool,
    /// `true` when the window lives outside the tiled layout.
    pub floating: bool,
    /// `None` while the window has not been assigned to a group.
    pub group: Option<Group>,
}

/// A monitor.
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub index: usize,
    pub name: String,
    /// `None` when the window manager has no usable geometry for it.
    pub position: Option<Point>,
    /// The group currently displayed on this screen.
    pub group: Option<Group>,
}

/// Everything the planners need to know about the current state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub screens: Vec<Screen>,
    pub windows: Vec<Window>,
    /// Index of the focused screen.
    pub current_screen: Option<usize>,
    /// Address of the focused window.
    pub current_window: Option<String>,
}

impl Snapshot {
    pub fn screen(&self, index: usize) -> Option<&Screen> {
        self.screens.iter().find(|s| s.index == index)
    }

    pub fn window(&self, address: &str) -> Option<&Window> {
        self.windows.iter().find(|w| w.address == address)
    }

    pub fn current_screen(&self) -> Option<&Screen> {
        self.current_screen.and_then(|idx| self.screen(idx))
    }

    pub fn current_window(&self) -> Option<&Window> {
        self.current_window
            .as_deref()
            .and_then(|addr| self.window(addr))
    }

    /// All windows that belong to `group`, in snapshot order.
    pub fn windows_in<'a>(&'a self, group: &'a Group) -> impl Iterator<Item = &'a Window> + 'a {
        self.windows
            .iter()
            .filter(move |w| w.group.as_ref() == Some(group))
    }
}

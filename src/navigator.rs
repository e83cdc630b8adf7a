//! The orchestrator that turns [`Command`]s into window manager calls.
//!
//! [`Navigator`] takes a fresh [`Snapshot`](crate::model::Snapshot) for
//! every command, asks [`select`](crate::select) for a plan and executes
//! it.  It keeps no state between commands.

use crate::command::{Command, Direction};
use crate::config::{ArrivalConfig, Config, FocusConfig};
use crate::model::{GroupTarget, Snapshot};
use crate::select::{plan_arrival, plan_focus, plan_swap, FocusPlan};
use crate::traits::WindowManager;
use log::{debug, info, warn};

/// Possible errors from the navigator.
#[derive(Debug, thiserror::Error)]
pub enum NavigatorError {
    /// The window manager returned an error.
    #[error("window manager error: {0}")]
    WindowManager(String),
}

fn wm_error(e: impl std::fmt::Display) -> NavigatorError {
    NavigatorError::WindowManager(e.to_string())
}

/// Executes directional focus, window relocation and new-window policy.
///
/// Generic over any [`WindowManager`], so it knows nothing about Hyprland.
///
/// ```ignore
/// let mut nav = Navigator::new(HyprlandWm::new(), &Config::default());
/// nav.handle(Command::FocusSmart(Direction::Left))?;
/// ```
pub struct Navigator<W: WindowManager> {
    wm: W,
    focus: FocusConfig,
    arrival: ArrivalConfig,
}

impl<W: WindowManager> Navigator<W> {
    pub fn new(wm: W, config: &Config) -> Self {
        Self {
            wm,
            focus: config.focus.clone(),
            arrival: config.arrival.clone(),
        }
    }

    /// Process a single [`Command`].
    ///
    /// A missing precondition (nothing focused, nothing in that direction)
    /// is not an error; the command simply does nothing.  Window manager
    /// failures are returned and nothing is retried.
    pub fn handle(&mut self, cmd: Command) -> Result<(), NavigatorError> {
        info!("{}", cmd);
        match cmd {
            Command::FocusSmart(dir) => self.focus_smart(dir),
            Command::SwapScreen(dir) => self.swap_screen(dir),
            Command::ShowGroup(label) => self.show_group(&label),
            Command::SendToGroup(label) => self.send_to_group(&label),
            Command::WindowOpened(address) => self.new_window_fullscreen(&address),
        }
    }

    fn snapshot(&self) -> Result<Snapshot, NavigatorError> {
        self.wm.snapshot().map_err(wm_error)
    }

    /// Focus the nearest window in `dir`, or failing that the nearest
    /// screen.
    pub fn focus_smart(&mut self, dir: Direction) -> Result<(), NavigatorError> {
        let snapshot = self.snapshot()?;
        match plan_focus(&snapshot, dir, &self.focus.denylist) {
            FocusPlan::Window { screen, address } => {
                let Some(screen) = snapshot.screen(screen) else {
                    warn!("planned screen {} vanished from snapshot", screen);
                    return Ok(());
                };
                debug!("  → window {} on {}", address, screen.name);
                self.wm
                    .focus_screen(screen, self.focus.warp_pointer)
                    .map_err(wm_error)?;
                self.wm
                    .focus_window(&address, self.focus.warp_pointer)
                    .map_err(wm_error)?;
            }
            FocusPlan::Screen { screen } => {
                let Some(screen) = snapshot.screen(screen) else {
                    warn!("planned screen {} vanished from snapshot", screen);
                    return Ok(());
                };
                debug!("  → screen {}", screen.name);
                self.wm.focus_screen(screen, false).map_err(wm_error)?;
            }
            FocusPlan::Nothing => {
                debug!("nothing {}", dir);
            }
        }
        Ok(())
    }

    /// Move the focused window to the nearest screen in `dir` and follow it.
    pub fn swap_screen(&mut self, dir: Direction) -> Result<(), NavigatorError> {
        let snapshot = self.snapshot()?;
        let Some(plan) = plan_swap(&snapshot, dir) else {
            debug!("no window to move or no screen {}", dir);
            return Ok(());
        };
        let Some(screen) = snapshot.screen(plan.screen) else {
            warn!("planned screen {} vanished from snapshot", plan.screen);
            return Ok(());
        };
        debug!("  → {} to group {} on {}", plan.window, plan.group.name, screen.name);
        self.wm
            .move_window_to_group(&plan.window, &GroupTarget::from(&plan.group))
            .map_err(wm_error)?;
        self.wm.focus_screen(screen, false).map_err(wm_error)?;
        Ok(())
    }

    /// Apply the new-window policy to the window at `address`.
    ///
    /// An ungrouped window joins the current screen's group, and takes
    /// fullscreen over from whichever window held it on that screen.
    pub fn new_window_fullscreen(&mut self, address: &str) -> Result<(), NavigatorError> {
        let snapshot = self.snapshot()?;
        let plan = plan_arrival(&snapshot, address, self.arrival.fullscreen_handoff);
        if plan.is_empty() {
            debug!("nothing to do for {}", address);
            return Ok(());
        }
        if let Some(group) = &plan.assign_to {
            debug!("  → {} joins group {}", address, group.name);
            self.wm
                .move_window_to_group(address, &GroupTarget::from(group))
                .map_err(wm_error)?;
        }
        if let Some(old) = &plan.demote {
            debug!("  → {} leaves fullscreen", old);
            self.wm.set_fullscreen(old, false).map_err(wm_error)?;
        }
        if let Some(new) = &plan.promote {
            debug!("  → {} goes fullscreen", new);
            self.wm.set_fullscreen(new, true).map_err(wm_error)?;
        }
        Ok(())
    }

    /// Show the group labelled `label` for the current screen.
    pub fn show_group(&mut self, label: &str) -> Result<(), NavigatorError> {
        let snapshot = self.snapshot()?;
        let Some(screen) = snapshot.current_screen() else {
            debug!("no current screen");
            return Ok(());
        };
        let group = screen_group_name(label, screen.index);
        self.wm
            .show_group_on_screen(screen, &GroupTarget::Name(group))
            .map_err(wm_error)
    }

    /// Send the focused window to the group labelled `label` for the
    /// current screen.
    pub fn send_to_group(&mut self, label: &str) -> Result<(), NavigatorError> {
        let snapshot = self.snapshot()?;
        let (Some(screen), Some(window)) = (snapshot.current_screen(), snapshot.current_window())
        else {
            debug!("no current screen or window");
            return Ok(());
        };
        let group = screen_group_name(label, screen.index);
        self.wm
            .move_window_to_group(&window.address, &GroupTarget::Name(group))
            .map_err(wm_error)
    }
}

/// Name of the group with `label` that belongs to screen `index`.
///
/// Each screen has its own copy of every label, so `"3"` on screen 1 is
/// `"31"`.
pub fn screen_group_name(label: &str, index: usize) -> String {
    format!("{}{}", label, index)
}

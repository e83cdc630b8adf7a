//! Directional candidate selection.
//!
//! Pure functions over a [`Snapshot`]: they decide *what* should be focused
//! or moved, and return a plan.  Executing the plan against the window
//! manager is the [`Navigator`](crate::navigator::Navigator)'s job, which
//! keeps everything in here testable without a compositor.
//!
//! All geometry uses top-left corners and Euclidean distance.  A candidate
//! is "in" a direction only under strict inequality, so a window never
//! qualifies as its own neighbour.

use crate::command::Direction;
use crate::model::{Group, Point, Screen, Snapshot, Window};

impl Direction {
    /// Strict directional predicate: is `p` on the `self` side of `reference`?
    pub fn admits(self, reference: Point, p: Point) -> bool {
        match self {
            Direction::Left => p.x < reference.x,
            Direction::Right => p.x > reference.x,
            Direction::Up => p.y < reference.y,
            Direction::Down => p.y > reference.y,
        }
    }
}

/// Outcome of [`plan_focus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusPlan {
    /// Focus `screen`, then focus the window at `address` inside its group.
    Window { screen: usize, address: String },
    /// No window qualifies; focus this screen without moving the pointer.
    Screen { screen: usize },
    /// Nothing in that direction.
    Nothing,
}

/// Outcome of [`plan_swap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapPlan {
    /// Address of the window to move.
    pub window: String,
    /// Screen to follow the window to.
    pub screen: usize,
    /// Group displayed on that screen.
    pub group: Group,
}

/// Outcome of [`plan_arrival`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrivalPlan {
    /// Group to put an ungrouped window into.
    pub assign_to: Option<Group>,
    /// Window that loses fullscreen.
    pub demote: Option<String>,
    /// Window that gains fullscreen.
    pub promote: Option<String>,
}

impl ArrivalPlan {
    pub fn is_empty(&self) -> bool {
        self.assign_to.is_none() && self.demote.is_none() && self.promote.is_none()
    }
}

fn is_denied(window: &Window, denylist: &[String]) -> bool {
    denylist
        .iter()
        .any(|name| *name == window.name || *name == window.class)
}

/// Windows on `screen` that focus may move to, in layout order (tiled
/// first, then floating).
///
/// A floating fullscreen window occludes everything else: when one exists
/// it is the only candidate, or there are none if it is denylisted.
pub fn screen_candidates<'a>(
    snapshot: &'a Snapshot,
    screen: &'a Screen,
    denylist: &[String],
) -> Vec<&'a Window> {
    let Some(group) = screen.group.as_ref() else {
        return Vec::new();
    };
    let windows: Vec<&Window> = snapshot.windows_in(group).collect();

    if let Some(fullscreen) = windows.iter().find(|w| w.floating && w.fullscreen) {
        if is_denied(fullscreen, denylist) {
            return Vec::new();
        }
        return vec![*fullscreen];
    }

    let tiled = windows.iter().filter(|w| !w.floating);
    let floating = windows.iter().filter(|w| w.floating);
    tiled
        .chain(floating)
        .filter(|w| !is_denied(w, denylist))
        .copied()
        .collect()
}

/// Pick the candidate closest to `reference`.
///
/// Exact ties go to a fullscreen window; otherwise the earliest one wins.
fn closest_window<'a>(
    reference: Point,
    candidates: impl IntoIterator<Item = (usize, &'a Window)>,
) -> Option<(usize, &'a Window)> {
    let mut best: Option<(f64, usize, &Window)> = None;
    for (screen, window) in candidates {
        let dist = reference.distance(window.position);
        let better = match best {
            None => true,
            Some((best_dist, _, best_win)) => {
                dist < best_dist || (dist == best_dist && window.fullscreen && !best_win.fullscreen)
            }
        };
        if better {
            best = Some((dist, screen, window));
        }
    }
    best.map(|(_, screen, window)| (screen, window))
}

/// Find the closest positioned screen in `direction` from `reference`.
pub fn closest_screen_in_direction(
    screens: &[Screen],
    reference: Point,
    direction: Direction,
) -> Option<&Screen> {
    screens
        .iter()
        .filter_map(|s| s.position.map(|p| (s, p)))
        .filter(|(_, p)| direction.admits(reference, *p))
        .min_by(|(_, a), (_, b)| {
            reference
                .distance(*a)
                .partial_cmp(&reference.distance(*b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(s, _)| s)
}

/// Decide where focus goes when moving in `direction`.
///
/// The reference point is the focused window, or the focused screen when no
/// window has focus.  Windows on every screen are considered together;
/// screens without geometry are skipped.
pub fn plan_focus(snapshot: &Snapshot, direction: Direction, denylist: &[String]) -> FocusPlan {
    let reference = match snapshot.current_window() {
        Some(w) => w.position,
        None => match snapshot.current_screen().and_then(|s| s.position) {
            Some(p) => p,
            None => return FocusPlan::Nothing,
        },
    };

    let candidates = snapshot
        .screens
        .iter()
        .filter(|s| s.position.is_some())
        .flat_map(|s| {
            screen_candidates(snapshot, s, denylist)
                .into_iter()
                .map(move |w| (s.index, w))
        })
        .filter(|(_, w)| direction.admits(reference, w.position));

    if let Some((screen, window)) = closest_window(reference, candidates) {
        return FocusPlan::Window {
            screen,
            address: window.address.clone(),
        };
    }

    let Some(origin) = snapshot.current_screen().and_then(|s| s.position) else {
        return FocusPlan::Nothing;
    };
    match closest_screen_in_direction(&snapshot.screens, origin, direction) {
        Some(screen) => FocusPlan::Screen {
            screen: screen.index,
        },
        None => FocusPlan::Nothing,
    }
}

/// Decide where the focused window goes when swapped in `direction`.
///
/// Returns `None` when no window is focused, the current screen has no
/// geometry, or no other screen showing a group lies in that direction.
pub fn plan_swap(snapshot: &Snapshot, direction: Direction) -> Option<SwapPlan> {
    let window = snapshot.current_window()?;
    let current = snapshot.current_screen()?;
    let origin = current.position?;

    let others: Vec<Screen> = snapshot
        .screens
        .iter()
        .filter(|s| s.index != current.index && s.group.is_some())
        .cloned()
        .collect();
    let target = closest_screen_in_direction(&others, origin, direction)?;

    Some(SwapPlan {
        window: window.address.clone(),
        screen: target.index,
        group: target.group.clone()?,
    })
}

/// Decide what happens when the window at `address` appears.
///
/// An ungrouped window joins the current screen's group.  When `handoff` is
/// set and another floating fullscreen window already occupies that group,
/// it gives up fullscreen to the newcomer.
pub fn plan_arrival(snapshot: &Snapshot, address: &str, handoff: bool) -> ArrivalPlan {
    let mut plan = ArrivalPlan::default();
    let Some(window) = snapshot.window(address) else {
        return plan;
    };
    let Some(group) = snapshot.current_screen().and_then(|s| s.group.as_ref()) else {
        return plan;
    };

    if window.group.is_none() {
        plan.assign_to = Some(group.clone());
    }

    let lands_here = window.group.as_ref().map_or(true, |g| g == group);
    if handoff && lands_here {
        let occupant = snapshot
            .windows_in(group)
            .find(|w| w.address != window.address && w.floating && w.fullscreen);
        if let Some(occupant) = occupant {
            plan.demote = Some(occupant.address.clone());
            plan.promote = Some(window.address.clone());
        }
    }
    plan
}

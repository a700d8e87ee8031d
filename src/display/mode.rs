//! Display mode values and sibling-mode selection.

use std::cmp::Ordering;

use crate::error::NotchDirection;

/// Aspect ratio of the notch-less 16:10 profile.
const NOTCHLESS_ASPECT: f64 = 1.6;
const ASPECT_TOLERANCE: f64 = 0.01;
/// Refresh rates closer than this count as the same rate.
const REFRESH_TOLERANCE_HZ: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMode {
    pub width: u32,
    pub height: u32,
    pub refresh_rate: f64,
    pub usable_for_desktop: bool,
}

impl DisplayMode {
    pub fn new(width: u32, height: u32, refresh_rate: f64) -> Self {
        Self {
            width,
            height,
            refresh_rate,
            usable_for_desktop: true,
        }
    }

    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            return 0.0;
        }
        f64::from(self.width) / f64::from(self.height)
    }

    /// True for the letterboxed 16:10 resolution that hides the notch.
    pub fn is_notchless(&self) -> bool {
        (self.aspect_ratio() - NOTCHLESS_ASPECT).abs() < ASPECT_TOLERANCE
    }

    pub fn same_size(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height
    }

    fn refresh_matches(&self, target: f64) -> bool {
        (self.refresh_rate - target).abs() < REFRESH_TOLERANCE_HZ
    }
}

/// Which direction a toggle from `current` goes.
pub fn toggle_direction(current: &DisplayMode) -> NotchDirection {
    if current.is_notchless() {
        NotchDirection::Show
    } else {
        NotchDirection::Hide
    }
}

/// Picks the best sibling of `current` among `modes`.
///
/// Candidates share the current width, are usable for the desktop, and are
/// strictly shorter (hide) or taller (show). The nearest height wins; among
/// equal heights a refresh rate within 1 Hz of the current one wins. Returns
/// the index into `modes` so callers can map back to OS handles.
pub fn select_sibling(
    modes: &[DisplayMode],
    current: &DisplayMode,
    direction: NotchDirection,
) -> Option<usize> {
    let mut candidates: Vec<usize> = modes
        .iter()
        .enumerate()
        .filter(|(_, m)| {
            m.usable_for_desktop
                && m.width == current.width
                && match direction {
                    NotchDirection::Hide => m.height < current.height,
                    NotchDirection::Show => m.height > current.height,
                }
        })
        .map(|(i, _)| i)
        .collect();

    // Stable sort keeps OS enumeration order among full ties.
    candidates.sort_by(|&a, &b| {
        let (a, b) = (&modes[a], &modes[b]);
        let by_height = match direction {
            NotchDirection::Hide => b.height.cmp(&a.height),
            NotchDirection::Show => a.height.cmp(&b.height),
        };
        by_height.then_with(|| {
            match (
                a.refresh_matches(current.refresh_rate),
                b.refresh_matches(current.refresh_rate),
            ) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => Ordering::Equal,
            }
        })
    });

    candidates.first().copied()
}

//! Divider/arrow ordering check.

use crate::error::{Error, Result};
use crate::shell::ScreenPoint;

/// Checks that the divider sits strictly left of the arrow.
///
/// Items registered earlier sit further left, and only items left of the
/// divider are pushed off-screen when it grows. A user can
/// drag the divider anywhere, so this is checked before every collapse.
pub fn check_ordering(divider: Option<ScreenPoint>, arrow: Option<ScreenPoint>) -> Result<()> {
    let (Some(divider), Some(arrow)) = (divider, arrow) else {
        return Err(Error::PositionUnavailable);
    };

    if divider.x < arrow.x {
        Ok(())
    } else {
        Err(Error::InvalidOrdering {
            divider_x: divider.x,
            arrow_x: arrow.x,
        })
    }
}

pub fn is_valid_ordering(divider: Option<ScreenPoint>, arrow: Option<ScreenPoint>) -> bool {
    check_ordering(divider, arrow).is_ok()
}

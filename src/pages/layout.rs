//! Sizes of the resizable sidebar and bottom panel row.

const SIDEBAR_MIN: f64 = 300.0;
const SIDEBAR_MAX: f64 = 1000.0;
const BOTTOM_MIN: f64 = 150.0;
/// Largest share of the window height the bottom row may take.
const BOTTOM_MAX_SHARE: f64 = 0.7;
/// Page padding under the bottom row.
const BOTTOM_GUTTER: f64 = 24.0;

/// Which splitter is being dragged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Splitter {
	Sidebar,
	BottomPanels,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelSizes {
	pub sidebar_width: f64,
	pub bottom_height: f64,
}

impl Default for PanelSizes {
	fn default() -> Self {
		Self {
			sidebar_width: 400.0,
			bottom_height: 260.0,
		}
	}
}

impl PanelSizes {
	/// Follows the pointer at `(x, y)` in a window of `(w, h)`. Positions
	/// that would leave the allowed range keep the previous size.
	pub fn drag(&mut self, splitter: Splitter, (w, h): (f64, f64), (x, y): (f64, f64)) {
		match splitter {
			Splitter::Sidebar => {
				let width = w - x;
				if width > SIDEBAR_MIN && width < SIDEBAR_MAX {
					self.sidebar_width = width;
				}
			}
			Splitter::BottomPanels => {
				let height = h - y - BOTTOM_GUTTER;
				if height > BOTTOM_MIN && height < h * BOTTOM_MAX_SHARE {
					self.bottom_height = height;
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const WINDOW: (f64, f64) = (1600.0, 1000.0);

	#[test]
	fn sidebar_tracks_distance_from_right_edge() {
		let mut sizes = PanelSizes::default();
		sizes.drag(Splitter::Sidebar, WINDOW, (1100.0, 10.0));
		assert_eq!(sizes.sidebar_width, 500.0);
		assert_eq!(sizes.bottom_height, 260.0);
	}

	#[test]
	fn sidebar_outside_bounds_is_ignored() {
		let mut sizes = PanelSizes::default();
		sizes.drag(Splitter::Sidebar, WINDOW, (1500.0, 0.0));
		sizes.drag(Splitter::Sidebar, WINDOW, (100.0, 0.0));
		assert_eq!(sizes, PanelSizes::default());
	}

	#[test]
	fn bottom_row_is_capped_by_window_share() {
		let mut sizes = PanelSizes::default();
		sizes.drag(Splitter::BottomPanels, WINDOW, (0.0, 600.0));
		assert_eq!(sizes.bottom_height, 376.0);

		// 1000 - 200 - 24 = 776 > 700
		sizes.drag(Splitter::BottomPanels, WINDOW, (0.0, 200.0));
		assert_eq!(sizes.bottom_height, 376.0);
		// 1000 - 900 - 24 = 76 < 150
		sizes.drag(Splitter::BottomPanels, WINDOW, (0.0, 900.0));
		assert_eq!(sizes.bottom_height, 376.0);
	}
}

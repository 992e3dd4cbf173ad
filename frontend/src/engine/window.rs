/// Extra rows rendered outside the visible viewport on each side, to mask
/// popping during fast scrolls.
pub const DEFAULT_OVERSCAN: usize = 10;

/// How close (in rows) the rendered window may get to the end of loaded
/// data before the next page is requested.
pub const LOAD_MORE_THRESHOLD: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_top: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scroll_top: 0.0,
            height: 0.0,
        }
    }
}

/// The materialized slice `[start, end)` plus the spacer geometry: rows
/// before `start` contribute only to `top_offset`, and the full collection
/// contributes to `total_height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowPlan {
    pub start: usize,
    pub end: usize,
    pub top_offset: f64,
    pub total_height: f64,
}

impl WindowPlan {
    pub fn empty() -> Self {
        Self {
            start: 0,
            end: 0,
            top_offset: 0.0,
            total_height: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Computes the minimal contiguous index range covering the visible pixel
/// range plus `overscan` rows of margin on each side, clamped to `[0, len)`.
pub fn plan_window(len: usize, row_height: f64, viewport: Viewport, overscan: usize) -> WindowPlan {
    if len == 0 || row_height <= 0.0 {
        return WindowPlan::empty();
    }

    let scroll_top = viewport.scroll_top.max(0.0);
    let first_visible = (scroll_top / row_height).floor() as usize;
    let last_visible = ((scroll_top + viewport.height.max(0.0)) / row_height).ceil() as usize;

    let start = first_visible.saturating_sub(overscan).min(len);
    let end = last_visible.saturating_add(overscan).min(len);

    WindowPlan {
        start,
        end,
        top_offset: start as f64 * row_height,
        total_height: len as f64 * row_height,
    }
}

/// Infinite-load trigger: true when the last rendered index is within
/// `threshold` rows of the end of loaded data. The caller still has to win
/// `begin_fetch`, so firing this on every scroll event stays idempotent.
pub fn near_end(plan: &WindowPlan, len: usize, threshold: usize) -> bool {
    if len == 0 {
        return true;
    }
    if plan.end == 0 {
        return false;
    }
    plan.end + threshold >= len
}

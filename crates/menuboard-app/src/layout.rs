// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::ids::CategoryId;

pub const DEFAULT_SCROLL_OFFSET_PERCENT: f64 = 6.0;

/// Measured geometry of the tab strip. Widths are in whatever unit the host
/// measures in (CSS pixels for pages, cells for terminals).
#[derive(Debug, Clone, PartialEq)]
pub struct TabStrip {
    pub tab_widths: Vec<f64>,
    /// Visible width of the strip itself.
    pub client_width: f64,
    pub viewport_width: f64,
}

impl TabStrip {
    /// A strip spanning the whole viewport.
    pub fn full_width(tab_widths: Vec<f64>, viewport_width: f64) -> Self {
        Self {
            tab_widths,
            client_width: viewport_width,
            viewport_width,
        }
    }

    pub fn total_tab_width(&self) -> f64 {
        self.tab_widths.iter().sum()
    }

    pub fn needs_swipe_hint(&self) -> bool {
        self.total_tab_width() > self.viewport_width
    }

    pub fn max_scroll(&self) -> f64 {
        (self.total_tab_width() - self.client_width).max(0.0)
    }

    pub fn tab_left(&self, id: CategoryId) -> Option<f64> {
        let index = id.get();
        if index >= self.tab_widths.len() {
            return None;
        }
        Some(self.tab_widths[..index].iter().sum())
    }

    /// Scroll position that puts the tab `offset_percent` of the viewport
    /// width from the strip's left edge, clamped to the scrollable range.
    pub fn scroll_target(&self, id: CategoryId, offset_percent: f64) -> f64 {
        let Some(left) = self.tab_left(id) else {
            return 0.0;
        };
        let offset = offset_percent * self.viewport_width / 100.0;
        (left - offset).clamp(0.0, self.max_scroll())
    }
}

/// Estimates tab widths from label lengths when nothing can be measured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabMetrics {
    pub char_width: f64,
    pub tab_padding: f64,
}

impl Default for TabMetrics {
    fn default() -> Self {
        Self {
            char_width: 9.0,
            tab_padding: 32.0,
        }
    }
}

impl TabMetrics {
    pub fn estimate<'a, I>(&self, labels: I) -> Vec<f64>
    where
        I: IntoIterator<Item = &'a str>,
    {
        labels
            .into_iter()
            .map(|label| label.chars().count() as f64 * self.char_width + self.tab_padding)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{TabMetrics, TabStrip};
    use crate::CategoryId;

    #[test]
    fn swipe_hint_only_when_tabs_overflow_viewport() {
        let strip = TabStrip::full_width(vec![100.0, 120.0, 90.0], 300.0);
        assert!(strip.needs_swipe_hint());

        let wide = TabStrip::full_width(vec![100.0, 120.0, 90.0], 310.0);
        assert!(!wide.needs_swipe_hint());
    }

    #[test]
    fn scroll_target_applies_offset_and_clamps() {
        let strip = TabStrip::full_width(vec![200.0; 5], 400.0);
        assert_eq!(strip.max_scroll(), 600.0);

        // 6% of 400 is 24.
        assert_eq!(strip.scroll_target(CategoryId::new(2), 6.0), 376.0);
        assert_eq!(strip.scroll_target(CategoryId::new(0), 6.0), 0.0);
        assert_eq!(strip.scroll_target(CategoryId::new(4), 6.0), 600.0);
        assert_eq!(strip.scroll_target(CategoryId::new(9), 6.0), 0.0);
    }

    #[test]
    fn strip_that_fits_never_scrolls() {
        let strip = TabStrip::full_width(vec![50.0, 50.0], 400.0);
        assert_eq!(strip.max_scroll(), 0.0);
        assert_eq!(strip.scroll_target(CategoryId::new(1), 6.0), 0.0);
    }

    #[test]
    fn estimate_counts_characters() {
        let metrics = TabMetrics {
            char_width: 10.0,
            tab_padding: 20.0,
        };
        assert_eq!(metrics.estimate(["Tea", "Café"]), vec![50.0, 60.0]);
    }
}

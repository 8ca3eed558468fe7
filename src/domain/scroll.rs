use serde::{Deserialize, Serialize};

/// Viewport position reported by the list binding layer after a scroll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScrollSample {
    pub last_visible_index: usize,
    pub total_item_count: usize,
    /// True for downward (towards the end of the list) scroll deltas
    pub is_forward_scroll: bool,
}

impl ScrollSample {
    pub fn forward(last_visible_index: usize, total_item_count: usize) -> Self {
        Self {
            last_visible_index,
            total_item_count,
            is_forward_scroll: true,
        }
    }

    pub fn backward(last_visible_index: usize, total_item_count: usize) -> Self {
        Self {
            last_visible_index,
            total_item_count,
            is_forward_scroll: false,
        }
    }

    /// Whether the last visible item is within `threshold` items of the end
    ///
    /// Equivalent to `last_visible_index >= total_item_count - 1 - threshold`,
    /// saturating for lists shorter than the threshold.
    pub fn is_near_end(&self, threshold: usize) -> bool {
        if self.total_item_count == 0 {
            return false;
        }
        let trigger_index = self
            .total_item_count
            .saturating_sub(1)
            .saturating_sub(threshold);
        self.last_visible_index >= trigger_index
    }

    /// Same position and list size as `other`, i.e. no new scroll delta
    pub fn is_same_position(&self, other: &ScrollSample) -> bool {
        self.last_visible_index == other.last_visible_index
            && self.total_item_count == other.total_item_count
    }
}

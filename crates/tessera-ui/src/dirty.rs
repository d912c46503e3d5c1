//! Dirty flag tracking for UI nodes.

use bitflags::bitflags;

bitflags! {
    /// What a node needs before it is up to date on screen.
    ///
    /// A node moves through three states: clean, `REDRAW`, and
    /// `LAYOUT | REDRAW`. Layout changes always imply a repaint.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DirtyFlags: u8 {
        /// No changes
        const NONE   = 0b0000_0000;

        /// Min-size or layout style changed; sizes and positions must be
        /// recomputed.
        const LAYOUT = 0b0000_0001;

        /// Only the painted appearance changed.
        const REDRAW = 0b0000_0010;
    }
}

impl DirtyFlags {
    /// Returns true if the layout pass must run for this node.
    #[inline]
    pub fn needs_layout(&self) -> bool {
        self.contains(Self::LAYOUT)
    }

    /// Returns true if the node must be painted again.
    #[inline]
    pub fn needs_redraw(&self) -> bool {
        self.intersects(Self::LAYOUT | Self::REDRAW)
    }

    /// Returns true if only visual properties changed (no layout needed).
    #[inline]
    pub fn is_paint_only(&self) -> bool {
        *self == Self::REDRAW
    }

    /// Flags that a change implies: layout always brings a redraw along.
    #[inline]
    pub fn normalized(self) -> Self {
        if self.contains(Self::LAYOUT) {
            self | Self::REDRAW
        } else {
            self
        }
    }
}

impl Default for DirtyFlags {
    fn default() -> Self {
        Self::NONE
    }
}

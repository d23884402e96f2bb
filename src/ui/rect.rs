//! Rectangle type for UI layout

/// A rectangle defined by position and size
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Create from screen dimensions
    pub fn screen(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w * 0.5
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.h * 0.5
    }

    /// Check if point is inside
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Shrink by padding on all sides
    pub fn pad(&self, padding: f32) -> Self {
        Self::new(
            self.x + padding,
            self.y + padding,
            (self.w - padding * 2.0).max(0.0),
            (self.h - padding * 2.0).max(0.0),
        )
    }

    /// A `w` x `h` rect centered in this one (clamped to fit)
    pub fn centered(&self, w: f32, h: f32) -> Self {
        let w = w.min(self.w);
        let h = h.min(self.h);
        Self::new(self.center_x() - w * 0.5, self.center_y() - h * 0.5, w, h)
    }

    /// Horizontal slice from the top (title bars)
    pub fn slice_top(&self, height: f32) -> Self {
        Self::new(self.x, self.y, self.w, height.min(self.h))
    }

    /// Remaining area after slicing top
    pub fn remaining_after_top(&self, height: f32) -> Self {
        let h = height.min(self.h);
        Self::new(self.x, self.y + h, self.w, self.h - h)
    }

    /// Horizontal slice from the bottom (status bars)
    pub fn slice_bottom(&self, height: f32) -> Self {
        let h = height.min(self.h);
        Self::new(self.x, self.bottom() - h, self.w, h)
    }

    /// Remaining area after slicing bottom
    pub fn remaining_after_bottom(&self, height: f32) -> Self {
        let h = height.min(self.h);
        Self::new(self.x, self.y, self.w, self.h - h)
    }

    /// Lay out `count` equal cells of `cell_w` x `cell_h`, `columns` per
    /// row, centered horizontally and starting at the top
    pub fn grid(&self, count: usize, columns: usize, cell_w: f32, cell_h: f32, gap: f32) -> Vec<Rect> {
        let columns = columns.max(1);
        let used_columns = count.min(columns) as f32;
        let row_w = used_columns * cell_w + (used_columns - 1.0).max(0.0) * gap;
        let start_x = self.center_x() - row_w * 0.5;

        (0..count)
            .map(|i| {
                let (row, col) = ((i / columns) as f32, (i % columns) as f32);
                Rect::new(
                    start_x + col * (cell_w + gap),
                    self.y + row * (cell_h + gap),
                    cell_w,
                    cell_h,
                )
            })
            .collect()
    }
}

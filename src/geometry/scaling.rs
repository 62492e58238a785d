/// Bounding box in projected plane units
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Create bounds from a set of points
    pub fn from_points(points: &[(f64, f64)]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let mut bounds = Self {
            min_x: f64::MAX,
            max_x: f64::MIN,
            min_y: f64::MAX,
            max_y: f64::MIN,
        };
        bounds.expand(points);
        Some(bounds)
    }

    /// Expand bounds to include another set of points
    pub fn expand(&mut self, points: &[(f64, f64)]) {
        for &(x, y) in points {
            self.min_x = self.min_x.min(x);
            self.max_x = self.max_x.max(x);
            self.min_y = self.min_y.min(y);
            self.max_y = self.max_y.max(y);
        }
    }

    /// Grow every side by `fraction` of the larger dimension.
    ///
    /// A degenerate box (single point or a straight line) gets a unit extent so
    /// it can still be scaled.
    pub fn padded(&self, fraction: f64) -> Self {
        let span = self.width().max(self.height());
        let pad = if span > 0.0 { span * fraction } else { 0.5 };
        Self {
            min_x: self.min_x - pad,
            max_x: self.max_x + pad,
            min_y: self.min_y - pad,
            max_y: self.max_y + pad,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Pixel margins around the plot area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Margins {
    pub fn uniform(px: f64) -> Self {
        Self {
            left: px,
            right: px,
            top: px,
            bottom: px,
        }
    }
}

/// Maps plane units to image pixels with the same scale on both axes.
///
/// Image rows grow downwards, so y is flipped.
#[derive(Debug, Clone)]
pub struct Scaler {
    /// Pixels per plane unit
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Scaler {
    /// Fit `bounds` into a `width` x `height` image, centered inside `margins`.
    pub fn from_bounds_with_margins(
        bounds: &Bounds,
        width: u32,
        height: u32,
        margins: Margins,
    ) -> Self {
        let usable_w = (width as f64 - margins.left - margins.right).max(1.0);
        let usable_h = (height as f64 - margins.top - margins.bottom).max(1.0);

        let scale_x = if bounds.width() > 0.0 {
            usable_w / bounds.width()
        } else {
            f64::MAX
        };
        let scale_y = if bounds.height() > 0.0 {
            usable_h / bounds.height()
        } else {
            f64::MAX
        };
        let scale = match scale_x.min(scale_y) {
            s if s == f64::MAX => 1.0,
            s => s,
        };

        let scaled_w = bounds.width() * scale;
        let scaled_h = bounds.height() * scale;

        let offset_x = margins.left + (usable_w - scaled_w) / 2.0 - bounds.min_x * scale;
        let offset_y = margins.top + (usable_h - scaled_h) / 2.0 + bounds.max_y * scale;

        Self {
            scale,
            offset_x,
            offset_y,
        }
    }

    /// Plane units to pixel coordinates
    pub fn scale(&self, x: f64, y: f64) -> (f32, f32) {
        let px = x * self.scale + self.offset_x;
        let py = self.offset_y - y * self.scale;
        (px as f32, py as f32)
    }

    /// Pixel coordinates back to plane units
    pub fn unscale(&self, px: f64, py: f64) -> (f64, f64) {
        ((px - self.offset_x) / self.scale, (self.offset_y - py) / self.scale)
    }

    pub fn scale_points(&self, points: &[(f64, f64)]) -> Vec<(f32, f32)> {
        points.iter().map(|&(x, y)| self.scale(x, y)).collect()
    }

    /// Pixels per plane unit
    pub fn scale_factor(&self) -> f64 {
        self.scale
    }
}

use serde::Serialize;

/// The intrinsic coordinate frame of a vector document.
///
/// Only `width` and `height` take part in geometry mapping; the origin is
/// kept so it can be reported.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ViewBox {
    pub min_x: f32,
    pub min_y: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewBox {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            width,
            height,
        }
    }

    /// Parse a `viewBox` attribute: four numbers separated by whitespace
    /// and/or commas. Non-numeric sizes become 0.
    pub fn parse(attr: &str) -> Option<Self> {
        let parts: Vec<&str> = attr
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|p| !p.is_empty())
            .collect();
        if parts.len() < 4 {
            return None;
        }
        let num = |s: &str| s.parse::<f32>().ok().filter(|v| v.is_finite()).unwrap_or(0.0);
        Some(Self {
            min_x: num(parts[0]),
            min_y: num(parts[1]),
            width: num(parts[2]),
            height: num(parts[3]),
        })
    }

    /// True when the frame has no usable area.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Pixel size of the sampling canvas: one pixel per ViewBox unit,
    /// fractional sizes truncated.
    pub fn canvas_size(&self) -> (u32, u32) {
        (truncate(self.width), truncate(self.height))
    }

    /// Centre of the frame relative to its own origin.
    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }
}

fn truncate(v: f32) -> u32 {
    if v.is_finite() && v > 0.0 {
        v.floor() as u32
    } else {
        0
    }
}

/// An axis-aligned box in display coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Layout has produced a real box: both sides positive and finite.
    pub fn is_measurable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Scale position and size uniformly about the display origin.
    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(
            self.x * factor,
            self.y * factor,
            self.width * factor,
            self.height * factor,
        )
    }
}

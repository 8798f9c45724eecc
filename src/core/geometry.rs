use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Axis-aligned box around a (possibly rotated) four-corner polygon, the
    /// shape EasyOCR reports.
    pub fn from_quad(points: &[[f32; 2]; 4]) -> Self {
        let mut bbox = Self::new(points[0][0], points[0][1], points[0][0], points[0][1]);
        for [x, y] in &points[1..] {
            bbox.x0 = bbox.x0.min(*x);
            bbox.y0 = bbox.y0.min(*y);
            bbox.x1 = bbox.x1.max(*x);
            bbox.y1 = bbox.y1.max(*y);
        }
        bbox
    }

    /// Top edge; this is the vertical position the classifier orders by.
    pub fn top(&self) -> f32 {
        self.y0.min(self.y1)
    }
}

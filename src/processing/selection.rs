use serde::{Deserialize, Serialize};

/// A point picked on a chart, as reported by the selection widget.
/// Extra fields in the event payload are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectedPoint {
    pub x: f64,
    pub y: f64,
}

/// Anything carrying a chart y value.
pub trait PlotValue {
    fn y(&self) -> f64;
}

impl PlotValue for SelectedPoint {
    fn y(&self) -> f64 {
        self.y
    }
}

impl PlotValue for [f64; 2] {
    fn y(&self) -> f64 {
        self[1]
    }
}

/// Mean y of the selected points. An empty or absent selection reads as 0.
pub fn reduce<P: PlotValue>(points: Option<&[P]>) -> f64 {
    match points {
        Some(points) if !points.is_empty() => {
            points.iter().map(PlotValue::y).sum::<f64>() / points.len() as f64
        }
        _ => 0.0,
    }
}

/// Axis-aligned rectangle dragged out on a chart, in plot coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushRegion {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl BrushRegion {
    /// Region spanned by two opposite corners, in any order.
    pub fn from_corners(a: [f64; 2], b: [f64; 2]) -> Self {
        Self {
            x_min: a[0].min(b[0]),
            x_max: a[0].max(b[0]),
            y_min: a[1].min(b[1]),
            y_max: a[1].max(b[1]),
        }
    }

    /// Edges are inclusive.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    pub fn select(&self, points: &[[f64; 2]]) -> Vec<SelectedPoint> {
        points
            .iter()
            .filter(|p| self.contains(p[0], p[1]))
            .map(|p| SelectedPoint { x: p[0], y: p[1] })
            .collect()
    }

    /// Polygon outline, for drawing the brush.
    pub fn corners(&self) -> [[f64; 2]; 4] {
        [
            [self.x_min, self.y_min],
            [self.x_max, self.y_min],
            [self.x_max, self.y_max],
            [self.x_min, self.y_max],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_absent_selections_are_zero() {
        let empty: [SelectedPoint; 0] = [];
        assert_eq!(reduce(Some(&empty[..])), 0.0);
        assert_eq!(reduce::<SelectedPoint>(None), 0.0);
    }

    #[test]
    fn mean_of_y_values() {
        let points = [SelectedPoint { x: 0.0, y: 2.0 }, SelectedPoint { x: 9.0, y: 4.0 }];
        assert_eq!(reduce(Some(&points[..])), 3.0);
    }

    #[test]
    fn parses_event_payload() {
        let json = r#"[{"x": 1.0, "y": 5.0, "curveNumber": 0, "pointIndex": 3}]"#;
        let points: Vec<SelectedPoint> = serde_json::from_str(json).unwrap();
        assert_eq!(reduce(Some(&points[..])), 5.0);
    }

    #[test]
    fn brush_selects_inside_points_only() {
        let brush = BrushRegion::from_corners([4.0, 10.0], [1.0, 0.0]);
        let points = [[0.0, 5.0], [1.0, 5.0], [2.5, 11.0], [4.0, 10.0]];
        let selected = brush.select(&points);
        assert_eq!(selected.len(), 2);
        assert_eq!(reduce(Some(&selected[..])), 7.5);
    }
}

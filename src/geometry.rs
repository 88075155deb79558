// Small geometry helpers used by the drag controller.
// All pure: no state, no allocation.

use crate::types::Point;

/// Euclidean distance between two points.
/// Works in whatever space the caller uses (normalized or pixels); never mix them.
#[inline]
pub fn distance(a: [f32; 2], b: [f32; 2]) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    (dx * dx + dy * dy).sqrt()
}

#[inline]
fn squared_distance(a: Point, b: Point) -> i128 {
    // widen first: opposite corners of the i32 plane overflow i64 once squared
    let dx = a.x as i128 - b.x as i128;
    let dy = a.y as i128 - b.y as i128;
    dx * dx + dy * dy
}

/// Index of the vertex closest to `point`.
/// Ties go to the lowest index. `None` only when `vertices` is empty.
pub fn nearest_vertex_index(vertices: &[Point], point: Point) -> Option<usize> {
    let mut best: Option<(usize, i128)> = None;
    for (i, v) in vertices.iter().enumerate() {
        let d = squared_distance(*v, point);
        // strict `<` keeps the first minimum
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

/// True if `point` lies inside or exactly on the circle.
#[inline]
pub fn point_in_circle(center: Point, radius: i32, point: Point) -> bool {
    let r = radius as i128;
    squared_distance(center, point) <= r * r
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> [Point; 4] {
        [
            Point::new(300, 300),
            Point::new(1500, 300),
            Point::new(1500, 900),
            Point::new(300, 900),
        ]
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance([0.0, 0.0], [3.0, 4.0]), 5.0);
        assert_eq!(distance([0.5, 0.5], [0.5, 0.5]), 0.0);
    }

    #[test]
    fn test_nearest_vertex_picks_minimum() {
        let poly = square();
        assert_eq!(nearest_vertex_index(&poly, Point::new(305, 305)), Some(0));
        assert_eq!(nearest_vertex_index(&poly, Point::new(1400, 320)), Some(1));
        assert_eq!(nearest_vertex_index(&poly, Point::new(1490, 1000)), Some(2));
        assert_eq!(nearest_vertex_index(&poly, Point::new(0, 2000)), Some(3));
    }

    #[test]
    fn test_nearest_vertex_tie_goes_to_lowest_index() {
        let poly = square();
        // Dead centre is equidistant from all four corners.
        assert_eq!(nearest_vertex_index(&poly, Point::new(900, 600)), Some(0));
        // Equidistant from vertices 1 and 2 only.
        assert_eq!(nearest_vertex_index(&poly, Point::new(1600, 600)), Some(1));
    }

    #[test]
    fn test_nearest_vertex_with_duplicates() {
        let poly = [Point::new(10, 10); 4];
        assert_eq!(nearest_vertex_index(&poly, Point::new(0, 0)), Some(0));
    }

    #[test]
    fn test_nearest_vertex_empty() {
        assert_eq!(nearest_vertex_index(&[], Point::new(0, 0)), None);
    }

    #[test]
    fn test_nearest_vertex_with_extreme_coordinates() {
        let poly = [
            Point::new(-2_147_483_000, 0),
            Point::new(1500, 300),
            Point::new(1500, 900),
            Point::new(i32::MIN, i32::MIN),
        ];
        assert_eq!(nearest_vertex_index(&poly, Point::new(1000, 0)), Some(1));
        assert_eq!(nearest_vertex_index(&poly, Point::new(i32::MAX, i32::MAX)), Some(2));
        assert_eq!(nearest_vertex_index(&poly, Point::new(i32::MIN, 0)), Some(0));
        assert!(!point_in_circle(poly[3], 50, Point::new(i32::MAX, i32::MAX)));
    }

    #[test]
    fn test_point_in_circle_is_inclusive() {
        let c = Point::new(100, 100);
        assert!(point_in_circle(c, 50, Point::new(150, 100)));
        assert!(point_in_circle(c, 50, Point::new(130, 140))); // 3-4-5 triangle, exactly 50
        assert!(!point_in_circle(c, 50, Point::new(151, 100)));
        assert!(point_in_circle(c, 0, c));
    }
}

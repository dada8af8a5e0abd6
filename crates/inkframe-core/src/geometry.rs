//! Geometry kernel: point rotation, segment/polygon intersection and the
//! crossing-number test used to hit-test object quadrilaterals.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Convert degrees to radians.
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// Convert radians to degrees.
pub fn radians_to_degrees(radians: f64) -> f64 {
    radians.to_degrees()
}

/// Component-wise minimum of two points.
pub fn point_min(a: Point, b: Point) -> Point {
    Point::new(a.x.min(b.x), a.y.min(b.y))
}

/// Component-wise maximum of two points.
pub fn point_max(a: Point, b: Point) -> Point {
    Point::new(a.x.max(b.x), a.y.max(b.y))
}

/// Rotate `point` about `origin` by `radians`.
///
/// With the y axis pointing down, positive angles rotate clockwise on screen.
pub fn rotate_point(point: Point, origin: Point, radians: f64) -> Point {
    let (sin, cos) = radians.sin_cos();
    let dx = point.x - origin.x;
    let dy = point.y - origin.y;
    Point::new(
        origin.x + dx * cos - dy * sin,
        origin.y + dx * sin + dy * cos,
    )
}

/// Classification of an intersection query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntersectionStatus {
    /// At least one intersection point was found.
    Intersection,
    /// The inputs do not touch.
    NoIntersection,
    /// Segments are parallel and never meet.
    Parallel,
    /// Segments lie on the same line.
    Coincident,
}

/// Result of an intersection query: a status plus every point found.
///
/// Points are only produced for [`IntersectionStatus::Intersection`].
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection {
    pub status: IntersectionStatus,
    pub points: Vec<Point>,
}

impl Intersection {
    /// Create an empty result with the given status.
    pub fn new(status: IntersectionStatus) -> Self {
        Self {
            status,
            points: Vec::new(),
        }
    }

    /// Append the points of another result.
    pub fn append_points(&mut self, points: &[Point]) {
        self.points.extend_from_slice(points);
    }

    /// Whether the query found an intersection.
    pub fn is_intersection(&self) -> bool {
        self.status == IntersectionStatus::Intersection
    }

    /// Mark as intersecting when any point was collected.
    fn settle(mut self) -> Self {
        if !self.points.is_empty() {
            self.status = IntersectionStatus::Intersection;
        }
        self
    }
}

/// Intersect segment `a1-a2` with segment `b1-b2`.
///
/// Uses the parametric cross-product form: the segments meet when both
/// parameters `ua` and `ub` fall in `[0, 1]`. A zero denominator means the
/// directions are parallel; if both numerators are zero too the segments are
/// collinear and reported as coincident.
pub fn intersect_segment_segment(a1: Point, a2: Point, b1: Point, b2: Point) -> Intersection {
    let ua_t = (b2.x - b1.x) * (a1.y - b1.y) - (b2.y - b1.y) * (a1.x - b1.x);
    let ub_t = (a2.x - a1.x) * (a1.y - b1.y) - (a2.y - a1.y) * (a1.x - b1.x);
    let u_b = (b2.y - b1.y) * (a2.x - a1.x) - (b2.x - b1.x) * (a2.y - a1.y);

    if u_b != 0.0 {
        let ua = ua_t / u_b;
        let ub = ub_t / u_b;
        if (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub) {
            let mut result = Intersection::new(IntersectionStatus::Intersection);
            result.points.push(Point::new(
                a1.x + ua * (a2.x - a1.x),
                a1.y + ua * (a2.y - a1.y),
            ));
            result
        } else {
            Intersection::new(IntersectionStatus::NoIntersection)
        }
    } else if ua_t == 0.0 && ub_t == 0.0 {
        Intersection::new(IntersectionStatus::Coincident)
    } else {
        Intersection::new(IntersectionStatus::Parallel)
    }
}

/// Intersect segment `a1-a2` with every edge of a closed polygon.
pub fn intersect_segment_polygon(a1: Point, a2: Point, polygon: &[Point]) -> Intersection {
    let mut result = Intersection::new(IntersectionStatus::NoIntersection);
    let len = polygon.len();
    for i in 0..len {
        let b1 = polygon[i];
        let b2 = polygon[(i + 1) % len];
        let inter = intersect_segment_segment(a1, a2, b1, b2);
        result.append_points(&inter.points);
    }
    result.settle()
}

/// Intersect every edge of polygon `a` with polygon `b`.
pub fn intersect_polygon_polygon(a: &[Point], b: &[Point]) -> Intersection {
    let mut result = Intersection::new(IntersectionStatus::NoIntersection);
    let len = a.len();
    for i in 0..len {
        let inter = intersect_segment_polygon(a[i], a[(i + 1) % len], b);
        result.append_points(&inter.points);
    }
    result.settle()
}

/// Intersect a polygon with the axis-aligned rectangle spanned by `r1` and `r2`.
///
/// The corners may be given in any order; they are normalized with a
/// component-wise min/max first.
pub fn intersect_polygon_rectangle(polygon: &[Point], r1: Point, r2: Point) -> Intersection {
    let top_left = point_min(r1, r2);
    let bottom_right = point_max(r1, r2);
    let top_right = Point::new(bottom_right.x, top_left.y);
    let bottom_left = Point::new(top_left.x, bottom_right.y);

    let mut result = Intersection::new(IntersectionStatus::NoIntersection);
    for (from, to) in [
        (top_left, top_right),
        (top_right, bottom_right),
        (bottom_right, bottom_left),
        (bottom_left, top_left),
    ] {
        let inter = intersect_segment_polygon(from, to, polygon);
        result.append_points(&inter.points);
    }
    result.settle()
}

/// A directed edge from `o` (origin) to `d` (destination).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub o: Point,
    pub d: Point,
}

impl Segment {
    pub fn new(o: Point, d: Point) -> Self {
        Self { o, d }
    }
}

/// The four edges of a quadrilateral given clockwise from its top-left corner.
pub fn quad_edges(tl: Point, tr: Point, br: Point, bl: Point) -> [Segment; 4] {
    [
        Segment::new(tl, tr),
        Segment::new(tr, br),
        Segment::new(br, bl),
        Segment::new(bl, tl),
    ]
}

/// Count the crossings of a horizontal ray cast rightward from `point` with `edges`.
///
/// An edge is skipped when both endpoints are above the ray, or both are at or
/// below it; the half-open rule keeps shared vertices from being counted twice
/// and drops edges lying on the ray. The loop stops at two crossings, which is
/// the most a convex quadrilateral can produce.
pub fn ray_crossing_count(point: Point, edges: &[Segment]) -> usize {
    let mut count = 0;
    for edge in edges {
        if edge.o.y < point.y && edge.d.y < point.y {
            continue;
        }
        if edge.o.y >= point.y && edge.d.y >= point.y {
            continue;
        }

        let xi = if edge.o.x == edge.d.x {
            edge.o.x
        } else {
            // y = b * x + a for the edge; solve at y = point.y
            let b = (edge.d.y - edge.o.y) / (edge.d.x - edge.o.x);
            let a = edge.o.y - b * edge.o.x;
            (point.y - a) / b
        };

        if xi >= point.x {
            count += 1;
        }
        if count == 2 {
            break;
        }
    }
    count
}

/// Even-odd containment test for a quadrilateral.
pub fn quad_contains(point: Point, edges: &[Segment; 4]) -> bool {
    ray_crossing_count(point, edges) % 2 == 1
}

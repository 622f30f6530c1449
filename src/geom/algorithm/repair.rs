use geo::{BooleanOps, Coord, Geometry, LineString, MultiPolygon, Polygon, Validation};
use tracing::warn;

use crate::geom::union_all;

/// Normalize any geometry to a valid MultiPolygon.
///
/// Polygonal members are kept (a lone Polygon is wrapped, collections are flattened),
/// lines and points are discarded, repeated and collinear vertices are dropped, and
/// self-intersections are resolved. An empty result means "no polygonal remainder".
/// Applying `repair` to its own output returns it unchanged.
pub fn repair(geom: &Geometry<f64>) -> MultiPolygon<f64> {
    repair_with_status(geom).0
}

/// [`repair`] for a value that is already a MultiPolygon.
#[inline]
pub fn repair_multipolygon(shape: MultiPolygon<f64>) -> MultiPolygon<f64> {
    repair(&Geometry::MultiPolygon(shape))
}

/// Upper bound on rebuild passes before giving up on reaching a valid shape.
const MAX_REBUILDS: usize = 16;

/// [`repair`], also returning whether the polygonal part was invalid and had to be rebuilt.
///
/// Boolean ops can leave their own output slightly invalid (overlaps from rounding), so
/// rebuilds repeat until the shape is valid or a rebuild no longer changes it. Once either
/// holds, the result passes straight through a second call.
pub(crate) fn repair_with_status(geom: &Geometry<f64>) -> (MultiPolygon<f64>, bool) {
    let mut shape = simplify_zero(polygonal_parts(geom));
    if shape.is_valid() { return (shape, false) }

    for _ in 0..MAX_REBUILDS {
        let rebuilt = rebuild(&shape);
        if rebuilt == shape || rebuilt.is_valid() { return (rebuilt, true) }
        shape = rebuilt;
    }
    warn!(polygons = shape.0.len(), "geometry still invalid after {MAX_REBUILDS} rebuilds");
    (shape, true)
}

/// Rebuild each polygon on its own (resolves self-intersections), then dissolve overlaps.
fn rebuild(shape: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    let empty = MultiPolygon::<f64>::new(vec![]);
    let rebuilt = union_all(
        shape.0.iter()
            .map(|polygon| MultiPolygon::new(vec![polygon.clone()]).union(&empty))
            .collect()
    );
    simplify_zero(rebuilt.0)
}

/// Collect the polygonal members of any geometry, flattening nested collections.
fn polygonal_parts(geom: &Geometry<f64>) -> Vec<Polygon<f64>> {
    match geom {
        Geometry::Polygon(polygon) => vec![polygon.clone()],
        Geometry::MultiPolygon(shape) => shape.0.clone(),
        Geometry::Rect(rect) => vec![rect.to_polygon()],
        Geometry::Triangle(triangle) => vec![triangle.to_polygon()],
        Geometry::GeometryCollection(collection) => {
            collection.0.iter().flat_map(polygonal_parts).collect()
        }
        Geometry::Point(_)
        | Geometry::Line(_)
        | Geometry::LineString(_)
        | Geometry::MultiPoint(_)
        | Geometry::MultiLineString(_) => Vec::new(),
    }
}

/// Zero-tolerance simplification: drop repeated and collinear vertices, then drop
/// rings left with no area. A polygon whose exterior collapses is dropped entirely.
fn simplify_zero(polygons: Vec<Polygon<f64>>) -> MultiPolygon<f64> {
    MultiPolygon::new(
        polygons.into_iter()
            .filter_map(|polygon| {
                let (exterior, interiors) = polygon.into_inner();
                let exterior = simplify_ring(&exterior)?;
                let interiors = interiors.iter().filter_map(simplify_ring).collect();
                Some(Polygon::new(exterior, interiors))
            })
            .collect()
    )
}

/// Simplify one closed ring; `None` if fewer than three distinct corners remain.
fn simplify_ring(ring: &LineString<f64>) -> Option<LineString<f64>> {
    #[inline]
    fn cross(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> f64 {
        (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
    }

    let mut points = ring.coords().copied().collect::<Vec<_>>();

    // Removing a vertex can expose a new repeat or collinear triple, so iterate to a fixed point.
    loop {
        points.dedup();
        if points.len() > 1 && points.first() == points.last() { points.pop(); }
        if points.len() < 3 { return None }

        let n = points.len();
        let keep = (0..n)
            .map(|i| cross(points[(i + n - 1) % n], points[i], points[(i + 1) % n]) != 0.0)
            .collect::<Vec<_>>();
        if keep.iter().all(|&k| k) { break }

        points = points.into_iter().zip(keep)
            .filter_map(|(point, k)| k.then_some(point))
            .collect();
    }

    points.push(points[0]);
    Some(LineString::new(points))
}

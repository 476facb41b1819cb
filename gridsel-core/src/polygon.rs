/// Selection outlines for drawing
///
/// Visible selected rectangles are turned into a poly-polygon: one closed
/// point list per connected region (and per hole), so the whole selection can
/// be filled and stroked with a single draw call without internal edges.
use std::collections::BTreeMap;

use crate::geometry::{Point, Rect};
use crate::merge::{self, Mergeable};

impl Mergeable for Rect {
    fn covers(&self, other: &Self) -> bool {
        self.contains_rect(other)
    }

    fn try_union(&self, other: &Self) -> Option<Self> {
        if self.contains_rect(other) {
            return Some(*self);
        }
        if other.contains_rect(self) {
            return Some(*other);
        }

        let same_rows = self.y == other.y && self.height == other.height;
        let same_cols = self.x == other.x && self.width == other.width;

        if same_rows && self.x <= other.right() && other.x <= self.right() {
            return Some(self.union(other));
        }
        if same_cols && self.y <= other.bottom() && other.y <= self.bottom() {
            return Some(self.union(other));
        }
        None
    }
}

/// Closed outlines ready for a poly-polygon draw call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolyPolygon {
    /// Number of points of each polygon in `points`
    counts: Vec<usize>,
    points: Vec<Point>,
    bbox: Rect,
}

impl PolyPolygon {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if there is anything to draw
    pub fn is_valid(&self) -> bool {
        !self.counts.is_empty()
    }

    /// Number of polygons
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Iterate over the point list of each polygon
    pub fn polygons(&self) -> impl Iterator<Item = &[Point]> + '_ {
        let mut offset = 0;
        self.counts.iter().map(move |&count| {
            let polygon = &self.points[offset..offset + count];
            offset += count;
            polygon
        })
    }

    /// Bounding box of every polygon, an empty rectangle if there are none
    pub fn bounding_box(&self) -> Rect {
        self.bbox
    }

    /// The outline as a plain rectangle when it is exactly one.
    ///
    /// Lets the caller draw a rectangle instead of a general polygon.
    pub fn as_rect(&self) -> Option<Rect> {
        (self.counts.len() == 1 && self.counts[0] == 4).then_some(self.bbox)
    }

    pub fn append(&mut self, points: &[Point]) {
        if points.is_empty() {
            return;
        }

        let min_x = points.iter().map(|p| p.x).min().unwrap_or_default();
        let max_x = points.iter().map(|p| p.x).max().unwrap_or_default();
        let min_y = points.iter().map(|p| p.y).min().unwrap_or_default();
        let max_y = points.iter().map(|p| p.y).max().unwrap_or_default();
        self.bbox = self.bbox.union(&Rect::from_edges(min_x, min_y, max_x, max_y));

        self.counts.push(points.len());
        self.points.extend_from_slice(points);
    }
}

/// Build the poly-polygon outlining the union of `rects`.
///
/// Adjacent rectangles are merged first. A single rectangle yields one
/// 4-point polygon; disjoint rectangles yield one polygon each; touching
/// rectangles that don't form a rectangle yield their common outline.
pub fn compute_poly_polygon(mut rects: Vec<Rect>) -> PolyPolygon {
    rects.retain(|rect| !rect.is_empty());
    merge::merge_adjacent(&mut rects);

    let mut poly = PolyPolygon::new();
    match rects.as_slice() {
        [] => {}
        [rect] => poly.append(&rect.corners()),
        _ => {
            for outline in trace_outlines(&rects) {
                poly.append(&outline);
            }
        }
    }
    poly
}

/// Trace the boundary of the union of `rects`.
///
/// The plane is split along every rectangle edge into a coarse grid of
/// slabs. Each covered slab contributes the sides it does not share with
/// another covered slab, oriented so the covered side is always on the right.
/// Chaining those edges gives closed loops: outer outlines run clockwise,
/// holes counter-clockwise.
fn trace_outlines(rects: &[Rect]) -> Vec<Vec<Point>> {
    let xs = edges(rects.iter().flat_map(|r| [r.x, r.right()]));
    let ys = edges(rects.iter().flat_map(|r| [r.y, r.bottom()]));
    let (nx, ny) = (xs.len() - 1, ys.len() - 1);

    let mut covered = vec![false; nx * ny];
    for rect in rects {
        let (x0, x1) = (index_of(&xs, rect.x), index_of(&xs, rect.right()));
        let (y0, y1) = (index_of(&ys, rect.y), index_of(&ys, rect.bottom()));
        for j in y0..y1 {
            for i in x0..x1 {
                covered[j * nx + i] = true;
            }
        }
    }
    let filled = |i: isize, j: isize| {
        i >= 0 && j >= 0 && (i as usize) < nx && (j as usize) < ny && covered[j as usize * nx + i as usize]
    };

    // Directed edges between slab vertices, keyed by start vertex
    let mut outgoing: BTreeMap<(isize, isize), Vec<(isize, isize)>> = BTreeMap::new();
    let mut add = |from: (isize, isize), to: (isize, isize)| {
        outgoing.entry(from).or_default().push(to);
    };
    for j in 0..ny as isize {
        for i in 0..nx as isize {
            if !filled(i, j) {
                continue;
            }
            if !filled(i, j - 1) {
                add((i, j), (i + 1, j));
            }
            if !filled(i + 1, j) {
                add((i + 1, j), (i + 1, j + 1));
            }
            if !filled(i, j + 1) {
                add((i + 1, j + 1), (i, j + 1));
            }
            if !filled(i - 1, j) {
                add((i, j + 1), (i, j));
            }
        }
    }

    let mut outlines = Vec::new();
    loop {
        let Some(start) = outgoing.keys().next().copied() else {
            break;
        };
        let mut vertices = vec![start];
        let mut current = start;
        let mut heading: Option<(isize, isize)> = None;

        loop {
            let Some(ends) = outgoing.get_mut(&current) else {
                break;
            };
            let pick = match heading {
                Some(dir) => preferred_edge(current, dir, ends),
                None => 0,
            };
            let next = ends.remove(pick);
            if ends.is_empty() {
                outgoing.remove(&current);
            }

            heading = Some(((next.0 - current.0).signum(), (next.1 - current.1).signum()));
            current = next;
            if current == start {
                break;
            }
            vertices.push(current);
        }

        let corners = drop_collinear(&vertices);
        outlines.push(
            corners
                .into_iter()
                .map(|(i, j)| Point::new(xs[i as usize], ys[j as usize]))
                .collect(),
        );
    }
    outlines
}

fn edges(values: impl Iterator<Item = i32>) -> Vec<i32> {
    let mut values: Vec<i32> = values.collect();
    values.sort_unstable();
    values.dedup();
    values
}

fn index_of(edges: &[i32], value: i32) -> usize {
    edges.partition_point(|&edge| edge < value)
}

/// At a vertex where two regions touch corner to corner there are two ways
/// out. Turning right keeps following the region already being traced.
fn preferred_edge(at: (isize, isize), heading: (isize, isize), ends: &[(isize, isize)]) -> usize {
    let (dx, dy) = heading;
    let right = (-dy, dx);
    let left = (dy, -dx);
    [right, heading, left]
        .iter()
        .find_map(|dir| ends.iter().position(|&end| (end.0 - at.0, end.1 - at.1) == *dir))
        .unwrap_or(0)
}

fn drop_collinear(vertices: &[(isize, isize)]) -> Vec<(isize, isize)> {
    let n = vertices.len();
    if n < 4 {
        return vertices.to_vec();
    }
    (0..n)
        .filter(|&k| {
            let prev = vertices[(k + n - 1) % n];
            let here = vertices[k];
            let next = vertices[(k + 1) % n];
            let straight_x = prev.0 == here.0 && here.0 == next.0;
            let straight_y = prev.1 == here.1 && here.1 == next.1;
            !(straight_x || straight_y)
        })
        .map(|k| vertices[k])
        .collect()
}

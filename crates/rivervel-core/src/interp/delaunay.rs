use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::consts::{COLLINEAR_EPSILON, INCIRCLE_EPSILON};
use crate::point::Point2;

/// Delaunay triangulation of a scattered point set.
///
/// A lexicographic sweep first triangulates the whole convex hull; Lawson
/// edge flips then make every interior edge locally Delaunay. Triangles are
/// stored as indices into the slice given to [`build`](Self::build).
/// Non-finite and exactly duplicated points are skipped; fewer than three
/// usable points, or a collinear set, yields an empty triangulation.
#[derive(Clone, Debug, Default)]
pub struct Triangulation {
    triangles: Vec<[usize; 3]>,
}

/// Twice the signed area of `abc`; positive when counter-clockwise.
pub(crate) fn orient(a: Point2, b: Point2, c: Point2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn collinear(a: Point2, b: Point2, p: Point2) -> bool {
    orient(a, b, p).abs() <= COLLINEAR_EPSILON * a.distance(&b) * a.distance(&p)
}

/// `p` lies clearly to the right of the directed line `a -> b`.
fn strictly_right(a: Point2, b: Point2, p: Point2) -> bool {
    orient(a, b, p) < -COLLINEAR_EPSILON * a.distance(&b) * a.distance(&p)
}

/// `d` lies inside the circumcircle of the counter-clockwise triangle `abc`
/// by more than rounding error.
fn in_circle(a: Point2, b: Point2, c: Point2, d: Point2) -> bool {
    let (adx, ady) = (a.x - d.x, a.y - d.y);
    let (bdx, bdy) = (b.x - d.x, b.y - d.y);
    let (cdx, cdy) = (c.x - d.x, c.y - d.y);
    let alift = adx * adx + ady * ady;
    let blift = bdx * bdx + bdy * bdy;
    let clift = cdx * cdx + cdy * cdy;

    let det = alift * (bdx * cdy - cdx * bdy)
        + blift * (cdx * ady - adx * cdy)
        + clift * (adx * bdy - bdx * ady);
    let permanent = alift * ((bdx * cdy).abs() + (cdx * bdy).abs())
        + blift * ((cdx * ady).abs() + (adx * cdy).abs())
        + clift * ((adx * bdy).abs() + (bdx * ady).abs());
    det > INCIRCLE_EPSILON * permanent
}

/// Counter-clockwise triangles plus a directed-edge index.
#[derive(Default)]
struct Mesh {
    triangles: Vec<[usize; 3]>,
    /// Directed edge `a -> b` to the triangle that contains it.
    edges: HashMap<(usize, usize), usize>,
}

impl Mesh {
    fn push(&mut self, t: [usize; 3]) {
        self.triangles.push(t);
        self.link(self.triangles.len() - 1);
    }

    fn link(&mut self, id: usize) {
        let t = self.triangles[id];
        for k in 0..3 {
            self.edges.insert((t[k], t[(k + 1) % 3]), id);
        }
    }

    fn unlink(&mut self, id: usize) {
        let t = self.triangles[id];
        for k in 0..3 {
            self.edges.remove(&(t[k], t[(k + 1) % 3]));
        }
    }
}

/// The vertex of `t` that is neither `a` nor `b`.
fn third(t: [usize; 3], a: usize, b: usize) -> usize {
    t[0] + t[1] + t[2] - a - b
}

/// Triangulate the convex hull by inserting points in lexicographic order,
/// joining each to the hull edges it sees. `None` for a collinear set.
fn sweep(verts: &[Point2]) -> Option<Mesh> {
    let n = verts.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| {
        verts[i]
            .x
            .total_cmp(&verts[j].x)
            .then(verts[i].y.total_cmp(&verts[j].y))
    });

    let (p0, p1) = (verts[order[0]], verts[order[1]]);
    let first_off = (2..n).find(|&k| !collinear(p0, p1, verts[order[k]]))?;
    let chain = &order[..first_off];
    let apex = order[first_off];

    let mut mesh = Mesh::default();
    let mut hull: Vec<usize>;
    if orient(p0, p1, verts[apex]) > 0.0 {
        for w in chain.windows(2) {
            mesh.push([w[0], w[1], apex]);
        }
        hull = chain.to_vec();
    } else {
        for w in chain.windows(2) {
            mesh.push([w[1], w[0], apex]);
        }
        hull = chain.iter().rev().copied().collect();
    }
    hull.push(apex);

    let mut skipped = 0usize;
    for &p in &order[first_off + 1..] {
        let pt = verts[p];
        let m = hull.len();
        let edge = |i: usize| (verts[hull[i]], verts[hull[(i + 1) % m]]);

        let seed = (0..m).min_by(|&i, &j| {
            let (a, b) = edge(i);
            let (c, d) = edge(j);
            orient(a, b, pt).total_cmp(&orient(c, d, pt))
        });
        let Some(seed) = seed.filter(|&i| {
            let (a, b) = edge(i);
            orient(a, b, pt) < 0.0
        }) else {
            skipped += 1;
            continue;
        };
        let visible = |i: usize| {
            let (a, b) = edge(i);
            i == seed || strictly_right(a, b, pt)
        };

        // The edges seen from outside a convex polygon form one run.
        let mut start = seed;
        let mut len = 1;
        while len < m && visible((start + m - 1) % m) {
            start = (start + m - 1) % m;
            len += 1;
        }
        while len < m && visible((start + len) % m) {
            len += 1;
        }
        if len == m {
            skipped += 1;
            continue;
        }

        for k in 0..len {
            let i = (start + k) % m;
            mesh.push([hull[(i + 1) % m], hull[i], p]);
        }
        let mut next = Vec::with_capacity(m - len + 2);
        for k in 0..=(m - len) {
            next.push(hull[(start + len + k) % m]);
        }
        next.push(p);
        hull = next;
    }
    if skipped > 0 {
        debug!(skipped, "Points left out of the hull sweep");
    }
    Some(mesh)
}

/// Flip edges until no vertex lies inside the circumcircle of a neighbour.
/// Returns the number of flips.
fn legalize(mesh: &mut Mesh, verts: &[Point2]) -> usize {
    let mut stack: Vec<(usize, usize)> = mesh
        .edges
        .keys()
        .copied()
        .filter(|&(a, b)| a < b)
        .collect();

    let mut flips = 0usize;
    while let Some((a, b)) = stack.pop() {
        let (Some(&t1), Some(&t2)) = (mesh.edges.get(&(a, b)), mesh.edges.get(&(b, a))) else {
            continue;
        };
        let c = third(mesh.triangles[t1], a, b);
        let d = third(mesh.triangles[t2], a, b);
        let (pa, pb, pc, pd) = (verts[a], verts[b], verts[c], verts[d]);
        if !in_circle(pa, pb, pc, pd) {
            continue;
        }
        if orient(pa, pd, pc) <= 0.0 || orient(pd, pb, pc) <= 0.0 {
            continue;
        }

        mesh.unlink(t1);
        mesh.unlink(t2);
        mesh.triangles[t1] = [a, d, c];
        mesh.triangles[t2] = [d, b, c];
        mesh.link(t1);
        mesh.link(t2);
        stack.extend([(a, d), (d, b), (b, c), (c, a)]);
        flips += 1;
    }
    flips
}

impl Triangulation {
    pub fn build(points: &[Point2]) -> Self {
        let mut seen = HashSet::new();
        let input: Vec<usize> = (0..points.len())
            .filter(|&i| {
                let p = points[i];
                p.is_finite() && seen.insert(((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits()))
            })
            .collect();
        if input.len() < 3 {
            debug!(points = input.len(), "Too few points to triangulate");
            return Self::default();
        }

        // Work in coordinates local to the bounding box.
        let (min_x, min_y) = input
            .iter()
            .fold((f64::INFINITY, f64::INFINITY), |(lx, ly), &i| {
                (lx.min(points[i].x), ly.min(points[i].y))
            });
        let verts: Vec<Point2> = input
            .iter()
            .map(|&i| Point2::new(points[i].x - min_x, points[i].y - min_y))
            .collect();

        let Some(mut mesh) = sweep(&verts) else {
            debug!(points = verts.len(), "Collinear points, nothing to triangulate");
            return Self::default();
        };
        let flips = legalize(&mut mesh, &verts);

        let mut triangles: Vec<[usize; 3]> = mesh
            .triangles
            .iter()
            .map(|t| {
                let mut tri = [input[t[0]], input[t[1]], input[t[2]]];
                tri.sort_unstable();
                tri
            })
            .collect();
        triangles.sort_unstable();

        debug!(
            points = verts.len(),
            triangles = triangles.len(),
            flips,
            "Triangulation built"
        );
        Self { triangles }
    }

    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Total area covered by the triangles.
    pub fn area(&self, points: &[Point2]) -> f64 {
        self.triangles
            .iter()
            .map(|&[i, j, k]| orient(points[i], points[j], points[k]).abs() / 2.0)
            .sum()
    }
}

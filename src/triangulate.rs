//! Ear-clipping triangulation of a planar polygon face.

/// Triangulate a polygon of `n` vertices (`in_idx[0..n]`, each an index into
/// a `numVerts`-long position array) into `out_idx`, which must hold room for
/// `3 * (n - 2)` indices. Returns the number of triangles written.
///
/// - `n < 3` produces no triangles.
/// - `n == 3` copies the triangle as-is.
/// - `n == 4` splits on the 0-2 diagonal.
/// - `n >= 5` runs a sharpest-angle-first ear clip.
///
/// Any out-of-range index in `in_idx[0..n]` aborts the whole polygon and
/// returns 0, rather than failing the caller.
pub fn triangulate_polygon(
    n: usize,
    vert_pos: &[f32],
    num_verts: u32,
    in_idx: &[i32],
    out_idx: &mut [i32],
) -> usize {
    if n < 3 {
        return 0;
    }
    for &idx in &in_idx[..n] {
        if idx < 0 || idx as u32 >= num_verts {
            return 0;
        }
    }

    if n == 3 {
        out_idx[0..3].copy_from_slice(&in_idx[0..3]);
        return 1;
    }

    if n == 4 {
        out_idx[0] = in_idx[0];
        out_idx[1] = in_idx[1];
        out_idx[2] = in_idx[3];
        out_idx[3] = in_idx[2];
        out_idx[4] = in_idx[3];
        out_idx[5] = in_idx[1];
        return 2;
    }

    ear_clip(n, vert_pos, in_idx, out_idx)
}

type Vec3 = [f64; 3];
type Vec2 = (f64, f64);

fn pos(vert_pos: &[f32], idx: i32) -> Vec3 {
    let o = idx as usize * 3;
    [vert_pos[o] as f64, vert_pos[o + 1] as f64, vert_pos[o + 2] as f64]
}

fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross3(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot3(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn normalize3(v: Vec3) -> Option<Vec3> {
    let len = dot3(v, v).sqrt();
    if len < 1e-12 {
        None
    } else {
        Some([v[0] / len, v[1] / len, v[2] / len])
    }
}

/// Sharpest-angle ear clipping for `n >= 5`. Builds a 2D basis for the
/// polygon's plane from its first three distinct vertices, then repeatedly
/// removes the convex vertex with the smallest interior angle.
fn ear_clip(n: usize, vert_pos: &[f32], in_idx: &[i32], out_idx: &mut [i32]) -> usize {
    let p0 = pos(vert_pos, in_idx[0]);
    let p1 = pos(vert_pos, in_idx[1]);
    let p_last = pos(vert_pos, in_idx[n - 1]);

    let Some(u) = normalize3(sub(p1, p0)) else {
        return 0;
    };
    let Some(v_last) = normalize3(sub(p_last, p0)) else {
        return 0;
    };
    let Some(normal) = normalize3(cross3(u, v_last)) else {
        return 0;
    };
    let Some(v) = normalize3(cross3(normal, u)) else {
        return 0;
    };

    let q: Vec<Vec2> = (0..n)
        .map(|i| {
            let d = sub(pos(vert_pos, in_idx[i]), p0);
            (dot3(d, u), dot3(d, v))
        })
        .collect();

    let mut next: Vec<usize> = (0..n).map(|i| (i + 1) % n).collect();
    let mut prev: Vec<usize> = (0..n).map(|i| (i + n - 1) % n).collect();

    let mut remaining = n;
    let mut tri_out = 0usize;
    let mut cursor = 0usize;

    while remaining > 3 {
        let mut best: Option<usize> = None;
        let mut best_angle = f64::INFINITY;

        let start = cursor;
        let mut i = start;
        loop {
            let angle = interior_angle(&q, prev[i], i, next[i]);
            if angle < best_angle {
                best_angle = angle;
                best = Some(i);
            }
            i = next[i];
            if i == start {
                break;
            }
        }

        let Some(best) = best else {
            // No convex vertex left (degenerate/self-intersecting input);
            // stop rather than emit garbage triangles.
            break;
        };

        let triangle = [in_idx[best], in_idx[next[best]], in_idx[prev[best]]];
        out_idx[tri_out * 3..tri_out * 3 + 3].copy_from_slice(&triangle);
        tri_out += 1;

        let (p, nx) = (prev[best], next[best]);
        next[p] = nx;
        prev[nx] = p;
        cursor = nx;
        remaining -= 1;
    }

    // Emit the final triangle from the three survivors.
    let a = cursor;
    let b = next[a];
    let c = next[b];
    out_idx[tri_out * 3..tri_out * 3 + 3].copy_from_slice(&[in_idx[a], in_idx[b], in_idx[c]]);
    tri_out += 1;

    tri_out
}

const INFEASIBLE: f64 = 10_000.0;

/// Signed interior angle at `i` (between the edge coming from `p` and the
/// edge going to `nx`), in `(0, pi)` for a convex vertex. Reflex vertices,
/// and the exact boundary cases `0`/`pi`, are marked infeasible.
fn interior_angle(q: &[Vec2], p: usize, i: usize, nx: usize) -> f64 {
    let to_prev = (q[p].0 - q[i].0, q[p].1 - q[i].1);
    let to_next = (q[nx].0 - q[i].0, q[nx].1 - q[i].1);
    let cross = to_prev.0 * to_next.1 - to_prev.1 * to_next.0;
    let dot = to_prev.0 * to_next.0 + to_prev.1 * to_next.1;
    if cross <= 0.0 {
        return INFEASIBLE;
    }
    cross.atan2(dot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<f32> {
        // Unit square in the z=0 plane, CCW.
        vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0]
    }

    #[test]
    fn n_below_3_yields_nothing() {
        let verts = square();
        let idx = [0, 1];
        let mut out = [0i32; 0];
        assert_eq!(triangulate_polygon(2, &verts, 4, &idx, &mut out), 0);
    }

    #[test]
    fn triangle_passes_through_unchanged() {
        let verts = square();
        let idx = [0, 1, 2];
        let mut out = [0i32; 3];
        assert_eq!(triangulate_polygon(3, &verts, 4, &idx, &mut out), 1);
        assert_eq!(out, [0, 1, 2]);
    }

    #[test]
    fn quad_splits_on_diagonal() {
        let verts = square();
        let idx = [0, 1, 2, 3];
        let mut out = [0i32; 6];
        assert_eq!(triangulate_polygon(4, &verts, 4, &idx, &mut out), 2);
        assert_eq!(out, [0, 1, 3, 2, 3, 1]);
    }

    #[test]
    fn out_of_range_index_aborts_polygon() {
        let verts = square();
        let idx = [0, 1, 99];
        let mut out = [0i32; 3];
        assert_eq!(triangulate_polygon(3, &verts, 4, &idx, &mut out), 0);
    }

    #[test]
    fn convex_pentagon_yields_three_triangles_covering_all_indices() {
        // Regular-ish convex pentagon in z=0 plane.
        let verts: Vec<f32> = vec![
            0.0, 1.0, 0.0, //
            0.95, 0.31, 0.0, //
            0.59, -0.81, 0.0, //
            -0.59, -0.81, 0.0, //
            -0.95, 0.31, 0.0, //
        ];
        let idx = [0, 1, 2, 3, 4];
        let mut out = [0i32; 9];
        let tris = triangulate_polygon(5, &verts, 5, &idx, &mut out);
        assert_eq!(tris, 3);
        let mut seen = std::collections::HashSet::new();
        for &i in &out {
            seen.insert(i);
        }
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn concave_pentagon_avoids_clipping_across_the_notch() {
        // A pentagon with one reflex vertex (index 2 dents inward).
        let verts: Vec<f32> = vec![
            0.0, 0.0, 0.0, //
            2.0, 0.0, 0.0, //
            1.0, 0.5, 0.0, // reflex notch
            2.0, 2.0, 0.0, //
            0.0, 2.0, 0.0, //
        ];
        let idx = [0, 1, 2, 3, 4];
        let mut out = [0i32; 9];
        let tris = triangulate_polygon(5, &verts, 5, &idx, &mut out);
        assert_eq!(tris, 3);
        // None of the emitted triangles should use vertex 2 as a non-ear
        // apex that crosses the notch entirely; at minimum every vertex is
        // used somewhere in the fan.
        let mut seen = std::collections::HashSet::new();
        for &i in &out {
            seen.insert(i);
        }
        assert_eq!(seen.len(), 5);
    }
}

use crate::construct::points::{PointClass, PointPool};
use crate::geometry::EdgeIndex;
use itertools::Itertools;

/// Spawns the potential points induced by placing a `(w, l)` rectangle at
/// `(x, y)` in a `width` x `length` container, querying `edges` for the
/// already-placed rectangles. Must run before the new rectangle's own edges
/// are appended to the index.
///
/// Class assignments: `A`/`B` are the placement's top-left and bottom-right
/// corners, generated on a container wall or where a neighboring edge passes
/// through them. When a corner is not generated, `A'`/`B'` project it onto
/// the nearest supporting edge (falling to `E`/`F` past two intervening
/// obstacles) and `A"`/`B"` keep the corner as a marginal fallback. `C`/`D`
/// mark interior edge ends on the placement's top and right levels,
/// retracting a coincident `B"`/`A"` point.
pub fn spawn_points(
    width: usize,
    length: usize,
    edges: &EdgeIndex,
    pool: &mut PointPool,
    x: usize,
    y: usize,
    w: usize,
    l: usize,
) {
    let (ay, bx) = (y + l, x + w);
    let a = (x, ay);
    let b = (bx, y);

    let mut a_generated = false;
    let mut allow_a_double = true;
    let mut prohibit_a_prime = false;

    if ay < length && x == 0 {
        // A on the container wall
        a_generated = true;
        pool.push(PointClass::A, a);
    } else if ay < length {
        let mut append_a = false;
        for seg in edges.verticals_at(x) {
            if seg.start.1 == ay || seg.end.1 == ay {
                // vertical edge ending at A's level obstructs the projection
                prohibit_a_prime = true;
            }
            if seg.start.1 <= ay && seg.end.1 > ay {
                append_a = true;
                break;
            }
        }
        for seg in edges.horizontals_at(ay) {
            if seg.start.0 <= x && seg.end.0 > x {
                // horizontal edge passing through A prohibits A and A"
                append_a = false;
                allow_a_double = false;
                break;
            }
        }
        if append_a {
            a_generated = true;
            pool.push(PointClass::A, a);
        }
    }

    // A' or E: project A leftwards onto the nearest supporting vertical edge
    if !a_generated && !prohibit_a_prime {
        let mut intervening = 0;
        let mut stop = false;
        let mut found = false;
        for vx in edges.vertical_keys_before(x).into_iter().rev() {
            let mut counted_here = false;
            let segments = edges.verticals_at(vx).iter().copied().sorted().collect_vec();
            for (i, seg) in segments.iter().enumerate() {
                if seg.start.1 > ay {
                    break;
                }
                if seg.end.1 == ay {
                    let continued = segments[i + 1..].iter().any(|s| s.start.1 == ay);
                    if !continued {
                        // discontinued obstacle, no support to land on
                        stop = true;
                        break;
                    }
                }
                if !counted_here && seg.end.1 > y && seg.end.1 < ay {
                    intervening += 1;
                    counted_here = true;
                }
                if seg.start.1 <= ay && seg.end.1 > ay {
                    let landing = (seg.start.0, ay);
                    if intervening <= 1 || (intervening <= 2 && counted_here) {
                        pool.push(PointClass::APrime, landing);
                    } else {
                        pool.push(PointClass::E, landing);
                    }
                    found = true;
                }
            }
            if stop || found {
                break;
            }
        }
    }

    if !a_generated && ay < length && allow_a_double {
        pool.push(PointClass::ADouble, a);
    }

    let mut b_generated = false;
    let mut allow_b_double = true;
    let mut prohibit_b_prime = false;

    if bx < width && y == 0 {
        // B on the container bottom
        b_generated = true;
        pool.push(PointClass::B, b);
    } else if bx < width {
        let mut append_b = false;
        for seg in edges.horizontals_at(y) {
            if seg.start.0 == bx || seg.end.0 == bx {
                prohibit_b_prime = true;
            }
            if seg.start.0 <= bx && seg.end.0 > bx {
                append_b = true;
                break;
            }
        }
        for seg in edges.verticals_at(bx) {
            if seg.start.1 <= y && seg.end.1 > y {
                append_b = false;
                allow_b_double = false;
                break;
            }
        }
        if append_b {
            b_generated = true;
            pool.push(PointClass::B, b);
        }
    }

    // B' or F: project B downwards onto the nearest supporting horizontal edge
    if !b_generated && !prohibit_b_prime {
        let mut intervening = 0;
        let mut stop = false;
        let mut found = false;
        for hy in edges.horizontal_keys_before(y).into_iter().rev() {
            let mut counted_here = false;
            let segments = edges
                .horizontals_at(hy)
                .iter()
                .copied()
                .sorted()
                .collect_vec();
            for (i, seg) in segments.iter().enumerate() {
                if seg.start.0 > bx {
                    break;
                }
                if seg.end.0 == bx {
                    let continued = segments[i + 1..].iter().any(|s| s.start.0 == bx);
                    if !continued {
                        stop = true;
                        break;
                    }
                }
                if !counted_here && seg.end.0 > x && seg.end.0 < bx {
                    intervening += 1;
                    counted_here = true;
                }
                if seg.start.0 <= bx && seg.end.0 > bx {
                    let landing = (bx, seg.start.1);
                    if intervening <= 1 || (intervening <= 2 && counted_here) {
                        pool.push(PointClass::BPrime, landing);
                    } else {
                        pool.push(PointClass::F, landing);
                    }
                    found = true;
                    break;
                }
            }
            if stop || found {
                break;
            }
        }
    }

    if !b_generated && bx < width && allow_b_double {
        pool.push(PointClass::BDouble, b);
    }

    // C: end of a strictly-interior edge on the placement's top level,
    // suppressed when a follow-on segment continues it
    if edges.horizontals.contains_key(&ay) {
        let segments = edges
            .horizontals_at(ay)
            .iter()
            .copied()
            .sorted()
            .collect_vec();
        let mut append_c = false;
        let mut end_x = None;
        for seg in &segments {
            if let Some(cx) = end_x {
                if seg.start.0 == cx {
                    append_c = false;
                    break;
                }
            }
            if seg.end.0 > x && seg.end.0 < bx {
                append_c = true;
                end_x = Some(seg.end.0);
            }
        }
        if append_c {
            if let Some(cx) = end_x {
                pool.push(PointClass::C, (cx, ay));
                pool.remove(PointClass::BDouble, (cx, ay));
            }
        }
    }

    // D: end of a strictly-interior edge on the placement's right level
    if edges.verticals.contains_key(&bx) {
        let mut append_d = false;
        let mut end_y = None;
        for seg in edges.verticals_at(bx) {
            if seg.end.1 > y && seg.end.1 < ay {
                append_d = true;
                end_y = Some(seg.end.1);
            }
            if seg.start.1 < ay && seg.end.1 > ay {
                append_d = false;
                break;
            }
        }
        if append_d {
            if let Some(dy) = end_y {
                pool.push(PointClass::D, (bx, dy));
                pool.remove(PointClass::ADouble, (bx, dy));
            }
        }
    }
}

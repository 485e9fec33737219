use std::f64::consts::PI;

use layclip_boolean::{boolean, ClipOp, ClipOptions};
use layclip_core::{ClipError, ClipResult, FillRule, Point, PolyTree, PolygonSet, Ring};

use crate::join::JoinStyle;
use crate::options::OffsetOptions;

/// Grow (`delta > 0`) or shrink (`delta < 0`) every ring of `set`.
///
/// Each ring is turned into a raw offset contour, and the contours are
/// united under the positive fill rule. That union removes the loops
/// generated at reflex vertices and drops any part of a contour that turned
/// inside out, which is how holes and thin features disappear.
pub fn offset(set: &PolygonSet, delta: f64, options: &OffsetOptions) -> ClipResult<PolyTree> {
    if !delta.is_finite() {
        return Err(ClipError::InvalidParameter(format!(
            "offset distance must be finite, got {delta}"
        )));
    }
    options.join.validate()?;

    let rings = prepare(set, options)?;
    let clean = ClipOptions {
        subject_fill: FillRule::Positive,
        clip_fill: FillRule::Positive,
        max_noding_passes: options.max_noding_passes,
    };
    if delta == 0.0 {
        return boolean(
            &PolygonSet::from_rings(rings),
            &PolygonSet::new(),
            ClipOp::Union,
            &clean,
        );
    }

    let builder = ContourBuilder::new(delta, options.join);
    let mut contours = Vec::with_capacity(rings.len());
    for ring in &rings {
        match Ring::new(builder.contour(ring)?) {
            Ok(contour) => contours.push(contour),
            Err(defect) => log::trace!("dropping collapsed offset contour: {}", defect),
        }
    }
    log::debug!(
        "offset by {} with {:?}: {} rings, {} raw contours",
        delta,
        options.join,
        rings.len(),
        contours.len()
    );
    boolean(
        &PolygonSet::from_rings(contours),
        &PolygonSet::new(),
        ClipOp::Union,
        &clean,
    )
}

/// Rings with outer contours counter-clockwise, ready for offsetting.
fn prepare(set: &PolygonSet, options: &OffsetOptions) -> ClipResult<Vec<Ring>> {
    if options.join_first {
        let united = boolean(
            set,
            &PolygonSet::new(),
            ClipOp::Union,
            &ClipOptions {
                max_noding_passes: options.max_noding_passes,
                ..ClipOptions::default()
            },
        )?;
        return Ok(united.into_polygon_set().into_rings());
    }

    let rings: Vec<Ring> = set
        .rings()
        .iter()
        .filter(|r| !r.is_degenerate())
        .cloned()
        .collect();
    // The ring through the lowest vertex is always an outer contour.
    let lowest = rings
        .iter()
        .enumerate()
        .flat_map(|(i, r)| r.points().iter().map(move |p| (*p, i)))
        .min_by(|a, b| a.0.sweep_cmp(&b.0))
        .map(|(_, i)| i);
    match lowest {
        Some(i) if rings[i].is_hole() => {
            log::debug!("input rings are clockwise, reversing");
            Ok(rings.iter().map(Ring::reversed).collect())
        }
        _ => Ok(rings),
    }
}

#[derive(Debug, Clone, Copy)]
struct Normal {
    x: f64,
    y: f64,
}

/// Right-hand unit normal of the edge `a -> b`.
fn unit_normal(a: Point, b: Point) -> Normal {
    let dx = (b.x - a.x) as f64;
    let dy = (b.y - a.y) as f64;
    let len = dx.hypot(dy);
    Normal {
        x: dy / len,
        y: -dx / len,
    }
}

/// Per-call join parameters.
struct ContourBuilder {
    delta: f64,
    join: JoinStyle,
    /// Smallest `1 + cos` for which a mitre is kept.
    mitre_min: f64,
    step_sin: f64,
    step_cos: f64,
    steps_per_rad: f64,
}

impl ContourBuilder {
    fn new(delta: f64, join: JoinStyle) -> Self {
        let mitre_min = match join {
            JoinStyle::Mitre { limit } => 2.0 / (limit.max(2.0) * limit.max(2.0)),
            _ => 0.0,
        };
        let (step_sin, step_cos, steps_per_rad) = match join {
            JoinStyle::Round { steps_per_circle } => {
                let step = 2.0 * PI / steps_per_circle as f64;
                let sin = if delta < 0.0 { -step.sin() } else { step.sin() };
                (sin, step.cos(), steps_per_circle as f64 / (2.0 * PI))
            }
            _ => (0.0, 1.0, 0.0),
        };
        Self {
            delta,
            join,
            mitre_min,
            step_sin,
            step_cos,
            steps_per_rad,
        }
    }

    fn contour(&self, ring: &Ring) -> ClipResult<Vec<Point>> {
        let points = ring.points();
        let n = points.len();
        let normals: Vec<Normal> = (0..n)
            .map(|i| unit_normal(points[i], points[(i + 1) % n]))
            .collect();
        let mut out = Vec::with_capacity(n * 2);
        for j in 0..n {
            let k = (j + n - 1) % n;
            self.vertex(points[j], normals[k], normals[j], &mut out)?;
        }
        Ok(out)
    }

    /// Emit the offset geometry at `p`, between the incoming edge normal
    /// `nk` and the outgoing edge normal `nj`.
    fn vertex(&self, p: Point, nk: Normal, nj: Normal, out: &mut Vec<Point>) -> ClipResult<()> {
        let d = self.delta;
        let mut sin_a = nk.x * nj.y - nj.x * nk.y;
        let cos_a = nk.x * nj.x + nk.y * nj.y;
        if (sin_a * d).abs() < 1.0 {
            // Nearly straight: one point is within rounding of the join.
            if cos_a > 0.0 {
                return emit(out, p, nk, d);
            }
        } else {
            sin_a = sin_a.clamp(-1.0, 1.0);
        }

        if sin_a * d < 0.0 {
            // Reflex for this direction; the union trims the loop.
            emit(out, p, nk, d)?;
            out.push(p);
            return emit(out, p, nj, d);
        }

        match self.join {
            JoinStyle::Mitre { .. } => {
                let r = 1.0 + cos_a;
                if r >= self.mitre_min {
                    let q = d / r;
                    push_f64(
                        out,
                        p.x as f64 + (nk.x + nj.x) * q,
                        p.y as f64 + (nk.y + nj.y) * q,
                    )
                } else {
                    self.square(p, nk, nj, sin_a, cos_a, out)
                }
            }
            JoinStyle::Square => self.square(p, nk, nj, sin_a, cos_a, out),
            JoinStyle::Round { .. } => self.round(p, nk, nj, sin_a, cos_a, out),
            JoinStyle::Bevel => {
                emit(out, p, nk, d)?;
                emit(out, p, nj, d)
            }
        }
    }

    fn square(
        &self,
        p: Point,
        nk: Normal,
        nj: Normal,
        sin_a: f64,
        cos_a: f64,
        out: &mut Vec<Point>,
    ) -> ClipResult<()> {
        let d = self.delta;
        let t = (sin_a.atan2(cos_a) / 4.0).tan();
        let (px, py) = (p.x as f64, p.y as f64);
        push_f64(out, px + d * (nk.x - nk.y * t), py + d * (nk.y + nk.x * t))?;
        push_f64(out, px + d * (nj.x + nj.y * t), py + d * (nj.y - nj.x * t))
    }

    fn round(
        &self,
        p: Point,
        nk: Normal,
        nj: Normal,
        sin_a: f64,
        cos_a: f64,
        out: &mut Vec<Point>,
    ) -> ClipResult<()> {
        let d = self.delta;
        let angle = sin_a.atan2(cos_a);
        let steps = ((self.steps_per_rad * angle.abs()).round() as usize).max(1);
        let (mut x, mut y) = (nk.x, nk.y);
        for _ in 0..steps {
            push_f64(out, p.x as f64 + x * d, p.y as f64 + y * d)?;
            let x2 = x;
            x = x * self.step_cos - self.step_sin * y;
            y = x2 * self.step_sin + y * self.step_cos;
        }
        emit(out, p, nj, d)
    }
}

fn emit(out: &mut Vec<Point>, p: Point, n: Normal, d: f64) -> ClipResult<()> {
    push_f64(out, p.x as f64 + n.x * d, p.y as f64 + n.y * d)
}

fn push_f64(out: &mut Vec<Point>, x: f64, y: f64) -> ClipResult<()> {
    out.push(Point::from_f64(x, y)?);
    Ok(())
}

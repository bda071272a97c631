//! Quadratic surrogate of one target against one parameter.
//!
//! The fit is ordinary least squares on `y = a·x² + b·x + c`, solved in closed
//! form from the 3×3 moment system. The band around it is a distance
//! heuristic, not a confidence interval: it starts at
//! [`BASE_UNCERTAINTY`] and shrinks multiplicatively for every observation
//! closer than [`NEAR_DISTANCE`] of the parameter range.

use serde::{Deserialize, Serialize};

use crate::error::{InvalidInputError, Result};
use crate::model::{Parameter, ParameterRange, TableView, Target};
use crate::stats::mean;

/// Relative half-width of the band far from any observation
pub const BASE_UNCERTAINTY: f64 = 0.1;

/// Normalized distance below which an observation tightens the band
pub const NEAR_DISTANCE: f64 = 0.1;

/// Model actually fitted after the degeneracy checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitKind {
    /// Full degree-2 fit from at least three distinct parameter values
    Quadratic,
    /// Least-squares line (`a = 0`) from exactly two distinct values or a
    /// singular moment system
    Linear,
    /// Flat line at the target mean
    Constant,
}

/// Coefficients of `y = a·x² + b·x + c`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadraticFit {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub kind: FitKind,
    /// Coefficient of determination on the fitted points
    pub r_squared: f64,
}

impl QuadraticFit {
    /// Least-squares fit of `ys` against `xs`, degrading to a line or a
    /// constant when the quadratic is not determined by the data.
    ///
    /// The normal equations are formed on `u = (x - mean) / range` so that
    /// the moment sums stay well conditioned for parameters far from zero;
    /// the coefficients are mapped back to `x` afterwards.
    #[must_use]
    pub fn fit(xs: &[f64], ys: &[f64]) -> Self {
        let center = mean(xs);
        let range = ParameterRange::from_values(xs.iter().copied()).range;
        let scale = if range > 0.0 { range } else { 1.0 };
        let m = Moments::new(xs, ys, center, scale);

        let linear = || {
            m.linear().map(|[slope, intercept]| {
                Self::from_normalized(FitKind::Linear, [0.0, slope, intercept], center, scale)
            })
        };
        let fit = match distinct_count(xs) {
            0 | 1 => None,
            2 => linear(),
            _ => m
                .quadratic()
                .map(|q| Self::from_normalized(FitKind::Quadratic, q, center, scale))
                .or_else(|| {
                    tracing::debug!("singular moment system, falling back to a line");
                    linear()
                }),
        };
        fit.unwrap_or_else(|| Self::constant(ys)).with_r_squared(xs, ys)
    }

    /// Value of the fitted curve at `x`
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        (self.a * x + self.b) * x + self.c
    }

    /// Map `q0·u² + q1·u + q2` with `u = (x - center) / scale` onto `x`
    fn from_normalized(kind: FitKind, [q0, q1, q2]: [f64; 3], center: f64, scale: f64) -> Self {
        let a = q0 / (scale * scale);
        let slope = q1 / scale;
        Self {
            a,
            b: slope - 2.0 * a * center,
            c: q2 - slope * center + a * center * center,
            kind,
            r_squared: 0.0,
        }
    }

    fn constant(ys: &[f64]) -> Self {
        Self {
            a: 0.0,
            b: 0.0,
            c: mean(ys),
            kind: FitKind::Constant,
            r_squared: 0.0,
        }
    }

    fn with_r_squared(mut self, xs: &[f64], ys: &[f64]) -> Self {
        let y_mean = mean(ys);
        let (ss_res, ss_tot) = xs.iter().zip(ys).fold((0.0, 0.0), |(res, tot), (&x, &y)| {
            (res + (y - self.predict(x)).powi(2), tot + (y - y_mean).powi(2))
        });
        self.r_squared = if ss_tot == 0.0 {
            1.0
        } else {
            1.0 - ss_res / ss_tot
        };
        self
    }
}

/// Power sums of the normalized abscissa feeding the normal equations
struct Moments {
    n: f64,
    su: f64,
    su2: f64,
    su3: f64,
    su4: f64,
    sy: f64,
    suy: f64,
    su2y: f64,
}

impl Moments {
    fn new(xs: &[f64], ys: &[f64], center: f64, scale: f64) -> Self {
        let mut m = Self {
            n: xs.len() as f64,
            su: 0.0,
            su2: 0.0,
            su3: 0.0,
            su4: 0.0,
            sy: 0.0,
            suy: 0.0,
            su2y: 0.0,
        };
        for (&x, &y) in xs.iter().zip(ys) {
            let u = (x - center) / scale;
            let u2 = u * u;
            m.su += u;
            m.su2 += u2;
            m.su3 += u2 * u;
            m.su4 += u2 * u2;
            m.sy += y;
            m.suy += u * y;
            m.su2y += u2 * y;
        }
        m
    }

    /// Cramer's rule on
    ///
    /// ```text
    /// | Σu⁴ Σu³ Σu² | |q0|   |Σu²y|
    /// | Σu³ Σu² Σu  | |q1| = |Σuy |
    /// | Σu² Σu  n   | |q2|   |Σy  |
    /// ```
    fn quadratic(&self) -> Option<[f64; 3]> {
        let det = det3(
            [self.su4, self.su3, self.su2],
            [self.su3, self.su2, self.su],
            [self.su2, self.su, self.n],
        );
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let rhs = [self.su2y, self.suy, self.sy];
        let det_0 = det3(
            [rhs[0], self.su3, self.su2],
            [rhs[1], self.su2, self.su],
            [rhs[2], self.su, self.n],
        );
        let det_1 = det3(
            [self.su4, rhs[0], self.su2],
            [self.su3, rhs[1], self.su],
            [self.su2, rhs[2], self.n],
        );
        let det_2 = det3(
            [self.su4, self.su3, rhs[0]],
            [self.su3, self.su2, rhs[1]],
            [self.su2, self.su, rhs[2]],
        );
        let q = [det_0 / det, det_1 / det, det_2 / det];
        q.iter().all(|v| v.is_finite()).then_some(q)
    }

    /// Slope and intercept of the least-squares line in `u`
    fn linear(&self) -> Option<[f64; 2]> {
        let denom = self.n * self.su2 - self.su * self.su;
        if denom == 0.0 || !denom.is_finite() {
            return None;
        }
        let slope = (self.n * self.suy - self.su * self.sy) / denom;
        let intercept = (self.sy - slope * self.su) / self.n;
        (slope.is_finite() && intercept.is_finite()).then_some([slope, intercept])
    }
}

/// Determinant of a 3×3 matrix given by rows
fn det3(r0: [f64; 3], r1: [f64; 3], r2: [f64; 3]) -> f64 {
    r0[0] * (r1[1] * r2[2] - r1[2] * r2[1]) - r0[1] * (r1[0] * r2[2] - r1[2] * r2[0])
        + r0[2] * (r1[0] * r2[1] - r1[1] * r2[0])
}

fn distinct_count(xs: &[f64]) -> usize {
    let mut sorted = xs.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    sorted.len()
}

/// One evaluation of the surrogate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurrogatePoint {
    pub parameter_value: f64,
    pub mean: f64,
    pub upper_bound: f64,
    pub lower_bound: f64,
}

/// Fitted curve sampled across the padded parameter domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurrogateCurve {
    pub target: Target,
    pub parameter: Parameter,
    pub fit: QuadraticFit,
    pub points: Vec<SurrogatePoint>,
}

/// Fit `target` against `parameter` over `view` and evaluate the fit at
/// `samples` evenly spaced points of the padded domain, ends included.
///
/// Fails only when fewer than two sample points are requested.
pub fn surrogate_curve(
    view: TableView<'_>,
    target: Target,
    parameter: Parameter,
    samples: usize,
) -> Result<SurrogateCurve> {
    if samples < 2 {
        return Err(InvalidInputError::TooFewSamplePoints(samples));
    }

    let xs = view.parameter_values(parameter);
    let ys = view.target_values(target);
    let fit = QuadraticFit::fit(&xs, &ys);
    if fit.kind != FitKind::Quadratic {
        tracing::debug!(%parameter, metric = %target, kind = ?fit.kind, "surrogate degraded");
    }

    let range = view.range(parameter);
    let (lo, hi) = range.padded_domain();
    let step = (hi - lo) / (samples - 1) as f64;

    let points = (0..samples)
        .map(|i| {
            let x = lo + i as f64 * step;
            let mean = fit.predict(x);
            let spread = uncertainty(x, &xs, &range) * mean.abs();
            SurrogatePoint {
                parameter_value: x,
                mean,
                upper_bound: mean + spread,
                lower_bound: mean - spread,
            }
        })
        .collect();

    Ok(SurrogateCurve {
        target,
        parameter,
        fit,
        points,
    })
}

/// Heuristic relative band half-width at `x`
fn uncertainty(x: f64, observed: &[f64], range: &ParameterRange) -> f64 {
    observed
        .iter()
        .map(|&obs| normalized_distance(obs, x, range))
        .filter(|&d| d < NEAR_DISTANCE)
        .fold(BASE_UNCERTAINTY, |u, d| u * 10.0 * d)
}

fn normalized_distance(observed: f64, x: f64, range: &ParameterRange) -> f64 {
    let delta = (observed - x).abs();
    if range.is_constant() {
        if delta == 0.0 { 0.0 } else { f64::INFINITY }
    } else {
        delta / range.range
    }
}

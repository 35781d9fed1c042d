//! Small numeric helpers shared by the geometry and load modules

use nalgebra::{Point3, Vector3};

pub type Pt3 = Point3<f64>;
pub type Vec3 = Vector3<f64>;

/// Tolerance used to decide whether two fractional stations coincide
pub const STATION_EPS: f64 = 1e-9;

/// Linear interpolation between `a` and `b` at parameter `t`
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// `n` evenly spaced samples over `[start, end]`, both ends included
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// `n` samples over `[0, 1]` clustered at both ends (half-cosine spacing)
pub fn cosine_spacing(n: usize) -> Vec<f64> {
    linspace(0.0, std::f64::consts::PI, n)
        .into_iter()
        .map(|beta| 0.5 * (1.0 - beta.cos()))
        .collect()
}

/// Binomial coefficient as a float
pub fn binomial(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

/// Index `i` of the interval `[xs[i], xs[i + 1]]` containing `x`.
///
/// `xs` must be sorted ascending with at least two entries. Returns `None`
/// when `x` lies outside `[xs[0], xs[last]]`.
pub fn bracket(xs: &[f64], x: f64) -> Option<usize> {
    if xs.len() < 2 {
        return None;
    }
    let first = xs[0];
    let last = xs[xs.len() - 1];
    if x < first - STATION_EPS || x > last + STATION_EPS {
        return None;
    }
    let idx = xs.partition_point(|&v| v <= x);
    Some(idx.saturating_sub(1).min(xs.len() - 2))
}

/// True when two stations are the same within [`STATION_EPS`]
pub fn same_station(a: f64, b: f64) -> bool {
    (a - b).abs() <= STATION_EPS
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linspace_endpoints() {
        let xs = linspace(0.0, 1.0, 40);
        assert_eq!(xs.len(), 40);
        assert_relative_eq!(xs[0], 0.0);
        assert_relative_eq!(xs[39], 1.0);
    }

    #[test]
    fn test_binomial() {
        assert_relative_eq!(binomial(7, 0), 1.0);
        assert_relative_eq!(binomial(7, 3), 35.0);
        assert_relative_eq!(binomial(7, 7), 1.0);
    }

    #[test]
    fn test_bracket() {
        let xs = [0.0, 0.5, 1.0];
        assert_eq!(bracket(&xs, 0.0), Some(0));
        assert_eq!(bracket(&xs, 0.3), Some(0));
        assert_eq!(bracket(&xs, 0.5), Some(1));
        assert_eq!(bracket(&xs, 1.0), Some(1));
        assert_eq!(bracket(&xs, 1.2), None);
        assert_eq!(bracket(&xs, -0.1), None);
    }
}

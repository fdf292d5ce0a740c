use nalgebra::Vector3;

/// Poor man's approx assertion for matrices
#[macro_export]
macro_rules! assert_approx_matrix_eq {
    ($x:expr, $y:expr, abstol = $tol:expr) => {{
        let diff = $x - $y;

        let max_absdiff = diff.abs().max();
        let approx_eq = max_absdiff <= $tol;

        if !approx_eq {
            println!("abstol: {:e}", $tol);
            println!("left: {}", $x);
            println!("right: {}", $y);
            println!("diff: {:e}", diff);
        }
        assert!(approx_eq);
    }};
}

/// Approx assertion for anything that exposes its entries through `as_slice()`, such as the
/// fixed-rank tensors.
#[macro_export]
macro_rules! assert_tensor_eq {
    ($x:expr, $y:expr, abstol = $tol:expr) => {{
        let (x, y) = (&$x, &$y);
        let (x, y): (&[f64], &[f64]) = (x.as_slice(), y.as_slice());
        assert_eq!(x.len(), y.len(), "Tensors must have the same number of entries");
        let max_absdiff = x
            .iter()
            .zip(y.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        let approx_eq = max_absdiff <= $tol;

        if !approx_eq {
            println!("abstol: {:e}", $tol);
            println!("max absdiff: {:e}", max_absdiff);
            println!("left: {:?}", x);
            println!("right: {:?}", y);
        }
        assert!(approx_eq);
    }};
}

#[macro_export]
macro_rules! assert_panics {
    ($e:expr) => {{
        use std::panic::catch_unwind;
        use std::stringify;
        let expr_string = stringify!($e);
        let result = catch_unwind(|| $e);
        if result.is_ok() {
            panic!("assert_panics!({}) failed.", expr_string);
        }
    }};
}

/// A quadrature point in reference coordinates together with its weight (`JxW`).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct QuadraturePoint {
    pub weight: f64,
    pub point: Vector3<f64>,
}

/// Trilinear hexahedron occupying the unit cube `[0, 1]^3`.
///
/// Reference and physical coordinates coincide, so shape function gradients are gradients with
/// respect to the reference position `X`. Node `a` sits at `(a & 1, (a >> 1) & 1, (a >> 2) & 1)`.
#[derive(Debug, Copy, Clone, Default)]
pub struct UnitCubeHex8;

impl UnitCubeHex8 {
    pub const NUM_NODES: usize = 8;

    pub fn node(a: usize) -> Vector3<f64> {
        assert!(a < Self::NUM_NODES);
        Vector3::new((a & 1) as f64, ((a >> 1) & 1) as f64, ((a >> 2) & 1) as f64)
    }

    fn linear_factors(a: usize, x: &Vector3<f64>) -> [(f64, f64); 3] {
        let node = Self::node(a);
        let mut factors = [(0.0, 0.0); 3];
        for (d, factor) in factors.iter_mut().enumerate() {
            // (value, derivative) of x_d or 1 - x_d
            *factor = if node[d] == 1.0 { (x[d], 1.0) } else { (1.0 - x[d], -1.0) };
        }
        factors
    }

    pub fn shape_functions(x: &Vector3<f64>) -> [f64; 8] {
        let mut values = [0.0; 8];
        for (a, value) in values.iter_mut().enumerate() {
            *value = Self::linear_factors(a, x).iter().map(|(v, _)| v).product();
        }
        values
    }

    pub fn shape_gradients(x: &Vector3<f64>) -> [Vector3<f64>; 8] {
        let mut gradients = [Vector3::zeros(); 8];
        for (a, gradient) in gradients.iter_mut().enumerate() {
            let factors = Self::linear_factors(a, x);
            for d in 0..3 {
                gradient[d] = (0..3)
                    .map(|e| if e == d { factors[e].1 } else { factors[e].0 })
                    .product();
            }
        }
        gradients
    }

    /// 2x2x2 Gauss rule on the unit cube.
    pub fn volume_quadrature() -> Vec<QuadraturePoint> {
        let points = gauss_points_01();
        let mut rule = Vec::with_capacity(8);
        for &z in &points {
            for &y in &points {
                for &x in &points {
                    rule.push(QuadraturePoint {
                        weight: 0.125,
                        point: Vector3::new(x, y, z),
                    });
                }
            }
        }
        rule
    }

    /// 2x2 Gauss rule on the face `X = 1`, whose outward reference normal is `(1, 0, 0)`.
    pub fn face_quadrature() -> Vec<QuadraturePoint> {
        let points = gauss_points_01();
        let mut rule = Vec::with_capacity(4);
        for &z in &points {
            for &y in &points {
                rule.push(QuadraturePoint {
                    weight: 0.25,
                    point: Vector3::new(1.0, y, z),
                });
            }
        }
        rule
    }

    pub fn face_normal() -> Vector3<f64> {
        Vector3::x()
    }

    /// Interpolates the gradient of a scalar nodal field at `x`.
    pub fn interpolate_gradient(nodal_values: &[f64], x: &Vector3<f64>) -> Vector3<f64> {
        assert_eq!(nodal_values.len(), Self::NUM_NODES);
        Self::shape_gradients(x)
            .iter()
            .zip(nodal_values)
            .fold(Vector3::zeros(), |acc, (g, &u)| acc + g * u)
    }

    /// Interpolates a scalar nodal field at `x`.
    pub fn interpolate(nodal_values: &[f64], x: &Vector3<f64>) -> f64 {
        assert_eq!(nodal_values.len(), Self::NUM_NODES);
        Self::shape_functions(x)
            .iter()
            .zip(nodal_values)
            .map(|(n, u)| n * u)
            .sum()
    }
}

/// Two-point Gauss abscissae mapped to `[0, 1]`.
fn gauss_points_01() -> [f64; 2] {
    let offset = 0.5 / 3.0f64.sqrt();
    [0.5 - offset, 0.5 + offset]
}

use gemicro_calculus::{approximate_gradient_fd, approximate_jacobian_fd, approximate_tensor_derivative_fd};
use gemicro_tensor::{Tensor1, Tensor2};
use matrixcompare::assert_matrix_eq;
use nalgebra::{DMatrix, DVector, DVectorView, DVectorViewMut, Vector3};

#[test]
fn approximate_gradient_fd_agrees_with_exact_gradient() {
    let f = |x: DVectorView<f64>| x[0] * x[0] + 3.0 * x[0] * x[1] + x[2].sin();
    let mut x = DVector::from_column_slice(&[1.0, -2.0, 0.5]);
    let x_before = x.clone();
    let df = approximate_gradient_fd(f, &mut x, 1e-6);

    let expected = Vector3::new(2.0 * 1.0 + 3.0 * -2.0, 3.0 * 1.0, 0.5f64.cos());
    assert_matrix_eq!(df, expected, comp = abs, tol = 1e-8);
    assert_eq!(x, x_before);
}

#[test]
fn approximate_jacobian_fd_agrees_with_exact_jacobian() {
    let f = |x: DVectorView<f64>, mut y: DVectorViewMut<f64>| {
        y[0] = x[0] * x[1];
        y[1] = x[1].exp();
    };
    let mut x = DVector::from_column_slice(&[2.0, 0.5]);
    let jacobian = approximate_jacobian_fd(2, f, &mut x, 1e-6);

    #[rustfmt::skip]
    let expected = DMatrix::from_row_slice(2, 2, &[
        0.5, 2.0,
        0.0, 0.5f64.exp()
    ]);
    assert_matrix_eq!(jacobian, expected, comp = abs, tol = 1e-8);
}

#[test]
fn tensor_derivative_uses_row_major_flattening() {
    // Y_ij = X_ij^2 / 2 + X_ji, so ∂Y_ij/∂X_kl = X_ij δ_ik δ_jl + δ_jk δ_il
    let x = Tensor2::from([[1.0, 2.0, 3.0], [-1.0, 0.5, 0.0], [0.25, 4.0, -2.0]]);
    let jacobian = approximate_tensor_derivative_fd(
        |x: &Tensor2<f64>| Tensor2::from_fn(|[i, j]| 0.5 * x[[i, j]] * x[[i, j]] + x[[j, i]]),
        &x,
        1e-6,
    );
    assert_eq!(jacobian.shape(), (9, 9));
    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                for l in 0..3 {
                    let mut expected = 0.0;
                    if i == k && j == l {
                        expected += x[[i, j]];
                    }
                    if j == k && i == l {
                        expected += 1.0;
                    }
                    let approx = jacobian[(3 * i + j, 3 * k + l)];
                    assert!((approx - expected).abs() < 1e-8, "Mismatch at [{i}, {j}, {k}, {l}]");
                }
            }
        }
    }

    let v = Tensor1::new(1.0, 2.0, 3.0);
    let d = approximate_tensor_derivative_fd(|v: &Tensor1<f64>| *v * 2.0, &v, 1e-6);
    assert_matrix_eq!(d, DMatrix::<f64>::identity(3, 3) * 2.0, comp = abs, tol = 1e-8);
}

//! Central finite-difference approximations of gradients and Jacobians.
//!
//! Used to check analytic derivatives (consistent tangents, boundary-normal derivatives) against
//! their numerical counterparts.
use gemicro_tensor::{FixedRankTensor, Real};
use nalgebra::{DMatrix, DMatrixViewMut, DVector, DVectorView, DVectorViewMut};
use numeric_literals::replace_float_literals;

/// Approximates the derivative of the function `f: R^n -> R` with finite differences.
///
/// The parameter `h` determines the step size of the finite difference approximation.
///
/// The vector `x` is mutable in order to contain intermediate computations, but upon returning,
/// its content remains unchanged.
pub fn approximate_gradient_fd<'a, T>(
    f: impl FnMut(DVectorView<T>) -> T,
    x: impl Into<DVectorViewMut<'a, T>>,
    h: T,
) -> DVector<T>
where
    T: Real,
{
    let x = x.into();
    let mut df = DVector::zeros(x.len());
    approximate_gradient_fd_into_(DVectorViewMut::from(&mut df), f, x, h);
    df
}

#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
fn approximate_gradient_fd_into_<T>(
    mut df: DVectorViewMut<T>,
    mut f: impl FnMut(DVectorView<T>) -> T,
    mut x: DVectorViewMut<T>,
    h: T,
) where
    T: Real,
{
    let n = x.len();
    assert_eq!(n, df.len());
    for i in 0..n {
        let x_i = x[i];
        x[i] = x_i + h;
        let f_plus = f(DVectorView::from(&x));
        x[i] = x_i - h;
        let f_minus = f(DVectorView::from(&x));
        df[i] = (f_plus - f_minus) / (2.0 * h);
        x[i] = x_i;
    }
}

/// Approximates the Jacobian of the function $f: \mathbb{R}^n \rightarrow \mathbb{R}^m$
/// with finite differences.
///
/// The Jacobian matrix is the $m \times n$ matrix whose entries are given by
/// $$ J_{ij} := \pd{f_i}{x_j}.$$
///
/// The parameter `h` determines the step size of the finite difference approximation.
pub fn approximate_jacobian_fd<'a, T>(
    m: usize,
    f: impl FnMut(DVectorView<T>, DVectorViewMut<T>),
    x: impl Into<DVectorViewMut<'a, T>>,
    h: T,
) -> DMatrix<T>
where
    T: Real,
{
    let x = x.into();
    let n = x.len();
    let mut jacobian = DMatrix::zeros(m, n);
    approximate_jacobian_fd_into_(DMatrixViewMut::from(&mut jacobian), f, x, h);
    jacobian
}

#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
fn approximate_jacobian_fd_into_<T>(
    mut j: DMatrixViewMut<T>,
    mut f: impl FnMut(DVectorView<T>, DVectorViewMut<T>),
    mut x: DVectorViewMut<T>,
    h: T,
) where
    T: Real,
{
    let m = j.nrows();
    let n = x.len();
    assert_eq!(n, j.ncols());

    // Buffers to hold f(x + e_i h) and f(x - e_i h)
    let mut f_plus = DVector::zeros(m);
    let mut f_minus = DVector::zeros(m);

    for i in 0..n {
        // df_dxi ~ (f(x + h e_i) - f(x - h e_i)) / (2 h)
        let xi = x[i];
        x[i] = xi + h;
        f(DVectorView::from(&x), DVectorViewMut::from(&mut f_plus));
        x[i] = xi - h;
        f(DVectorView::from(&x), DVectorViewMut::from(&mut f_minus));
        x[i] = xi;

        let mut df_dxi = j.column_mut(i);
        df_dxi.copy_from(&f_plus);
        df_dxi -= &f_minus;
        df_dxi /= 2.0 * h;
    }
}

/// Approximates the derivative of a tensor-valued function of a tensor argument.
///
/// Returns the matrix whose entry `(a, b)` is the derivative of the `a`-th row-major entry of
/// the output with respect to the `b`-th row-major entry of the input. For a rank-2 output `Y`
/// and a rank-2 input `X`, entry `(3 i + j, 3 k + l)` therefore approximates `∂Y_ij/∂X_kl`, which
/// matches the row-major flattening of the rank-4 derivative tensor `[i, j, k, l]`.
pub fn approximate_tensor_derivative_fd<T, X, Y>(mut f: impl FnMut(&X) -> Y, x: &X, h: T) -> DMatrix<T>
where
    T: Real,
    X: FixedRankTensor<T>,
    Y: FixedRankTensor<T>,
{
    let m = Y::zeros().as_slice().len();
    let mut x_flat = DVector::from_column_slice(x.as_slice());
    let mut x_work = *x;
    approximate_jacobian_fd(
        m,
        |x_flat, mut y_flat| {
            for (dst, src) in x_work.as_mut_slice().iter_mut().zip(x_flat.iter()) {
                *dst = *src;
            }
            y_flat.copy_from_slice(f(&x_work).as_slice());
        },
        &mut x_flat,
        h,
    )
}

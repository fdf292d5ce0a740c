use gemicro::kinematics::{
    compute_deformed_boundary_normal, deformation_gradient, invert_deformation_gradient, DeformedBoundaryNormal,
};
use gemicro::tensor::proptest::{deformation_gradient as deformation_gradient_strategy, rotation, unit_vector};
use gemicro::tensor::{Tensor1, Tensor2};
use gemicro::RecoverableFailure;
use gemicro_calculus::approximate_tensor_derivative_fd;
use matrixcompare::{assert_matrix_eq, assert_scalar_eq};
use nalgebra::DMatrix;
use proptest::prelude::*;
use util::assert_tensor_eq;

#[test]
fn deformation_gradient_adds_identity() {
    let grad_u = Tensor2::from([[0.1, 0.2, 0.0], [0.0, -0.1, 0.3], [0.05, 0.0, 0.0]]);
    let f = deformation_gradient(&grad_u);
    let expected = Tensor2::from([[1.1, 0.2, 0.0], [0.0, 0.9, 0.3], [0.05, 0.0, 1.0]]);
    assert_tensor_eq!(f, expected, abstol = 1e-15);
}

#[test]
fn invert_deformation_gradient_returns_inverse_and_determinant() {
    let f = Tensor2::from([[2.0, 0.0, 0.0], [0.0, 1.0, 0.5], [0.0, 0.0, 0.5]]);
    let (f_inv, j) = invert_deformation_gradient(&f).unwrap();
    assert_scalar_eq!(j, 1.0, comp = abs, tol = 1e-14);
    assert_tensor_eq!(f.matmul(&f_inv), Tensor2::identity(), abstol = 1e-14);
}

#[test]
fn invert_deformation_gradient_rejects_inverted_and_singular_elements() {
    let inverted = Tensor2::from_diagonal(&Tensor1::new(1.0, 1.0, -1.0));
    assert!(matches!(
        invert_deformation_gradient(&inverted),
        Err(RecoverableFailure::SingularDeformationGradient { .. })
    ));

    let singular = Tensor2::from_diagonal(&Tensor1::new(1.0, 0.0, 1.0));
    assert!(invert_deformation_gradient(&singular).is_err());

    let nan = Tensor2::identity() * f64::NAN;
    assert!(invert_deformation_gradient(&nan).is_err());
}

#[test]
fn deformed_boundary_normal_under_uniaxial_stretch() {
    // Stretching along X leaves the area of the face X = const unchanged, but doubles the
    // area of faces Y = const
    let f = Tensor2::from_diagonal(&Tensor1::new(2.0, 1.0, 1.0));
    let n_x = compute_deformed_boundary_normal(&Tensor1::new(1.0, 0.0, 0.0), &f).unwrap().n;
    let n_y = compute_deformed_boundary_normal(&Tensor1::new(0.0, 1.0, 0.0), &f).unwrap().n;
    assert_tensor_eq!(n_x, Tensor1::new(1.0, 0.0, 0.0), abstol = 1e-14);
    assert_tensor_eq!(n_y, Tensor1::new(0.0, 2.0, 0.0), abstol = 1e-14);
}

#[test]
fn deformed_boundary_normal_fails_for_negative_determinant() {
    let f = Tensor2::from_diagonal(&Tensor1::new(-1.0, 1.0, 1.0));
    let result = compute_deformed_boundary_normal(&Tensor1::new(1.0, 0.0, 0.0), &f);
    assert!(matches!(result, Err(RecoverableFailure::SingularDeformationGradient { .. })));
}

#[test]
fn deformed_boundary_normal_requires_undisplaced_mesh() {
    assert!(DeformedBoundaryNormal::new(true).is_err());
    let normal = DeformedBoundaryNormal::new(false).unwrap();
    let result = normal.compute(&Tensor1::new(0.0, 0.0, 1.0), &Tensor2::zeros()).unwrap();
    assert_tensor_eq!(result.n, Tensor1::new(0.0, 0.0, 1.0), abstol = 1e-15);
}

proptest! {
    #[test]
    fn deformed_boundary_normal_rotates_with_rigid_rotations(r in rotation(), normal in unit_vector()) {
        let result = compute_deformed_boundary_normal(&normal, &r).unwrap();
        assert_tensor_eq!(result.n, r.dot(&normal), abstol = 1e-12);
    }

    #[test]
    fn deformed_boundary_normal_derivative_matches_finite_differences(
        f in deformation_gradient_strategy(),
        normal in unit_vector()
    ) {
        let analytic = compute_deformed_boundary_normal(&normal, &f).unwrap().dn_df;
        let analytic = DMatrix::from_row_slice(3, 9, analytic.as_slice());
        let numeric = approximate_tensor_derivative_fd(
            |f: &Tensor2<f64>| compute_deformed_boundary_normal(&normal, f).unwrap().n,
            &f,
            1e-6,
        );
        assert_matrix_eq!(analytic, numeric, comp = abs, tol = 1e-6);
    }
}

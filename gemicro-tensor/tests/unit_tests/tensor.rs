use gemicro_tensor::proptest::deformation_gradient;
use gemicro_tensor::{flat_offset, multi_index, Tensor1, Tensor2, Tensor3, Tensor4};
use matrixcompare::{assert_matrix_eq, assert_scalar_eq};
use nalgebra::{Matrix3, Vector3};
use proptest::prelude::*;

#[test]
fn row_major_layout() {
    assert_eq!(flat_offset(&[1, 2]), 5);
    assert_eq!(flat_offset(&[2, 0, 1]), 19);
    assert_eq!(multi_index::<4>(80), [2, 2, 2, 2]);
    assert_eq!(multi_index::<3>(19), [2, 0, 1]);

    let t = Tensor2::from([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
    assert_eq!(t.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    assert_eq!(t[[1, 2]], 6.0);
}

#[test]
#[should_panic]
fn out_of_bounds_index_panics() {
    let t = Tensor2::<f64>::zeros();
    let _ = t[[0, 3]];
}

#[test]
fn from_nested_arrays_matches_from_fn() {
    let mut nested = [[[0.0; 3]; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                nested[i][j][k] = (100 * i + 10 * j + k) as f64;
            }
        }
    }
    let from_nested = Tensor3::from(nested);
    let from_fn = Tensor3::from_fn(|[i, j, k]| (100 * i + 10 * j + k) as f64);
    assert_eq!(from_nested, from_fn);

    let t4 = Tensor4::from_fn(|[i, j, k, l]| (1000 * i + 100 * j + 10 * k + l) as f64);
    assert_eq!(t4[[2, 1, 0, 2]], 2102.0);
}

#[test]
fn arithmetic() {
    let a = Tensor1::new(1.0, 2.0, 3.0);
    let b = Tensor1::new(-1.0, 0.5, 2.0);
    assert_eq!(a + b, Tensor1::new(0.0, 2.5, 5.0));
    assert_eq!(a - b, Tensor1::new(2.0, 1.5, 1.0));
    assert_eq!(-a, Tensor1::new(-1.0, -2.0, -3.0));
    assert_eq!(a * 2.0, Tensor1::new(2.0, 4.0, 6.0));
    assert_eq!(2.0 * a, a * 2.0);
    assert_eq!(a / 2.0, Tensor1::new(0.5, 1.0, 1.5));

    let mut c = a;
    c += b;
    c -= a;
    assert_eq!(c, b);
    c *= 4.0;
    c /= 2.0;
    assert_eq!(c, b * 2.0);

    assert_scalar_eq!(a.dot(&b), 6.0);
    assert_scalar_eq!(a.norm(), 14.0f64.sqrt(), comp = float);
}

#[test]
fn rank_two_operations() {
    let t = Tensor2::from([[2.0, 1.0, 0.0], [0.0, 3.0, 1.0], [1.0, 0.0, 1.0]]);
    assert_scalar_eq!(t.trace(), 6.0);
    assert_scalar_eq!(t.determinant(), 7.0, comp = abs, tol = 1e-14);
    assert_eq!(t.transpose()[[0, 2]], 1.0);
    assert_eq!(t.transpose()[[2, 0]], 0.0);

    let inverse = t.try_inverse().unwrap();
    let product = t.matmul(&inverse);
    assert_matrix_eq!(product.to_matrix(), Matrix3::identity(), comp = abs, tol = 1e-14);

    let v = Tensor1::new(1.0, -1.0, 2.0);
    assert_matrix_eq!(t.dot(&v).to_vector(), t.to_matrix() * v.to_vector(), comp = float);

    let singular = Tensor2::from([[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 0.0, 1.0]]);
    assert!(singular.try_inverse().is_none());
}

#[test]
fn nalgebra_conversions() {
    let m = Matrix3::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0);
    let t = Tensor2::from(m);
    assert_eq!(t[[0, 1]], 2.0);
    assert_eq!(t[[1, 0]], 4.0);
    assert_eq!(Matrix3::from(t), m);

    let v = Vector3::new(1.0, 2.0, 3.0);
    assert_eq!(Vector3::from(Tensor1::from(v)), v);
}

proptest! {
    #[test]
    fn inverse_agrees_with_nalgebra(f in deformation_gradient()) {
        let inverse = f.try_inverse().unwrap();
        let expected = f.to_matrix().try_inverse().unwrap();
        assert_matrix_eq!(inverse.to_matrix(), expected, comp = float);
        prop_assert!(f.determinant() > 0.0);
    }

    #[test]
    fn symmetric_part_is_symmetric(f in deformation_gradient()) {
        let s = f.symmetric_part();
        assert_matrix_eq!(s.to_matrix(), s.to_matrix().transpose(), comp = float);
        assert_scalar_eq!(s.trace(), f.trace(), comp = abs, tol = 1e-14);
    }
}

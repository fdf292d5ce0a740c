use gemicro::tensor::Tensor2;
use gemicro::voigt::{
    tensor2_from_voigt, tensor2_from_voigt_derivative, tensor2_to_voigt, tensor4_from_voigt, voigt_index,
    ShearScaling, Tensor4FromVoigtOptions, VoigtLayout, VOIGT_INDICES,
};
use matrixcompare::assert_matrix_eq;
use nalgebra::Vector6;
use util::{assert_panics, assert_tensor_eq};

#[test]
fn voigt_index_is_symmetric_and_matches_ordering() {
    for (a, &(i, j)) in VOIGT_INDICES.iter().enumerate() {
        assert_eq!(voigt_index(i, j), a);
        assert_eq!(voigt_index(j, i), a);
    }
    assert_panics!(voigt_index(3, 0));
}

#[test]
fn symmetric_tensor_to_voigt() {
    let t = Tensor2::from([[1.0, 4.0, 5.0], [4.0, 2.0, 6.0], [5.0, 6.0, 3.0]]);
    assert_matrix_eq!(
        tensor2_to_voigt(&t, ShearScaling::None),
        Vector6::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0),
        comp = abs,
        tol = 0.0
    );
    let engineering = tensor2_to_voigt(&t, ShearScaling::Engineering);
    assert_matrix_eq!(
        engineering,
        Vector6::new(1.0, 2.0, 3.0, 8.0, 10.0, 12.0),
        comp = abs,
        tol = 0.0
    );
    assert_tensor_eq!(tensor2_from_voigt(&engineering, ShearScaling::Engineering), t, abstol = 0.0);
}

#[test]
fn non_symmetric_tensor_is_symmetrized() {
    let t = Tensor2::from([[0.0, 2.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]]);
    let v = tensor2_to_voigt(&t, ShearScaling::Engineering);
    assert_matrix_eq!(v, Vector6::new(0.0, 0.0, 0.0, 2.0, 0.0, 0.0), comp = abs, tol = 0.0);
    assert_tensor_eq!(
        tensor2_from_voigt(&v, ShearScaling::Engineering),
        t.symmetric_part(),
        abstol = 0.0
    );
}

#[test]
fn voigt_derivative_keeps_shear_entries() {
    let dl_dstrain = Vector6::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
    let expected = Tensor2::from([[1.0, 4.0, 5.0], [4.0, 2.0, 6.0], [5.0, 6.0, 3.0]]);
    assert_tensor_eq!(tensor2_from_voigt_derivative(&dl_dstrain), expected, abstol = 0.0);
}

#[test]
fn rank_four_tensor_from_voigt_matrix() {
    let v: Vec<f64> = (0..36).map(|k| k as f64).collect();
    let row_major = tensor4_from_voigt(&v, VoigtLayout::RowMajor, Tensor4FromVoigtOptions::default());
    let column_major = tensor4_from_voigt(&v, VoigtLayout::ColumnMajor, Tensor4FromVoigtOptions::default());
    // (ij, kl) = (12, 33) is row 3, column 2
    assert_eq!(row_major[[0, 1, 2, 2]], 20.0);
    assert_eq!(row_major[[1, 0, 2, 2]], 20.0);
    assert_eq!(column_major[[0, 1, 2, 2]], 15.0);

    let options = Tensor4FromVoigtOptions {
        halve_off_diagonal_ij: true,
        double_off_diagonal_kl: true,
    };
    let scaled = tensor4_from_voigt(&v, VoigtLayout::RowMajor, options);
    assert_eq!(scaled[[0, 1, 2, 2]], 10.0);
    assert_eq!(scaled[[2, 2, 0, 1]], 2.0 * row_major[[2, 2, 0, 1]]);
    assert_eq!(scaled[[0, 1, 0, 1]], row_major[[0, 1, 0, 1]]);
    assert_eq!(scaled[[1, 1, 2, 2]], row_major[[1, 1, 2, 2]]);
}

#[test]
fn rank_four_tensor_requires_36_entries() {
    assert_panics!(tensor4_from_voigt(
        &[0.0; 35],
        VoigtLayout::RowMajor,
        Tensor4FromVoigtOptions::default()
    ));
}

use crate::ConfigurationError;

/// Characteristic length `(JxW · coord)^(1/dim)` of the volume associated with a quadrature point.
///
/// `coord` is the coordinate system factor of the host (1 for Cartesian coordinates).
pub fn characteristic_element_length(dim: usize, jxw: f64, coord: f64) -> Result<f64, ConfigurationError> {
    let volume = jxw * coord;
    match dim {
        1 => Ok(volume),
        2 => Ok(volume.sqrt()),
        3 => Ok(volume.cbrt()),
        _ => Err(ConfigurationError::DimensionMismatch {
            context: "characteristic element length requires dimension 1, 2 or 3".to_string(),
            expected: 3,
            actual: dim,
        }),
    }
}

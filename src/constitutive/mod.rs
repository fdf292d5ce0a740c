//! Adapters that evaluate opaque constitutive laws at quadrature points and bring their response
//! into the form consumed by the kernels.
pub mod element_length;
pub mod hypoelastic;
pub mod micropolar;

pub use element_length::characteristic_element_length;
pub use hypoelastic::*;
pub use micropolar::*;

use crate::{FixedRankTensor, Real, DIM};
use std::fmt;
use std::fmt::{Display, Formatter};

/// Highest tensor rank that can appear in a contraction pattern.
pub const MAX_RANK: usize = 4;

/// The ordered index labels of one operand (or of the output) in a contraction pattern.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Labels {
    labels: [u8; MAX_RANK],
    len: usize,
}

impl Labels {
    const EMPTY: Self = Self {
        labels: [0; MAX_RANK],
        len: 0,
    };

    const fn push(self, label: u8) -> Self {
        if self.len == MAX_RANK {
            panic!("einsum: operands and output are limited to rank 4");
        }
        if self.contains(label) {
            panic!("einsum: index label repeated within a single operand");
        }
        let mut labels = self.labels;
        labels[self.len] = label;
        Self {
            labels,
            len: self.len + 1,
        }
    }

    const fn contains(&self, label: u8) -> bool {
        let mut i = 0;
        while i < self.len {
            if self.labels[i] == label {
                return true;
            }
            i += 1;
        }
        false
    }

    pub const fn rank(&self) -> usize {
        self.len
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.labels[..self.len]
    }
}

/// A validated two-operand contraction pattern such as `"Ii,ijkK->IjkK"`.
///
/// Patterns are normally parsed in a `const` context by [`einsum!`](crate::einsum), which turns
/// every malformed pattern into a compile error.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct IndexPattern {
    lhs: Labels,
    rhs: Labels,
    output: Labels,
}

impl IndexPattern {
    /// Parses a pattern of the form `"<lhs>,<rhs>->[output]"` or `"<lhs>,<rhs>"`.
    ///
    /// Labels are ASCII letters and case-sensitive. Labels shared between the operands that do not
    /// appear in the output are summed over. Without an explicit output, the output consists of
    /// all labels occurring exactly once, in order of first appearance.
    ///
    /// # Panics
    ///
    /// Panics on malformed patterns. When evaluated in a `const` context the panic is reported as a
    /// compile error.
    pub const fn parse(pattern: &str) -> Self {
        let bytes = pattern.as_bytes();
        let mut lhs = Labels::EMPTY;
        let mut rhs = Labels::EMPTY;
        let mut output = Labels::EMPTY;
        // 0: first operand, 1: second operand, 2: output
        let mut section = 0;
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            if b == b',' {
                if section != 0 {
                    panic!("einsum: pattern must have exactly two operands");
                }
                section = 1;
            } else if b == b'-' {
                if section != 1 || i + 1 >= bytes.len() || bytes[i + 1] != b'>' {
                    panic!("einsum: expected '->' after the second operand");
                }
                section = 2;
                i += 1;
            } else if b.is_ascii_alphabetic() {
                if section == 0 {
                    lhs = lhs.push(b);
                } else if section == 1 {
                    rhs = rhs.push(b);
                } else {
                    output = output.push(b);
                }
            } else if b != b' ' {
                panic!("einsum: index labels must be ASCII letters");
            }
            i += 1;
        }

        if section == 0 {
            panic!("einsum: pattern must have exactly two operands");
        }

        if section == 2 {
            let mut k = 0;
            while k < output.len {
                let label = output.labels[k];
                if !lhs.contains(label) && !rhs.contains(label) {
                    panic!("einsum: output label does not appear in any operand");
                }
                k += 1;
            }
        } else {
            let mut k = 0;
            while k < lhs.len {
                if !rhs.contains(lhs.labels[k]) {
                    output = output.push(lhs.labels[k]);
                }
                k += 1;
            }
            k = 0;
            while k < rhs.len {
                if !lhs.contains(rhs.labels[k]) {
                    output = output.push(rhs.labels[k]);
                }
                k += 1;
            }
        }

        Self { lhs, rhs, output }
    }

    pub fn lhs(&self) -> &Labels {
        &self.lhs
    }

    pub fn rhs(&self) -> &Labels {
        &self.rhs
    }

    pub fn output(&self) -> &Labels {
        &self.output
    }
}

impl Display for IndexPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let as_str = |labels: &Labels| String::from_utf8_lossy(labels.as_slice()).into_owned();
        write!(f, "{},{}->{}", as_str(&self.lhs), as_str(&self.rhs), as_str(&self.output))
    }
}

/// Strides of each distinct label into the row-major storage of an operand.
fn label_strides(labels: &Labels, distinct: &[u8]) -> [usize; 2 * MAX_RANK] {
    let mut strides = [0; 2 * MAX_RANK];
    let rank = labels.rank();
    for (position, label) in labels.as_slice().iter().enumerate() {
        let slot = distinct
            .iter()
            .position(|l| l == label)
            .expect("Every operand label is among the distinct labels");
        strides[slot] = DIM.pow((rank - 1 - position) as u32);
    }
    strides
}

/// Evaluates the contraction described by `pattern`.
///
/// Prefer the [`einsum!`](crate::einsum) macro, which validates the pattern at compile time.
///
/// # Panics
///
/// Panics if the ranks of the operands or the output type do not match the pattern.
pub fn contract<T, A, B, C>(pattern: &IndexPattern, a: &A, b: &B) -> C
where
    T: Real,
    A: FixedRankTensor<T>,
    B: FixedRankTensor<T>,
    C: FixedRankTensor<T>,
{
    assert_eq!(pattern.lhs.rank(), A::RANK, "Rank of first operand must match pattern {}", pattern);
    assert_eq!(pattern.rhs.rank(), B::RANK, "Rank of second operand must match pattern {}", pattern);
    assert_eq!(pattern.output.rank(), C::RANK, "Rank of output must match pattern {}", pattern);

    let mut distinct = [0u8; 2 * MAX_RANK];
    let mut num_distinct = 0;
    for &label in pattern.lhs.as_slice().iter().chain(pattern.rhs.as_slice()) {
        if !distinct[..num_distinct].contains(&label) {
            distinct[num_distinct] = label;
            num_distinct += 1;
        }
    }
    let distinct = &distinct[..num_distinct];
    let a_strides = label_strides(&pattern.lhs, distinct);
    let b_strides = label_strides(&pattern.rhs, distinct);
    let c_strides = label_strides(&pattern.output, distinct);

    let mut result = C::zeros();
    {
        let (a, b, c) = (a.as_slice(), b.as_slice(), result.as_mut_slice());
        let mut values = [0usize; 2 * MAX_RANK];
        for _ in 0..DIM.pow(num_distinct as u32) {
            let (mut a_offset, mut b_offset, mut c_offset) = (0, 0, 0);
            for slot in 0..num_distinct {
                a_offset += values[slot] * a_strides[slot];
                b_offset += values[slot] * b_strides[slot];
                c_offset += values[slot] * c_strides[slot];
            }
            c[c_offset] += a[a_offset] * b[b_offset];

            // Advance the multi-index over all distinct labels
            for slot in (0..num_distinct).rev() {
                values[slot] += 1;
                if values[slot] < DIM {
                    break;
                }
                values[slot] = 0;
            }
        }
    }
    result
}

/// Contracts two fixed-rank tensors according to an index pattern checked at compile time.
///
/// ```
/// use gemicro_tensor::{einsum, Tensor2, Tensor4};
///
/// let finv = Tensor2::<f64>::identity();
/// let s = Tensor2::from([[1.0, 2.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 4.0]]);
/// let p: Tensor2<f64> = einsum!("Ii,ij->Ij", &finv, &s);
/// assert_eq!(p, s);
///
/// let d: Tensor4<f64> = einsum!("Ik,Ki->IikK", &finv, &finv);
/// assert_eq!(d[[0, 0, 0, 0]], 1.0);
/// ```
///
/// A malformed pattern does not compile:
///
/// ```compile_fail
/// use gemicro_tensor::{einsum, Tensor2};
///
/// let a = Tensor2::<f64>::identity();
/// let b: Tensor2<f64> = einsum!("ii,ij->ij", &a, &a);
/// ```
#[macro_export]
macro_rules! einsum {
    ($pattern:literal, $a:expr, $b:expr) => {{
        const PATTERN: $crate::IndexPattern = $crate::IndexPattern::parse($pattern);
        $crate::contract(&PATTERN, $a, $b)
    }};
}

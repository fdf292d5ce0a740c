use crate::Real;
use nalgebra::{Matrix3, Vector3};
use numeric_literals::replace_float_literals;
use std::ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

/// Extent of every tensor index.
pub const DIM: usize = 3;

/// Common interface of the fixed-rank tensor types, used by generic contraction code.
pub trait FixedRankTensor<T>: Copy {
    const RANK: usize;

    fn zeros() -> Self;
    fn as_slice(&self) -> &[T];
    fn as_mut_slice(&mut self) -> &mut [T];
}

/// Maps a multi-index to its offset in row-major storage.
///
/// Panics if any index is out of bounds.
#[inline]
pub fn flat_offset(index: &[usize]) -> usize {
    index.iter().fold(0, |offset, &i| {
        assert!(i < DIM, "Tensor index {} out of bounds (extent is {})", i, DIM);
        DIM * offset + i
    })
}

/// Maps a row-major offset back to its multi-index.
#[inline]
pub fn multi_index<const R: usize>(mut offset: usize) -> [usize; R] {
    let mut index = [0; R];
    for axis in (0..R).rev() {
        index[axis] = offset % DIM;
        offset /= DIM;
    }
    index
}

macro_rules! fixed_rank_tensor {
    ($(#[$attr:meta])* $name:ident, rank = $rank:literal, len = $len:literal) => {
        $(#[$attr])*
        #[derive(Copy, Clone, Debug, PartialEq)]
        pub struct $name<T> {
            data: [T; $len],
        }

        impl<T: Real> $name<T> {
            pub fn zeros() -> Self {
                Self { data: [T::zero(); $len] }
            }

            /// Constructs a tensor by evaluating `f` at every multi-index.
            pub fn from_fn(mut f: impl FnMut([usize; $rank]) -> T) -> Self {
                let mut data = [T::zero(); $len];
                for (offset, entry) in data.iter_mut().enumerate() {
                    *entry = f(multi_index::<$rank>(offset));
                }
                Self { data }
            }

            /// Constructs a tensor from entries given in row-major order.
            ///
            /// Panics if the slice does not have exactly the number of entries of the tensor.
            pub fn from_row_major_slice(entries: &[T]) -> Self {
                assert_eq!(entries.len(), $len, "Number of entries must match tensor size");
                let mut data = [T::zero(); $len];
                data.copy_from_slice(entries);
                Self { data }
            }

            pub fn as_slice(&self) -> &[T] {
                &self.data
            }

            pub fn as_mut_slice(&mut self) -> &mut [T] {
                &mut self.data
            }

            pub fn map(&self, mut f: impl FnMut(T) -> T) -> Self {
                let mut result = *self;
                result.data.iter_mut().for_each(|x| *x = f(*x));
                result
            }

            /// Full contraction with another tensor of the same rank.
            pub fn contract_all(&self, other: &Self) -> T {
                self.data
                    .iter()
                    .zip(other.data.iter())
                    .fold(T::zero(), |acc, (&a, &b)| acc + a * b)
            }

            pub fn norm_squared(&self) -> T {
                self.contract_all(self)
            }

            /// Frobenius norm.
            pub fn norm(&self) -> T {
                self.norm_squared().sqrt()
            }

            pub fn is_finite(&self) -> bool {
                self.data.iter().all(|x| x.is_finite())
            }
        }

        impl<T: Real> FixedRankTensor<T> for $name<T> {
            const RANK: usize = $rank;

            fn zeros() -> Self {
                $name::zeros()
            }

            fn as_slice(&self) -> &[T] {
                &self.data
            }

            fn as_mut_slice(&mut self) -> &mut [T] {
                &mut self.data
            }
        }

        impl<T: Real> Default for $name<T> {
            fn default() -> Self {
                Self::zeros()
            }
        }

        impl<T> Index<[usize; $rank]> for $name<T> {
            type Output = T;

            #[inline]
            fn index(&self, index: [usize; $rank]) -> &T {
                &self.data[flat_offset(&index)]
            }
        }

        impl<T> IndexMut<[usize; $rank]> for $name<T> {
            #[inline]
            fn index_mut(&mut self, index: [usize; $rank]) -> &mut T {
                &mut self.data[flat_offset(&index)]
            }
        }

        impl<T: Real> AddAssign for $name<T> {
            fn add_assign(&mut self, rhs: Self) {
                self.data.iter_mut().zip(rhs.data.iter()).for_each(|(a, &b)| *a += b);
            }
        }

        impl<T: Real> SubAssign for $name<T> {
            fn sub_assign(&mut self, rhs: Self) {
                self.data.iter_mut().zip(rhs.data.iter()).for_each(|(a, &b)| *a -= b);
            }
        }

        impl<T: Real> MulAssign<T> for $name<T> {
            fn mul_assign(&mut self, rhs: T) {
                self.data.iter_mut().for_each(|a| *a *= rhs);
            }
        }

        impl<T: Real> DivAssign<T> for $name<T> {
            fn div_assign(&mut self, rhs: T) {
                self.data.iter_mut().for_each(|a| *a /= rhs);
            }
        }

        impl<T: Real> Add for $name<T> {
            type Output = Self;

            fn add(mut self, rhs: Self) -> Self {
                self += rhs;
                self
            }
        }

        impl<T: Real> Sub for $name<T> {
            type Output = Self;

            fn sub(mut self, rhs: Self) -> Self {
                self -= rhs;
                self
            }
        }

        impl<T: Real> Mul<T> for $name<T> {
            type Output = Self;

            fn mul(mut self, rhs: T) -> Self {
                self *= rhs;
                self
            }
        }

        impl Mul<$name<f64>> for f64 {
            type Output = $name<f64>;

            fn mul(self, rhs: $name<f64>) -> $name<f64> {
                rhs * self
            }
        }

        impl<T: Real> Div<T> for $name<T> {
            type Output = Self;

            fn div(mut self, rhs: T) -> Self {
                self /= rhs;
                self
            }
        }

        impl<T: Real> Neg for $name<T> {
            type Output = Self;

            fn neg(self) -> Self {
                self.map(|x| -x)
            }
        }
    };
}

fixed_rank_tensor!(
    /// Rank-1 tensor (vector) in three dimensions.
    Tensor1, rank = 1, len = 3
);
fixed_rank_tensor!(
    /// Rank-2 tensor in three dimensions, indexed as `t[[row, column]]`.
    Tensor2, rank = 2, len = 9
);
fixed_rank_tensor!(
    /// Rank-3 tensor in three dimensions.
    Tensor3, rank = 3, len = 27
);
fixed_rank_tensor!(
    /// Rank-4 tensor in three dimensions.
    Tensor4, rank = 4, len = 81
);

impl<T: Real> Tensor1<T> {
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { data: [x, y, z] }
    }

    pub fn dot(&self, other: &Self) -> T {
        self.contract_all(other)
    }

    pub fn to_vector(&self) -> Vector3<T> {
        Vector3::from_column_slice(&self.data)
    }

    pub fn to_array(&self) -> [T; 3] {
        self.data
    }

    /// Outer product `a ⊗ b`.
    pub fn outer(&self, other: &Self) -> Tensor2<T> {
        Tensor2::from_fn(|[i, j]| self.data[i] * other.data[j])
    }
}

impl<T: Real> Tensor2<T> {
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn identity() -> Self {
        Self::from_fn(|[i, j]| if i == j { 1.0 } else { 0.0 })
    }

    pub fn from_diagonal(diagonal: &Tensor1<T>) -> Self {
        Self::from_fn(|[i, j]| if i == j { diagonal[[i]] } else { T::zero() })
    }

    pub fn to_matrix(&self) -> Matrix3<T> {
        Matrix3::from_row_slice(&self.data)
    }

    pub fn determinant(&self) -> T {
        self.to_matrix().determinant()
    }

    /// Returns the inverse, or `None` if the tensor is singular.
    pub fn try_inverse(&self) -> Option<Self> {
        self.to_matrix().try_inverse().map(Self::from)
    }

    pub fn transpose(&self) -> Self {
        Self::from_fn(|[i, j]| self[[j, i]])
    }

    pub fn trace(&self) -> T {
        self.data[0] + self.data[4] + self.data[8]
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn symmetric_part(&self) -> Self {
        (*self + self.transpose()) * 0.5
    }

    /// Matrix-vector product `t · v`.
    pub fn dot(&self, v: &Tensor1<T>) -> Tensor1<T> {
        Tensor1::from_fn(|[i]| (0..DIM).fold(T::zero(), |acc, j| acc + self[[i, j]] * v[[j]]))
    }

    /// Single contraction `a · b`.
    pub fn matmul(&self, other: &Self) -> Self {
        Self::from_fn(|[i, k]| (0..DIM).fold(T::zero(), |acc, j| acc + self[[i, j]] * other[[j, k]]))
    }
}

impl<T: Real> From<[T; 3]> for Tensor1<T> {
    fn from(data: [T; 3]) -> Self {
        Self { data }
    }
}

impl<T: Real> From<Vector3<T>> for Tensor1<T> {
    fn from(v: Vector3<T>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl<T: Real> From<Tensor1<T>> for Vector3<T> {
    fn from(t: Tensor1<T>) -> Self {
        t.to_vector()
    }
}

impl<T: Real> From<[[T; 3]; 3]> for Tensor2<T> {
    fn from(rows: [[T; 3]; 3]) -> Self {
        Self::from_fn(|[i, j]| rows[i][j])
    }
}

impl<T: Real> From<Matrix3<T>> for Tensor2<T> {
    fn from(m: Matrix3<T>) -> Self {
        Self::from_fn(|[i, j]| m[(i, j)])
    }
}

impl<T: Real> From<Tensor2<T>> for Matrix3<T> {
    fn from(t: Tensor2<T>) -> Self {
        t.to_matrix()
    }
}

impl<T: Real> From<[[[T; 3]; 3]; 3]> for Tensor3<T> {
    fn from(entries: [[[T; 3]; 3]; 3]) -> Self {
        Self::from_fn(|[i, j, k]| entries[i][j][k])
    }
}

impl<T: Real> From<[[[[T; 3]; 3]; 3]; 3]> for Tensor4<T> {
    fn from(entries: [[[[T; 3]; 3]; 3]; 3]) -> Self {
        Self::from_fn(|[i, j, k, l]| entries[i][j][k][l])
    }
}

//! Dense matrix primitives for the closed-form solvers.
//!
//! The matrices involved are tiny (a handful of features), so everything is a
//! straightforward loop over an owned [`Array2<f64>`].

use ndarray::{Array2, ArrayView2};

use crate::error::ModelError;

/// Pivots with an absolute value below this are replaced by it.
pub const PIVOT_EPSILON: f64 = 1e-10;

/// Result of [`invert`].
///
/// Inversion never fails on near-singular input: tiny pivots are clamped and
/// counted instead. Callers that prefer to reject such input use
/// [`Inverse::strict`].
#[derive(Debug, Clone, PartialEq)]
pub struct Inverse {
    /// The (possibly approximate) inverse.
    pub matrix: Array2<f64>,
    /// Number of pivots that were clamped to [`PIVOT_EPSILON`].
    pub clamped_pivots: usize,
}

impl Inverse {
    /// Whether any pivot was clamped.
    #[inline]
    pub fn is_approximated(&self) -> bool {
        self.clamped_pivots > 0
    }

    /// Return the inverse, or `SingularMatrixApproximated` if it was clamped.
    pub fn strict(self) -> Result<Array2<f64>, ModelError> {
        if self.is_approximated() {
            return Err(ModelError::SingularMatrixApproximated {
                clamped_pivots: self.clamped_pivots,
            });
        }
        Ok(self.matrix)
    }
}

/// Owned transpose of `a`.
pub fn transpose(a: ArrayView2<f64>) -> Array2<f64> {
    a.t().to_owned()
}

/// Matrix product `a · b`.
///
/// # Errors
///
/// `DimensionMismatch` if `a.ncols() != b.nrows()`.
pub fn multiply(a: ArrayView2<f64>, b: ArrayView2<f64>) -> Result<Array2<f64>, ModelError> {
    let (n, k) = a.dim();
    let (kb, m) = b.dim();
    if k != kb {
        return Err(ModelError::DimensionMismatch {
            op: "multiply",
            left: (n, k),
            right: (kb, m),
        });
    }

    let mut out = Array2::<f64>::zeros((n, m));
    for i in 0..n {
        for j in 0..m {
            let mut acc = 0.0;
            for t in 0..k {
                acc += a[[i, t]] * b[[t, j]];
            }
            out[[i, j]] = acc;
        }
    }
    Ok(out)
}

/// Gauss-Jordan inverse of a square matrix.
///
/// Rows are swapped to bring the largest remaining entry of each column onto
/// the diagonal. If that entry is still smaller than [`PIVOT_EPSILON`] in
/// absolute value it is replaced by `PIVOT_EPSILON` before dividing.
///
/// # Errors
///
/// `DimensionMismatch` if `m` is not square.
pub fn invert(m: ArrayView2<f64>) -> Result<Inverse, ModelError> {
    let (rows, cols) = m.dim();
    if rows != cols {
        return Err(ModelError::DimensionMismatch {
            op: "invert",
            left: (rows, cols),
            right: (cols, rows),
        });
    }
    let n = rows;

    let mut a = m.to_owned();
    let mut inv = Array2::<f64>::eye(n);
    let mut clamped_pivots = 0;

    for col in 0..n {
        let mut best = col;
        for row in (col + 1)..n {
            if a[[row, col]].abs() > a[[best, col]].abs() {
                best = row;
            }
        }
        if best != col {
            for j in 0..n {
                a.swap([col, j], [best, j]);
                inv.swap([col, j], [best, j]);
            }
        }

        let mut pivot = a[[col, col]];
        if pivot.abs() < PIVOT_EPSILON {
            pivot = PIVOT_EPSILON;
            a[[col, col]] = pivot;
            clamped_pivots += 1;
        }

        for j in 0..n {
            a[[col, j]] /= pivot;
            inv[[col, j]] /= pivot;
        }

        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = a[[row, col]];
            if factor == 0.0 {
                continue;
            }
            for j in 0..n {
                a[[row, j]] -= factor * a[[col, j]];
                inv[[row, j]] -= factor * inv[[col, j]];
            }
        }
    }

    if clamped_pivots > 0 {
        log::warn!("matrix inversion clamped {clamped_pivots} near-zero pivot(s) to {PIVOT_EPSILON:e}");
    }

    Ok(Inverse { matrix: inv, clamped_pivots })
}

//! Eigen decomposition adapter.
//!
//! The numerical work is done by an [`EigenSolver`]. Solvers may report
//! eigenvalues either as a plain list of real-or-complex entries or as a
//! complex column vector, and eigenvectors as `{value, vector}` pairings.
//! [`compute_with`] resolves those shapes once and hands back a uniform
//! [`EigenResult`], preserving the solver's order.

use std::cmp::Ordering;

use nalgebra::{DMatrix, DVector, Schur, SymmetricEigen};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::error::SolverError;
use crate::core::matrix::{Matrix, MatrixSize};

/// A scalar as a solver reports it: plain real, or carrying both parts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Real(f64),
    Complex(Complex64),
}

impl Scalar {
    pub fn to_complex(self) -> ComplexScalar {
        match self {
            Scalar::Real(x) => ComplexScalar::real(x),
            Scalar::Complex(z) => ComplexScalar::new(z.re, z.im),
        }
    }
}

/// Container shapes a solver may use for eigenvalues.
#[derive(Debug, Clone, PartialEq)]
pub enum EigenvalueSet {
    List(Vec<Scalar>),
    Column(DVector<Complex64>),
}

impl EigenvalueSet {
    pub fn to_vec(&self) -> Vec<Scalar> {
        match self {
            EigenvalueSet::List(values) => values.clone(),
            EigenvalueSet::Column(col) => col.iter().map(|z| Scalar::Complex(*z)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EigenPairing {
    pub value: Scalar,
    pub vector: Vec<Scalar>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolverOutput {
    pub values: EigenvalueSet,
    pub vectors: Vec<EigenPairing>,
}

pub trait EigenSolver {
    fn decompose(&self, matrix: &DMatrix<f64>) -> Result<SolverOutput, SolverError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ComplexScalar {
    pub real: f64,
    pub imag: f64,
}

impl ComplexScalar {
    pub fn new(real: f64, imag: f64) -> Self {
        ComplexScalar { real, imag }
    }

    pub fn real(real: f64) -> Self {
        ComplexScalar { real, imag: 0.0 }
    }

    pub fn magnitude(&self) -> f64 {
        self.real.hypot(self.imag)
    }

    pub fn is_real(&self, tolerance: f64) -> bool {
        self.imag.abs() < tolerance
    }

    pub fn to_c64(self) -> Complex64 {
        Complex64::new(self.real, self.imag)
    }
}

/// One eigenvector as parallel real/imaginary component lists.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Eigenvector {
    pub real: Vec<f64>,
    pub imag: Vec<f64>,
}

impl Eigenvector {
    pub fn len(&self) -> usize {
        self.real.len()
    }

    pub fn is_empty(&self) -> bool {
        self.real.is_empty()
    }

    pub fn component(&self, i: usize) -> ComplexScalar {
        ComplexScalar::new(self.real[i], self.imag[i])
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EigenResult {
    pub eigenvalues: Vec<ComplexScalar>,
    pub eigenvectors: Vec<Eigenvector>,
}

impl EigenResult {
    pub fn len(&self) -> usize {
        self.eigenvalues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eigenvalues.is_empty()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&ComplexScalar, &Eigenvector)> {
        self.eigenvalues.iter().zip(self.eigenvectors.iter())
    }

    /// ‖Av − λv‖∞ for every pair.
    pub fn residuals(&self, matrix: &Matrix) -> Vec<f64> {
        let a = matrix.as_dmatrix().map(|x| Complex64::new(x, 0.0));
        self.pairs()
            .map(|(value, vector)| {
                let v = DVector::from_iterator(
                    vector.len(),
                    (0..vector.len()).map(|i| vector.component(i).to_c64()),
                );
                let av = &a * &v;
                let lv = v * value.to_c64();
                (av - lv).iter().map(|z| z.norm()).fold(0.0, f64::max)
            })
            .collect()
    }

    /// Every pair satisfies `Av = λv` up to a tolerance scaled by ‖A‖∞.
    pub fn verified(&self, matrix: &Matrix) -> bool {
        let scale = matrix
            .as_dmatrix()
            .row_iter()
            .map(|r| r.iter().map(|x| x.abs()).sum::<f64>())
            .fold(1.0, f64::max);
        let tol = VERIFY_TOLERANCE * scale;
        self.residuals(matrix).iter().all(|r| *r <= tol)
    }
}

pub const VERIFY_TOLERANCE: f64 = 1e-6;
const PAIRING_TOLERANCE: f64 = 1e-8;
/// Eigenvalues closer than this (relative to the largest entry) are one repeated value.
const REPEAT_TOLERANCE: f64 = 1e-10;
/// Singular values below this (relative) span the null space of `A − λI`.
const NULL_TOLERANCE: f64 = 1e-8;

/// Decompose with the default [`NalgebraSolver`].
pub fn compute(matrix: &Matrix) -> Result<EigenResult, SolverError> {
    compute_with(&NalgebraSolver::default(), matrix.as_dmatrix())
}

pub fn compute_with<S: EigenSolver + ?Sized>(
    solver: &S,
    matrix: &DMatrix<f64>,
) -> Result<EigenResult, SolverError> {
    let (rows, cols) = matrix.shape();
    if rows != cols || MatrixSize::try_from(rows).is_err() {
        return Err(SolverError::Shape { rows, cols });
    }
    if let Some(idx) = matrix.iter().position(|x| !x.is_finite()) {
        // column-major storage
        return Err(SolverError::NonFinite { row: idx % rows, col: idx / rows });
    }
    let n = rows;

    let output = solver.decompose(matrix)?;
    let eigenvalues: Vec<ComplexScalar> =
        output.values.to_vec().into_iter().map(Scalar::to_complex).collect();
    if eigenvalues.len() != n {
        return Err(SolverError::MalformedOutput(format!(
            "expected {n} eigenvalues, got {}",
            eigenvalues.len()
        )));
    }
    if output.vectors.len() != n {
        return Err(SolverError::MalformedOutput(format!(
            "expected {n} eigenvectors, got {}",
            output.vectors.len()
        )));
    }

    let mut eigenvectors = Vec::with_capacity(n);
    for (i, pairing) in output.vectors.iter().enumerate() {
        if pairing.vector.len() != n {
            return Err(SolverError::MalformedOutput(format!(
                "eigenvector {} has {} components, expected {n}",
                i + 1,
                pairing.vector.len()
            )));
        }
        let paired = pairing.value.to_complex();
        let gap = (paired.to_c64() - eigenvalues[i].to_c64()).norm();
        if gap > PAIRING_TOLERANCE * eigenvalues[i].magnitude().max(1.0) {
            return Err(SolverError::MalformedOutput(format!(
                "eigenvector {} is paired with a different eigenvalue",
                i + 1
            )));
        }
        let (real, imag): (Vec<f64>, Vec<f64>) = pairing
            .vector
            .iter()
            .map(|s| {
                let c = s.to_complex();
                (c.real, c.imag)
            })
            .unzip();
        eigenvectors.push(Eigenvector { real, imag });
    }

    debug!(n, "normalized eigen decomposition");
    Ok(EigenResult { eigenvalues, eigenvectors })
}

/// Eigen solver backed by `nalgebra`.
///
/// Symmetric input goes through `SymmetricEigen` and yields a real list.
/// Anything else goes through the real Schur form; each eigenvector is the
/// right singular vector of `A − λI` with the smallest singular value.
/// Pairs come back sorted by real part, then imaginary part. Vectors have
/// unit norm and their largest component is real and positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NalgebraSolver {
    pub symmetry_tolerance: f64,
    pub eps: f64,
    /// 0 iterates until convergence.
    pub max_iterations: usize,
}

impl Default for NalgebraSolver {
    fn default() -> Self {
        Self { symmetry_tolerance: 1e-12, eps: f64::EPSILON, max_iterations: 0 }
    }
}

impl NalgebraSolver {
    fn is_symmetric(&self, m: &DMatrix<f64>) -> bool {
        let n = m.nrows();
        (0..n).all(|r| (r + 1..n).all(|c| (m[(r, c)] - m[(c, r)]).abs() <= self.symmetry_tolerance))
    }

    fn symmetric(&self, m: &DMatrix<f64>) -> Result<SolverOutput, SolverError> {
        let eig = SymmetricEigen::try_new(m.clone(), self.eps, self.max_iterations)
            .ok_or_else(|| SolverError::Decomposition("symmetric eigen solver did not converge".into()))?;

        let mut order: Vec<usize> = (0..eig.eigenvalues.len()).collect();
        order.sort_by(|&a, &b| eig.eigenvalues[a].total_cmp(&eig.eigenvalues[b]));

        let mut values = Vec::with_capacity(order.len());
        let mut vectors = Vec::with_capacity(order.len());
        for i in order {
            let lambda = eig.eigenvalues[i];
            let column: Vec<Complex64> =
                eig.eigenvectors.column(i).iter().map(|x| Complex64::new(*x, 0.0)).collect();
            let vector = normalize_phase(column).into_iter().map(|z| Scalar::Real(z.re)).collect();
            values.push(Scalar::Real(lambda));
            vectors.push(EigenPairing { value: Scalar::Real(lambda), vector });
        }
        Ok(SolverOutput { values: EigenvalueSet::List(values), vectors })
    }

    fn general(&self, m: &DMatrix<f64>) -> Result<SolverOutput, SolverError> {
        let n = m.nrows();
        let schur = Schur::try_new(m.clone(), self.eps, self.max_iterations)
            .ok_or_else(|| SolverError::Decomposition("Schur decomposition did not converge".into()))?;

        let mut lambdas: Vec<Complex64> = schur.complex_eigenvalues().iter().copied().collect();
        let scale = m.iter().map(|x| x.abs()).fold(1.0, f64::max);
        for z in lambdas.iter_mut() {
            if z.re.abs() <= 1e-12 * scale {
                z.re = 0.0;
            }
            if z.im.abs() <= 1e-12 * scale {
                z.im = 0.0;
            }
        }
        lambdas.sort_by(|a, b| match a.re.total_cmp(&b.re) {
            Ordering::Equal => a.im.total_cmp(&b.im),
            other => other,
        });

        let a = m.map(|x| Complex64::new(x, 0.0));
        let mut vectors = Vec::with_capacity(n);
        let mut start = 0;
        while start < n {
            // repeated eigenvalues share one SVD and take distinct null vectors
            let mut end = start + 1;
            while end < n && (lambdas[end] - lambdas[start]).norm() <= REPEAT_TOLERANCE * scale {
                end += 1;
            }
            let group = &lambdas[start..end];
            let center = group.iter().sum::<Complex64>() / group.len() as f64;
            for (lambda, null) in group.iter().zip(self.null_vectors(&a, center, group.len(), scale)?) {
                let vector = normalize_phase(null).into_iter().map(Scalar::Complex).collect();
                vectors.push(EigenPairing { value: Scalar::Complex(*lambda), vector });
            }
            start = end;
        }

        Ok(SolverOutput {
            values: EigenvalueSet::Column(DVector::from_vec(lambdas)),
            vectors,
        })
    }

    /// `count` right singular vectors of `A − λI`, smallest singular value
    /// first. Past the true null space (a defective eigenvalue) the best
    /// vector is repeated.
    fn null_vectors(
        &self,
        a: &DMatrix<Complex64>,
        lambda: Complex64,
        count: usize,
        scale: f64,
    ) -> Result<Vec<Vec<Complex64>>, SolverError> {
        let n = a.nrows();
        let shifted = a - DMatrix::<Complex64>::identity(n, n) * lambda;
        let svd = shifted
            .try_svd(false, true, self.eps, self.max_iterations)
            .ok_or_else(|| SolverError::Decomposition("SVD did not converge".into()))?;
        let v_t = svd
            .v_t
            .as_ref()
            .ok_or_else(|| SolverError::Decomposition("SVD returned no right singular vectors".into()))?;

        let mut order: Vec<usize> = (0..svd.singular_values.len()).collect();
        order.sort_by(|&x, &y| svd.singular_values[x].total_cmp(&svd.singular_values[y]));
        let null_dim = order
            .iter()
            .take(count)
            .take_while(|&&k| svd.singular_values[k] <= NULL_TOLERANCE * scale)
            .count()
            .max(1);
        if null_dim < count {
            warn!(%lambda, multiplicity = count, null_dim, "defective eigenvalue");
        }

        Ok((0..count)
            .map(|j| {
                let k = order[j.min(null_dim - 1)];
                v_t.row(k).iter().map(|z| z.conj()).collect()
            })
            .collect())
    }
}

impl EigenSolver for NalgebraSolver {
    fn decompose(&self, matrix: &DMatrix<f64>) -> Result<SolverOutput, SolverError> {
        let symmetric = self.is_symmetric(matrix);
        debug!(n = matrix.nrows(), symmetric, "decomposing matrix");
        if symmetric {
            self.symmetric(matrix)
        } else {
            self.general(matrix)
        }
    }
}

/// Unit norm, largest component rotated onto the positive real axis.
fn normalize_phase(mut v: Vec<Complex64>) -> Vec<Complex64> {
    let norm = v.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt();
    if norm == 0.0 {
        warn!("solver produced a zero eigenvector");
        return v;
    }
    let pivot = v
        .iter()
        .copied()
        .max_by(|a, b| a.norm().total_cmp(&b.norm()))
        .unwrap_or(Complex64::new(1.0, 0.0));
    let phase = pivot.conj() / pivot.norm();
    for z in v.iter_mut() {
        *z = *z * phase / norm;
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(SolverOutput);

    impl EigenSolver for Fixed {
        fn decompose(&self, _: &DMatrix<f64>) -> Result<SolverOutput, SolverError> {
            Ok(self.0.clone())
        }
    }

    fn dm(rows: &[&[f64]]) -> DMatrix<f64> {
        DMatrix::from_fn(rows.len(), rows[0].len(), |r, c| rows[r][c])
    }

    #[test]
    fn list_with_mixed_entries_is_normalized_in_order() {
        let out = SolverOutput {
            values: EigenvalueSet::List(vec![
                Scalar::Real(3.0),
                Scalar::Complex(Complex64::new(1.0, -2.0)),
            ]),
            vectors: vec![
                EigenPairing { value: Scalar::Real(3.0), vector: vec![Scalar::Real(1.0), Scalar::Real(0.0)] },
                EigenPairing {
                    value: Scalar::Complex(Complex64::new(1.0, -2.0)),
                    vector: vec![Scalar::Complex(Complex64::new(0.5, 0.5)), Scalar::Real(2.0)],
                },
            ],
        };
        let res = compute_with(&Fixed(out), &DMatrix::zeros(2, 2)).unwrap();
        assert_eq!(res.eigenvalues, vec![ComplexScalar::real(3.0), ComplexScalar::new(1.0, -2.0)]);
        assert_eq!(res.eigenvectors[1].real, vec![0.5, 2.0]);
        assert_eq!(res.eigenvectors[1].imag, vec![0.5, 0.0]);
    }

    #[test]
    fn column_container_is_flattened() {
        let out = SolverOutput {
            values: EigenvalueSet::Column(DVector::from_vec(vec![
                Complex64::new(2.0, 0.0),
                Complex64::new(-1.0, 0.0),
            ])),
            vectors: vec![
                EigenPairing { value: Scalar::Real(2.0), vector: vec![Scalar::Real(1.0), Scalar::Real(0.0)] },
                EigenPairing { value: Scalar::Real(-1.0), vector: vec![Scalar::Real(0.0), Scalar::Real(1.0)] },
            ],
        };
        let res = compute_with(&Fixed(out), &DMatrix::zeros(2, 2)).unwrap();
        assert_eq!(res.eigenvalues[0], ComplexScalar::real(2.0));
        assert_eq!(res.eigenvalues[1], ComplexScalar::real(-1.0));
    }

    #[test]
    fn malformed_output_is_rejected() {
        let short = SolverOutput { values: EigenvalueSet::List(vec![Scalar::Real(1.0)]), vectors: vec![] };
        let err = compute_with(&Fixed(short), &DMatrix::zeros(2, 2)).unwrap_err();
        assert!(matches!(err, SolverError::MalformedOutput(_)));

        let mispaired = SolverOutput {
            values: EigenvalueSet::List(vec![Scalar::Real(1.0), Scalar::Real(2.0)]),
            vectors: vec![
                EigenPairing { value: Scalar::Real(2.0), vector: vec![Scalar::Real(1.0), Scalar::Real(0.0)] },
                EigenPairing { value: Scalar::Real(1.0), vector: vec![Scalar::Real(0.0), Scalar::Real(1.0)] },
            ],
        };
        assert!(compute_with(&Fixed(mispaired), &DMatrix::zeros(2, 2)).is_err());
    }

    #[test]
    fn rejects_bad_input_before_solving() {
        let solver = NalgebraSolver::default();
        assert_eq!(
            compute_with(&solver, &DMatrix::zeros(2, 3)).unwrap_err(),
            SolverError::Shape { rows: 2, cols: 3 }
        );
        assert!(compute_with(&solver, &DMatrix::zeros(0, 0)).is_err());
        assert!(compute_with(&solver, &DMatrix::zeros(5, 5)).is_err());
        let mut m = DMatrix::zeros(3, 3);
        m[(1, 2)] = f64::NAN;
        assert_eq!(compute_with(&solver, &m).unwrap_err(), SolverError::NonFinite { row: 1, col: 2 });
    }

    #[test]
    fn nonsymmetric_two_by_two() {
        let out = NalgebraSolver::default().decompose(&dm(&[&[4.0, 2.0], &[1.0, 3.0]])).unwrap();
        assert!(matches!(out.values, EigenvalueSet::Column(_)));
        let values = out.values.to_vec();
        let re: Vec<f64> = values.iter().map(|s| s.to_complex().real).collect();
        assert!((re[0] - 2.0).abs() < 1e-9);
        assert!((re[1] - 5.0).abs() < 1e-9);
    }

    #[test]
    fn rotation_has_conjugate_pair() {
        let m = Matrix::from_rows(&[vec![0.0, -1.0], vec![1.0, 0.0]]).unwrap();
        let res = compute(&m).unwrap();
        let mut imags: Vec<f64> = res.eigenvalues.iter().map(|z| z.imag).collect();
        imags.sort_by(f64::total_cmp);
        assert!((imags[0] + 1.0).abs() < 1e-9);
        assert!((imags[1] - 1.0).abs() < 1e-9);
        assert!(res.eigenvalues.iter().all(|z| z.real.abs() < 1e-9));
        assert!(res.verified(&m));
    }

    #[test]
    fn zero_matrix_decomposes() {
        let m = Matrix::zeros(MatrixSize::Three);
        let res = compute(&m).unwrap();
        assert_eq!(res.len(), 3);
        assert!(res.eigenvalues.iter().all(|z| z.magnitude() < 1e-12));
        assert!(res.verified(&m));
    }

    #[test]
    fn vectors_are_unit_and_phase_fixed() {
        let v = normalize_phase(vec![Complex64::new(0.0, 3.0), Complex64::new(0.0, -4.0)]);
        let norm: f64 = v.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
        assert!((v[1].re - 0.8).abs() < 1e-12 && v[1].im.abs() < 1e-12);
        assert!((v[0].re + 0.6).abs() < 1e-12);
    }

    /// |⟨u, v⟩| for two unit eigenvectors; 1 means parallel.
    fn overlap(u: &Eigenvector, v: &Eigenvector) -> f64 {
        (0..u.len())
            .map(|i| u.component(i).to_c64().conj() * v.component(i).to_c64())
            .sum::<Complex64>()
            .norm()
    }

    #[test]
    fn repeated_eigenvalue_gets_independent_vectors() {
        let m = Matrix::parse("2,0,1;0,2,0;0,0,3").unwrap();
        let res = compute(&m).unwrap();
        let re: Vec<f64> = res.eigenvalues.iter().map(|z| z.real).collect();
        assert!((re[0] - 2.0).abs() < 1e-12 && (re[1] - 2.0).abs() < 1e-12, "{re:?}");
        assert!(overlap(&res.eigenvectors[0], &res.eigenvectors[1]) < 1e-9);
        assert!(res.verified(&m));
    }

    #[test]
    fn defective_eigenvalue_repeats_its_only_vector() {
        let m = Matrix::parse("1,1;0,1").unwrap();
        let res = compute(&m).unwrap();
        assert_eq!(res.len(), 2);
        assert!((overlap(&res.eigenvectors[0], &res.eigenvectors[1]) - 1.0).abs() < 1e-6);
        assert!(res.verified(&m));
    }
}

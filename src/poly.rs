use crate::error::AlgebraicError;
use ark_ff::Field;
use ark_std::vec::Vec;
use core::ops::{Add, Mul, Sub};

/// A univariate polynomial over `F`, stored as coefficients in increasing
/// degree order.
///
/// Trailing zero coefficients are allowed and preserved; arithmetic pads the
/// shorter operand and comparisons ignore them.
#[derive(Clone, Debug, Default)]
pub struct FieldPolynomial<F: Field> {
    coeffs: Vec<F>,
}

impl<F: Field> FieldPolynomial<F> {
    pub fn from_coefficients(coeffs: Vec<F>) -> Self {
        Self { coeffs }
    }

    pub fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    pub fn constant(c: F) -> Self {
        Self { coeffs: vec![c] }
    }

    pub fn coeffs(&self) -> &[F] {
        &self.coeffs
    }

    pub fn into_coeffs(self) -> Vec<F> {
        self.coeffs
    }

    /// Number of stored coefficients, trailing zeros included.
    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Coefficient of `x^i`, zero past the stored length.
    pub fn coeff(&self, i: usize) -> F {
        self.coeffs.get(i).copied().unwrap_or_else(F::zero)
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|c| c.is_zero())
    }

    /// Degree of the polynomial with trailing zeros removed; the zero
    /// polynomial reports 0.
    pub fn degree(&self) -> usize {
        self.significant().len().saturating_sub(1)
    }

    pub fn trimmed(mut self) -> Self {
        let n = self.significant().len();
        self.coeffs.truncate(n);
        self
    }

    fn significant(&self) -> &[F] {
        let end = self
            .coeffs
            .iter()
            .rposition(|c| !c.is_zero())
            .map_or(0, |i| i + 1);
        &self.coeffs[..end]
    }

    pub fn add(&self, other: &Self) -> Self {
        let mut coeffs = vec![F::zero(); self.len().max(other.len())];
        for (r, a) in coeffs.iter_mut().zip(&self.coeffs) {
            *r += a;
        }
        for (r, b) in coeffs.iter_mut().zip(&other.coeffs) {
            *r += b;
        }
        Self { coeffs }
    }

    pub fn sub(&self, other: &Self) -> Self {
        let mut coeffs = vec![F::zero(); self.len().max(other.len())];
        for (r, a) in coeffs.iter_mut().zip(&self.coeffs) {
            *r += a;
        }
        for (r, b) in coeffs.iter_mut().zip(&other.coeffs) {
            *r -= b;
        }
        Self { coeffs }
    }

    /// Convolution of the two coefficient vectors; the result has
    /// `|a| + |b| - 1` coefficients.
    pub fn mul(&self, other: &Self) -> Self {
        if self.is_empty() || other.is_empty() {
            return Self::zero();
        }
        let mut coeffs = vec![F::zero(); self.len() + other.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in other.coeffs.iter().enumerate() {
                coeffs[i + j] += *a * b;
            }
        }
        Self { coeffs }
    }

    pub fn scale(&self, c: &F) -> Self {
        Self {
            coeffs: self.coeffs.iter().map(|a| *a * c).collect(),
        }
    }

    /// Schoolbook long division, eliminating the highest-degree term first.
    ///
    /// Returns `(quotient, remainder)` with `self = quotient * divisor +
    /// remainder` and `deg(remainder) < deg(divisor)`.
    pub fn divide(&self, divisor: &Self) -> Result<(Self, Self), AlgebraicError> {
        let divisor = divisor.significant();
        let lead = divisor.last().ok_or(AlgebraicError::DivisionByZero)?;
        let lead_inverse = lead.inverse().ok_or(AlgebraicError::ZeroInverse)?;

        let mut remainder = self.coeffs.clone();
        if remainder.len() < divisor.len() {
            return Ok((Self::zero(), Self { coeffs: remainder }));
        }

        let mut quotient = vec![F::zero(); remainder.len() - divisor.len() + 1];
        for pos in (0..quotient.len()).rev() {
            let q = remainder[pos + divisor.len() - 1] * lead_inverse;
            if q.is_zero() {
                continue;
            }
            quotient[pos] = q;
            for (r, d) in remainder[pos..].iter_mut().zip(divisor) {
                *r -= q * d;
            }
        }
        remainder.truncate(divisor.len() - 1);

        Ok((Self { coeffs: quotient }, Self { coeffs: remainder }))
    }

    pub fn evaluate(&self, x: &F) -> F {
        let mut acc = F::zero();
        let mut power = F::one();
        for c in &self.coeffs {
            acc += power * c;
            power *= x;
        }
        acc
    }

    /// `∏_{i=1}^{n} (x - i)`.
    pub fn vanishing(n: usize) -> Self {
        let mut z = Self::constant(F::one());
        for i in 1..=n {
            z = z.mul(&Self {
                coeffs: vec![-F::from(i as u64), F::one()],
            });
        }
        z
    }

    /// Lagrange interpolation through `(i, values[i - 1])` for `i = 1..=n`.
    ///
    /// The result always has exactly `n` coefficients.
    pub fn interpolate(values: &[F]) -> Result<Self, AlgebraicError> {
        let n = values.len();
        let mut coeffs = vec![F::zero(); n];
        if values.iter().all(|v| v.is_zero()) {
            return Ok(Self { coeffs });
        }

        let z = Self::vanishing(n);
        for (idx, v) in values.iter().enumerate() {
            if v.is_zero() {
                continue;
            }
            let point = F::from((idx + 1) as u64);
            // z(x) / (x - i) vanishes on every point but i.
            let basis = z.divide_by_root(&point);
            let denominator = basis.evaluate(&point);
            let scale = *v * denominator.inverse().ok_or(AlgebraicError::ZeroInverse)?;
            for (c, b) in coeffs.iter_mut().zip(&basis.coeffs) {
                *c += scale * b;
            }
        }
        Ok(Self { coeffs })
    }

    /// Exact division by `(x - root)`, assuming `root` is a root of `self`.
    fn divide_by_root(&self, root: &F) -> Self {
        let n = self.len();
        if n < 2 {
            return Self::zero();
        }
        let mut coeffs = vec![F::zero(); n - 1];
        coeffs[n - 2] = self.coeffs[n - 1];
        for k in (1..n - 1).rev() {
            coeffs[k - 1] = self.coeffs[k] + *root * coeffs[k];
        }
        Self { coeffs }
    }
}

impl<F: Field> PartialEq for FieldPolynomial<F> {
    fn eq(&self, other: &Self) -> bool {
        self.significant() == other.significant()
    }
}

impl<F: Field> Eq for FieldPolynomial<F> {}

impl<'a, F: Field> Add<&'a FieldPolynomial<F>> for &'a FieldPolynomial<F> {
    type Output = FieldPolynomial<F>;

    fn add(self, other: &'a FieldPolynomial<F>) -> FieldPolynomial<F> {
        FieldPolynomial::add(self, other)
    }
}

impl<'a, F: Field> Sub<&'a FieldPolynomial<F>> for &'a FieldPolynomial<F> {
    type Output = FieldPolynomial<F>;

    fn sub(self, other: &'a FieldPolynomial<F>) -> FieldPolynomial<F> {
        FieldPolynomial::sub(self, other)
    }
}

impl<'a, F: Field> Mul<&'a FieldPolynomial<F>> for &'a FieldPolynomial<F> {
    type Output = FieldPolynomial<F>;

    fn mul(self, other: &'a FieldPolynomial<F>) -> FieldPolynomial<F> {
        FieldPolynomial::mul(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Fr;
    use ark_ff::{One, Zero};
    use ark_std::{test_rng, UniformRand};

    fn poly(coeffs: &[i64]) -> FieldPolynomial<Fr> {
        FieldPolynomial::from_coefficients(
            coeffs
                .iter()
                .map(|&c| {
                    if c < 0 {
                        -Fr::from(c.unsigned_abs())
                    } else {
                        Fr::from(c as u64)
                    }
                })
                .collect(),
        )
    }

    #[test]
    fn add_and_sub_pad_the_shorter_operand() {
        let a = poly(&[1, 2, 3]);
        let b = poly(&[4, 5]);
        assert_eq!(&a + &b, poly(&[5, 7, 3]));
        assert_eq!(&b - &a, poly(&[3, 3, -3]));
        assert_eq!((&a + &b).len(), 3);
    }

    #[test]
    fn mul_is_a_convolution() {
        // (1 + x)(1 - x) = 1 - x^2
        let p = &poly(&[1, 1]) * &poly(&[1, -1]);
        assert_eq!(p, poly(&[1, 0, -1]));
        assert_eq!(p.len(), 3);
        assert!((&poly(&[]) * &poly(&[1, 2])).is_zero());
    }

    #[test]
    fn divide_returns_quotient_and_remainder() {
        // x^3 + 2x + 5 = (x^2 + x + 3)(x - 1) + 8
        let (q, r) = poly(&[5, 2, 0, 1]).divide(&poly(&[-1, 1])).unwrap();
        assert_eq!(q, poly(&[3, 1, 1]));
        assert_eq!(r, poly(&[8]));
    }

    #[test]
    fn divide_ignores_trailing_zeros_of_divisor() {
        let (q, r) = poly(&[-1, 0, 1]).divide(&poly(&[1, 1, 0, 0])).unwrap();
        assert_eq!(q, poly(&[-1, 1]));
        assert!(r.is_zero());
    }

    #[test]
    fn divide_by_higher_degree_leaves_dividend_as_remainder() {
        let (q, r) = poly(&[7, 1]).divide(&poly(&[1, 2, 3])).unwrap();
        assert!(q.is_zero());
        assert_eq!(r, poly(&[7, 1]));
    }

    #[test]
    fn divide_by_zero_polynomial_fails() {
        assert_eq!(
            poly(&[1, 2]).divide(&poly(&[0, 0])),
            Err(AlgebraicError::DivisionByZero)
        );
        assert_eq!(
            poly(&[1, 2]).divide(&FieldPolynomial::zero()),
            Err(AlgebraicError::DivisionByZero)
        );
    }

    #[test]
    fn vanishing_polynomial_has_roots_one_to_n() {
        let z = FieldPolynomial::<Fr>::vanishing(4);
        assert_eq!(z.degree(), 4);
        for i in 1..=4u64 {
            assert!(z.evaluate(&Fr::from(i)).is_zero());
        }
        assert!(!z.evaluate(&Fr::from(5u64)).is_zero());
        assert_eq!(FieldPolynomial::<Fr>::vanishing(1), poly(&[-1, 1]));
    }

    #[test]
    fn interpolate_hits_every_point() {
        let mut rng = test_rng();
        let values = (0..6).map(|_| Fr::rand(&mut rng)).collect::<Vec<_>>();
        let p = FieldPolynomial::interpolate(&values).unwrap();
        assert_eq!(p.len(), values.len());
        for (i, v) in values.iter().enumerate() {
            assert_eq!(p.evaluate(&Fr::from((i + 1) as u64)), *v);
        }
    }

    #[test]
    fn interpolate_known_column() {
        // Through (1, 0), (2, 0), (3, 1): (x - 1)(x - 2) / 2
        let p = FieldPolynomial::interpolate(&[Fr::zero(), Fr::zero(), Fr::one()]).unwrap();
        let half = Fr::from(2u64).inverse().unwrap();
        assert_eq!(
            p,
            FieldPolynomial::from_coefficients(vec![Fr::one(), -Fr::from(3u64) * half, half])
        );
        assert_eq!(FieldPolynomial::<Fr>::interpolate(&[]).unwrap().len(), 0);
    }

    #[test]
    fn equality_ignores_trailing_zeros() {
        assert_eq!(poly(&[1, 2, 0, 0]), poly(&[1, 2]));
        assert_eq!(poly(&[1, 2, 0, 0]).degree(), 1);
        assert_eq!(poly(&[0, 0]), FieldPolynomial::zero());
        assert_eq!(poly(&[1, 2, 0]).trimmed().len(), 2);
    }
}

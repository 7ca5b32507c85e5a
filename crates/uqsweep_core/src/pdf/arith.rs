//! Arithmetic on independent random variables
//!
//! Sums and differences use a discretized convolution; products and
//! quotients use the change-of-variables integral, summing the density of
//! one operand over the support of the other. Every result re-enters the
//! normal [`Pdf::new`] path so resampling and truncation apply uniformly.
//!
//! Operands are treated as independent. Adding a PDF to itself therefore
//! yields the sum of two i.i.d. copies, not a doubling.

use std::ops::{Add, Sub};

use crate::error::PdfError;
use crate::numeric::{linspace, linspace_open};
use crate::pdf::Pdf;

impl Pdf {
    /// Density of `-X`
    #[must_use]
    pub fn neg(&self) -> Self {
        if self.is_point_mass() {
            return Self::point_mass(-self.x[0], self.config);
        }
        let n = self.x.len();
        let x: Vec<f64> = self.x.iter().rev().map(|v| -v).collect();
        let y: Vec<f64> = self.y.iter().rev().copied().collect();
        let cdfy: Vec<f64> = (0..n).map(|i| 1.0 - self.cdfy[n - 1 - i]).collect();
        Self {
            x,
            y,
            cdfy,
            mean: -self.mean,
            dev: self.dev,
            config: self.config,
        }
    }

    /// Density of `X + c`
    #[must_use]
    pub fn shift(&self, c: f64) -> Self {
        let mut out = self.clone();
        for v in &mut out.x {
            *v += c;
        }
        out.mean += c;
        out
    }

    /// Density of `c * X`; scaling by zero is rejected
    pub fn scale(&self, c: f64) -> Result<Self, PdfError> {
        if c == 0.0 {
            return Err(PdfError::MultiplyByZero);
        }
        if self.is_point_mass() {
            return Ok(Self::point_mass(c * self.x[0], self.config));
        }
        let flipped = if c < 0.0 { self.neg() } else { self.clone() };
        let m = c.abs();
        let x: Vec<f64> = flipped.x.iter().map(|v| v * m).collect();
        let y: Vec<f64> = flipped.y.iter().map(|v| v / m).collect();
        Ok(Self {
            x,
            y,
            cdfy: flipped.cdfy,
            mean: flipped.mean * m,
            dev: flipped.dev * m,
            config: self.config,
        })
    }

    /// Density of `X / c`
    pub fn scalar_div(&self, c: f64) -> Result<Self, PdfError> {
        if c == 0.0 {
            return Err(PdfError::DivideByZero);
        }
        self.scale(1.0 / c)
    }

    /// Density of `X + Y` for independent X, Y
    pub fn try_add(&self, b: &Self) -> Result<Self, PdfError> {
        if b.is_point_mass() {
            return Ok(self.shift(b.x[0]));
        }
        if self.is_point_mass() {
            return Ok(b.shift(self.x[0]));
        }

        // Sample the wider-support operand on the full grid
        let (a, b) = if self.x[self.x.len() - 1] - self.x[0] < b.x[b.x.len() - 1] - b.x[0] {
            (b, self)
        } else {
            (self, b)
        };
        let (a0, a1) = a.range();
        let (b0, b1) = b.range();
        let ar = a1 - a0;
        let br = b1 - b0;

        let nsamp = self.config.numpart.max(2);
        let dx = ar / (nsamp - 1) as f64;
        let blen = ((br / dx).ceil() as usize).max(1);
        let cx = linspace(0.0, ar, nsamp);

        let av: Vec<f64> = cx.iter().map(|&v| a.pdf(v + a0)).collect();
        let bv: Vec<f64> = cx[..blen].iter().map(|&v| b.pdf(v + b0)).collect();

        // Full discrete convolution
        let clen = av.len() + bv.len() - 1;
        let mut cy = vec![0.0; clen];
        for (i, &ai) in av.iter().enumerate() {
            for (j, &bj) in bv.iter().enumerate() {
                cy[i + j] += ai * bj;
            }
        }
        let out_x = linspace_open(a0 + b0, a1 + b1, clen);
        Self::new(out_x, cy, self.config)
    }

    /// Density of `X - Y` for independent X, Y
    pub fn try_sub(&self, b: &Self) -> Result<Self, PdfError> {
        self.try_add(&b.neg())
    }

    /// Density of `X * Y` for independent X, Y
    pub fn try_mul(&self, b: &Self) -> Result<Self, PdfError> {
        if b.is_point_mass() {
            return self.scale(b.x[0]);
        }
        if self.is_point_mass() {
            return b.scale(self.x[0]);
        }

        // If the second support crosses zero, integrate over the first
        let (a, b) = if b.x[0] < 0.0 && b.x[b.x.len() - 1] > 0.0 {
            (b, self)
        } else {
            (self, b)
        };
        let (a0, a1) = a.range();
        let (b0, b1) = b.range();
        let extremes = [a0 * b0, a0 * b1, a1 * b0, a1 * b1];
        let zmin = extremes.iter().copied().fold(f64::INFINITY, f64::min);
        let zmax = extremes.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        // A product range crossing zero must not be evaluated at zero
        let skip_zero = zmin * zmax <= 0.0;
        let cx = linspace(zmin, zmax, self.config.numpart.max(2));
        let mut cy = vec![0.0; cx.len()];
        for (&bx, &by) in b.x.iter().zip(&b.y) {
            if skip_zero && bx == 0.0 {
                continue;
            }
            for (out, &z) in cy.iter_mut().zip(&cx) {
                *out += (a.pdf(z / bx) / bx).abs() * by;
            }
        }
        Self::new(cx, cy, self.config)
    }

    /// Density of `X / Y` for independent X, Y
    ///
    /// Fails with [`PdfError::DivisorSpansZero`] when the divisor's
    /// support includes zero.
    pub fn try_div(&self, b: &Self) -> Result<Self, PdfError> {
        if b.is_point_mass() {
            return self.scalar_div(b.x[0]);
        }
        if b.x[0] * b.x[b.x.len() - 1] <= 0.0 {
            return Err(PdfError::DivisorSpansZero);
        }
        if self.is_point_mass() {
            return b.try_recip()?.scale(self.x[0]);
        }

        let (a0, a1) = self.range();
        let (b0, b1) = b.range();
        let extremes = [a0 / b0, a0 / b1, a1 / b0, a1 / b1];
        let zmin = extremes.iter().copied().fold(f64::INFINITY, f64::min);
        let zmax = extremes.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let cx = linspace(zmin, zmax, self.config.numpart.max(2));
        let mut cy = vec![0.0; cx.len()];
        for (&bx, &by) in b.x.iter().zip(&b.y) {
            for (out, &z) in cy.iter_mut().zip(&cx) {
                *out += (self.pdf(bx * z) * bx).abs() * by;
            }
        }
        Self::new(cx, cy, self.config)
    }

    /// Density of `1 / X`
    ///
    /// Fails when the support includes zero.
    pub fn try_recip(&self) -> Result<Self, PdfError> {
        if self.x[0] * self.x[self.x.len() - 1] <= 0.0 {
            return Err(PdfError::DivisorSpansZero);
        }
        if self.is_point_mass() {
            return Ok(Self::point_mass(1.0 / self.x[0], self.config));
        }
        let (x0, x1) = self.range();
        let zmin = (1.0 / x0).min(1.0 / x1);
        let zmax = (1.0 / x0).max(1.0 / x1);
        let cx = linspace(zmin, zmax, self.config.numpart.max(2));
        let cy: Vec<f64> = cx.iter().map(|&z| self.pdf(1.0 / z) / (z * z)).collect();
        Self::new(cx, cy, self.config)
    }
}

impl Add for &Pdf {
    type Output = Result<Pdf, PdfError>;

    fn add(self, rhs: &Pdf) -> Self::Output {
        self.try_add(rhs)
    }
}

impl Sub for &Pdf {
    type Output = Result<Pdf, PdfError>;

    fn sub(self, rhs: &Pdf) -> Self::Output {
        self.try_sub(rhs)
    }
}

impl Add<f64> for &Pdf {
    type Output = Pdf;

    fn add(self, rhs: f64) -> Pdf {
        self.shift(rhs)
    }
}

impl Sub<f64> for &Pdf {
    type Output = Pdf;

    fn sub(self, rhs: f64) -> Pdf {
        self.shift(-rhs)
    }
}

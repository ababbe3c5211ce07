//! Complex IQ sample type and buffers

/// Complex number representation for IQ data
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Complex {
    pub real: f64,
    pub imag: f64,
}

impl Complex {
    pub fn new(real: f64, imag: f64) -> Self {
        Self { real, imag }
    }

    pub fn magnitude(&self) -> f64 {
        self.norm_sqr().sqrt()
    }

    /// Squared magnitude, |z|^2
    pub fn norm_sqr(&self) -> f64 {
        self.real * self.real + self.imag * self.imag
    }

    pub fn phase(&self) -> f64 {
        self.imag.atan2(self.real)
    }
}

impl std::ops::Mul<f64> for Complex {
    type Output = Complex;

    fn mul(self, rhs: f64) -> Self::Output {
        Complex::new(self.real * rhs, self.imag * rhs)
    }
}

impl std::ops::Add for Complex {
    type Output = Complex;

    fn add(self, rhs: Complex) -> Self::Output {
        Complex::new(self.real + rhs.real, self.imag + rhs.imag)
    }
}

/// Type alias for complex sample buffers (IQ data)
pub type ComplexBuffer = Vec<Complex>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complex_operations() {
        let c = Complex::new(3.0, 4.0);
        assert_eq!(c.magnitude(), 5.0);
        assert_eq!(c.norm_sqr(), 25.0);
        assert!((c.phase() - 0.9272952180016122).abs() < 1e-10);
    }

    #[test]
    fn test_complex_scale_and_add() {
        let c = Complex::new(1.0, -1.0) * 2.0;
        assert_eq!(c, Complex::new(2.0, -2.0));
        assert_eq!(c + Complex::new(-2.0, 2.0), Complex::default());
    }
}

use crate::errors::SGError;

use super::base::{BasisFunction, BasisKernel};

///
/// Piecewise polynomial basis. Levels 1 and 2 use the flip-up hat; deeper
/// levels replace the hat body with the quadratic through
/// `(xp - 1/m, xp, xp + 1/m)`. Both have linear "wings" on the first and last
/// node of a level, which extrapolate to the domain boundary.
///
/// Pairs are stored as raw `(level, index)`; only level 1 is folded onto the
/// `(0, 0)` sentinel.
///
#[derive(Copy, Clone, Debug, Default)]
pub struct PolynomialBasis;

#[inline]
pub fn index_to_coordinate(i: u32, j: u32) -> f64
{
    if i == 1
    {
        return 0.5;
    }
    (j as f64 - 1.0) / 2.0_f64.powi(i as i32)
}

#[inline]
fn flip_up(x: f64, i: u32, j: u32) -> f64
{
    if i == 1
    {
        return 1.0;
    }
    let m = 2.0_f64.powi(i as i32);
    let invm = 1.0 / m;
    let xp = index_to_coordinate(i, j);

    if x <= invm && xp == invm
    {
        -m * x + 2.0
    }
    else if x >= 1.0 - invm && xp == 1.0 - invm
    {
        m * x + (2.0 - m)
    }
    else if f64::abs(x - xp) >= invm
    {
        0.0
    }
    else
    {
        1.0 - m * f64::abs(x - xp)
    }
}

impl BasisKernel for PolynomialBasis
{
    #[inline]
    fn weight(x: f64, i: u32, j: u32) -> f64 {
        if i == 0
        {
            return 1.0;
        }
        if i < 3
        {
            return flip_up(x, i, j);
        }
        let m = 2.0_f64.powi(i as i32);
        let invm = 1.0 / m;
        let xp = index_to_coordinate(i, j);

        if x <= invm && xp == invm
        {
            -m * x + 2.0
        }
        else if x >= 1.0 - invm && xp == 1.0 - invm
        {
            m * x + (2.0 - m)
        }
        else
        {
            let x1 = xp - invm;
            let x2 = xp + invm;
            let temp = (x - x1) * (x - x2) / ((xp - x1) * (xp - x2));
            if temp > 0.0 { temp } else { 0.0 }
        }
    }

    #[inline]
    fn encode(level: u32, index: u32) -> Result<(u32, u32), SGError> {
        Ok(if level <= 1 { (0, 0) } else { (level, index) })
    }

    fn basis_type() -> BasisFunction {
        BasisFunction::Polynomial
    }
}

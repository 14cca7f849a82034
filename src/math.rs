use core::ops::{Add, Mul};

/// A trait used to enable types to be interpolated throughout the rasterization process.
///
/// This is implemented for every type that can be scaled by an `f32` and summed, which covers `f32`, the `vek`
/// vector and colour types, and user-defined structs that derive `Add` and `Mul`.
pub trait WeightedSum: Sized {
    /// Linearly scale two items of this type and sum them.
    fn weighted_sum2(a: Self, b: Self, wa: f32, wb: f32) -> Self;

    /// Linearly scale three items of this type and sum them.
    fn weighted_sum3(a: Self, b: Self, c: Self, wa: f32, wb: f32, wc: f32) -> Self;
}

impl<T> WeightedSum for T
where
    T: Clone + Mul<f32, Output = T> + Add<Output = T>,
{
    #[inline(always)]
    fn weighted_sum2(a: Self, b: Self, wa: f32, wb: f32) -> Self {
        a * wa + b * wb
    }

    #[inline(always)]
    fn weighted_sum3(a: Self, b: Self, c: Self, wa: f32, wb: f32, wc: f32) -> Self {
        a * wa + b * wb + c * wc
    }
}

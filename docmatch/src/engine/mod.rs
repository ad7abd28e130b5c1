pub mod align;
pub mod batch;
pub mod fusion;
pub mod normalize;
pub mod semantic;

/// Round to two decimals, the precision every reported score uses.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Clamp a percentage into [0, 100]; NaN collapses to 0.
pub fn clamp_pct(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 100.0) }
}

/// An error type for the geometry crate.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    /// Axis-aligned box with non-positive width or height.
    #[error("Invalid axis-aligned box [{0}, {1}, {2}, {3}]: min corner must be strictly below max corner")]
    InvalidAabb(f64, f64, f64, f64),
}

/// Floating point type used throughout the runtime and across the host
/// boundary.
pub type Real = f64;

/// The host's "value not available" sentinel. Chosen by the host as
/// -2^110 so that exact `==` comparison is well defined.
pub const NOT_AVAILABLE: Real = -1.298_074_214_633_706_9e33;

/// True when `v` is exactly the host's "not available" sentinel.
pub fn is_not_available(v: Real) -> bool {
    v == NOT_AVAILABLE
}

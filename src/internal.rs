/// Keeps traits like [`Marker`](crate::types::id::marker::Marker)
/// implementable only from inside this crate.
pub trait Sealed {}

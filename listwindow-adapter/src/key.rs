#[cfg(feature = "std")]
pub trait ListKey: core::hash::Hash + Eq {}
#[cfg(feature = "std")]
impl<T: core::hash::Hash + Eq> ListKey for T {}

#[cfg(not(feature = "std"))]
pub trait ListKey: Ord {}
#[cfg(not(feature = "std"))]
impl<T: Ord> ListKey for T {}

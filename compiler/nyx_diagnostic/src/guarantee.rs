//! Type-level proof that an error was emitted.

/// Proof that at least one error diagnostic was reported.
///
/// Can only be constructed inside this crate, by actually reporting an
/// error through the queue. Passes that bail out return this instead of a
/// bare `()` so "failed silently without reporting" is unrepresentable.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ErrorGuaranteed(());

impl ErrorGuaranteed {
    pub(crate) fn new() -> Self {
        ErrorGuaranteed(())
    }
}

/// Current network reachability as reported by the runtime.
///
/// Advisory only: a device can claim to be online while the check-in API is
/// unreachable. Per-call delivery outcomes stay authoritative.
pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Rate-limiting collaborator consulted before a generation starts and
/// notified after one completes. Synchronous by contract; no network or
/// async behavior is assumed.
pub trait UsageGate: Send + Sync {
    /// May a new generation start now?
    fn can_send(&self) -> bool;

    /// Record one successful completion.
    fn record_usage(&self);
}

/// Gate that never limits. Default collaborator for sessions without
/// metering.
#[derive(Debug, Default)]
pub struct Unmetered;

impl UsageGate for Unmetered {
    fn can_send(&self) -> bool {
        true
    }

    fn record_usage(&self) {}
}

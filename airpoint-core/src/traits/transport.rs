//! Wireless transport and configuration channel traits

/// Trait for the wireless link to the host
pub trait Transport {
    /// Check if at least one host is connected
    fn is_connected(&self) -> bool;

    /// Start advertising; no-op if already advertising
    fn begin_advertising(&mut self);

    /// Drop every host link and stop advertising
    fn disconnect_all(&mut self);
}

/// Trait for the bounded read/write configuration value
///
/// One value of at most `CHUNK_CAPACITY` bytes is shared with the host.
/// Writes by the device do not raise a notification.
pub trait DebugChannel {
    /// Replace the shared value
    fn write_chunk(&mut self, bytes: &[u8]);

    /// Copy the current value into `buf`, returning its length
    fn read_chunk(&mut self, buf: &mut [u8]) -> usize;

    /// Consume the pending host-write notification, if any
    fn take_notification(&mut self) -> bool;
}

//! Observe subscription bookkeeping.
//!
//! Tracks, per measurement channel, whether a push-update subscription is
//! currently active. Delivering updates to registered subscribers is the
//! protocol engine's job; this component records intent only. A resource
//! with several measurement channels (the accelerometer's three axes, say)
//! gets one independent slot per channel.

use crate::error::Error;

/// Subscription slots for a resource with `CHANNELS` measurement channels.
#[derive(Clone, Debug)]
pub struct Observers<const CHANNELS: usize> {
    slots: [bool; CHANNELS],
}

impl<const CHANNELS: usize> Observers<CHANNELS> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [false; CHANNELS],
        }
    }

    /// Marks `channel` as observed. Registering an already-registered
    /// channel is idempotent.
    pub fn register(&mut self, channel: usize) -> Result<(), Error> {
        let slot = self
            .slots
            .get_mut(channel)
            .ok_or(Error::InvalidArgument)?;
        *slot = true;
        Ok(())
    }

    /// Clears `channel`. Deregistering an unregistered channel is a no-op
    /// returning success.
    pub fn deregister(&mut self, channel: usize) -> Result<(), Error> {
        let slot = self
            .slots
            .get_mut(channel)
            .ok_or(Error::InvalidArgument)?;
        *slot = false;
        Ok(())
    }

    #[must_use]
    pub fn is_registered(&self, channel: usize) -> bool {
        self.slots.get(channel).copied().unwrap_or(false)
    }
}

impl<const CHANNELS: usize> Default for Observers<CHANNELS> {
    fn default() -> Self {
        Self::new()
    }
}

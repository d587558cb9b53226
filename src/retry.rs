//! Bounded retry for sensor bring-up.
//!
//! Bring-up and calibration talk to flaky hardware; a few retries at boot
//! cover transient bus noise without hiding a genuinely absent device.

use core::fmt::Debug;
use core::marker::PhantomData;

/// Retries a fallible operation up to a fixed number of times, with an
/// optional predicate deciding which errors are worth retrying.
pub struct Retry<E, F = fn(&E) -> bool> {
    max_retries: usize,
    should_retry: F,
    target: &'static str,
    _error: PhantomData<fn(E)>,
}

impl<E> Retry<E> {
    #[must_use]
    pub const fn new(max_retries: usize) -> Self {
        Self {
            max_retries,
            should_retry: |_: &E| true,
            target: "hothouse::retry",
            _error: PhantomData,
        }
    }

    #[must_use]
    pub const fn with_target(self, target: &'static str) -> Self {
        Self {
            max_retries: self.max_retries,
            should_retry: self.should_retry,
            target,
            _error: PhantomData,
        }
    }
}

impl<E, F> Retry<E, F>
where
    F: Fn(&E) -> bool,
    E: Debug,
{
    /// Replaces the retry predicate; errors it rejects fail immediately.
    pub fn with_predicate<P>(self, should_retry: P) -> Retry<E, P>
    where
        P: Fn(&E) -> bool,
    {
        Retry {
            max_retries: self.max_retries,
            should_retry,
            target: self.target,
            _error: PhantomData,
        }
    }

    pub fn run<T>(&self, mut op: impl FnMut() -> Result<T, E>) -> Result<T, E> {
        let mut attempt = 0;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(error) if attempt < self.max_retries && (self.should_retry)(&error) => {
                    attempt += 1;
                    log::warn!(
                        target: self.target,
                        "attempt {attempt}/{} failed: {error:?}; retrying",
                        self.max_retries
                    );
                }
                Err(error) => return Err(error),
            }
        }
    }
}

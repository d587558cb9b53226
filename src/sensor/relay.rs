//! Relay card actuator.
//!
//! The relay is config-only: a single `state` option (`open` or `close`)
//! both commands and reports the contact. There is no measurement channel
//! and nothing to observe. Boot default is open.

use crate::coap::Reading;
use crate::error::Error;
use crate::resource::Resource;

pub const NAME: &str = "relay";

const CONFIG_KEYS: &[&str] = &["state"];
const MEASUREMENT_KEYS: &[&str] = &[];

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum State {
    Open,
    Close,
}

impl State {
    fn parse(value: &str) -> Result<Self, Error> {
        match value {
            "open" => Ok(State::Open),
            "close" => Ok(State::Close),
            _ => Err(Error::InvalidArgument),
        }
    }

    fn label(self) -> &'static str {
        match self {
            State::Open => "open",
            State::Close => "close",
        }
    }
}

/// The relay coil.
pub trait Driver {
    fn set(&mut self, state: State) -> anyhow::Result<()>;
}

pub struct Relay<D> {
    driver: D,
    state: State,
    enabled: bool,
}

// === impl Relay ===

impl<D: Driver> Relay<D> {
    #[must_use]
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            state: State::Open,
            enabled: true,
        }
    }

    /// Drives the contact to the boot default.
    pub fn bringup(mut self) -> anyhow::Result<Self> {
        self.driver.set(self.state)?;
        log::info!(target: "hothouse::relay", "up, contact {}", self.state.label());
        Ok(self)
    }
}

impl<D: Driver> Resource for Relay<D> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn config_keys(&self) -> &'static [&'static str] {
        CONFIG_KEYS
    }

    fn measurement_keys(&self) -> &'static [&'static str] {
        MEASUREMENT_KEYS
    }

    fn put_config(&mut self, _key: &str, value: &str) -> Result<(), Error> {
        let state = State::parse(value)?;
        // drive the coil before committing
        self.driver.set(state)?;
        self.state = state;
        Ok(())
    }

    fn read_config(&self, _key: &str) -> Result<Reading, Error> {
        Ok(Reading::Label(self.state.label()))
    }

    // no measurement channels; the dispatcher never routes here

    fn read(&mut self, _key: &str) -> Result<Reading, Error> {
        Err(Error::InvalidArgument)
    }

    fn register(&mut self, _key: &str) -> Result<(), Error> {
        Err(Error::InvalidArgument)
    }

    fn deregister(&mut self, _key: &str) -> Result<(), Error> {
        Err(Error::InvalidArgument)
    }

    fn disable(&mut self) -> Result<(), Error> {
        self.enabled = false;
        Ok(())
    }

    fn enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Coil {
        driven: Option<State>,
        fail: bool,
    }

    impl Driver for Coil {
        fn set(&mut self, state: State) -> anyhow::Result<()> {
            anyhow::ensure!(!self.fail, "coil fault");
            self.driven = Some(state);
            Ok(())
        }
    }

    #[test]
    fn bringup_opens_the_contact() {
        let relay = Relay::new(Coil::default()).bringup().unwrap();
        assert_eq!(relay.driver.driven, Some(State::Open));
        assert_eq!(relay.read_config("state").unwrap(), Reading::Label("open"));
    }

    #[test]
    fn state_changes_drive_the_coil() {
        let mut relay = Relay::new(Coil::default()).bringup().unwrap();
        relay.put_config("state", "close").unwrap();
        assert_eq!(relay.driver.driven, Some(State::Close));
        assert_eq!(relay.read_config("state").unwrap(), Reading::Label("close"));
    }

    #[test]
    fn failed_drive_does_not_commit() {
        let mut relay = Relay::new(Coil::default()).bringup().unwrap();
        relay.driver.fail = true;
        assert!(relay.put_config("state", "close").is_err());
        assert_eq!(relay.read_config("state").unwrap(), Reading::Label("open"));
    }

    #[test]
    fn rejects_unknown_state() {
        let mut relay = Relay::new(Coil::default()).bringup().unwrap();
        assert!(matches!(
            relay.put_config("state", "ajar"),
            Err(Error::InvalidArgument)
        ));
    }
}

//! Request counters for the gateway.

use core::fmt;

use serde::Serialize;

use crate::coap::Code;

/// Running totals over every request the gateway has answered.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Stats {
    pub requests: u64,
    pub ok: u64,
    pub client_errors: u64,
    pub server_errors: u64,
    pub sensors_disabled: u64,
}

impl Stats {
    pub(crate) fn record(&mut self, code: Code) {
        self.requests += 1;
        if code.is_success() {
            self.ok += 1;
        } else if code.is_client_error() {
            self.client_errors += 1;
        } else if code.is_server_error() {
            self.server_errors += 1;
        }
        if code == Code::Deleted {
            self.sensors_disabled += 1;
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            requests,
            ok,
            client_errors,
            server_errors,
            sensors_disabled,
        } = self;
        writeln!(f, "requests: {requests}")?;
        writeln!(f, "ok: {ok}")?;
        writeln!(f, "client_errors: {client_errors}")?;
        writeln!(f, "server_errors: {server_errors}")?;
        writeln!(f, "sensors_disabled: {sensors_disabled}")
    }
}

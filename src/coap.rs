//! Request/response model for the CoAP-style protocol layer.
//!
//! Wire encoding, retransmission, and session handling belong to the
//! surrounding protocol engine. This module models only what the resource
//! layer consumes and produces: a method, a URI path, a query option, an
//! optional Observe option, and a response carrying a code plus a short
//! textual payload.

use crate::error::Error;
use core::fmt::Write;

/// Maximum payload length, in bytes. Payloads are short readings like
/// `245.2 ppm`, so a small fixed buffer is plenty.
pub const MAX_PAYLOAD: usize = 40;

/// A response payload with fixed capacity and an accurate length.
pub type Payload = heapless::String<MAX_PAYLOAD>;

/// Observe option value requesting registration (RFC 7641).
pub const OBSERVE_REGISTER: u32 = 0;

/// Observe option value requesting deregistration (RFC 7641).
pub const OBSERVE_DEREGISTER: u32 = 1;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// Response codes, named after their CoAP equivalents.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Code {
    /// 2.02, successful disable.
    Deleted,
    /// 2.03, subscription acknowledged (no content).
    Valid,
    /// 2.04, configuration stored.
    Changed,
    /// 2.05, payload carries a reading.
    Content,
    /// 4.04, path did not resolve to a resource.
    NotFound,
    /// 4.05, missing query or unsupported method.
    MethodNotAllowed,
    /// 4.06, recognized keyword with an invalid value, or a read on a
    /// disabled resource.
    NotAcceptable,
    /// 5.00, unexpected failure.
    InternalError,
    /// 5.01, unrecognized query keyword.
    NotImplemented,
}

impl Code {
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Code::Deleted | Code::Valid | Code::Changed | Code::Content)
    }

    #[must_use]
    pub fn is_client_error(self) -> bool {
        matches!(
            self,
            Code::NotFound | Code::MethodNotAllowed | Code::NotAcceptable
        )
    }

    #[must_use]
    pub fn is_server_error(self) -> bool {
        matches!(self, Code::InternalError | Code::NotImplemented)
    }
}

/// One decoded request, borrowed from the protocol engine.
#[derive(Copy, Clone, Debug)]
pub struct Request<'a> {
    pub method: Method,
    /// Full URI path, e.g. `/sensor/arduino/mq6`.
    pub path: &'a str,
    /// The URI query option, verbatim, if present.
    pub query: Option<&'a str>,
    /// The raw Observe option value, if present.
    pub observe: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    pub code: Code,
    pub payload: Payload,
}

impl Response {
    /// A response with a zero-length payload. Every error outcome takes
    /// this shape; partial results are never emitted.
    #[must_use]
    pub fn empty(code: Code) -> Self {
        Self {
            code,
            payload: Payload::new(),
        }
    }

    #[must_use]
    pub fn content(code: Code, payload: Payload) -> Self {
        Self { code, payload }
    }

    #[must_use]
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }
}

/// A reading produced by a resource, before assembly into a payload.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Reading {
    /// A configuration or state label (value count of zero).
    Label(&'static str),
    /// A measured value with its unit label (value count of one).
    Value(f32, &'static str),
}

/// Assembles a reading into the canonical textual payload: the label alone
/// for [`Reading::Label`], the number followed by the unit for
/// [`Reading::Value`] (the bare number when the unit is empty).
pub fn assemble(reading: &Reading) -> Result<Payload, Error> {
    let mut payload = Payload::new();
    let res = match *reading {
        Reading::Label(label) => write!(&mut payload, "{label}"),
        Reading::Value(value, "") => write!(&mut payload, "{value}"),
        Reading::Value(value, unit) => write!(&mut payload, "{value} {unit}"),
    };
    // a reading that overflows the fixed buffer is malformed
    res.map_err(|_| Error::BadData)?;
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_assembles_alone() {
        let payload = assemble(&Reading::Label("lpg")).unwrap();
        assert_eq!(payload.as_str(), "lpg");
    }

    #[test]
    fn value_assembles_with_unit() {
        let payload = assemble(&Reading::Value(0.5, "g")).unwrap();
        assert_eq!(payload.as_str(), "0.5 g");
    }

    #[test]
    fn empty_unit_assembles_bare_number() {
        let payload = assemble(&Reading::Value(2280.0, "")).unwrap();
        assert_eq!(payload.as_str(), "2280");
    }

    #[test]
    fn overflow_is_bad_data() {
        let too_long = "a label much too long to fit in a payload buffer";
        assert!(too_long.len() > MAX_PAYLOAD);
        assert!(matches!(
            assemble(&Reading::Label(too_long)),
            Err(Error::BadData)
        ));
    }

    #[test]
    fn empty_responses_report_zero_length() {
        assert_eq!(Response::empty(Code::NotAcceptable).payload_len(), 0);
    }
}

//! Generic per-resource method dispatch.
//!
//! Every resource follows the same request contract; the per-resource
//! differences (which config keys exist, which measurement keys exist, how
//! a value is read and converted) live behind the [`Resource`] descriptor
//! trait, so the state machine itself is written exactly once.

use crate::coap::{
    self, Code, Method, Reading, Request, Response, OBSERVE_DEREGISTER, OBSERVE_REGISTER,
};
use crate::error::Error;
use crate::query::Query;

/// A sensor or actuator exposed by the gateway.
///
/// The implementation owns the resource's mutable state: the enabled flag,
/// the active configuration, calibration constants, and the observe
/// subscription slots. State is created at bring-up with documented
/// defaults and only ever mutated through dispatch; disabling never
/// destroys it.
pub trait Resource {
    /// The resource's name, the final URI path segment it is addressed by.
    fn name(&self) -> &'static str;

    /// Config-style keys, readable with a bare `GET ?<key>` and (unless
    /// read-only) writable with `PUT ?<key>=<value>`.
    fn config_keys(&self) -> &'static [&'static str];

    /// Measurement keys, readable with `GET ?<key>`, each backed by an
    /// observe subscription channel.
    fn measurement_keys(&self) -> &'static [&'static str];

    /// Stores a validated config value. `key` is guaranteed to be one of
    /// [`Resource::config_keys`]; a value outside the key's accepted set
    /// is an [`Error::InvalidArgument`].
    fn put_config(&mut self, key: &str, value: &str) -> Result<(), Error>;

    /// Renders the configuration currently stored under `key`.
    fn read_config(&self, key: &str) -> Result<Reading, Error>;

    /// Performs a live measurement read for `key`, converting through the
    /// active configuration. Fails with [`Error::Unsupported`] while the
    /// resource is disabled.
    fn read(&mut self, key: &str) -> Result<Reading, Error>;

    /// Registers the observe channel behind measurement `key`.
    fn register(&mut self, key: &str) -> Result<(), Error>;

    /// Deregisters the observe channel behind measurement `key`.
    fn deregister(&mut self, key: &str) -> Result<(), Error>;

    /// Disables the resource. Configuration is retained; only live reads
    /// are refused from here on.
    fn disable(&mut self) -> Result<(), Error>;

    /// Whether live reads are currently served.
    fn enabled(&self) -> bool;
}

/// Dispatches one request against `resource`, to completion.
///
/// `extra_path` is whatever URI path was left over after the resource
/// name; no resource supports deeper paths, so anything present is
/// rejected up front.
pub fn dispatch(
    resource: &mut dyn Resource,
    extra_path: Option<&str>,
    req: &Request<'_>,
) -> Response {
    if extra_path.is_some() {
        return Response::empty(Code::NotFound);
    }

    // all methods require a query
    let Some(raw_query) = req.query else {
        return Response::empty(Code::MethodNotAllowed);
    };
    let query = Query::parse(raw_query);

    match req.method {
        Method::Put => put(resource, &query),
        Method::Get => get(resource, &query, req.observe),
        Method::Delete => delete(resource, &query),
        _ => Response::empty(Code::MethodNotAllowed),
    }
}

fn put(resource: &mut dyn Resource, query: &Query<'_>) -> Response {
    // a bare key is not a supported write
    let Some(value) = query.value else {
        return Response::empty(Code::NotImplemented);
    };
    if !resource.config_keys().contains(&query.key) {
        return Response::empty(Code::NotImplemented);
    }
    match resource.put_config(query.key, value) {
        Ok(()) => Response::empty(Code::Changed),
        Err(error) => failure(resource.name(), "PUT", query.key, &error),
    }
}

fn get(resource: &mut dyn Resource, query: &Query<'_>, observe: Option<u32>) -> Response {
    // reads are bare keys; a key=value shape matches nothing
    if query.value.is_some() {
        return Response::empty(Code::NotImplemented);
    }
    let key = query.key;

    if resource.config_keys().contains(&key) {
        return match resource.read_config(key).and_then(|r| coap::assemble(&r)) {
            Ok(payload) => Response::content(Code::Content, payload),
            Err(error) => failure(resource.name(), "GET", key, &error),
        };
    }

    if resource.measurement_keys().contains(&key) {
        return match observe {
            // the registration ack carries no payload; the value itself is
            // pushed later by the notification machinery
            Some(OBSERVE_REGISTER) => match resource.register(key) {
                Ok(()) => Response::empty(Code::Valid),
                Err(error) => failure(resource.name(), "GET", key, &error),
            },
            Some(OBSERVE_DEREGISTER) => match resource.deregister(key) {
                Ok(()) => Response::empty(Code::Valid),
                Err(error) => failure(resource.name(), "GET", key, &error),
            },
            Some(_) => Response::empty(Code::NotAcceptable),
            None => match resource.read(key).and_then(|r| coap::assemble(&r)) {
                Ok(payload) => Response::content(Code::Content, payload),
                Err(error) => failure(resource.name(), "GET", key, &error),
            },
        };
    }

    Response::empty(Code::NotImplemented)
}

fn delete(resource: &mut dyn Resource, query: &Query<'_>) -> Response {
    if query.key != "all" || query.value.is_some() {
        return Response::empty(Code::MethodNotAllowed);
    }
    match resource.disable() {
        Ok(()) => {
            log::info!(target: "hothouse::dispatch", "{} disabled", resource.name());
            Response::empty(Code::Deleted)
        }
        // any disable failure is an internal error
        Err(error) => {
            log::warn!(
                target: "hothouse::dispatch",
                "failed to disable {}: {error}",
                resource.name()
            );
            Response::empty(Code::InternalError)
        }
    }
}

fn failure(name: &str, method: &str, key: &str, error: &Error) -> Response {
    log::debug!(target: "hothouse::dispatch", "{method} {name}?{key}: {error}");
    Response::empty(error.code())
}

//! URI routing and request accounting for a group of resources.

use crate::coap::{Code, Request, Response};
use crate::resource::{self, Resource};
use crate::stats::Stats;

/// The root path segment every resource URI starts with.
const ROOT: &str = "sensor";

/// One gateway instance: a named group of resources behind the
/// `/sensor/<group>/<name>` URI space.
pub struct Gateway {
    group: &'static str,
    resources: Vec<Box<dyn Resource>>,
    stats: Stats,
}

// === impl Gateway ===

impl Gateway {
    #[must_use]
    pub fn new(group: &'static str) -> Self {
        Self {
            group,
            resources: Vec::new(),
            stats: Stats::default(),
        }
    }

    /// Mounts a resource under this gateway's group.
    pub fn add(&mut self, resource: Box<dyn Resource>) {
        log::info!(
            target: "hothouse::gateway",
            "mounted /{ROOT}/{}/{}",
            self.group,
            resource.name()
        );
        self.resources.push(resource);
    }

    #[must_use]
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Answers one request, recording the outcome in the counters.
    pub fn handle(&mut self, req: &Request<'_>) -> Response {
        let rsp = self.route(req);
        self.stats.record(rsp.code);
        log::debug!(
            target: "hothouse::gateway",
            "{:?} {}?{} -> {:?}",
            req.method,
            req.path,
            req.query.unwrap_or(""),
            rsp.code
        );
        rsp
    }

    fn route(&mut self, req: &Request<'_>) -> Response {
        let mut segments = req.path.trim_start_matches('/').splitn(4, '/');
        let (root, group, name) = match (segments.next(), segments.next(), segments.next()) {
            (Some(root), Some(group), Some(name)) => (root, group, name),
            _ => return Response::empty(Code::NotFound),
        };
        if root != ROOT || group != self.group {
            return Response::empty(Code::NotFound);
        }
        let extra = segments.next().filter(|s| !s.is_empty());
        match self.resources.iter_mut().find(|r| r.name() == name) {
            Some(resource) => resource::dispatch(resource.as_mut(), extra, req),
            None => Response::empty(Code::NotFound),
        }
    }
}

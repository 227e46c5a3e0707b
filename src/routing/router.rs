//! Route table and lookup.
//!
//! # Responsibilities
//! - Compile the fixed route table from configured upstream bases
//! - Look up the matching route for a request path
//! - Return matched route or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Sorted by pattern specificity at build time; insertion order never
//!   decides a match
//! - O(n) scan over a five-entry table

use url::Url;

use crate::config::UpstreamConfig;
use crate::routing::matcher::PathPattern;

/// Key used in gateway-error bodies for a route. The auth route predates the
/// `error` convention and its clients still read `message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKey {
    Error,
    Message,
}

impl ErrorKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Message => "message",
        }
    }
}

/// One forwarding rule.
#[derive(Debug, Clone)]
pub struct Route {
    /// Identifier for logging and metrics.
    pub name: &'static str,

    pub pattern: PathPattern,

    /// Upstream base URL; the rewritten suffix is appended to it.
    pub upstream: Url,

    /// Whether the auth filter lets this route through without a token.
    pub public: bool,

    /// Forward the client's `Authorization` header. Only the auth service
    /// and the comment service consume the raw token.
    pub forward_authorization: bool,

    pub error_key: ErrorKey,
}

/// The compiled route table.
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Compile the table from the configured upstream bases.
    pub fn from_config(upstreams: &UpstreamConfig) -> Result<Self, url::ParseError> {
        let auth = Url::parse(&upstreams.auth_service_url)?;
        let users = Url::parse(&upstreams.user_service_url)?;
        let tickets = Url::parse(&upstreams.ticket_service_url)?;
        let comments = Url::parse(&upstreams.comment_service_url)?;

        let mut routes = vec![
            Route {
                name: "auth",
                pattern: PathPattern::new("/api/auth/**"),
                upstream: auth,
                public: true,
                forward_authorization: true,
                error_key: ErrorKey::Message,
            },
            Route {
                name: "users",
                pattern: PathPattern::new("/api/users/**"),
                upstream: users,
                public: false,
                forward_authorization: false,
                error_key: ErrorKey::Error,
            },
            Route {
                name: "ticket-comments",
                pattern: PathPattern::new("/api/tickets/*/comments/**"),
                upstream: comments.clone(),
                public: false,
                forward_authorization: true,
                error_key: ErrorKey::Error,
            },
            Route {
                name: "comments",
                pattern: PathPattern::new("/api/comments/**"),
                upstream: comments,
                public: false,
                forward_authorization: true,
                error_key: ErrorKey::Error,
            },
            Route {
                name: "tickets",
                pattern: PathPattern::new("/api/tickets/**"),
                upstream: tickets,
                public: false,
                forward_authorization: false,
                error_key: ErrorKey::Error,
            },
        ];

        // Most specific pattern first; ties broken deterministically.
        routes.sort_by(|a, b| b.pattern.specificity().cmp(&a.pattern.specificity()));

        Ok(Self { routes })
    }

    /// Find the route for a request path, most specific pattern winning.
    pub fn match_path(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.pattern.matches(path))
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::from_config(&UpstreamConfig::default()).unwrap()
    }

    #[test]
    fn comments_over_tickets() {
        let table = table();
        let route = table.match_path("/api/tickets/42/comments").unwrap();
        assert_eq!(route.name, "ticket-comments");

        let route = table.match_path("/api/tickets/42/comments/9").unwrap();
        assert_eq!(route.name, "ticket-comments");

        let route = table.match_path("/api/tickets/42").unwrap();
        assert_eq!(route.name, "tickets");
    }

    #[test]
    fn auth_route_is_public_and_keeps_authorization() {
        let table = table();
        let route = table.match_path("/api/auth/login").unwrap();
        assert_eq!(route.name, "auth");
        assert!(route.public);
        assert!(route.forward_authorization);
        assert_eq!(route.error_key, ErrorKey::Message);
    }

    #[test]
    fn user_route_strips_authorization() {
        let table = table();
        let route = table.match_path("/api/users/me").unwrap();
        assert_eq!(route.name, "users");
        assert!(!route.forward_authorization);
        assert_eq!(route.error_key, ErrorKey::Error);
    }

    #[test]
    fn unknown_paths_do_not_match() {
        let table = table();
        assert!(table.match_path("/api/unknown").is_none());
        assert!(table.match_path("/api").is_none());
        assert!(table.match_path("/healthz").is_none());
    }

    #[test]
    fn bad_upstream_url_is_rejected() {
        let mut upstreams = UpstreamConfig::default();
        upstreams.ticket_service_url = "not a url".to_string();
        assert!(RouteTable::from_config(&upstreams).is_err());
    }
}

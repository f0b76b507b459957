use axum::{extract::Request, middleware::Next, response::Response};
use serde::Serialize;
use std::fmt;

/// Role a path prefix is declared to require
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Employer => write!(f, "employer"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProtectedRoute {
    pub prefix: &'static str,
    pub role: Role,
}

/// Static prefix -> role mapping
pub const PROTECTED_ROUTES: &[ProtectedRoute] = &[
    ProtectedRoute {
        prefix: "/admin",
        role: Role::Admin,
    },
    ProtectedRoute {
        prefix: "/employer",
        role: Role::Employer,
    },
];

/// Request extension set on requests under a protected prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredRole(pub Role);

/// Role declared for `path`, matching whole path segments only
pub fn required_role(path: &str) -> Option<Role> {
    PROTECTED_ROUTES
        .iter()
        .find(|route| {
            path.strip_prefix(route.prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
        .map(|route| route.role)
}

/// Classifies protected paths and always forwards the request.
///
/// Identity and role checks are not performed here; the client-side guard
/// owns enforcement. Handlers can read [`RequiredRole`] from extensions.
pub async fn route_guard(mut request: Request, next: Next) -> Response {
    if let Some(role) = required_role(request.uri().path()) {
        tracing::debug!(
            "Path {} declares role '{}'; enforcement deferred to client",
            request.uri().path(),
            role
        );
        request.extensions_mut().insert(RequiredRole(role));
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        extract::Extension,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        Router,
    };
    use tower::ServiceExt;

    async fn echo_role(role: Option<Extension<RequiredRole>>) -> String {
        match role {
            Some(Extension(RequiredRole(role))) => format!("reached:{}", role),
            None => "reached".to_string(),
        }
    }

    fn app() -> Router {
        Router::new()
            .fallback(echo_role)
            .layer(middleware::from_fn(route_guard))
    }

    async fn call(path: &str) -> (StatusCode, String) {
        let response = app()
            .oneshot(HttpRequest::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn matches_whole_segments() {
        assert_eq!(required_role("/admin"), Some(Role::Admin));
        assert_eq!(required_role("/admin/users/1"), Some(Role::Admin));
        assert_eq!(required_role("/employer/jobs"), Some(Role::Employer));
        assert_eq!(required_role("/administrator"), None);
        assert_eq!(required_role("/jobs"), None);
        assert_eq!(required_role("/"), None);
    }

    #[tokio::test]
    async fn forwards_every_path() {
        for path in ["/", "/jobs", "/admin", "/admin/settings", "/employer", "/employer/jobs/new", "/api/test-connection"] {
            let (status, body) = call(path).await;
            assert_eq!(status, StatusCode::OK, "path {} was not forwarded", path);
            assert!(body.starts_with("reached"), "path {} got {}", path, body);
        }
    }

    #[tokio::test]
    async fn annotates_protected_requests_with_role() {
        assert_eq!(call("/admin/settings").await.1, "reached:admin");
        assert_eq!(call("/employer").await.1, "reached:employer");
        assert_eq!(call("/jobs").await.1, "reached");
    }
}

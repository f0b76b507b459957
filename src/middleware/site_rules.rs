use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use crate::config::SiteRules;

/// Applies configured redirects before routing and adds the security
/// headers to every response that does not already carry them.
pub async fn apply_site_rules(
    State(rules): State<Arc<SiteRules>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = match rules.redirect_for(request.uri().path()) {
        Some(rule) => {
            let location = match request.uri().query() {
                Some(query) => format!("{}?{}", rule.destination, query),
                None => rule.destination.clone(),
            };
            tracing::debug!("Redirecting {} -> {}", request.uri().path(), location);
            if rule.permanent {
                Redirect::permanent(&location).into_response()
            } else {
                Redirect::temporary(&location).into_response()
            }
        }
        None => next.run(request).await,
    };

    let headers = response.headers_mut();
    for (name, value) in &rules.headers {
        if !headers.contains_key(name) {
            headers.insert(name.clone(), value.clone());
        }
    }

    response
}

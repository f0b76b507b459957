pub mod route_guard;
pub mod site_rules;

pub use route_guard::{required_role, route_guard, ProtectedRoute, RequiredRole, Role, PROTECTED_ROUTES};
pub use site_rules::apply_site_rules;

pub mod diagnose;
pub mod routes;
pub mod site;

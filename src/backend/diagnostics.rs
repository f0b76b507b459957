use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

use super::BackendClient;

/// Tables whose presence the diagnostic endpoint reports
pub const PROBED_TABLES: &[&str] = &["jobs", "profiles"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    /// A client could be built from the configuration
    pub client_configured: bool,
    /// The backend answered at least one probe
    pub connected: bool,
    pub auth: AuthStatus,
    pub tables: BTreeMap<String, TableStatus>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthStatus {
    pub reachable: bool,
    pub session: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableStatus {
    pub exists: bool,
    pub error: Option<String>,
    pub count: Option<u64>,
}

/// Probe the auth gateway and every table in [`PROBED_TABLES`], one after
/// another. Failures are recorded in the report rather than returned.
pub async fn run_diagnostics(client: &BackendClient) -> DiagnosticReport {
    run_diagnostics_for(client, PROBED_TABLES).await
}

pub async fn run_diagnostics_for(client: &BackendClient, tables: &[&str]) -> DiagnosticReport {
    let mut connected = false;

    let auth = match client.auth_health().await {
        Ok(()) => {
            connected = true;
            AuthStatus {
                reachable: true,
                session: client.has_session(),
                error: None,
            }
        }
        Err(e) => {
            connected |= e.backend_responded();
            warn!("Auth gateway check failed: {}", e);
            AuthStatus {
                reachable: false,
                session: client.has_session(),
                error: Some(e.to_string()),
            }
        }
    };

    let mut statuses = BTreeMap::new();
    for &table in tables {
        let status = match client.count_rows(table).await {
            Ok(count) => {
                connected = true;
                TableStatus {
                    exists: true,
                    error: None,
                    count: Some(count),
                }
            }
            Err(e) => {
                connected |= e.backend_responded();
                warn!("Table probe for '{}' failed: {}", table, e);
                TableStatus {
                    exists: false,
                    error: Some(e.to_string()),
                    count: None,
                }
            }
        };
        statuses.insert(table.to_string(), status);
    }

    info!(
        "Backend diagnostics finished: connected={}, tables={}",
        connected,
        statuses.values().filter(|s| s.exists).count()
    );

    DiagnosticReport {
        client_configured: true,
        connected,
        auth,
        tables: statuses,
        timestamp: Utc::now(),
    }
}

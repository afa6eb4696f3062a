use crate::server::ServerState;
use crate::types::HealthResponse;

pub fn health_summary(state: &ServerState, verbose: bool) -> HealthResponse {
    let mut summary = HealthResponse {
        status: "ok".to_string(),
        name: state.name.to_string(),
        version: state.version.to_string(),
        uptime_seconds: state.uptime().as_secs(),
        started_at: None,
        endpoints: None,
    };
    if verbose {
        summary.started_at = Some(state.started_at);
        summary.endpoints = Some(state.endpoints());
    }
    summary
}

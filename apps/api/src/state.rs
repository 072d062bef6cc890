use gatehouse_application::AuthGateService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_gate_service: AuthGateService,
}

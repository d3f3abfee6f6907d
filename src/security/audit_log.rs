use tracing::{info, warn};

/// Structured account events under the `audit` target. Never receives passwords.
#[derive(Debug, Clone, Default)]
pub struct AuditLogger;

impl AuditLogger {
    pub fn new() -> Self {
        Self
    }

    pub fn account_created(&self, user_id: &str) {
        info!(target: "audit", event = "account_created", user_id);
    }

    pub fn signup_rejected(&self, user_id: Option<&str>, cause: &str) {
        warn!(target: "audit", event = "signup_rejected", user_id = user_id.unwrap_or(""), cause);
    }

    pub fn auth_success(&self, user_id: &str, path: &str) {
        info!(target: "audit", event = "auth_success", user_id, path);
    }

    pub fn auth_failure(&self, user_id: Option<&str>, reason: &str) {
        warn!(target: "audit", event = "auth_failure", user_id = user_id.unwrap_or(""), reason);
    }

    pub fn permission_denied(&self, caller: &str, target_user: &str) {
        warn!(target: "audit", event = "permission_denied", caller, target_user);
    }

    pub fn account_updated(&self, user_id: &str) {
        info!(target: "audit", event = "account_updated", user_id);
    }

    pub fn account_closed(&self, user_id: &str, existed: bool) {
        info!(target: "audit", event = "account_closed", user_id, existed);
    }
}

// src/session/mod.rs

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// One allow-listed login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

/// Per-run session context, owned by the caller.
///
/// The flag has no expiry of its own: it lives exactly as long as the session
/// object. Nothing else in the crate reads or writes authentication state.
#[derive(Debug, Default)]
pub struct Session {
    authenticated: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Check a credential pair against the allow-list. An exact match sets
    /// the flag; anything else leaves it untouched.
    pub fn authenticate(&mut self, allowlist: &[Credential], username: &str, password: &str) -> bool {
        let ok = allowlist
            .iter()
            .any(|c| c.username == username && c.password == password);
        if ok {
            self.authenticated = true;
            info!(user = username, "authenticated");
        } else {
            warn!(user = username, "rejected credentials");
        }
        ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowlist() -> Vec<Credential> {
        vec![Credential {
            username: "corregedoria".into(),
            password: "prov07".into(),
        }]
    }

    #[test]
    fn correct_pair_sets_the_flag() {
        let mut session = Session::new();
        assert!(!session.is_authenticated());
        assert!(session.authenticate(&allowlist(), "corregedoria", "prov07"));
        assert!(session.is_authenticated());
    }

    #[test]
    fn wrong_pair_never_sets_the_flag() {
        let mut session = Session::new();
        assert!(!session.authenticate(&allowlist(), "corregedoria", "wrong"));
        assert!(!session.authenticate(&allowlist(), "intruder", "prov07"));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn failed_attempt_does_not_clear_an_earlier_success() {
        let mut session = Session::new();
        session.authenticate(&allowlist(), "corregedoria", "prov07");
        session.authenticate(&allowlist(), "corregedoria", "typo");
        assert!(session.is_authenticated());
    }

    #[test]
    fn empty_allowlist_rejects_everyone() {
        let mut session = Session::new();
        assert!(!session.authenticate(&[], "corregedoria", "prov07"));
    }
}

use super::session::SessionUser;

const MOCK_EMAIL: &str = "admin@example.com";
const MOCK_PASSWORD: &str = "admin123";

/// Checks an email/password pair and returns the matching user.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, email: &str, password: &str) -> Option<SessionUser>;
}

/// The single hardcoded account the dashboard accepts.
#[derive(Debug, Clone)]
pub struct MockCredentials {
    email: String,
    password: String,
}

impl Default for MockCredentials {
    fn default() -> Self {
        Self {
            email: MOCK_EMAIL.to_string(),
            password: MOCK_PASSWORD.to_string(),
        }
    }
}

impl CredentialVerifier for MockCredentials {
    fn verify(&self, email: &str, password: &str) -> Option<SessionUser> {
        if email == self.email && password == self.password {
            Some(SessionUser {
                id: "1".to_string(),
                email: email.to_string(),
                name: "Admin User".to_string(),
                role: "admin".to_string(),
            })
        } else {
            None
        }
    }
}

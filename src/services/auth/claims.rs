/// Assertions about the caller produced by a `TokenVerifier`.
///
/// - `valid` is true for every claims value a verifier hands back.
/// - `token` is the raw bearer string, never empty.
/// - `subject` / `scope` are only known to verifiers that actually decode or
///   introspect the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub valid: bool,
    pub token: String,
    pub subject: Option<String>,
    pub scope: Option<String>,
}

impl Claims {
    pub fn for_token(token: impl Into<String>) -> Self {
        Self {
            valid: true,
            token: token.into(),
            subject: None,
            scope: None,
        }
    }

    pub fn with_subject(mut self, subject: Option<String>) -> Self {
        self.subject = subject;
        self
    }

    pub fn with_scope(mut self, scope: Option<String>) -> Self {
        self.scope = scope;
        self
    }
}

use shared::Session;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthorizationError {
    #[error("Administrator session required: no active session")]
    NoSession,
    #[error("Administrator session required: user '{user_id}' is not an administrator")]
    NotAdmin { user_id: String },
}

/// Check, at call time, that the caller holds an administrator session
pub fn require_admin(session: Option<&Session>) -> Result<&Session, AuthorizationError> {
    match session {
        None => Err(AuthorizationError::NoSession),
        Some(session) if session.is_admin() => Ok(session),
        Some(session) => Err(AuthorizationError::NotAdmin {
            user_id: session.user_id.clone(),
        }),
    }
}

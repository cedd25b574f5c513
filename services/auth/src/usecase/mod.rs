use uuid::Uuid;

use crate::domain::types::AuthUser;

pub mod code;
pub mod login;
pub mod reset;
pub mod signup;
pub mod token;
pub mod verify;

/// Result of a credential-accepting flow (login or signup): either a live
/// session, or a pending two-factor step the client must complete with the
/// emailed code.
#[derive(Debug)]
pub enum AuthOutcome {
    Session {
        user: AuthUser,
        session_token: String,
    },
    VerificationRequired {
        verification_token: String,
        code_id: Uuid,
    },
}

//! Sign-in orchestration: credentials first, then at most one
//! verification code when the account asks for a second factor.

use std::io;

use crate::gateway::error::AuthError;
use crate::gateway::{Credentials, Session, SessionGateway};

const CODE_LENGTH: usize = 6;

/// Authenticate against `gateway`, asking `code_provider` for a
/// verification code if the account requires one.
///
/// The provider runs on the blocking pool since it usually reads the
/// terminal. A code that is not six ASCII digits is rejected without
/// being submitted.
pub async fn authenticate<F>(
    gateway: &dyn SessionGateway,
    credentials: &Credentials,
    code_provider: F,
) -> Result<Box<dyn Session>, AuthError>
where
    F: FnOnce() -> io::Result<String> + Send + 'static,
{
    let mut session = gateway.authenticate(credentials).await?;

    if session.requires_second_factor() {
        tracing::info!("Two-factor authentication is required");
        let code = tokio::task::spawn_blocking(code_provider)
            .await
            .map_err(io::Error::other)??;
        let code = code.trim();

        if !is_well_formed_code(code) {
            tracing::error!("Verification code has the wrong format");
            return Err(AuthError::SecondFactorRejected);
        }
        if !session.submit_second_factor_code(code).await? {
            tracing::error!("Verification code was rejected");
            return Err(AuthError::SecondFactorRejected);
        }
        tracing::info!("Verification code accepted");
    }

    tracing::info!("Authentication completed successfully");
    Ok(session)
}

fn is_well_formed_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}

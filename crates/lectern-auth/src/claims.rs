//! JWT claim structure for access tokens.

use serde::{Deserialize, Serialize};

use lectern_models::Role;

/// Claims embedded in every access token.
///
/// The role travels inside the token so that the permission table can be
/// consulted without a database round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    pub email: String,
    pub role: Role,
    /// Expiration (Unix timestamp)
    pub exp: usize,
    /// Issued-at (Unix timestamp)
    pub iat: usize,
}

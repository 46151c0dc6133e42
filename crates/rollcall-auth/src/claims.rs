//! Session token payload.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// What a Rollcall session token asserts about its holder.
///
/// The role is carried as text so that a token naming a role this build
/// does not know still decodes; the route guards reject it as
/// unauthorized instead of failing inside the JWT layer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Account id of the teacher or student
    pub sub: String,
    pub email: String,
    /// `"teacher"` or `"student"`
    pub role: String,
    /// Expiry, seconds since the epoch
    pub exp: usize,
    /// Issue time, seconds since the epoch
    pub iat: usize,
}

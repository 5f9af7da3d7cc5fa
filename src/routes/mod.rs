/// Router Module Index
///
/// Routing is split by access level so that the authentication layer is applied to a whole
/// module at once instead of handler by handler.

/// Routes accessible without a token (health, login).
pub mod public;

/// Routes protected by the `auth_middleware` layer. Every handler here receives a
/// resolved `AuthUser`.
pub mod authenticated;

//! Admin command authorization

use crate::ids::RoleId;

use super::types::GuildSettings;

/// Whether a caller may run admin commands on a server.
///
/// Platform administrators always may. Otherwise the caller needs one of the
/// server's configured admin roles; an empty admin role list grants nothing
/// extra.
pub fn is_authorized(
    caller_is_platform_admin: bool,
    caller_role_ids: &[RoleId],
    settings: &GuildSettings,
) -> bool {
    caller_is_platform_admin
        || settings
            .admin_role_ids
            .iter()
            .any(|role| caller_role_ids.contains(role))
}

use crate::models::UserRole;

/// Route-prefix permission table. Order matters: the first prefix that
/// matches the route decides, so `/super-admin` must sit above `/admin`.
/// Staff work out of the admin panel, so `/admin` admits them too.
const ROUTE_PERMISSIONS: &[(&str, &[UserRole])] = &[
    ("/super-admin", &[UserRole::SuperAdmin]),
    (
        "/admin",
        &[UserRole::Admin, UserRole::SuperAdmin, UserRole::Staff],
    ),
    (
        "/staff",
        &[UserRole::Staff, UserRole::Admin, UserRole::SuperAdmin],
    ),
    ("/student", &[UserRole::Student]),
    ("/parent", &[UserRole::Parent]),
];

/// Whether `role` may enter `route`. Unknown routes are denied.
pub fn can_access_route(role: UserRole, route: &str) -> bool {
    ROUTE_PERMISSIONS
        .iter()
        .find(|(prefix, _)| route.starts_with(prefix))
        .map(|(_, allowed)| allowed.contains(&role))
        .unwrap_or(false)
}

/// The single ownership predicate applied before every read, decrypt or
/// mutation of a user-owned resource.
pub fn is_owner(resource_owner: &str, caller: &str) -> bool {
    !caller.is_empty() && resource_owner == caller
}

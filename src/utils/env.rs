/// Read `TIDEWAY_{key}`, or `{key}` when the prefixed variable is unset.
///
/// ```rust
/// use tideway_impersonate::utils::get_env_with_prefix;
///
/// let key = get_env_with_prefix("IMPERSONATE_SESSION_KEY");
/// ```
pub fn get_env_with_prefix(key: &str) -> Option<String> {
    std::env::var(format!("TIDEWAY_{}", key))
        .or_else(|_| std::env::var(key))
        .ok()
}

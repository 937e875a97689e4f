//! Marker vocabulary. The literal tag strings are case- and spelling-exact
//! for compatibility with the target annotation set.

pub const SERVICE: &str = "@Service";
pub const REPOSITORY: &str = "@Repository";
pub const CONTROLLER: &str = "@Controller";
pub const CONFIGURATION: &str = "@Configuration";
pub const COMPONENT: &str = "@Component";
pub const PRIMARY: &str = "@Primary";
pub const LAZY: &str = "@Lazy";
pub const AUTOWIRED: &str = "@Autowired";

/// Prioritized role-classification table over the lowercased unqualified
/// type name. First substring hit wins; [`COMPONENT`] is the fallback. This
/// is deliberately crude name matching, kept as data rather than logic.
pub const ROLE_MARKERS: &[(&str, &str)] = &[
    ("service", SERVICE),
    ("repository", REPOSITORY),
    ("dao", REPOSITORY),
    ("controller", CONTROLLER),
    ("config", CONFIGURATION),
];

/// Pick the role marker for an unqualified type name.
pub fn classify_role(unqualified_name: &str) -> &'static str {
    let lowered = unqualified_name.to_lowercase();
    ROLE_MARKERS
        .iter()
        .find(|(needle, _)| lowered.contains(needle))
        .map(|(_, marker)| *marker)
        .unwrap_or(COMPONENT)
}

/// Scope marker parameterized with the literal scope string.
pub fn scope_marker(scope: &str) -> String {
    format!("@Scope(\"{scope}\")")
}

/// Disambiguation marker parameterized with a reference id.
pub fn qualifier_marker(ref_id: &str) -> String {
    format!("@Qualifier(\"{ref_id}\")")
}

/// Literal-injection marker parameterized with the value string.
pub fn value_marker(value: &str) -> String {
    format!("@Value(\"{value}\")")
}

/// Marker name used for presence checks: the tag with `@` stripped and any
/// argument list ignored (`@Scope("prototype")` → `Scope`).
pub fn marker_name(tag: &str) -> &str {
    let stripped = tag.strip_prefix('@').unwrap_or(tag);
    match stripped.find('(') {
        Some(at) => &stripped[..at],
        None => stripped,
    }
}

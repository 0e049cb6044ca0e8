//! The known module catalog for the legacy Horde source tree.

/// Namespace tag prefixed to framework library names so they cannot
/// collide with application names.
pub const LIBRARY_PREFIX: &str = "Horde_";

/// End-user applications. Their split repositories keep the bare name.
pub const APPLICATIONS: &[&str] = &[
    "ansel", "beatnik", "chora", "horde", "imp", "components", "content",
    "gollem", "hermes", "ingo", "jonah", "kolab", "koward", "kronolith",
    "mnemo", "nag", "passwd", "pastie", "sam", "sesha", "timeobjects",
    "trean", "turba", "ulaform", "whups", "wicked",
];

/// Framework subdirectories that are not packages and must not be split.
pub const FRAMEWORK_IGNORE: &[&str] = &["bin", "xxhash", "lz4"];

/// Default module wired into a freshly assembled composite repository.
pub const SEED_MODULE: &str = "Horde_ActiveSync";

pub fn is_application(name: &str) -> bool {
    APPLICATIONS.contains(&name)
}

/// Canonical repository name for a split module identifier.
///
/// Applications keep their bare name. Framework libraries get the
/// `Horde_` namespace tag, unless the identifier already carries it:
/// the split tool emits some packages with the tag baked in.
pub fn canonical_name(id: &str) -> String {
    if is_application(id) || id.starts_with(LIBRARY_PREFIX) {
        id.to_string()
    } else {
        format!("{}{}", LIBRARY_PREFIX, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_keeps_bare_name() {
        assert_eq!(canonical_name("imp"), "imp");
        assert_eq!(canonical_name("kronolith"), "kronolith");
    }

    #[test]
    fn test_library_gets_namespace_tag() {
        assert_eq!(canonical_name("Util"), "Horde_Util");
        assert_eq!(canonical_name("Core"), "Horde_Core");
    }

    #[test]
    fn test_already_tagged_identifier_is_not_double_prefixed() {
        assert_eq!(canonical_name("Horde_Core"), "Horde_Core");
        assert_eq!(canonical_name("Horde_ActiveSync"), "Horde_ActiveSync");
    }

    #[test]
    fn test_is_application() {
        assert!(is_application("imp"));
        assert!(!is_application("Core"));
        assert!(!is_application("Imp"), "application names are case-sensitive");
    }
}

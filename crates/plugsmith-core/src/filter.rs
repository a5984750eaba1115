//! Release file selection.
//!
//! A file is shipped when its repository-relative path starts with one of
//! the allow-listed prefixes. Rules are checked in order and the first
//! prefix that matches decides; an exception suffix on that rule rejects
//! the file even though the prefix matched.

use plugsmith_config::LayoutConfig;

/// Game data file types shared by several roles.
const READABLE_DATA: [&str; 4] = ["ini", "json", "vdf", "xml"];

/// One allow-list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTypeRule {
    /// Path prefix, `/`-separated.
    pub prefix: String,
    /// File extensions expected under this prefix.
    ///
    /// Informational only: selection is decided by prefix and exception
    /// suffixes alone.
    pub extensions: Vec<String>,
    /// File name suffixes rejected under this prefix.
    pub excluded_suffixes: Vec<String>,
}

impl FileTypeRule {
    /// Creates a rule for `prefix`.
    #[must_use]
    pub fn new(prefix: impl Into<String>, extensions: &[&str]) -> Self {
        Self {
            prefix: prefix.into().replace('\\', "/"),
            extensions: extensions.iter().map(|e| (*e).to_string()).collect(),
            excluded_suffixes: Vec::new(),
        }
    }

    /// Adds exception suffixes to the rule.
    #[must_use]
    pub fn excluding(mut self, suffixes: &[&str]) -> Self {
        self.excluded_suffixes
            .extend(suffixes.iter().map(|s| (*s).to_string()));
        self
    }

    fn matches(&self, relative_path: &str) -> bool {
        relative_path.starts_with(&self.prefix)
    }

    fn excludes(&self, relative_path: &str) -> bool {
        self.excluded_suffixes
            .iter()
            .any(|suffix| relative_path.ends_with(suffix.as_str()))
    }
}

/// Ordered allow list deciding which tracked files go into a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTypeAllowList {
    rules: Vec<FileTypeRule>,
}

impl FileTypeAllowList {
    /// Creates an allow list from rules in priority order.
    #[must_use]
    pub fn new(rules: Vec<FileTypeRule>) -> Self {
        Self { rules }
    }

    /// Builds the standard allow list for a plugin layout.
    ///
    /// Documentation is never shipped.
    #[must_use]
    pub fn from_layout(layout: &LayoutConfig) -> Self {
        let with_data = |extra: &[&'static str]| -> Vec<&'static str> {
            READABLE_DATA.iter().chain(extra).copied().collect()
        };

        Self::new(vec![
            FileTypeRule::new(&layout.plugin, &with_data(&["md", "py"])),
            FileTypeRule::new(&layout.data, &with_data(&["md", "txt"])),
            FileTypeRule::new(&layout.config, &with_data(&["cfg", "md", "txt"])),
            FileTypeRule::new(&layout.logs, &["md", "txt"]),
            FileTypeRule::new(&layout.sound, &["md", "mp3", "wav"]),
            FileTypeRule::new(&layout.events, &["md", "txt"]),
            FileTypeRule::new(&layout.translations, &["md", "ini"]).excluding(&["_server.ini"]),
            FileTypeRule::new("materials/", &["vmt", "vtf"]),
            FileTypeRule::new("models/", &["mdl", "phy", "vtx", "vvd"]),
        ])
    }

    /// Returns the rules in priority order.
    #[must_use]
    pub fn rules(&self) -> &[FileTypeRule] {
        &self.rules
    }

    /// Returns the first rule whose prefix matches the path.
    #[must_use]
    pub fn matching_rule(&self, relative_path: &str) -> Option<&FileTypeRule> {
        self.rules.iter().find(|rule| rule.matches(relative_path))
    }

    /// Returns whether a repository-relative path belongs in a release.
    #[must_use]
    pub fn allows(&self, relative_path: &str) -> bool {
        self.matching_rule(relative_path)
            .is_some_and(|rule| !rule.excludes(relative_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> LayoutConfig {
        LayoutConfig {
            translations: "translations/".to_string(),
            ..LayoutConfig::default()
        }
    }

    #[test]
    fn test_exception_suffix_overrides_prefix() {
        let allow_list = FileTypeAllowList::from_layout(&layout());
        assert!(!allow_list.allows("translations/foo_server.ini"));
        assert!(allow_list.allows("translations/foo.ini"));
    }

    #[test]
    fn test_unmatched_prefix_is_rejected() {
        let allow_list = FileTypeAllowList::from_layout(&layout());
        assert!(!allow_list.allows("README.md"));
        assert!(!allow_list.allows(".gitignore"));
        assert!(!allow_list.allows(
            "addons/source-python/docs/source-python/source/plugins/gg/index.rst"
        ));
    }

    #[test]
    fn test_layout_roles_are_allowed() {
        let allow_list = FileTypeAllowList::from_layout(&LayoutConfig::default());
        assert!(allow_list.allows("addons/source-python/plugins/gg/gg.py"));
        assert!(allow_list.allows("cfg/source-python/gg/settings.cfg"));
        assert!(allow_list.allows("sound/source-python/gg/level.mp3"));
        assert!(allow_list.allows("materials/gg/logo.vmt"));
        assert!(allow_list.allows("models/gg/knife.mdl"));
    }

    #[test]
    fn test_extensions_do_not_filter() {
        let allow_list = FileTypeAllowList::from_layout(&LayoutConfig::default());
        // `.exe` is not listed for the plugin role, but prefixes alone decide.
        assert!(allow_list.allows("addons/source-python/plugins/gg/tool.exe"));
    }

    #[test]
    fn test_first_matching_prefix_wins() {
        let allow_list = FileTypeAllowList::new(vec![
            FileTypeRule::new("resource/", &["res"]),
            FileTypeRule::new("resource/translations/", &["ini"]).excluding(&["_server.ini"]),
        ]);

        // The broader rule comes first, so its (empty) exceptions apply.
        assert!(allow_list.allows("resource/translations/gg_server.ini"));
        assert_eq!(
            allow_list
                .matching_rule("resource/translations/gg_server.ini")
                .map(|rule| rule.prefix.as_str()),
            Some("resource/")
        );
    }

    #[test]
    fn test_prefix_is_plain_string_match() {
        let allow_list = FileTypeAllowList::new(vec![FileTypeRule::new("cfg/sp", &["cfg"])]);
        assert!(allow_list.allows("cfg/sp_extra/file.cfg"));
    }

    #[test]
    fn test_backslash_prefix_normalised() {
        let rule = FileTypeRule::new("cfg\\source-python", &["cfg"]);
        assert_eq!(rule.prefix, "cfg/source-python");
    }

    #[test]
    fn test_rules_keep_configured_order() {
        let allow_list = FileTypeAllowList::from_layout(&LayoutConfig::default());
        let prefixes: Vec<&str> = allow_list
            .rules()
            .iter()
            .map(|rule| rule.prefix.as_str())
            .collect();
        assert_eq!(
            prefixes,
            vec![
                "addons/source-python/plugins",
                "addons/source-python/data/plugins",
                "cfg/source-python",
                "logs/source-python",
                "sound/source-python",
                "resource/source-python/events",
                "resource/source-python/translations",
                "materials/",
                "models/",
            ]
        );
        assert_eq!(allow_list.rules()[6].excluded_suffixes, vec!["_server.ini"]);
    }
}

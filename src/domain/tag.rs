use regex::Regex;
use semver::Version;
use serde::{Deserialize, Serialize};

use super::prerelease::PreRelease;
use crate::error::{MultiReleaseError, Result};

/// Default per-package tag format
pub const DEFAULT_TAG_FORMAT: &str = "{name}@{version}";

/// Extract the version from a package tag (e.g. "app@1.2.3" -> "1.2.3").
///
/// The tag must be exactly `<name>@<version>` with a complete semantic
/// version. Without a package name, a tag that is itself a version is
/// returned as-is. Never fails: any other input yields `None`.
pub fn get_version_from_tag(name: Option<&str>, tag: Option<&str>) -> Option<String> {
    let tag = tag?;
    let Some(name) = name else {
        return Version::parse(tag).ok().map(|_| tag.to_string());
    };

    let pattern = format!("^{}@(.+)$", regex::escape(name));
    let re = Regex::new(&pattern).ok()?;
    let version = re.captures(tag)?.get(1)?.as_str();

    Version::parse(version).ok().map(|_| version.to_string())
}

/// Tag naming format (e.g. "{name}@{version}", "{name}-v{version}")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagFormat {
    pub pattern: String,
}

impl Default for TagFormat {
    fn default() -> Self {
        TagFormat::new(DEFAULT_TAG_FORMAT)
    }
}

impl TagFormat {
    /// Create a new tag format
    pub fn new(pattern: impl Into<String>) -> Self {
        TagFormat {
            pattern: pattern.into(),
        }
    }

    /// Check the format carries a `{version}` placeholder
    pub fn validate(&self) -> Result<()> {
        if !self.pattern.contains("{version}") {
            return Err(MultiReleaseError::tag(format!(
                "Tag format '{}' must contain a {{version}} placeholder",
                self.pattern
            )));
        }
        Ok(())
    }

    /// Format a package version according to the pattern
    /// Example: pattern="{name}@{version}", name="app", version="1.2.3" -> "app@1.2.3"
    pub fn format(&self, name: &str, version: &str) -> String {
        self.pattern
            .replace("{name}", name)
            .replace("{version}", version)
    }

    /// Read the version of `name` out of `tag`.
    ///
    /// The default format goes through [`get_version_from_tag`]; custom
    /// formats are matched the same way, with the version part required to
    /// be a complete semantic version.
    pub fn parse_version(&self, name: &str, tag: &str) -> Option<String> {
        if self.pattern == DEFAULT_TAG_FORMAT {
            return get_version_from_tag(Some(name), Some(tag));
        }

        let escaped = regex::escape(&self.pattern.replace("{name}", name));
        let regex_pattern = escaped.replace(r"\{version\}", "(.+)");
        let re = Regex::new(&format!("^{}$", regex_pattern)).ok()?;
        let version = re.captures(tag)?.get(1)?.as_str();

        Version::parse(version).ok().map(|_| version.to_string())
    }

    /// Whether `tag` was produced for `name` by this format, even if its
    /// version part is not a valid semantic version
    pub fn claims(&self, name: &str, tag: &str) -> bool {
        let formatted = self.pattern.replace("{name}", name);
        match formatted.split_once("{version}") {
            Some((prefix, suffix)) => {
                tag.len() > prefix.len() + suffix.len()
                    && tag.starts_with(prefix)
                    && tag.ends_with(suffix)
            }
            None => false,
        }
    }
}

/// The last release found among a package's tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedVersion {
    pub tag: String,
    pub version: Version,
}

/// Find the highest version of `name` among `tags`.
///
/// On a release branch (`channel` is `None`) only plain releases count; on a
/// pre-release branch, pre-releases of the same channel count as well.
pub fn latest_tagged_version<'a, I>(
    format: &TagFormat,
    name: &str,
    tags: I,
    channel: Option<&str>,
) -> Option<TaggedVersion>
where
    I: IntoIterator<Item = &'a str>,
{
    tags.into_iter()
        .filter_map(|tag| {
            let version = Version::parse(&format.parse_version(name, tag)?).ok()?;
            let on_channel = match PreRelease::from_version(&version) {
                None => version.pre.is_empty(),
                Some(pre) => channel == Some(pre.identifier.as_str()),
            };
            on_channel.then(|| TaggedVersion {
                tag: tag.to_string(),
                version,
            })
        })
        .max_by(|a, b| a.version.cmp(&b.version))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_from_tag() {
        assert_eq!(
            get_version_from_tag(Some("app"), Some("app@1.0.0")),
            Some("1.0.0".to_string())
        );
        assert_eq!(
            get_version_from_tag(Some("app"), Some("app@1.0.0-dev.1")),
            Some("1.0.0-dev.1".to_string())
        );
    }

    #[test]
    fn test_version_from_tag_scoped_names() {
        assert_eq!(
            get_version_from_tag(Some("@scope/pkg"), Some("@scope/pkg@2.1.0")),
            Some("2.1.0".to_string())
        );
        assert_eq!(
            get_version_from_tag(Some("dotted.name"), Some("dotted.name@1.0.0")),
            Some("1.0.0".to_string())
        );
        // `.` is not a wildcard once escaped
        assert_eq!(get_version_from_tag(Some("dotted.name"), Some("dottedxname@1.0.0")), None);
    }

    #[test]
    fn test_version_from_tag_rejects_partial_versions() {
        assert_eq!(get_version_from_tag(Some("abc"), Some("1.0.x-rc.0")), None);
        assert_eq!(get_version_from_tag(Some("abc"), Some("abc@1.0.x")), None);
        assert_eq!(get_version_from_tag(Some("abc"), Some("abc@1-rc.0")), None);
        assert_eq!(get_version_from_tag(Some("abc"), Some("abc@x.1.0")), None);
        assert_eq!(get_version_from_tag(Some("abc"), Some("abc@@1.0.0")), None);
        assert_eq!(get_version_from_tag(Some("abc"), Some("other@1.0.0")), None);
    }

    #[test]
    fn test_version_from_tag_missing_inputs() {
        assert_eq!(get_version_from_tag(Some("abc"), None), None);
        assert_eq!(get_version_from_tag(None, None), None);
        assert_eq!(
            get_version_from_tag(None, Some("1.2.3")),
            Some("1.2.3".to_string())
        );
        assert_eq!(get_version_from_tag(None, Some("abc@1.2.3")), None);
    }

    #[test]
    fn test_format() {
        let format = TagFormat::default();
        assert_eq!(format.format("app", "1.2.3"), "app@1.2.3");
        let custom = TagFormat::new("{name}-v{version}");
        assert_eq!(custom.format("app", "1.2.3"), "app-v1.2.3");
    }

    #[test]
    fn test_custom_format_parse_version() {
        let format = TagFormat::new("{name}-v{version}");
        assert_eq!(format.parse_version("app", "app-v1.2.3"), Some("1.2.3".to_string()));
        assert_eq!(format.parse_version("app", "app@1.2.3"), None);
    }

    #[test]
    fn test_validate_requires_version_placeholder() {
        assert!(TagFormat::default().validate().is_ok());
        assert!(TagFormat::new("{name}").validate().is_err());
    }

    #[test]
    fn test_claims() {
        let format = TagFormat::default();
        assert!(format.claims("app", "app@1.x"));
        assert!(!format.claims("app", "app@"));
        assert!(!format.claims("app", "lib@1.0.0"));
    }

    #[test]
    fn test_latest_tagged_version_release_branch() {
        let tags = ["app@1.0.0", "app@1.2.0", "app@2.0.0-beta.1", "lib@9.0.0"];
        let latest =
            latest_tagged_version(&TagFormat::default(), "app", tags.iter().copied(), None)
                .unwrap();
        assert_eq!(latest.tag, "app@1.2.0");
    }

    #[test]
    fn test_latest_tagged_version_prerelease_branch() {
        let tags = ["app@1.2.0", "app@2.0.0-beta.1", "app@2.0.0-beta.2", "app@3.0.0-alpha.1"];
        let latest = latest_tagged_version(
            &TagFormat::default(),
            "app",
            tags.iter().copied(),
            Some("beta"),
        )
        .unwrap();
        assert_eq!(latest.tag, "app@2.0.0-beta.2");
    }

    #[test]
    fn test_latest_tagged_version_none() {
        let tags: [&str; 0] = [];
        assert!(latest_tagged_version(&TagFormat::default(), "app", tags, None).is_none());
    }
}

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::domain::{BranchContext, NextType};
use crate::engine::{ReleaseEngine, TagSource};
use crate::error::Result;
use crate::package::Package;

/// Release engine and tag source backed by data supplied up front
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    tags: IndexMap<String, Option<String>>,
    next_types: HashMap<String, NextType>,
}

impl InMemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        InMemorySource::default()
    }

    /// Add a tag, optionally with the commit it points at
    pub fn add_tag(&mut self, tag: impl Into<String>, head: Option<&str>) {
        self.tags.insert(tag.into(), head.map(str::to_string));
    }

    /// Set the intrinsic release type reported for a package
    pub fn set_next_type(&mut self, package: impl Into<String>, next_type: impl Into<NextType>) {
        self.next_types.insert(package.into(), next_type.into());
    }

    pub fn with_tag(mut self, tag: impl Into<String>, head: Option<&str>) -> Self {
        self.add_tag(tag, head);
        self
    }

    pub fn with_next_type(
        mut self,
        package: impl Into<String>,
        next_type: impl Into<NextType>,
    ) -> Self {
        self.set_next_type(package, next_type);
        self
    }
}

impl ReleaseEngine for InMemorySource {
    fn next_type(&self, package: &Package, _branch: &BranchContext) -> Result<NextType> {
        Ok(self
            .next_types
            .get(&package.name)
            .copied()
            .unwrap_or_default())
    }
}

impl TagSource for InMemorySource {
    fn tags(&self) -> Result<Vec<String>> {
        Ok(self.tags.keys().cloned().collect())
    }

    fn tag_head(&self, tag: &str) -> Result<Option<String>> {
        Ok(self.tags.get(tag).cloned().flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReleaseType;
    use crate::package::Manifest;

    #[test]
    fn test_tags_keep_insertion_order() {
        let source = InMemorySource::new()
            .with_tag("b@1.0.0", None)
            .with_tag("a@1.0.0", Some("abc123"));
        assert_eq!(source.tags().unwrap(), vec!["b@1.0.0", "a@1.0.0"]);
    }

    #[test]
    fn test_tag_head() {
        let source = InMemorySource::new()
            .with_tag("a@1.0.0", Some("abc123"))
            .with_tag("a@1.1.0", None);
        assert_eq!(source.tag_head("a@1.0.0").unwrap().as_deref(), Some("abc123"));
        assert_eq!(source.tag_head("a@1.1.0").unwrap(), None);
        assert_eq!(source.tag_head("missing").unwrap(), None);
    }

    #[test]
    fn test_next_type_defaults_to_undetermined() {
        let source = InMemorySource::new().with_next_type("a", ReleaseType::Minor);
        let branch = BranchContext::new("main");
        let a = Package::new("a", Manifest::named("a"));
        let b = Package::new("b", Manifest::named("b"));
        assert_eq!(
            source.next_type(&a, &branch).unwrap(),
            NextType::Release(ReleaseType::Minor)
        );
        assert_eq!(source.next_type(&b, &branch).unwrap(), NextType::Undetermined);
    }
}

//! Options controlling how a resource is declared

use crate::resource::ProviderReference;

/// ResourceOptions is the bag of options accompanying a declaration
#[derive(Debug, Clone, Default)]
pub struct ResourceOptions {
    /// Provider id of an existing resource to read instead of create
    pub id: Option<String>,
    /// URN of an existing resource to adopt without re-supplying inputs
    pub urn: Option<String>,
    pub parent: Option<String>,
    pub provider: Option<ProviderReference>,
    pub depends_on: Vec<String>,
    pub protect: bool,
    pub ignore_changes: Vec<String>,
    pub additional_secret_outputs: Vec<String>,
    pub delete_before_replace: bool,
    pub retain_on_delete: bool,
    /// Provider plugin version
    pub version: Option<String>,
    /// Where the provider plugin can be downloaded from
    pub plugin_download_url: Option<String>,
}

impl ResourceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn urn(mut self, urn: impl Into<String>) -> Self {
        self.urn = Some(urn.into());
        self
    }

    pub fn parent(mut self, urn: impl Into<String>) -> Self {
        self.parent = Some(urn.into());
        self
    }

    pub fn provider(mut self, provider: ProviderReference) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn depends_on(mut self, urn: impl Into<String>) -> Self {
        self.depends_on.push(urn.into());
        self
    }

    pub fn protect(mut self) -> Self {
        self.protect = true;
        self
    }

    pub fn ignore_changes(mut self, property: impl Into<String>) -> Self {
        self.ignore_changes.push(property.into());
        self
    }

    pub fn additional_secret_output(mut self, property: impl Into<String>) -> Self {
        self.additional_secret_outputs.push(property.into());
        self
    }

    pub fn delete_before_replace(mut self) -> Self {
        self.delete_before_replace = true;
        self
    }

    pub fn retain_on_delete(mut self) -> Self {
        self.retain_on_delete = true;
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn plugin_download_url(mut self, url: impl Into<String>) -> Self {
        self.plugin_download_url = Some(url.into());
        self
    }

    /// Overlay `other` on top of these options
    /// Scalars set in `other` win, lists are concatenated
    pub fn merge(mut self, other: ResourceOptions) -> Self {
        self.id = other.id.or(self.id);
        self.urn = other.urn.or(self.urn);
        self.parent = other.parent.or(self.parent);
        self.provider = other.provider.or(self.provider);
        self.version = other.version.or(self.version);
        self.plugin_download_url = other.plugin_download_url.or(self.plugin_download_url);
        self.protect |= other.protect;
        self.delete_before_replace |= other.delete_before_replace;
        self.retain_on_delete |= other.retain_on_delete;
        self.depends_on.extend(other.depends_on);
        self.ignore_changes.extend(other.ignore_changes);
        self.additional_secret_outputs
            .extend(other.additional_secret_outputs);
        self
    }
}

/// InvokeOptions accompanies a provider function call
#[derive(Debug, Clone, Default)]
pub struct InvokeOptions {
    pub parent: Option<String>,
    pub provider: Option<ProviderReference>,
    pub version: Option<String>,
    pub plugin_download_url: Option<String>,
}

impl InvokeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider(mut self, provider: ProviderReference) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn plugin_download_url(mut self, url: impl Into<String>) -> Self {
        self.plugin_download_url = Some(url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_prefers_later_scalars_and_concatenates_lists() {
        let base = ResourceOptions::new()
            .version("1.0.0")
            .depends_on("urn:a")
            .ignore_changes("name");
        let overlay = ResourceOptions::new()
            .version("2.0.0")
            .depends_on("urn:b")
            .protect();

        let merged = base.merge(overlay);
        assert_eq!(merged.version.as_deref(), Some("2.0.0"));
        assert_eq!(merged.depends_on, vec!["urn:a", "urn:b"]);
        assert_eq!(merged.ignore_changes, vec!["name"]);
        assert!(merged.protect);
    }

    #[test]
    fn merge_keeps_base_when_overlay_is_empty() {
        let base = ResourceOptions::new()
            .id("fn-1")
            .plugin_download_url("https://example.com/plugins");
        let merged = base.merge(ResourceOptions::default());

        assert_eq!(merged.id.as_deref(), Some("fn-1"));
        assert_eq!(
            merged.plugin_download_url.as_deref(),
            Some("https://example.com/plugins")
        );
    }
}

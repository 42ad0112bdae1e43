//! Package defaults applied to every declaration

use resplug::{InvokeOptions, ResourceOptions};

pub const PLUGIN_DOWNLOAD_URL_ENV: &str = "SUPABASE_PLUGIN_DOWNLOAD_URL";

/// Provider plugin version, pinned to this crate's version
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Plugin download location, only set when overridden through the environment
pub fn get_plugin_download_url() -> Option<String> {
    std::env::var(PLUGIN_DOWNLOAD_URL_ENV)
        .ok()
        .filter(|url| !url.is_empty())
}

/// Fill in version and download location unless the caller set them
pub fn resource_default_opts(mut opts: ResourceOptions) -> ResourceOptions {
    if opts.version.is_none() {
        opts.version = Some(get_version());
    }
    if opts.plugin_download_url.is_none() {
        opts.plugin_download_url = get_plugin_download_url();
    }
    opts
}

pub fn invoke_default_opts(mut opts: InvokeOptions) -> InvokeOptions {
    if opts.version.is_none() {
        opts.version = Some(get_version());
    }
    if opts.plugin_download_url.is_none() {
        opts.plugin_download_url = get_plugin_download_url();
    }
    opts
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn defaults_fill_unset_options() {
        std::env::remove_var(PLUGIN_DOWNLOAD_URL_ENV);

        let opts = resource_default_opts(ResourceOptions::new());
        assert_eq!(opts.version.as_deref(), Some(env!("CARGO_PKG_VERSION")));
        assert!(opts.plugin_download_url.is_none());
    }

    #[test]
    #[serial]
    fn caller_overrides_win() {
        std::env::set_var(PLUGIN_DOWNLOAD_URL_ENV, "https://plugins.example.com");

        let opts = resource_default_opts(
            ResourceOptions::new()
                .version("9.9.9")
                .plugin_download_url("https://mirror.example.com"),
        );
        assert_eq!(opts.version.as_deref(), Some("9.9.9"));
        assert_eq!(
            opts.plugin_download_url.as_deref(),
            Some("https://mirror.example.com")
        );

        let opts = invoke_default_opts(InvokeOptions::new());
        assert_eq!(
            opts.plugin_download_url.as_deref(),
            Some("https://plugins.example.com")
        );

        std::env::remove_var(PLUGIN_DOWNLOAD_URL_ENV);
    }
}

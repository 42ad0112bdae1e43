//! resplug - typed resource declarations for Rust
//!
//! A small runtime for infrastructure bindings: resources are declared with
//! typed inputs, handed to a resource monitor, and observed through outputs
//! that resolve once the monitor answers.

// Core modules
pub mod error;
pub mod token;
pub mod types;

// Declaration API modules
pub mod context;
pub mod input;
pub mod options;
pub mod output;
pub mod resource;
pub mod schema;

// Helper modules
pub mod defaults;
pub mod mock;
pub mod monitor;

// Re-exports for convenience
pub use context::{invoke_output, Context};
pub use error::{ResplugError, Result};
pub use input::{Input, InputMap};
pub use monitor::ResourceMonitor;
pub use options::{InvokeOptions, ResourceOptions};
pub use output::Output;
pub use resource::{ProviderReference, Resource, ResourceOutputs, ResourceState};
pub use schema::{AttributeBuilder, AttributeType, ResourceSchema, SchemaBuilder};
pub use token::{TypeToken, Urn};
pub use types::{CheckFailure, Dynamic, PropertyMap};

/// Record stack outputs on a context
#[macro_export]
macro_rules! export {
    ($ctx:expr, $($name:literal => $value:expr),+ $(,)?) => {{
        let mut result: $crate::Result<()> = Ok(());
        $(
            if result.is_ok() {
                result = $ctx.export($name, $value);
            }
        )+
        result
    }};
}

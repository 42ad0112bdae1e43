//! Provider functions

pub mod get_type_script;

pub use get_type_script::{
    get_type_script, get_type_script_output, GetTypeScriptArgs, GetTypeScriptResult,
};

// Security module for path validation
//
// Template files are located from client input (the requested format), so
// every template path is confined to the configured template root.

pub mod path_validator;

pub use path_validator::{PathSecurityError, validate_path};

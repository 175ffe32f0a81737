mod actions;
mod logging;
mod masker;

pub use actions::{
    escape_data, escape_property, issue_command, prepare_key_value_message, set_failed,
    set_output, ActionsSecretRegistry,
};
pub use logging::setup_logging;
pub use masker::SecretMasker;

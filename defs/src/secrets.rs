/// Receives values that must never appear in logs or command output.
///
/// Implementations are expected to start redacting a value as soon as it is
/// registered, so callers register secrets before doing anything else with them.
pub trait SecretRegistry: Send + Sync {
    fn register_secret(&self, value: &str);
}

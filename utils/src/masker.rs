use std::sync::{Arc, PoisonError, RwLock};

const MASK: &str = "***";

/// Shared list of secret values that are replaced with `***` in every log line.
///
/// Clones share the same list, so the logger and the secret registry can each
/// hold one.
#[derive(Clone, Default)]
pub struct SecretMasker {
    secrets: Arc<RwLock<Vec<String>>>,
}

impl SecretMasker {
    pub fn new() -> Self {
        SecretMasker::default()
    }

    pub fn add(&self, secret: &str) {
        if secret.trim().is_empty() {
            return;
        }

        let mut secrets = self.secrets.write().unwrap_or_else(PoisonError::into_inner);
        for candidate in [secret.to_string(), json_escaped(secret)] {
            if !secrets.contains(&candidate) {
                secrets.push(candidate);
            }
        }
        // Longest first so a secret containing another one is masked whole
        secrets.sort_by(|a, b| b.len().cmp(&a.len()));
    }

    pub fn mask(&self, message: &str) -> String {
        let secrets = self.secrets.read().unwrap_or_else(PoisonError::into_inner);
        secrets
            .iter()
            .fold(message.to_string(), |masked, secret| {
                masked.replace(secret.as_str(), MASK)
            })
    }

    pub fn len(&self) -> usize {
        self.secrets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The form a secret takes once embedded in a JSON string, as it appears in
/// logged request bodies.
fn json_escaped(secret: &str) -> String {
    let quoted = serde_json::Value::String(secret.to_string()).to_string();
    quoted[1..quoted.len() - 1].to_string()
}

use std::process::ExitCode;

use action_runner::{run_action, RawInputs, APPLICATION_ID_OUTPUT};
use dokploy_utils::{set_failed, set_output, setup_logging, ActionsSecretRegistry, SecretMasker};
use log::debug;

#[tokio::main]
async fn main() -> ExitCode {
    let masker = SecretMasker::new();
    if let Err(e) = setup_logging(masker.clone()) {
        eprintln!("Failed to initialize logging: {}", e);
    }
    let secrets = ActionsSecretRegistry::new(masker);

    let inputs = RawInputs::from_env();
    let result = match run_action(&inputs, &secrets).await {
        Ok(outcome) => set_output(APPLICATION_ID_OUTPUT, &outcome.application_id),
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            set_failed(&e.to_string());
            debug!("{:?}", e);
            ExitCode::FAILURE
        }
    }
}

//! Interactive shell driven through in-memory input and output.

use std::sync::Mutex;

use async_trait::async_trait;
use sol_balance_agent::{
    agent::{Dispatcher, LlmError},
    shell::Shell,
};

const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
const WALLET: &str = "4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T";

#[derive(Default)]
struct FakeDispatcher {
    instructions: Mutex<Vec<String>>,
    fail: bool,
}

impl FakeDispatcher {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn instructions(&self) -> Vec<String> {
        self.instructions.lock().unwrap().clone()
    }
}

#[async_trait]
impl Dispatcher for FakeDispatcher {
    async fn dispatch(&self, instruction: &str) -> Result<String, LlmError> {
        self.instructions.lock().unwrap().push(instruction.to_string());
        if self.fail {
            return Err(LlmError::Api {
                status: 500,
                message: "upstream unavailable".to_string(),
            });
        }
        Ok(format!("reply to: {}", instruction))
    }
}

async fn run_shell(input: &str, dispatcher: &FakeDispatcher) -> String {
    let mut output = Vec::new();
    Shell::new(input.as_bytes(), &mut output, dispatcher, WALLET)
        .run()
        .await
        .unwrap();
    String::from_utf8(output).unwrap()
}

#[tokio::test]
async fn empty_token_requests_native_balance() {
    let dispatcher = FakeDispatcher::default();

    let output = run_shell("1\n\n\n2\n", &dispatcher).await;

    assert_eq!(dispatcher.instructions(), vec!["Check my SOL balance"]);
    assert!(output.contains(WALLET));
    assert!(output.contains("Fetching balance..."));
    assert!(output.contains("reply to: Check my SOL balance"));
    assert!(output.contains("Press Enter to continue..."));
    assert!(output.contains("Thank you for using Solana Balance Checker! Goodbye!"));
}

#[tokio::test]
async fn valid_token_is_forwarded() {
    let dispatcher = FakeDispatcher::default();

    run_shell(&format!("1\n  {}  \n\n2\n", USDC_MINT), &dispatcher).await;

    assert_eq!(
        dispatcher.instructions(),
        vec![format!("Check balance for token {}", USDC_MINT)]
    );
}

#[tokio::test]
async fn invalid_token_never_dispatches() {
    let dispatcher = FakeDispatcher::default();

    let output = run_shell("1\nnot-an-address\n2\n", &dispatcher).await;

    assert!(dispatcher.instructions().is_empty());
    assert!(output.contains("Invalid token address format"));
    // Back at the menu after the error.
    assert_eq!(output.matches("Available Operations").count(), 2);
}

#[tokio::test]
async fn exit_choice_ends_without_dispatch() {
    let dispatcher = FakeDispatcher::default();

    let output = run_shell("2\n", &dispatcher).await;

    assert!(dispatcher.instructions().is_empty());
    assert!(output.contains("Goodbye!"));
}

#[tokio::test]
async fn unknown_choice_reprompts() {
    let dispatcher = FakeDispatcher::default();

    let output = run_shell("7\nbalance\n2\n", &dispatcher).await;

    assert_eq!(output.matches("Choose an operation [1/2]").count(), 3);
    assert!(dispatcher.instructions().is_empty());
}

#[tokio::test]
async fn dispatcher_failure_returns_to_menu() {
    let dispatcher = FakeDispatcher::failing();

    let output = run_shell("1\n\n\n1\n\n\n2\n", &dispatcher).await;

    assert_eq!(dispatcher.instructions().len(), 2);
    assert!(output.contains("Error occurred: language model API error (500): upstream unavailable"));
    assert!(output.contains("Goodbye!"));
}

#[tokio::test]
async fn failed_dispatch_waits_for_acknowledgement() {
    let dispatcher = FakeDispatcher::failing();

    let output = run_shell("1\n\n\n2\n", &dispatcher).await;

    assert_eq!(output.matches("Press Enter to continue...").count(), 1);
    // The acknowledging Enter must not be read as a menu choice.
    assert!(!output.contains("Please select one of the available options"));
    assert!(output.contains("Goodbye!"));
}

#[tokio::test]
async fn eof_after_failed_dispatch_exits() {
    let dispatcher = FakeDispatcher::failing();

    let output = run_shell("1\n\n", &dispatcher).await;

    assert_eq!(dispatcher.instructions().len(), 1);
    assert!(output.contains("Press Enter to continue..."));
    assert!(output.contains("Goodbye!"));
}

#[tokio::test]
async fn eof_is_treated_as_exit() {
    let dispatcher = FakeDispatcher::default();

    let output = run_shell("1\n", &dispatcher).await;

    assert!(dispatcher.instructions().is_empty());
    assert!(output.contains("Goodbye!"));
}

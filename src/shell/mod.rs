//! Interactive menu loop: `MENU -> (CHECK_BALANCE | EXIT)`.

pub mod ui;

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error};

use crate::{agent::Dispatcher, blockchain::is_valid_address};

pub const NATIVE_INSTRUCTION: &str = "Check my SOL balance";

pub fn token_instruction(token_address: &str) -> String {
    format!("Check balance for token {}", token_address)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    CheckBalance,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::CheckBalance),
            "2" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

enum Flow {
    Continue,
    Exit,
}

pub struct Shell<'a, R, W> {
    input: R,
    output: W,
    dispatcher: &'a dyn Dispatcher,
    wallet: String,
}

impl<'a, R, W> Shell<'a, R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W, dispatcher: &'a dyn Dispatcher, wallet: impl Into<String>) -> Self {
        Self {
            input,
            output,
            dispatcher,
            wallet: wallet.into(),
        }
    }

    /// Runs until the user picks Exit or stdin closes. Only terminal I/O
    /// failures end the loop with an error.
    pub async fn run(&mut self) -> io::Result<()> {
        let welcome = ui::welcome(&self.wallet);
        self.write(&welcome).await?;

        loop {
            self.write(&ui::operations()).await?;
            let choice = match self.read_choice().await? {
                Some(choice) => choice,
                None => break,
            };

            match choice {
                MenuChoice::CheckBalance => {
                    if let Flow::Exit = self.check_balance().await? {
                        break;
                    }
                }
                MenuChoice::Exit => break,
            }
        }

        self.write(&ui::farewell()).await
    }

    /// Re-prompts until a valid menu entry is given. `None` on EOF.
    async fn read_choice(&mut self) -> io::Result<Option<MenuChoice>> {
        loop {
            self.write(&ui::prompt("Choose an operation [1/2]")).await?;
            let line = match self.read_line().await? {
                Some(line) => line,
                None => return Ok(None),
            };
            match MenuChoice::parse(&line) {
                Some(choice) => return Ok(Some(choice)),
                None => {
                    self.write(&ui::notice("Please select one of the available options"))
                        .await?
                }
            }
        }
    }

    async fn check_balance(&mut self) -> io::Result<Flow> {
        self.write(&ui::prompt(
            "Enter token address (press Enter for SOL balance)",
        ))
        .await?;
        let token = match self.read_line().await? {
            Some(line) => line.trim().to_string(),
            None => return Ok(Flow::Exit),
        };

        let instruction = if token.is_empty() {
            NATIVE_INSTRUCTION.to_string()
        } else if is_valid_address(&token) {
            token_instruction(&token)
        } else {
            debug!("Rejected token address input: {}", token);
            self.write(&ui::error("Invalid token address format")).await?;
            return Ok(Flow::Continue);
        };

        self.write(&ui::notice("Fetching balance...")).await?;
        match self.dispatcher.dispatch(&instruction).await {
            Ok(reply) => self.write(&ui::result(&reply)).await?,
            Err(e) => {
                error!("Balance request failed: {}", e);
                self.write(&ui::error(&format!("Error occurred: {}", e)))
                    .await?
            }
        }

        self.write(&ui::prompt("Press Enter to continue...")).await?;
        match self.read_line().await? {
            Some(_) => Ok(Flow::Continue),
            None => Ok(Flow::Exit),
        }
    }

    async fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line).await?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    async fn write(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_choices() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::CheckBalance));
        assert_eq!(MenuChoice::parse(" 2\n"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("3"), None);
        assert_eq!(MenuChoice::parse(""), None);
    }

    #[test]
    fn token_instruction_text() {
        assert_eq!(
            token_instruction("So11111111111111111111111111111111111111112"),
            "Check balance for token So11111111111111111111111111111111111111112"
        );
    }
}

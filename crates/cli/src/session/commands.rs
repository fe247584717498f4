//! Interactive commands read from stdin while a session runs

use std::str::FromStr;

use crate::error::CliError;

/// One user command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    /// Use the latest raw sample as the new baseline
    Calibrate,
    /// Send the ready message
    Ready,
    /// Restart connecting with a fresh retry budget
    Reconnect,
    /// End the session
    Quit,
}

impl FromStr for UserCommand {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" | "calibrate" => Ok(Self::Calibrate),
            "r" | "ready" => Ok(Self::Ready),
            "n" | "connect" | "reconnect" => Ok(Self::Reconnect),
            "q" | "quit" | "exit" => Ok(Self::Quit),
            _ => Err(CliError::unknown_command(s.trim())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_and_long_forms() {
        assert_eq!("c".parse::<UserCommand>().unwrap(), UserCommand::Calibrate);
        assert_eq!(" Ready \n".parse::<UserCommand>().unwrap(), UserCommand::Ready);
        assert_eq!("connect".parse::<UserCommand>().unwrap(), UserCommand::Reconnect);
        assert_eq!("Q".parse::<UserCommand>().unwrap(), UserCommand::Quit);
    }

    #[test]
    fn test_unknown_command() {
        let err = "jump".parse::<UserCommand>().unwrap_err();
        assert_eq!(err, CliError::unknown_command("jump"));
    }
}

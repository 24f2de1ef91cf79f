//! Parsing of input lines.
//!
//! Lines starting with `:` are host commands. Anything else is a key spec
//! looked up in the key bindings, or shell input when the terminal has
//! focus.

use std::path::PathBuf;

/// A parsed line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    /// `:cd <path>`, relative paths resolve against the panel's path.
    ChangeDirectory(PathBuf),
    /// `:open <name>`
    Open(String),
    /// `:other`, select the other panel.
    OtherPanel,
    /// `:resize <columns> <rows>`
    Resize(u16, u16),
    /// `:quit`
    Quit,
    /// `:<handler>`, e.g. `:toggleIntegratedTerminal`.
    Handler(String),
    /// A key spec such as `F5`.
    Key(String),
    /// Empty input.
    Nothing,
}

impl InputCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let Some(command) = line.strip_prefix(':') else {
            if line.is_empty() {
                return Ok(InputCommand::Nothing);
            }
            return Ok(InputCommand::Key(line.to_owned()));
        };

        let (name, rest) = match command.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (command, ""),
        };

        match name {
            "cd" if !rest.is_empty() => Ok(InputCommand::ChangeDirectory(rest.into())),
            "open" if !rest.is_empty() => Ok(InputCommand::Open(rest.to_owned())),
            "cd" | "open" => Err(format!(":{name} needs an argument")),
            "other" => Ok(InputCommand::OtherPanel),
            "q" | "quit" => Ok(InputCommand::Quit),
            "resize" => parse_size(rest)
                .map(|(columns, rows)| InputCommand::Resize(columns, rows))
                .ok_or_else(|| format!("usage: :resize <columns> <rows>, got {rest:?}")),
            "" => Err("empty command".to_owned()),
            handler => Ok(InputCommand::Handler(handler.to_owned())),
        }
    }
}

fn parse_size(text: &str) -> Option<(u16, u16)> {
    let mut parts = text.split_whitespace();
    let columns = parts.next()?.parse::<u16>().ok()?;
    let rows = parts.next()?.parse::<u16>().ok()?;
    parts.next().is_none().then_some((columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_commands() {
        assert_eq!(
            InputCommand::parse(":cd /tmp/my dir").unwrap(),
            InputCommand::ChangeDirectory("/tmp/my dir".into())
        );
        assert_eq!(InputCommand::parse(":open src").unwrap(), InputCommand::Open("src".into()));
        assert_eq!(InputCommand::parse(":other").unwrap(), InputCommand::OtherPanel);
        assert_eq!(InputCommand::parse(":q").unwrap(), InputCommand::Quit);
        assert_eq!(InputCommand::parse(":resize 120 40").unwrap(), InputCommand::Resize(120, 40));
        assert_eq!(
            InputCommand::parse(":toggleIntegratedTerminal").unwrap(),
            InputCommand::Handler("toggleIntegratedTerminal".into())
        );
    }

    #[test]
    fn keys_and_blanks() {
        let key = InputCommand::parse("Control-`").unwrap();
        assert_eq!(key, InputCommand::Key("Control-`".into()));
        assert_eq!(InputCommand::parse("   ").unwrap(), InputCommand::Nothing);
    }

    #[test]
    fn malformed_commands() {
        assert!(InputCommand::parse(":cd").is_err());
        assert!(InputCommand::parse(":resize 80").is_err());
        assert!(InputCommand::parse(":resize 80 x").is_err());
        assert!(InputCommand::parse(":").is_err());
    }
}

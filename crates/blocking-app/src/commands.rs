//! Line commands typed at the console and their mapping onto settings events.

use blocking_settings::{SettingsEvent, TuningKind};

use crate::error::CommandError;

/// Help text printed for `help` and after unknown input.
pub const HELP: &str = "\
commands:
  manager                open the blocking manager chooser
  numbers                open the blocked numbers list
  messages               open the blocked messages list
  drop                   toggle dropping blocked messages
  spam                   toggle the spam filter
  queue-size [i]         open the queue size dialog, or pick option i
  receive-window [i]     open the receive window dialog, or pick option i
  pause-time [i]         open the pause time dialog, or pick option i
  state                  print the current screen state
  help                   print this text
  quit                   save and exit";

/// A parsed console command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Forward a settings event to the synchronizer.
    Event(SettingsEvent),
    /// Print the latest display state.
    State,
    /// Print the command list.
    Help,
    /// Leave the console.
    Quit,
}

impl Command {
    /// Parse one input line; blank lines yield `None`.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown commands, malformed indices, or surplus
    /// arguments.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let argument = words.next();
        if let Some(extra) = words.next() {
            return Err(CommandError::UnexpectedArgument {
                command: canonical_name(name),
                value: extra.to_string(),
            });
        }

        let command = match name.to_ascii_lowercase().as_str() {
            "manager" => Self::Event(SettingsEvent::ManagerRowClicked),
            "numbers" => Self::Event(SettingsEvent::NumbersRowClicked),
            "messages" => Self::Event(SettingsEvent::MessagesRowClicked),
            "drop" => Self::Event(SettingsEvent::DropRowClicked),
            "spam" => Self::Event(SettingsEvent::SpamSwitchClicked),
            "state" => Self::State,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => match tuning_kind(other) {
                Some(kind) => return Ok(Some(Self::Event(tuning_event(kind, argument)?))),
                None => {
                    return Err(CommandError::Unknown {
                        value: name.to_string(),
                    });
                }
            },
        };

        if let Some(extra) = argument {
            return Err(CommandError::UnexpectedArgument {
                command: canonical_name(name),
                value: extra.to_string(),
            });
        }
        Ok(Some(command))
    }
}

fn tuning_kind(name: &str) -> Option<TuningKind> {
    TuningKind::ALL
        .into_iter()
        .find(|kind| command_name(*kind) == name)
}

const fn command_name(kind: TuningKind) -> &'static str {
    match kind {
        TuningKind::QueueSize => "queue-size",
        TuningKind::ReceiveWindow => "receive-window",
        TuningKind::PauseTime => "pause-time",
    }
}

fn tuning_event(kind: TuningKind, argument: Option<&str>) -> Result<SettingsEvent, CommandError> {
    let Some(raw) = argument else {
        return Ok(SettingsEvent::row_clicked(kind));
    };
    let index = raw
        .parse::<usize>()
        .map_err(|_| CommandError::InvalidIndex {
            command: command_name(kind),
            value: raw.to_string(),
        })?;
    Ok(SettingsEvent::selected(kind, index))
}

fn canonical_name(name: &str) -> &'static str {
    const NAMES: [&str; 8] = [
        "manager", "numbers", "messages", "drop", "spam", "state", "help", "quit",
    ];
    let lowered = name.to_ascii_lowercase();
    NAMES
        .into_iter()
        .chain(TuningKind::ALL.into_iter().map(command_name))
        .find(|known| *known == lowered)
        .unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_commands_map_to_events() -> Result<(), CommandError> {
        assert_eq!(
            Command::parse("numbers")?,
            Some(Command::Event(SettingsEvent::NumbersRowClicked))
        );
        assert_eq!(
            Command::parse("  SPAM ")?,
            Some(Command::Event(SettingsEvent::SpamSwitchClicked))
        );
        assert_eq!(Command::parse("exit")?, Some(Command::Quit));
        assert_eq!(Command::parse("")?, None);
        Ok(())
    }

    #[test]
    fn tuning_commands_open_or_select() -> Result<(), CommandError> {
        assert_eq!(
            Command::parse("pause-time")?,
            Some(Command::Event(SettingsEvent::PauseTimeRowClicked))
        );
        assert_eq!(
            Command::parse("receive-window 3")?,
            Some(Command::Event(SettingsEvent::ReceiveWindowSelected(3)))
        );
        Ok(())
    }

    #[test]
    fn malformed_input_is_reported() {
        assert_eq!(
            Command::parse("queue-size -1"),
            Err(CommandError::InvalidIndex {
                command: "queue-size",
                value: "-1".to_string(),
            })
        );
        assert_eq!(
            Command::parse("drop now"),
            Err(CommandError::UnexpectedArgument {
                command: "drop",
                value: "now".to_string(),
            })
        );
        assert_eq!(
            Command::parse("queue-size 1 2"),
            Err(CommandError::UnexpectedArgument {
                command: "queue-size",
                value: "2".to_string(),
            })
        );
        assert!(matches!(
            Command::parse("ringtone"),
            Err(CommandError::Unknown { .. })
        ));
    }
}

//! Line-oriented command parsing for the interactive session.

use repclock_core::Intent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Intent(Intent),
    /// Deliver this many one-second ticks
    Tick(u64),
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  start | s            start the session
  pause | p            pause the clock
  resume | r           resume the clock
  weight | w <value>   set the load for the next unit (blank clears)
  done | c             complete the current unit
  rest | continue      end the rest and start the next unit
  next | n             move on to the next exercise
  finish | f           finish and save the session
  close                abandon the unit in progress
  tick | t [n]         advance the clock by n seconds (default 1)
  status               show the current state
  quit                 leave";

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "start" | "s" => Command::Intent(Intent::Start),
        "pause" | "p" => Command::Intent(Intent::Pause),
        "resume" | "r" => Command::Intent(Intent::Resume),
        "weight" | "w" => Command::Intent(Intent::SetWeight(rest.to_string())),
        "done" | "complete" | "c" => Command::Intent(Intent::CompleteUnit),
        "rest" | "continue" => Command::Intent(Intent::ContinueRest),
        "next" | "n" => Command::Intent(Intent::AdvanceExercise),
        "finish" | "f" => Command::Intent(Intent::FinishSession),
        "close" | "cancel" => Command::Intent(Intent::Close),
        "tick" | "t" => {
            let count = if rest.is_empty() {
                1
            } else {
                rest.parse::<u64>()
                    .map_err(|_| format!("tick expects a whole number of seconds, got '{}'", rest))?
            };
            Command::Tick(count)
        }
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{}' (try 'help')", other)),
    };

    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_and_comments_ignored() {
        assert_eq!(parse_command("   "), Ok(None));
        assert_eq!(parse_command("# warm-up"), Ok(None));
    }

    #[test]
    fn test_intents_and_aliases() {
        assert_eq!(
            parse_command("START"),
            Ok(Some(Command::Intent(Intent::Start)))
        );
        assert_eq!(
            parse_command("c"),
            Ok(Some(Command::Intent(Intent::CompleteUnit)))
        );
        assert_eq!(
            parse_command("next"),
            Ok(Some(Command::Intent(Intent::AdvanceExercise)))
        );
    }

    #[test]
    fn test_weight_keeps_rest_of_line() {
        assert_eq!(
            parse_command("weight 82.5 kg"),
            Ok(Some(Command::Intent(Intent::SetWeight("82.5 kg".into()))))
        );
        assert_eq!(
            parse_command("w"),
            Ok(Some(Command::Intent(Intent::SetWeight(String::new()))))
        );
    }

    #[test]
    fn test_tick_counts() {
        assert_eq!(parse_command("tick"), Ok(Some(Command::Tick(1))));
        assert_eq!(parse_command("t 40"), Ok(Some(Command::Tick(40))));
        assert!(parse_command("tick soon").is_err());
    }

    #[test]
    fn test_unknown_command() {
        assert!(parse_command("jump").unwrap_err().contains("unknown command"));
    }
}

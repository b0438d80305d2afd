//! Input line parsing for the interactive drill.
//!
//! Lines starting with `:` are commands; anything else (including an empty
//! line) is a submission for the current step.

use recite_core::model::UnitFilter;

pub const HELP: &str = "\
Commands:
  :grad                 mark the answered sentence as mastered
  :review               drill the incorrect set
  :normal               drill the bank
  :unit A > B > C       filter by unit (:unit all clears the filter)
  :mastered on|off      include or exclude mastered sentences
  :units                list the units in the bank
  :help                 show this help
  :quit                 end the session
Anything else is submitted as your answer; an empty line submits a blank answer.";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Submit(String),
    Graduate,
    Review,
    Normal,
    Unit(UnitFilter),
    Mastered(bool),
    Units,
    Help,
    Quit,
    /// A `:` command that could not be understood, with the reason.
    Invalid(String),
}

pub fn parse(line: &str) -> Input {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix(':') else {
        return Input::Submit(line.trim_end_matches(['\r', '\n']).to_string());
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name.to_lowercase().as_str() {
        "grad" | "graduate" => Input::Graduate,
        "review" => Input::Review,
        "normal" => Input::Normal,
        "unit" => match arg.parse::<UnitFilter>() {
            Ok(filter) => Input::Unit(filter),
            Err(e) => Input::Invalid(e),
        },
        "mastered" => match arg.to_lowercase().as_str() {
            "on" | "true" | "yes" => Input::Mastered(true),
            "off" | "false" | "no" => Input::Mastered(false),
            _ => Input::Invalid("usage: :mastered on|off".to_string()),
        },
        "units" => Input::Units,
        "help" | "h" | "?" => Input::Help,
        "quit" | "q" | "exit" => Input::Quit,
        other => Input::Invalid(format!("unknown command ':{other}'. Type :help for a list.")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recite_core::model::Selection;

    #[test]
    fn plain_lines_are_submissions() {
        assert_eq!(parse("I went home."), Input::Submit("I went home.".into()));
        assert_eq!(parse(""), Input::Submit(String::new()));
        assert_eq!(parse("   "), Input::Submit("   ".into()));
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parse(":grad"), Input::Graduate);
        assert_eq!(parse(" :review "), Input::Review);
        assert_eq!(parse(":normal"), Input::Normal);
        assert_eq!(parse(":units"), Input::Units);
        assert_eq!(parse(":help"), Input::Help);
        assert_eq!(parse(":q"), Input::Quit);
    }

    #[test]
    fn unit_filters() {
        let Input::Unit(filter) = parse(":unit Tenses > Past") else {
            panic!("expected a unit filter");
        };
        assert_eq!(filter.major, Selection::Only("Tenses".into()));
        assert_eq!(filter.middle, Selection::Only("Past".into()));
        assert_eq!(filter.minor, Selection::All);

        assert_eq!(parse(":unit all"), Input::Unit(UnitFilter::all()));
        assert_eq!(parse(":unit"), Input::Unit(UnitFilter::all()));
        assert!(matches!(parse(":unit a > b > c > d"), Input::Invalid(_)));
    }

    #[test]
    fn mastered_toggle() {
        assert_eq!(parse(":mastered on"), Input::Mastered(true));
        assert_eq!(parse(":mastered OFF"), Input::Mastered(false));
        assert!(matches!(parse(":mastered maybe"), Input::Invalid(_)));
    }

    #[test]
    fn unknown_command() {
        let Input::Invalid(message) = parse(":frobnicate") else {
            panic!("expected invalid input");
        };
        assert!(message.contains(":frobnicate"));
    }
}

//! help and version commands

use crate::cli::Cli;
use clap::CommandFactory;
use wrangle_core::errors::{CoreError, CoreResult};

const COMMAND_SUMMARY: &str = "
Commands:

  {prog} explore_analysis URL
  {prog} export_metadata URL
  {prog} export_subjects URL
  {prog} export_multiple_analyses URL
  {prog} export_all URL
  {prog} help [command]
  {prog} version
";

/// Help text for `help [topic]`
pub fn help_text(topics: &[String]) -> CoreResult<String> {
    let mut command = Cli::command();
    let prog = command.get_name().to_string();
    match topics {
        [] => Ok(format!(
            "{}\nFor more information about command options, use:\n\n  {} --help\n",
            COMMAND_SUMMARY.replace("{prog}", &prog),
            prog
        )),
        [topic] => match command.find_subcommand_mut(topic) {
            Some(subcommand) => Ok(subcommand.render_long_help().to_string()),
            None => Err(CoreError::UnknownHelpTopic {
                command: "help".to_string(),
                topic: topic.clone(),
            }),
        },
        more => Err(CoreError::UnexpectedArguments {
            command: "help".to_string(),
            supplied: more.join(" "),
        }),
    }
}

/// Handle the help command; help goes to standard error
pub fn handle_help_command(topics: &[String]) -> CoreResult<()> {
    eprintln!("{}", help_text(topics)?);
    Ok(())
}

/// Handle the version command
pub fn handle_version_command() -> CoreResult<()> {
    println!("{}", env!("CARGO_PKG_VERSION"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wrangle_core::ExitStatus;

    #[test]
    fn test_summary() {
        let text = help_text(&[]).unwrap();
        assert!(text.contains("wrangle export_multiple_analyses URL"));
        assert!(text.contains("wrangle --help"));
    }

    #[test]
    fn test_topic_by_name_or_alias() {
        let text = help_text(&["export_all".to_string()]).unwrap();
        assert!(text.contains("Export metadata and subjects"));
        let text = help_text(&["ver".to_string()]).unwrap();
        assert!(text.contains("version string"));
    }

    #[test]
    fn test_unknown_topic() {
        let err = help_text(&["frobnicate".to_string()]).unwrap_err();
        assert_eq!(err.exit_code(), ExitStatus::UNKNOWNCMD);
        assert_eq!(err.to_string(), "Unrecognized command for help: (frobnicate)");
    }

    #[test]
    fn test_too_many_topics() {
        let err = help_text(&["a".to_string(), "b".to_string()]).unwrap_err();
        assert_eq!(err.exit_code(), ExitStatus::UNEXPECTEDARGS);
    }
}

//! The line-oriented text command protocol (§4.G).

use crate::action::Action;

/// Parses one line of the command protocol into an [`Action`].
///
/// Returns `None` for unknown verbs or blank lines — the caller is
/// expected to log an error for the unknown case (§7: "Unknown command
/// — logged error; ignored").
pub fn parse_line(line: &str) -> Option<Action> {
    let mut tokens = line.trim().split_whitespace();
    let verb = tokens.next()?;

    let action = match verb {
        "focus_left" => Action::FocusHorizontal(-1),
        "focus_right" => Action::FocusHorizontal(1),
        "focus_first" => Action::FocusPosition(0),
        "focus_last" => Action::FocusPosition(-1),
        "workspace_up" => Action::WorkspaceFocus(-1),
        "workspace_down" => Action::WorkspaceFocus(1),
        "monitor_left" => Action::MonitorFocus(-1),
        "monitor_right" => Action::MonitorFocus(1),
        "move_left" => Action::MoveWindowHorizontal(-1),
        "move_right" => Action::MoveWindowHorizontal(1),
        "move_up" => Action::MoveWindowVertical(-1),
        "move_down" => Action::MoveWindowVertical(1),
        "move_first" => Action::MoveWindowPosition(0),
        "move_last" => Action::MoveWindowPosition(-1),
        "move_monitor_left" => Action::MoveWindowToMonitor(-1),
        "move_monitor_right" => Action::MoveWindowToMonitor(1),
        "resize_inc" => Action::Resize(0.1),
        "resize_dec" => Action::Resize(-0.1),
        "maximize_toggle" => Action::ToggleMaximize,
        "preset_width_toggle" => Action::TogglePresetWidth,
        "close_window" => Action::CloseWindow,
        "open" => Action::Open(tokens.map(str::to_owned).collect()),
        "exit" => Action::Exit,
        "restart_wm" => Action::Restart,
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_verbs() {
        assert_eq!(parse_line("focus_left"), Some(Action::FocusHorizontal(-1)));
        assert_eq!(parse_line("focus_right"), Some(Action::FocusHorizontal(1)));
        assert_eq!(parse_line("focus_first"), Some(Action::FocusPosition(0)));
        assert_eq!(parse_line("focus_last"), Some(Action::FocusPosition(-1)));
        assert_eq!(parse_line("workspace_up"), Some(Action::WorkspaceFocus(-1)));
        assert_eq!(
            parse_line("move_monitor_right"),
            Some(Action::MoveWindowToMonitor(1))
        );
        assert_eq!(parse_line("resize_inc"), Some(Action::Resize(0.1)));
        assert_eq!(parse_line("maximize_toggle"), Some(Action::ToggleMaximize));
        assert_eq!(parse_line("exit"), Some(Action::Exit));
        assert_eq!(parse_line("restart_wm"), Some(Action::Restart));
    }

    #[test]
    fn parses_open_with_arguments() {
        assert_eq!(
            parse_line("open C:\\tools\\wt.exe -d C:\\src"),
            Some(Action::Open(vec![
                "C:\\tools\\wt.exe".to_string(),
                "-d".to_string(),
                "C:\\src".to_string(),
            ]))
        );
    }

    #[test]
    fn open_with_no_arguments_yields_empty_vec() {
        assert_eq!(parse_line("open"), Some(Action::Open(vec![])));
    }

    #[test]
    fn unknown_verb_returns_none() {
        assert_eq!(parse_line("frobnicate"), None);
    }

    #[test]
    fn blank_line_returns_none() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("   "), None);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(
            parse_line("  focus_right  \n"),
            Some(Action::FocusHorizontal(1))
        );
    }
}

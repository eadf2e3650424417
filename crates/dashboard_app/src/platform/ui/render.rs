use chrono::{DateTime, Utc};
use dashboard_core::{AppViewModel, Phase};

use super::UiCommand;

/// Turns the difference between the last shown view and the new one into
/// display commands.
pub(crate) fn render(
    shown: &AppViewModel,
    next: &AppViewModel,
    now: DateTime<Utc>,
) -> Vec<UiCommand> {
    let mut cmds = Vec::new();

    if shown.theme != next.theme {
        cmds.push(UiCommand::ApplyTheme(next.theme));
    }
    if shown.start_enabled != next.start_enabled {
        cmds.push(UiCommand::SetStartEnabled(next.start_enabled));
    }
    if shown.progress_visible != next.progress_visible {
        cmds.push(UiCommand::ShowProgress(next.progress_visible));
    }
    if shown.progress_percent != next.progress_percent {
        cmds.push(UiCommand::SetProgress(next.progress_percent));
    }
    if shown.current_task != next.current_task {
        cmds.push(UiCommand::SetCurrentTask(next.current_task.clone()));
    }

    // The log only grows within a run; anything else means a new run cleared it.
    if next.log.starts_with(&shown.log) {
        cmds.extend(
            next.log[shown.log.len()..]
                .iter()
                .cloned()
                .map(UiCommand::AppendLog),
        );
    } else {
        cmds.push(UiCommand::ClearLog);
        cmds.extend(next.log.iter().cloned().map(UiCommand::AppendLog));
    }

    if let Some(summary) = next.last_summary {
        if shown.last_summary != next.last_summary {
            cmds.push(UiCommand::ShowLastSummary(summary));
        }
    }

    let ended = matches!(next.phase, Phase::Completed | Phase::Failed(_))
        && shown.phase == Phase::Polling;
    if let (true, Some(job)) = (ended, shown.active_job.as_ref()) {
        cmds.push(UiCommand::RunEnded {
            kind: job.kind,
            elapsed_secs: (now - job.started_at).num_seconds().max(0),
        });
    }

    cmds
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use dashboard_core::{
        update, Accepted, AppState, JobKind, LogLine, Msg, RunSummary, StatusSnapshot, Theme,
    };
    use pretty_assertions::assert_eq;

    fn at(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, secs).unwrap()
    }

    fn polling() -> AppState {
        let (state, _) = update(AppState::new(), Msg::StartClicked { kind: JobKind::Olx });
        let (state, _) = update(
            state,
            Msg::StartResponded {
                run_id: 1,
                started_at: at(0),
                result: Ok(Accepted::default()),
            },
        );
        state
    }

    fn status(state: AppState, dispatch: u64, snapshot: StatusSnapshot) -> AppState {
        let (state, _) = update(state, Msg::PollDue { run_id: 1 });
        let (state, _) = update(
            state,
            Msg::StatusReceived {
                run_id: 1,
                dispatch,
                result: Ok(snapshot),
            },
        );
        state
    }

    fn appended(cmds: &[UiCommand]) -> Vec<String> {
        cmds.iter()
            .filter_map(|cmd| match cmd {
                UiCommand::AppendLog(line) => Some(line.text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn unchanged_view_renders_nothing() {
        let view = polling().view();
        assert!(render(&view, &view, at(1)).is_empty());
    }

    #[test]
    fn only_new_log_lines_are_appended() {
        let state = polling();
        let before = state.view();
        let state = status(
            state,
            1,
            StatusSnapshot {
                progress_percent: 10,
                log: vec!["a".to_string(), "b".to_string()],
                ..StatusSnapshot::default()
            },
        );
        let middle = state.view();
        let first = render(&before, &middle, at(1));
        assert_eq!(appended(&first), vec!["a", "b"]);
        assert!(first.contains(&UiCommand::SetProgress(10)));

        let state = status(
            state,
            2,
            StatusSnapshot {
                progress_percent: 20,
                log: vec!["a".to_string(), "b".to_string(), "c".to_string()],
                ..StatusSnapshot::default()
            },
        );
        let second = render(&middle, &state.view(), at(2));
        assert_eq!(appended(&second), vec!["c"]);
        assert!(!second.contains(&UiCommand::ClearLog));
    }

    #[test]
    fn new_run_clears_the_log() {
        let shown = AppViewModel {
            start_enabled: true,
            log: vec![LogLine::entry("old".to_string())],
            ..AppViewModel::default()
        };
        let (state, _) = update(AppState::new(), Msg::StartClicked { kind: JobKind::Krisha });

        let cmds = render(&shown, &state.view(), at(0));
        assert!(cmds.contains(&UiCommand::ClearLog));
        assert!(cmds.contains(&UiCommand::SetStartEnabled(false)));
        assert!(cmds.contains(&UiCommand::ShowProgress(true)));
    }

    #[test]
    fn completion_shows_summary_and_elapsed_time() {
        let state = polling();
        let shown = state.view();
        let summary = RunSummary {
            added: 5,
            updated: 2,
            errors: 0,
            skipped: 1,
        };
        let state = status(
            state,
            1,
            StatusSnapshot {
                progress_percent: 100,
                log: vec!["a".to_string()],
                complete: true,
                summary: Some(summary),
                ..StatusSnapshot::default()
            },
        );

        let cmds = render(&shown, &state.view(), at(42));
        assert_eq!(
            appended(&cmds),
            vec!["a", "DONE: added 5, updated 2, errors 0, skipped 1"]
        );
        assert!(cmds.contains(&UiCommand::ShowLastSummary(summary)));
        assert!(cmds.contains(&UiCommand::SetStartEnabled(true)));
        assert!(cmds.contains(&UiCommand::RunEnded {
            kind: JobKind::Olx,
            elapsed_secs: 42
        }));
    }

    #[test]
    fn theme_change_is_applied() {
        let shown = AppState::new().view();
        let (state, _) = update(AppState::new(), Msg::ThemeLoaded(Theme::Dark));

        assert_eq!(
            render(&shown, &state.view(), at(0)),
            vec![UiCommand::ApplyTheme(Theme::Dark)]
        );
    }
}

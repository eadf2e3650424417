use std::io::Write;

use console::Style;
use dashboard_core::{AlertSeverity, LogLineKind, RunSummary, StatusSnapshot, Theme};

use super::{DisplaySurface, UiCommand};

const BAR_WIDTH: usize = 20;

struct Palette {
    accent: Style,
    muted: Style,
    success: Style,
    error: Style,
    warning: Style,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                accent: Style::new().blue().bold(),
                muted: Style::new().dim(),
                success: Style::new().green().bold(),
                error: Style::new().red().bold(),
                warning: Style::new().yellow().bold(),
            },
            Theme::Dark => Self {
                accent: Style::new().cyan().bright().bold(),
                muted: Style::new().white().dim(),
                success: Style::new().green().bright().bold(),
                error: Style::new().red().bright().bold(),
                warning: Style::new().yellow().bright().bold(),
            },
        }
    }
}

/// Append-only terminal rendering of the dashboard.
pub(crate) struct Console<W: Write> {
    out: W,
    palette: Palette,
    start_enabled: bool,
    progress_visible: bool,
    progress: u8,
    task: String,
    status_changed: bool,
}

impl<W: Write> Console<W> {
    pub(crate) fn new(out: W) -> Self {
        Self {
            out,
            palette: Palette::for_theme(Theme::default()),
            start_enabled: true,
            progress_visible: false,
            progress: 0,
            task: String::new(),
            status_changed: false,
        }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }

    #[cfg(test)]
    pub(crate) fn start_enabled(&self) -> bool {
        self.start_enabled
    }

    /// One-off rendering of a status response outside of a tracked run.
    pub(crate) fn print_snapshot(&mut self, snapshot: &StatusSnapshot) {
        self.progress_visible = true;
        self.progress = snapshot.progress_percent.clamp(0, 100) as u8;
        self.task = snapshot.current_task.clone().unwrap_or_default();
        self.status_changed = true;
        for line in &snapshot.log {
            let _ = writeln!(self.out, "  {line}");
        }
        self.present();
        let state = match (&snapshot.error, snapshot.complete) {
            (Some(error), _) => self.palette.error.apply_to(format!("failed: {error}")),
            (None, true) => self.palette.success.apply_to("complete".to_string()),
            (None, false) => self.palette.accent.apply_to("running".to_string()),
        };
        let _ = writeln!(self.out, "state: {state}");
        if snapshot.complete && snapshot.error.is_none() {
            if let Some(summary) = snapshot.summary {
                self.write_summary(summary);
            }
        }
        let _ = self.out.flush();
    }

    fn write_summary(&mut self, summary: RunSummary) {
        let title = self.palette.accent.apply_to("Last run summary:");
        let _ = writeln!(self.out, "{title}");
        let _ = writeln!(self.out, "  Added:   {}", summary.added);
        let _ = writeln!(self.out, "  Updated: {}", summary.updated);
        let _ = writeln!(self.out, "  Errors:  {}", summary.errors);
        let _ = writeln!(self.out, "  Skipped: {}", summary.skipped);
    }
}

impl<W: Write> DisplaySurface for Console<W> {
    fn apply(&mut self, command: UiCommand) {
        match command {
            UiCommand::ApplyTheme(theme) => self.palette = Palette::for_theme(theme),
            UiCommand::SetStartEnabled(enabled) => {
                if enabled && !self.start_enabled {
                    let hint = self.palette.muted.apply_to("Parsers can be started again.");
                    let _ = writeln!(self.out, "{hint}");
                }
                self.start_enabled = enabled;
            }
            UiCommand::ShowProgress(visible) => {
                self.progress_visible = visible;
                self.status_changed = true;
            }
            UiCommand::SetProgress(percent) => {
                self.progress = percent;
                self.status_changed = true;
            }
            UiCommand::SetCurrentTask(task) => {
                self.task = task;
                self.status_changed = true;
            }
            UiCommand::ClearLog => {
                let separator = self.palette.muted.apply_to("---- new run ----");
                let _ = writeln!(self.out, "{separator}");
            }
            UiCommand::AppendLog(line) => {
                let styled = match line.kind {
                    LogLineKind::Entry => self.palette.muted.apply_to(line.text),
                    LogLineKind::Error => self.palette.error.apply_to(line.text),
                    LogLineKind::Success => self.palette.success.apply_to(line.text),
                };
                let _ = writeln!(self.out, "  {styled}");
            }
            UiCommand::ShowLastSummary(summary) => self.write_summary(summary),
            UiCommand::RunEnded { kind, elapsed_secs } => {
                let _ = writeln!(
                    self.out,
                    "{} run ended after {}s",
                    kind.display_name(),
                    elapsed_secs
                );
            }
            UiCommand::Alert { severity, message } => {
                let style = match severity {
                    AlertSeverity::Warning => &self.palette.warning,
                    AlertSeverity::Error => &self.palette.error,
                };
                let _ = writeln!(self.out, "{}", style.apply_to(format!("!! {message}")));
            }
        }
    }

    fn present(&mut self) {
        if std::mem::take(&mut self.status_changed) && self.progress_visible {
            let filled = usize::from(self.progress) * BAR_WIDTH / 100;
            let bar = format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled));
            let _ = writeln!(
                self.out,
                "[{}] {:>3}% {}",
                self.palette.accent.apply_to(bar),
                self.progress,
                self.task
            );
        }
        let _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::{JobKind, LogLine};

    fn output(terminal: Console<Vec<u8>>) -> String {
        String::from_utf8(terminal.into_inner()).unwrap()
    }

    fn plain_console() -> Console<Vec<u8>> {
        console::set_colors_enabled(false);
        Console::new(Vec::new())
    }

    #[test]
    fn status_line_is_printed_once_per_batch() {
        let mut surface = plain_console();
        surface.apply(UiCommand::ShowProgress(true));
        surface.apply(UiCommand::SetProgress(40));
        surface.apply(UiCommand::SetCurrentTask("page 2".to_string()));
        surface.apply(UiCommand::AppendLog(LogLine::entry("fetched".to_string())));
        surface.present();
        surface.present();

        assert_eq!(
            output(surface),
            "  fetched\n[########------------]  40% page 2\n"
        );
    }

    #[test]
    fn status_is_hidden_until_progress_is_shown() {
        let mut surface = plain_console();
        surface.apply(UiCommand::SetCurrentTask("idle".to_string()));
        surface.present();

        assert_eq!(output(surface), "");
    }

    #[test]
    fn terminal_lines_and_alerts_are_written() {
        let mut surface = plain_console();
        surface.apply(UiCommand::AppendLog(LogLine::error("ERROR: boom".to_string())));
        surface.apply(UiCommand::Alert {
            severity: AlertSeverity::Error,
            message: "The parser reported an error: boom".to_string(),
        });
        surface.apply(UiCommand::RunEnded {
            kind: JobKind::Krisha,
            elapsed_secs: 7,
        });
        surface.apply(UiCommand::SetStartEnabled(false));
        assert!(!surface.start_enabled());
        surface.apply(UiCommand::SetStartEnabled(true));
        assert!(surface.start_enabled());

        let text = output(surface);
        assert!(text.contains("Parsers can be started again.\n"));
        assert!(text.contains("  ERROR: boom\n"));
        assert!(text.contains("!! The parser reported an error: boom\n"));
        assert!(text.contains("Krisha.kz run ended after 7s\n"));
    }

    #[test]
    fn idle_status_without_summary_prints_no_summary_block() {
        let mut surface = plain_console();
        surface.print_snapshot(&StatusSnapshot {
            complete: true,
            ..StatusSnapshot::default()
        });

        let text = output(surface);
        assert!(text.contains("state: complete\n"));
        assert!(!text.contains("Last run summary:"));
    }

    #[test]
    fn finished_status_prints_its_summary() {
        let mut surface = plain_console();
        surface.print_snapshot(&StatusSnapshot {
            progress_percent: 100,
            complete: true,
            summary: Some(RunSummary {
                added: 3,
                ..RunSummary::default()
            }),
            ..StatusSnapshot::default()
        });

        let text = output(surface);
        assert!(text.contains("Last run summary:\n  Added:   3\n"));
    }

    #[test]
    fn summary_block_lists_all_counts() {
        let mut surface = plain_console();
        surface.apply(UiCommand::ShowLastSummary(RunSummary {
            added: 5,
            updated: 2,
            errors: 0,
            skipped: 1,
        }));

        assert_eq!(
            output(surface),
            "Last run summary:\n  Added:   5\n  Updated: 2\n  Errors:  0\n  Skipped: 1\n"
        );
    }
}

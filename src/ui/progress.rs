use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::errors::TimelineError;
use crate::navigator::NavigationOutcome;
use crate::stage::Stage;
use crate::ui::icons::{CROSS, EXIT, LOCKED, SPARKLE};
use crate::ui::timeline_view::{TimelineView, render_json, render_lines, render_minimal};

/// Output mode for the timeline UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiMode {
    /// Stage list plus a progress bar
    #[default]
    Full,
    /// One summary line per render
    Minimal,
    /// One JSON object per render
    Json,
}

impl std::str::FromStr for UiMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s).unwrap_or_default())
    }
}

impl UiMode {
    /// Exact mode name, ignoring case; `None` for anything else.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "full" => Some(Self::Full),
            "minimal" => Some(Self::Minimal),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Parse UI mode from string, defaulting to `Full` for unknown values.
    pub fn parse(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for UiMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UiMode::Full => write!(f, "full"),
            UiMode::Minimal => write!(f, "minimal"),
            UiMode::Json => write!(f, "json"),
        }
    }
}

/// Terminal UI for the timeline.
///
/// In `Full` mode a stage bar is drawn on stderr via `indicatif`, with its
/// position at the number of completed stages. Timeline text always goes to
/// stdout; the bar is suspended while it is printed.
pub struct TimelineUI {
    mode: UiMode,
    multi: MultiProgress,
    stage_bar: ProgressBar,
    verbose: bool,
}

impl TimelineUI {
    pub fn new(mode: UiMode, verbose: bool) -> Self {
        let multi = if mode == UiMode::Full {
            MultiProgress::new()
        } else {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        };

        let stage_style = ProgressStyle::default_bar()
            .template("{prefix:.bold.dim} [{bar:28.cyan/blue}] {pos}/{len} {msg}")
            .expect("progress bar template is a valid static string")
            .progress_chars("█▓▒░");

        let stage_bar = multi.add(ProgressBar::new(Stage::COUNT as u64));
        stage_bar.set_style(stage_style);
        stage_bar.set_prefix("Stages");

        Self {
            mode,
            multi,
            stage_bar,
            verbose,
        }
    }

    pub fn mode(&self) -> UiMode {
        self.mode
    }

    /// Print to stdout without tearing the progress bar.
    fn print_line(&self, msg: impl AsRef<str>) {
        self.multi.suspend(|| println!("{}", msg.as_ref()));
    }

    /// Render a full timeline view.
    pub fn show(&self, view: &TimelineView) -> anyhow::Result<()> {
        match self.mode {
            UiMode::Full => {
                self.stage_bar.set_position(view.completed as u64);
                self.stage_bar.set_message(match view.active {
                    Some(stage) => format!("{}", style(stage.title()).yellow()),
                    None => format!("{}", style("not started").dim()),
                });
                for line in render_lines(view) {
                    self.print_line(line);
                }
                self.print_line("");
            }
            UiMode::Minimal => self.print_line(render_minimal(view)),
            UiMode::Json => self.print_line(render_json(view)?),
        }
        Ok(())
    }

    /// Report the result of one navigation step.
    ///
    /// JSON mode prints nothing here; the view that follows carries the state.
    pub fn show_navigation(&self, path: &str, outcome: &NavigationOutcome) {
        if self.mode == UiMode::Json {
            return;
        }
        match outcome {
            NavigationOutcome::Mounted { route, stage } => {
                self.print_line(format!(
                    "{} {} {} {}",
                    style("→").cyan().bold(),
                    style(path).bold(),
                    style("mounted as").dim(),
                    style(stage).yellow()
                ));
                if self.verbose && route != path {
                    self.print_line(format!("    {} {}", style("route:").dim(), route));
                }
            }
            NavigationOutcome::Rerendered { stage } => {
                self.print_line(format!(
                    "{} {} {}",
                    style("↻").dim(),
                    style(path).bold(),
                    style(format!("already on {}, no stage change", stage)).dim()
                ));
            }
            NavigationOutcome::Left { was_mounted } => {
                let note = if *was_mounted {
                    "left the timeline, scope unmounted"
                } else {
                    "outside the timeline"
                };
                self.print_line(format!("{}{} {}", EXIT, style(path).bold(), style(note).dim()));
            }
        }
    }

    /// Report a rejected navigation.
    pub fn show_error(&self, path: &str, err: &TimelineError) {
        let icon = match err {
            TimelineError::StageLocked { .. } => LOCKED,
            _ => CROSS,
        };
        match self.mode {
            UiMode::Json => self.print_line(
                serde_json::json!({ "path": path, "error": err.to_string() }).to_string(),
            ),
            _ => self.print_line(format!(
                "{}{} {}",
                icon,
                style(path).bold(),
                style(err).red()
            )),
        }
    }

    /// Verbose-only diagnostic line.
    pub fn log_step(&self, msg: &str) {
        if self.verbose && self.mode != UiMode::Json {
            self.print_line(format!("    {} {}", style("·").dim(), style(msg).dim()));
        }
    }

    /// Stop drawing the bar, with a closing line when the last stage is active.
    pub fn finish(&self, view: Option<&TimelineView>) {
        if let Some(view) = view
            && view.active.is_some_and(Stage::is_last)
            && self.mode == UiMode::Full
        {
            self.print_line(format!(
                "{}{}",
                SPARKLE,
                style("Final stage reached").green().bold()
            ));
        }
        self.stage_bar.finish_and_clear();
    }
}

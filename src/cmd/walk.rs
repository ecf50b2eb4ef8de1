//! Navigation replay and single-stage rendering — `kp-timeline walk` / `show`.

use anyhow::{Context, Result};
use std::path::PathBuf;

use kp_timeline::navigator::Navigator;
use kp_timeline::stage::Stage;
use kp_timeline::ui::{TimelineRenderer, TimelineUI, TimelineView};

use super::super::Cli;
use super::load_config;

pub fn cmd_walk(cli: &Cli, project_dir: PathBuf, paths: &[String], keep_going: bool) -> Result<()> {
    let config = load_config(cli, project_dir)?;
    let ui = TimelineUI::new(config.ui, config.verbose);
    let mut navigator = Navigator::new(config.route_table(), config.access_gate());

    // One renderer per mounted scope; replaced when the timeline is re-entered.
    let mut renderer: Option<(u64, TimelineRenderer)> = None;
    let mut last_view: Option<TimelineView> = None;
    let mut failures = 0usize;

    for path in paths {
        let outcome = match navigator.navigate(path) {
            Ok(outcome) => outcome,
            Err(e) => {
                ui.show_error(path, &e);
                if !keep_going {
                    ui.finish(last_view.as_ref());
                    return Err(e).with_context(|| format!("Navigation to '{}' failed", path));
                }
                failures += 1;
                continue;
            }
        };
        ui.show_navigation(path, &outcome);

        if !navigator.is_mounted() {
            renderer = None;
            continue;
        }

        let generation = navigator.scope_generation();
        if renderer.as_ref().is_none_or(|(g, _)| *g != generation) {
            renderer = Some((generation, TimelineRenderer::new(navigator.handle())?));
            ui.log_step(&format!("timeline scope #{} mounted", generation));
        }

        if let Some((_, r)) = &renderer {
            let view = r.view()?;
            ui.show(&view)?;
            ui.log_step(&format!("{} re-render(s) in this scope", r.render_count()));
            last_view = Some(view);
        }
    }

    ui.finish(last_view.as_ref());

    if failures > 0 {
        anyhow::bail!("{} of {} navigations were rejected", failures, paths.len());
    }
    Ok(())
}

pub fn cmd_show(cli: &Cli, project_dir: PathBuf, stage: Option<&str>) -> Result<()> {
    let config = load_config(cli, project_dir)?;
    let stage = stage
        .map(str::parse::<Stage>)
        .transpose()
        .context("Invalid --stage")?;

    let ui = TimelineUI::new(config.ui, config.verbose);
    let view = TimelineView::from_active(stage);
    ui.show(&view)?;
    ui.finish(Some(&view));
    Ok(())
}

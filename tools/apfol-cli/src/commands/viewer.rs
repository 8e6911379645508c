//! Rotation controller simulation.

use std::time::Duration;

use anyhow::{bail, Result};
use apfol_viewer::{ActiveInput, Pointer, RotationController, ViewerConfig};
use serde::Serialize;

use super::ViewerArgs;
use crate::context::Context;

/// Pixels moved per frame while a simulated drag is in progress.
const DRAG_STEP_PX: f64 = 10.0;

#[derive(Debug, Serialize)]
struct FrameSample {
    frame: u32,
    at_ms: u64,
    input: ActiveInput,
    yaw: f64,
    pitch: f64,
}

/// Run the viewer command.
pub async fn run(args: ViewerArgs, ctx: &Context) -> Result<()> {
    if args.frame_ms == 0 {
        bail!("--frame-ms must be at least 1");
    }
    if let Some(p) = args.scroll.iter().find(|p| !(0.0..=1.0).contains(*p)) {
        bail!("Scroll progress {p} is outside 0..=1");
    }

    let samples = simulate(&args);

    if ctx.output.is_json() {
        ctx.output.json(&samples);
        return Ok(());
    }

    ctx.output.header("Viewer rotation");
    let widths = [6, 8, 8, 9, 9];
    ctx.output
        .table_row(&["FRAME", "T(ms)", "INPUT", "YAW", "PITCH"], &widths);
    let every = args.every.max(1);
    let last = samples.len().saturating_sub(1);
    for (i, sample) in samples.iter().enumerate() {
        if sample.frame % every != 0 && i != last {
            continue;
        }
        ctx.output.table_row(
            &[
                &sample.frame.to_string(),
                &sample.at_ms.to_string(),
                &format!("{:?}", sample.input).to_lowercase(),
                &format!("{:.4}", sample.yaw),
                &format!("{:.4}", sample.pitch),
            ],
            &widths,
        );
    }
    Ok(())
}

/// Feed scripted input through a controller, one frame at a time.
///
/// Scroll values are applied one per frame from frame 0. A drag starts
/// after the scroll script and moves [`DRAG_STEP_PX`] per frame until the
/// requested distance is covered, then releases.
fn simulate(args: &ViewerArgs) -> Vec<FrameSample> {
    let mut controller = RotationController::new(ViewerConfig {
        enable_interaction: !args.no_interaction,
        ..ViewerConfig::default()
    });

    let drag_start = args.scroll.len() as u32;
    let drag_total = args.drag.unwrap_or(0.0);
    let drag_frames = (drag_total.abs() / DRAG_STEP_PX).ceil() as u32;
    let mut dragged = 0.0;

    (0..args.frames)
        .map(|frame| {
            let now = Duration::from_millis(u64::from(frame) * args.frame_ms);

            if let Some(progress) = args.scroll.get(frame as usize) {
                controller.on_scroll(*progress, now);
            }

            if drag_frames > 0 {
                if frame == drag_start {
                    controller.pointer_down(Pointer::mouse(0.0, 0.0));
                }
                if frame >= drag_start && frame < drag_start + drag_frames {
                    let step = (drag_total - dragged).clamp(-DRAG_STEP_PX, DRAG_STEP_PX);
                    dragged += step;
                    controller.pointer_move(Pointer::mouse(dragged, 0.0));
                }
                if frame == drag_start + drag_frames {
                    controller.pointer_up();
                }
            }

            let input = controller.active_input(now);
            let rotation = controller.frame(now);
            FrameSample {
                frame,
                at_ms: now.as_millis() as u64,
                input,
                yaw: rotation.yaw,
                pitch: rotation.pitch,
            }
        })
        .collect()
}

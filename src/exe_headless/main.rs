mod rig;

use std::path::PathBuf;
use clap::Parser;
use glam::{Mat4, Vec2, Vec3};
use edit_rsk::{EditSession, EditorConfig, SelectionMode};
use nab_rsk::app::{self, AppRun, ExitReason};
use nab_rsk::timing::{Clock, FMilliseconds, FSeconds};
use skin_rsk::Model;

#[derive(Debug, Parser)]
#[command(about = "Drives a procedural rig through playback, baking and editing without a window")]
struct CliArgs
{
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 120)]
    frames: u32,

    /// Fixed frame step in seconds, measured with a wall clock if unset
    #[arg(long)]
    dt: Option<f32>,

    #[arg(long, default_value_t = 8)]
    segments: u32,

    /// Print the effective config as TOML and exit
    #[arg(long)]
    print_config: bool,
}

const VIEWPORT: Vec2 = Vec2::new(800.0, 800.0);

fn main() -> ExitReason
{
    let app_run = AppRun::<CliArgs>::startup("reskin_headless", env!("CARGO_PKG_VERSION"));
    app::set_panic_hook(false);

    let config = match &app_run.args.config
    {
        Some(path) => match EditorConfig::load(path)
        {
            Ok(config) => config,
            Err(err) =>
            {
                log::error!("Failed to load config {path:?}: {err}");
                app_run.set_exit_reason(ExitReason::InvalidInput);
                return app_run.get_exit_reason();
            }
        },
        None => EditorConfig::default(),
    };

    if app_run.args.print_config
    {
        println!("{}", config.to_toml_string());
        return app_run.get_exit_reason();
    }

    let segments = app_run.args.segments.max(1);
    let model = match Model::load(rig::column(segments), &config.propagation_budget())
    {
        Ok(model) => model,
        Err(err) =>
        {
            log::error!("Failed to load the rig: {err}");
            app_run.set_exit_reason(ExitReason::InvalidInput);
            return app_run.get_exit_reason();
        }
    };

    let mut session = EditSession::new(model, config);
    if let Err(err) = session.load_clip(rig::sway(segments, 2.0, 1.0, 0.5))
    {
        log::error!("Failed to load the clip: {err}");
        app_run.set_exit_reason(ExitReason::InvalidInput);
        return app_run.get_exit_reason();
    }
    session.play_index(0);

    let mut clock = Clock::new();
    for frame in 0..app_run.args.frames
    {
        let delta_time = match app_run.args.dt
        {
            Some(dt) => FSeconds(dt),
            None => clock.tick().delta_secs(),
        };
        let frame_ms: FMilliseconds = delta_time.into();
        log::trace!("Frame {frame}: {:.3} ms", frame_ms.0);
        session.update(delta_time);
    }
    log::info!("Played {} frames, clip time {:.3} ticks", app_run.args.frames, session.animator().current_time());
    if app_run.args.dt.is_none()
    {
        log::info!("Last frame ran at {:.1} fps", clock.time().fps());
    }

    edit_top_row(&mut session, segments);

    let dirty = session.take_dirty();
    log::info!("Dirty meshes: animated {:?} baked {:?}", dirty.animated, dirty.baked);

    app_run.get_exit_reason()
}

// Looks at the column head-on with an orthographic camera that fits the model
fn camera(session: &EditSession) -> Mat4
{
    let bounds = session.model().bounds();
    let center = bounds.center();
    let extent = (bounds.size().max_element() / 2.0 + 0.5).max(1.0);

    let eye = center + Vec3::new(0.0, 0.0, 10.0);
    Mat4::orthographic_rh(-extent, extent, -extent, extent, 0.1, 100.0) * Mat4::look_at_rh(eye, center, Vec3::Y)
}

fn bind_position(session: &EditSession, vertex: usize) -> Option<Vec3>
{
    session.model().meshes().first()?.vertices().get(vertex).map(|v| v.position)
}

fn screen_point(view_projection: Mat4, world: Vec3) -> Vec2
{
    let ndc = view_projection.project_point3(world);
    Vec2::new((ndc.x + 1.0) / 2.0 * VIEWPORT.x, (1.0 - ndc.y) / 2.0 * VIEWPORT.y)
}

// Bake the current pose, grab the tip row and pull it sideways, then step through the history
fn edit_top_row(session: &mut EditSession, segments: u32)
{
    session.bake();
    let view_projection = camera(session);

    let Some(top_left) = session.baked()
        .and_then(|b| b.meshes().first())
        .and_then(|m| m.mesh.vertices().get(segments as usize * 2))
        .map(|v| v.position)
    else
    {
        log::warn!("Baked snapshot has no top row");
        return;
    };

    // nudge inside the face so the hit isn't on the silhouette
    let grab = top_left + Vec3::new(rig::COLUMN_WIDTH / 4.0, -rig::SEGMENT_HEIGHT / 4.0, 0.0);
    let cursor = screen_point(view_projection, grab);

    let Some(hit) = session.hover(cursor, VIEWPORT, view_projection)
    else
    {
        log::warn!("Nothing under the cursor at {cursor}");
        return;
    };
    log::info!("Hovering face {} of mesh {} at {}", hit.face_index, hit.mesh_index, hit.point);

    session.select_hovered(SelectionMode::Edge);
    let top = segments as usize * 2;
    if let Some(vertex) = session.model().meshes().first().and_then(|m| m.vertices().get(top))
    {
        let bones = session.model().bones();
        let names: Vec<_> = vertex.influences.iter()
            .map(|i| (bones.name_of(i.bone).unwrap_or("?"), i.weight))
            .collect();
        log::info!("Grabbed vertex {top} is bound to {names:?}");
    }
    log::info!("Selected {} vertices, pivot {}", session.selection().len(),
        session.pivot_at(cursor, VIEWPORT, view_projection));

    if !session.begin_drag()
    {
        log::warn!("Could not start dragging");
        return;
    }
    let target = screen_point(view_projection, grab + Vec3::new(0.5, 0.0, 0.0));
    session.drag(target, VIEWPORT, view_projection);
    session.end_drag();
    log::info!("Dragged, history has {} change(s)", session.history().len());

    let dragged = bind_position(session, top);
    session.undo();
    let undone = bind_position(session, top);
    session.redo();
    log::info!("Bind position of the grabbed vertex: dragged {dragged:?}, undone {undone:?}");

    let welded = session.weld_vertices();
    log::info!("Welded {welded} duplicate vertices");
}

// What you SEE:
// • S starts the camera, X stops it. ESC quits.
// • With a curve loaded (--curve file.json, reloaded whenever the file changes),
//   the live feed is bent like a funhouse mirror.
// • R turns the distortion by 90°. M switches between the direct pixel warp and
//   handing the mirror to the external ray tracer. P saves a PNG snapshot.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;
use log::{debug, info, warn};
use minifb::Key;

use funhouse::camera::CameraCapture;
use funhouse::curve::{CurveData, CurveWatcher};
use funhouse::draw::{Drawer, draw_text_5x7};
use funhouse::raytrace::{ParamsFileRenderer, RayTraceParams, RenderConfig, SurfaceRenderer};
use funhouse::session::{RenderMode, Session};
use funhouse::{Error, FrameBuffer, Rotation, warp_into};

const CURVE_POLL: Duration = Duration::from_millis(500);

/// Live funhouse-mirror effect on a camera feed.
#[derive(Parser, Debug)]
#[command(name = "funhouse-mirror", version, about)]
struct Args {
    /// Camera device index.
    #[arg(long, default_value_t = 0)]
    camera: u32,

    /// Requested capture width (the camera may pick a close one).
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Requested capture height.
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Curve JSON written by the curve editor; watched for changes.
    #[arg(long, value_name = "FILE.json")]
    curve: Option<PathBuf>,

    /// Initial distortion rotation: 0, 90, 180 or 270.
    #[arg(long, default_value = "0", value_parser = parse_rotation)]
    rotation: Rotation,

    /// Where the ray tracer picks up its parameter set.
    #[arg(long, value_name = "FILE", default_value = "raytrace_params.json")]
    params_out: PathBuf,

    /// Ray tracer field of view in degrees.
    #[arg(long, default_value_t = RenderConfig::default().fov_degrees)]
    fov: f64,

    /// Distance from the viewer to the mirror, physical units.
    #[arg(long, default_value_t = RenderConfig::default().mirror_distance)]
    mirror_distance: f64,

    /// Directory for P snapshots.
    #[arg(long, value_name = "DIR", default_value = ".")]
    snapshot_dir: PathBuf,

    /// Start capturing immediately.
    #[arg(long)]
    autostart: bool,
}

fn parse_rotation(s: &str) -> Result<Rotation, String> {
    s.parse::<u16>()
        .ok()
        .and_then(Rotation::from_degrees)
        .ok_or_else(|| format!("rotation must be 0, 90, 180 or 270, got {s:?}"))
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    /* --- Camera + window setup ---
       Visual: an empty window the size of the camera feed. */
    let mut cam = CameraCapture::new(args.camera, args.width, args.height)?;
    let (w, h) = cam.resolution();
    let mut drawer = Drawer::new("Funhouse Mirror", w as usize, h as usize)?;

    /* --- Reusable screen buffer ---
       Visual: this is the image you actually see each frame. */
    let mut screen = FrameBuffer::new(w as usize, h as usize);

    /* --- Curve + ray tracer hand-off --- */
    let mut watcher = args.curve.as_deref().map(|p| CurveWatcher::new(p));
    let mut curve: Option<CurveData> = None;
    let mut last_curve_error: Option<String> = None;
    let mut last_curve_poll: Option<Instant> = None;

    let config = RenderConfig { fov_degrees: args.fov, mirror_distance: args.mirror_distance, ..RenderConfig::default() };
    let mut renderer = ParamsFileRenderer::new(&args.params_out);

    let mut session = Session::new(args.rotation);
    if args.autostart {
        start_capture(&mut session, &mut cam)?;
    }

    /* --- HUD / FPS --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();
        let mut resubmit = false;

        /* 1) Curve changes (polled, not every frame). */
        if let Some(watcher) = watcher.as_mut() {
            if last_curve_poll.is_none_or(|t| now.duration_since(t) >= CURVE_POLL) {
                last_curve_poll = Some(now);
                match watcher.poll().and_then(|c| c.map(|c| c.bounds.validate().map(|_| c)).transpose()) {
                    Ok(Some(new_curve)) => {
                        info!("curve loaded from {}: {} segment(s)", watcher.path().display(), new_curve.line_segments.len());
                        curve = Some(new_curve);
                        last_curve_error = None;
                        resubmit = true;
                    }
                    Ok(None) => {}
                    Err(e) => {
                        // Keep the previous curve; report each distinct problem once.
                        let msg = e.to_string();
                        if last_curve_error.as_deref() != Some(msg.as_str()) {
                            warn!("{msg}");
                            last_curve_error = Some(msg);
                        }
                    }
                }
            }
        }
        let has_curve = curve.as_ref().is_some_and(|c| !c.is_empty());

        /* 2) Inputs */
        if drawer.pressed_once(Key::S) {
            start_capture(&mut session, &mut cam)?;
        }
        if drawer.pressed_once(Key::X) && session.stop() {
            cam.stop()?;
            info!("capture stopped");
        }
        if drawer.pressed_once(Key::R) && session.rotate(has_curve) {
            info!("rotation {}°", session.rotation().degrees());
        }
        if drawer.pressed_once(Key::M) && session.toggle_mode() {
            info!("mode {}", session.mode().label());
            resubmit |= session.mode() == RenderMode::RayTraced;
        }
        if drawer.pressed_once(Key::P) {
            match save_snapshot(&screen, &args.snapshot_dir) {
                Ok(path) => info!("snapshot saved to {}", path.display()),
                Err(e) => warn!("{e}"),
            }
        }

        /* 3) Ray-traced mode: hand the mirror over once per curve change / mode switch. */
        if resubmit && session.mode() == RenderMode::RayTraced {
            let params = RayTraceParams::from_curve(curve.as_ref(), config);
            if let Err(e) = renderer.submit(&params) {
                warn!("{e}");
            }
        }

        /* 4) One tick: grab a frame and build what we show.
           Visual: stopped capture shows a black screen; no frames are read. */
        if session.should_tick() {
            let live = cam.next_frame()?;
            if (live.width, live.height) != (screen.width, screen.height) {
                screen = FrameBuffer::new(live.width, live.height);
            }
            match (session.mode(), curve.as_ref()) {
                (RenderMode::Direct, Some(c)) => {
                    // untouched pixels stay black, as with a fresh buffer
                    screen.pixels.fill(0);
                    warp_into(&live, c, session.rotation(), &mut screen)?;
                }
                // no curve, or the external ray tracer draws the mirror: show the live feed
                _ => screen.pixels.copy_from_slice(&live.pixels),
            }
            frames_this_second += 1;
        } else {
            screen.pixels.fill(0);
        }

        /* 5) HUD text */
        let status = if session.is_capturing() { session.mode().label() } else { "STOPPED" };
        let hud = format!(
            "{} | ROT {} | {} | S START X STOP R ROTATE M MODE P SNAP",
            status,
            session.rotation().degrees(),
            hud_fps_text
        );
        draw_text_5x7(&mut screen, 8, 8, &hud, 0xFFFF_FFFF);

        /* 6) Present to the window. */
        drawer.present(&screen)?;

        /* 7) FPS counter (log + HUD once per second) */
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            debug!("FPS: {:.1}", fps);
            hud_fps_text = format!("FPS: {:.1}", fps);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    if session.stop() {
        if let Err(e) = cam.stop() {
            warn!("{e}");
        }
    }
    Ok(())
}

fn start_capture(session: &mut Session, cam: &mut CameraCapture) -> Result<(), Error> {
    if session.start() {
        cam.start()?;
        info!("capture started");
    }
    Ok(())
}

fn save_snapshot(screen: &FrameBuffer, dir: &Path) -> Result<PathBuf, Error> {
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis()).unwrap_or_default();
    let path = dir.join(format!("snapshot_{millis}.png"));
    screen.to_rgba_image().save(&path)?;
    Ok(path)
}

// Runs the scene composer on a synthetic landmark stream: a face whose mouth
// opens and closes and a hand that sweeps over the target, closing into a fist
// every few frames. Pass a file path to save the last frame's overlay.
//
//   RUST_LOG=facescene=debug cargo run -- overlay.png

use image::RgbImage;
use nalgebra::{Matrix4, Vector3};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use facescene::game::target::Target;
use facescene::landmarks::topology::{face, hand};
use facescene::overlay::draw_frame;
use facescene::{
    Collaborator, FrameInput, Gesture, HandObservation, Landmark, LandmarkSet, PerspectiveCamera,
    SceneComposer, SceneConfig, Viewport,
};

const FRAME_WIDTH: u32 = 640;
const FRAME_HEIGHT: u32 = 480;
const FRAMES: usize = 240;

fn synthetic_face(t: f32) -> LandmarkSet {
    let mut points = vec![Landmark::new(0.5, 0.5, 0.0); face::MESH_POINTS];

    // lips: upper and lower arcs alternate along the ring
    let opening = 0.02 + 0.03 * (t * 2.0).sin().abs();
    let n = face::INNER_LIPS_RING.len();
    for (k, &i) in face::INNER_LIPS_RING.iter().enumerate() {
        let u = (k / 2) as f32 / (n / 2 - 1) as f32;
        let x = 0.42 + 0.16 * u;
        let arc = (u * std::f32::consts::PI).sin();
        let y = if k % 2 == 0 {
            0.64 - opening * arc
        } else {
            0.64 + opening * arc
        };
        points[i] = Landmark::new(x, y, -0.02);
    }

    let sway = 0.02 * (t * 0.5).sin();
    points[face::LEFT_CHEEK] = Landmark::new(0.3 + sway, 0.5, 0.0);
    points[face::RIGHT_CHEEK] = Landmark::new(0.7 + sway, 0.5, 0.0);
    points[face::FOREHEAD] = Landmark::new(0.5 + sway, 0.2, -0.05);
    points[face::CHIN] = Landmark::new(0.5 + sway, 0.8, 0.05);
    points[face::NOSE_TIP] = Landmark::new(0.5 + sway, 0.55, -0.08);
    points[face::NOSE_BRIDGE] = Landmark::new(0.5 + sway, 0.42, -0.04);

    points.into()
}

fn synthetic_hand(center: (f32, f32), frame: usize) -> HandObservation {
    let (cx, cy) = center;
    let mut points: Vec<Landmark> = (0..hand::POINTS)
        .map(|i| {
            let a = i as f32 / hand::POINTS as f32 * std::f32::consts::TAU;
            Landmark::new(cx + 0.06 * a.cos(), cy + 0.06 * a.sin(), 0.0)
        })
        .collect();

    // upright hand: the box runs from fingertip down to wrist
    points[hand::WRIST] = Landmark::new(cx, cy + 0.1, 0.0);
    points[hand::MIDDLE_FINGER_TIP] = Landmark::new(cx, cy - 0.12, 0.0);
    let landmarks = LandmarkSet::new(points);

    let gesture = if frame % 20 < 10 {
        Gesture::OpenPalm
    } else {
        Gesture::ClosedFist
    };

    HandObservation {
        hand: 0,
        landmarks,
        gesture,
        confidence: 0.9,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let overlay_path = std::env::args().nth(1);

    let viewport = Viewport::new(FRAME_WIDTH as f32, FRAME_HEIGHT as f32);
    let camera = PerspectiveCamera::for_frame(63.0, 0.01, 1000.0, FRAME_WIDTH, FRAME_HEIGHT)?;

    let mut config = SceneConfig::default();
    config.deform.enabled = true;
    config.deform.curvature = 4.0;
    config.game.seed = Some(7);

    let mut composer = SceneComposer::new(config, camera)?;
    composer.mark_ready(Collaborator::Camera);
    composer.mark_ready(Collaborator::Detector);
    composer.mark_ready(Collaborator::Renderer);

    let mut target: Option<Target> = None;
    let mut last = None;

    for frame in 0..FRAMES {
        let t = frame as f32 / 30.0;

        // the hand homes in on the current target
        let aim = target
            .map(|tg| (tg.position.x / viewport.width, tg.position.y / viewport.height))
            .unwrap_or((0.5, 0.5));

        let rotation = Matrix4::from_scaled_axis(Vector3::y() * 0.2 * t.sin());
        let input = FrameInput {
            faces: vec![synthetic_face(t)],
            transform: Some(Matrix4::new_translation(&Vector3::new(0.0, 0.0, -0.5)) * rotation),
            hands: vec![synthetic_hand(aim, frame)],
            viewport,
        };

        let output = composer.compose(&input)?;

        if let Some(surface) = &output.surface {
            debug!(
                frame,
                triangles = surface.mesh.triangle_count(),
                bytes = surface.mesh.as_bytes().len(),
                "surface updated"
            );
        }
        if let Some(pose) = &output.pose {
            debug!(frame, visible = pose.visible, "pose updated");
        }

        target = composer.game().map(|g| *g.target());
        last = Some((input, output));
    }

    let score = composer.game().map_or(0, |g| g.score());
    info!(score, frames = FRAMES, "demo finished");

    if let (Some(path), Some((input, output))) = (overlay_path, last) {
        let mut image = RgbImage::new(FRAME_WIDTH, FRAME_HEIGHT);
        draw_frame(&mut image, &input, &output, target.as_ref());
        image.save(&path)?;
        info!(%path, "overlay written");
    }

    Ok(())
}

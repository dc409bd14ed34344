use nalgebra::{Matrix4, Point3, Vector3};

use facescene::landmarks::topology::face;
use facescene::{
    Collaborator, ComposeError, FrameInput, GameEvent, Gesture, HandObservation, Landmark,
    LandmarkSet, PerspectiveCamera, SceneComposer, SceneConfig, Viewport,
};

const VIEWPORT: Viewport = Viewport::new(640.0, 480.0);

fn composer(config: SceneConfig) -> SceneComposer {
    let camera = PerspectiveCamera::for_frame(63.0, 0.01, 1000.0, 640, 480).unwrap();
    let mut composer = SceneComposer::new(config, camera).unwrap();
    composer.mark_ready(Collaborator::Detector);
    composer.mark_ready(Collaborator::Renderer);
    composer.mark_ready(Collaborator::Camera);
    composer
}

fn face_landmarks(mouth_open: f32) -> LandmarkSet {
    let mut points = vec![Landmark::new(0.5, 0.5, 0.0); face::MESH_POINTS];
    for (k, &i) in face::INNER_LIPS_RING.iter().enumerate() {
        let x = 0.42 + 0.016 * (k / 2) as f32;
        let y = if k % 2 == 0 { 0.64 - mouth_open } else { 0.64 + mouth_open };
        points[i] = Landmark::new(x, y, -0.02);
    }
    points[face::LEFT_CHEEK] = Landmark::new(0.3, 0.5, 0.0);
    points[face::RIGHT_CHEEK] = Landmark::new(0.7, 0.5, 0.0);
    points[face::FOREHEAD] = Landmark::new(0.5, 0.2, -0.05);
    points[face::CHIN] = Landmark::new(0.5, 0.8, 0.05);
    points.into()
}

fn full_frame_hand(gesture: Gesture) -> HandObservation {
    HandObservation {
        hand: 3,
        landmarks: vec![Landmark::new(0.0, 0.0, 0.0), Landmark::new(1.0, 1.0, 0.0)].into(),
        gesture,
        confidence: 0.8,
    }
}

#[test]
fn nothing_happens_before_everyone_is_ready() {
    let camera = PerspectiveCamera::for_frame(63.0, 0.01, 1000.0, 640, 480).unwrap();
    let mut composer = SceneComposer::new(SceneConfig::default(), camera).unwrap();
    composer.mark_ready(Collaborator::Renderer);

    assert!(matches!(
        composer.compose(&FrameInput::new(VIEWPORT)),
        Err(ComposeError::ResourceUnavailable(_))
    ));

    composer.mark_ready(Collaborator::Detector);
    composer.mark_ready(Collaborator::Camera);
    assert!(composer.is_ready());
    assert!(composer.compose(&FrameInput::new(VIEWPORT)).is_ok());

    composer.mark_unavailable(Collaborator::Camera);
    assert_eq!(
        composer.compose(&FrameInput::new(VIEWPORT)),
        Err(ComposeError::ResourceUnavailable(Collaborator::Camera))
    );
}

#[test]
fn mesh_follows_mouth_without_drift() {
    let mut config = SceneConfig::default();
    config.deform.enabled = true;
    config.deform.curvature = 3.0;
    let mut composer = composer(config);

    let frame = |open| FrameInput {
        faces: vec![face_landmarks(open)],
        transform: Some(Matrix4::identity()),
        ..FrameInput::new(VIEWPORT)
    };

    let first = composer.compose(&frame(0.02)).unwrap().surface.unwrap();
    composer.compose(&frame(0.05)).unwrap();
    let again = composer.compose(&frame(0.02)).unwrap().surface.unwrap();

    // same landmarks produce the same deformed surface on any frame
    assert_eq!(first.mesh, again.mesh);
    assert_eq!(first.mesh.triangle_count(), 18);
    assert_eq!(first.mesh.as_bytes().len(), 54 * std::mem::size_of::<facescene::Vertex>());
}

#[test]
fn object_tracks_face_and_hides_when_lost() {
    let mut composer = composer(SceneConfig::default());
    let transform = Matrix4::new_translation(&Vector3::new(0.0, 0.0, -2.0));

    let visible = composer
        .compose(&FrameInput {
            faces: vec![face_landmarks(0.03)],
            transform: Some(transform),
            ..FrameInput::new(VIEWPORT)
        })
        .unwrap()
        .pose
        .unwrap();
    assert!(visible.visible);
    assert!(!visible.matrix_auto_update);
    let origin = visible.matrix.transform_point(&Point3::origin());
    assert!(origin.z < -1.0);

    let hidden = composer.compose(&FrameInput::new(VIEWPORT)).unwrap().pose.unwrap();
    assert!(!hidden.visible);
    assert_eq!(hidden.matrix, visible.matrix);
}

#[test]
fn fist_cycles_score_once_per_closing() {
    let mut config = SceneConfig::default();
    config.game.seed = Some(99);
    let mut composer = composer(config);

    let gestures = [
        Gesture::OpenPalm,
        Gesture::ClosedFist,
        Gesture::ClosedFist,
        Gesture::OpenPalm,
        Gesture::ClosedFist,
        Gesture::from_label("Closed_Fist"),
    ];

    let mut events = Vec::new();
    for g in gestures {
        let out = composer
            .compose(&FrameInput {
                hands: vec![full_frame_hand(g)],
                ..FrameInput::new(VIEWPORT)
            })
            .unwrap();
        events.extend(out.events);
    }

    let scores: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::ScoreChanged(s) => Some(*s),
            _ => None,
        })
        .collect();
    assert_eq!(scores, vec![1, 2]);

    let spawns = events
        .iter()
        .filter(|e| matches!(e, GameEvent::TargetSpawned(_)))
        .count();
    assert_eq!(spawns, 3);
}

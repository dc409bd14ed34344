//! Debug overlay: draws landmarks, hand boxes and the live target onto a
//! camera frame.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_cross_mut, draw_hollow_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::composer::{FrameInput, FrameOutput};
use crate::game::hit::BoundingBox;
use crate::game::target::Target;
use crate::game::HandReport;
use crate::landmarks::LandmarkSet;

pub const LANDMARK_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const HAND_COLOR: Rgb<u8> = Rgb([255, 255, 0]);
pub const HIT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const TARGET_COLOR: Rgb<u8> = Rgb([0, 128, 255]);

/// Draws a cross for every landmark; coordinates are normalized to the image.
pub fn draw_landmarks(image: &mut RgbImage, landmarks: &LandmarkSet, color: Rgb<u8>) {
    let (w, h) = (image.width() as f32, image.height() as f32);
    for landmark in landmarks.iter() {
        draw_cross_mut(image, color, (landmark.x * w) as i32, (landmark.y * h) as i32);
    }
}

pub fn draw_box(image: &mut RgbImage, bbox: &BoundingBox, color: Rgb<u8>) {
    // imageproc rejects zero-sized rects
    let rect = Rect::at(bbox.origin_x as i32, bbox.origin_y as i32)
        .of_size((bbox.width as u32).max(1), (bbox.height as u32).max(1));
    draw_hollow_rect_mut(image, rect, color);
}

pub fn draw_hands(image: &mut RgbImage, hands: &[HandReport]) {
    for report in hands {
        if let Some(bbox) = report.bbox {
            let color = if report.hit { HIT_COLOR } else { HAND_COLOR };
            draw_box(image, &bbox, color);
        }
    }
}

pub fn draw_target(image: &mut RgbImage, target: &Target, color: Rgb<u8>) {
    let center = (target.position.x as i32, target.position.y as i32);
    draw_hollow_circle_mut(image, center, target.radius.max(1.0) as i32, color);
    draw_cross_mut(image, color, center.0, center.1);
}

/// Draws everything known about one composed frame.
pub fn draw_frame(
    image: &mut RgbImage,
    input: &FrameInput,
    output: &FrameOutput,
    target: Option<&Target>,
) {
    for face in input.faces.iter() {
        draw_landmarks(image, face, LANDMARK_COLOR);
    }

    for hand in input.hands.iter() {
        draw_landmarks(image, &hand.landmarks, HAND_COLOR);
    }
    draw_hands(image, &output.hands);

    if let Some(target) = target {
        draw_target(image, target, TARGET_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Point2;

    use super::*;
    use crate::landmarks::Landmark;

    fn blank() -> RgbImage {
        RgbImage::new(64, 48)
    }

    #[test]
    fn landmark_cross_is_drawn_at_pixel_position() {
        let mut image = blank();
        let set: LandmarkSet = vec![Landmark::new(0.5, 0.5, 0.0)].into();
        draw_landmarks(&mut image, &set, LANDMARK_COLOR);

        assert_eq!(*image.get_pixel(32, 24), LANDMARK_COLOR);
        assert_eq!(*image.get_pixel(0, 0), Rgb([0, 0, 0]));
    }

    #[test]
    fn box_outline_uses_hit_color() {
        let mut image = blank();
        let report = HandReport {
            hand: 0,
            bbox: Some(BoundingBox::new(10.0, 10.0, 20.0, 10.0)),
            hit_tested: true,
            hit: true,
        };
        draw_hands(&mut image, &[report]);

        assert_eq!(*image.get_pixel(10, 10), HIT_COLOR);
        assert_eq!(*image.get_pixel(29, 19), HIT_COLOR);
        // interior untouched
        assert_eq!(*image.get_pixel(20, 15), Rgb([0, 0, 0]));
    }

    #[test]
    fn zero_sized_box_still_draws() {
        let mut image = blank();
        draw_box(&mut image, &BoundingBox::new(5.0, 5.0, 0.0, 0.0), HAND_COLOR);
        assert_eq!(*image.get_pixel(5, 5), HAND_COLOR);
    }

    #[test]
    fn target_marks_its_center() {
        let mut image = blank();
        let target = Target {
            id: 0,
            position: Point2::new(30.0, 20.0),
            radius: 8.0,
        };
        draw_target(&mut image, &target, TARGET_COLOR);

        assert_eq!(*image.get_pixel(30, 20), TARGET_COLOR);
        assert_eq!(*image.get_pixel(38, 20), TARGET_COLOR);
    }
}

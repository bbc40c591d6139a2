//! Bounding box overlay for the annotated copy.

use image::{Rgb, RgbImage};
use log::warn;

use crate::config::AnnotationPolicy;
use crate::model::Detection;
use crate::sampling::Frame;

const BOX_THICKNESS: u32 = 2;

const PALETTE: [Rgb<u8>; 6] = [
    Rgb([0, 255, 0]),
    Rgb([255, 64, 64]),
    Rgb([64, 160, 255]),
    Rgb([255, 200, 0]),
    Rgb([255, 0, 255]),
    Rgb([0, 255, 255]),
];

/// Draws detections onto frames according to an [`AnnotationPolicy`].
#[derive(Debug, Clone)]
pub struct Annotator {
    policy: AnnotationPolicy,
    held: Vec<Detection>,
}

impl Annotator {
    pub fn new(policy: AnnotationPolicy) -> Self {
        Self {
            policy,
            held: Vec::new(),
        }
    }

    /// Annotates `frame` in place. `detections` is the detector output for
    /// sampled frames and `None` for the rest.
    pub fn annotate(&mut self, frame: &mut Frame, detections: Option<&[Detection]>) {
        let boxes: &[Detection] = match (self.policy, detections) {
            (AnnotationPolicy::HoldLast, Some(current)) => {
                self.held = current.to_vec();
                &self.held
            }
            (AnnotationPolicy::HoldLast, None) => &self.held,
            (AnnotationPolicy::SampledOnly, Some(current)) => current,
            (AnnotationPolicy::SampledOnly, None) => &[],
        };
        if boxes.is_empty() {
            return;
        }

        let (width, height) = (frame.image.width, frame.image.height);
        if frame.image.data.len() != width as usize * height as usize * 3 {
            warn!(
                "Frame {}: {} byte(s) do not match {}x{} RGB, left unannotated",
                frame.index,
                frame.image.data.len(),
                width,
                height
            );
            return;
        }
        let data = std::mem::take(&mut frame.image.data);
        let Some(mut canvas) = RgbImage::from_raw(width, height, data) else {
            return;
        };
        for detection in boxes {
            let color = PALETTE[(detection.track_id % PALETTE.len() as u64) as usize];
            draw_box(&mut canvas, detection, color);
        }
        frame.image.data = canvas.into_raw();
    }
}

fn draw_box(canvas: &mut RgbImage, detection: &Detection, color: Rgb<u8>) {
    let (width, height) = canvas.dimensions();
    if width == 0 || height == 0 {
        return;
    }
    let clamp_x = |v: f32| (v.max(0.0) as u32).min(width - 1);
    let clamp_y = |v: f32| (v.max(0.0) as u32).min(height - 1);
    let (x1, y1, x2, y2) = detection.bbox.corners();
    let (left, top, right, bottom) = (clamp_x(x1), clamp_y(y1), clamp_x(x2), clamp_y(y2));

    for t in 0..BOX_THICKNESS {
        for x in left..=right {
            canvas.put_pixel(x, (top + t).min(bottom), color);
            canvas.put_pixel(x, bottom.saturating_sub(t).max(top), color);
        }
        for y in top..=bottom {
            canvas.put_pixel((left + t).min(right), y, color);
            canvas.put_pixel(right.saturating_sub(t).max(left), y, color);
        }
    }
}

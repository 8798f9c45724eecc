use crate::core::model::Detection;

/// Clamp an engine-reported score into `[0, 1]`; NaN counts as no confidence.
pub fn clamp_confidence(score: f32) -> f32 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

pub fn mean_confidence(detections: &[Detection]) -> Option<f32> {
    if detections.is_empty() {
        return None;
    }
    let total: f32 = detections
        .iter()
        .map(|detection| clamp_confidence(detection.confidence))
        .sum();
    Some(total / detections.len() as f32)
}

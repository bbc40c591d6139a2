//! Stream probing through the `ffprobe` crate.

use ffprobe::{FfProbeError, ffprobe};
use log::debug;

use std::path::Path;

use crate::error::{CoreError, CoreResult};
use crate::sampling::VideoInfo;

/// Reads dimensions, frame rate and (when declared) frame count of the first
/// video stream. Any failure is reported as a decode error for `input_path`.
pub fn probe_video(input_path: &Path) -> CoreResult<VideoInfo> {
    debug!("Probing {}", input_path.display());
    let video = input_path.display().to_string();
    let metadata = ffprobe(input_path).map_err(|e| map_ffprobe_error(&video, e))?;

    let stream = metadata
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| CoreError::decode(&video, "no video stream found"))?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w as u32, h as u32),
        (w, h) => {
            return Err(CoreError::decode(
                &video,
                format!("invalid dimensions {:?}x{:?}", w, h),
            ));
        }
    };

    let fps = parse_frame_rate(&stream.avg_frame_rate)
        .or_else(|| parse_frame_rate(&stream.r_frame_rate))
        .unwrap_or(0.0);
    let frame_count = stream
        .nb_frames
        .as_deref()
        .and_then(|n| n.parse::<u64>().ok());

    Ok(VideoInfo {
        width,
        height,
        fps,
        frame_count,
    })
}

/// Parses ffprobe rates such as `30000/1001` or `25`.
pub(crate) fn parse_frame_rate(rate: &str) -> Option<f64> {
    let value = match rate.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => rate.trim().parse().ok()?,
    };
    (value.is_finite() && value > 0.0).then_some(value)
}

fn map_ffprobe_error(video: &str, err: FfProbeError) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => CoreError::decode(video, format!("failed to run ffprobe: {}", io_err)),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            CoreError::decode(video, stderr.trim().to_string())
        }
        FfProbeError::Deserialize(err) => {
            CoreError::decode(video, format!("unreadable ffprobe output: {}", err))
        }
        other => CoreError::decode(video, format!("{:?}", other)),
    }
}

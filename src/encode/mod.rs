//! VP9 encoding through the system `ffmpeg`.

/// `ffmpeg`/libvpx-vp9 candidate encoder.
pub mod ffmpeg;

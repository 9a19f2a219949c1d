use image::codecs::avif::AvifEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder as _};

use crate::config::{EncodeSettings, PngCompression};
use crate::foundation::core::OutputFormat;
use crate::foundation::error::{TurntableError, TurntableResult};
use crate::render::backend::FrameRGBA;

/// Encode `frame` into the bytes of one output format.
///
/// The frame is validated first; encoders are never handed a buffer whose length disagrees with
/// its dimensions.
pub fn encode_image(
    frame: &FrameRGBA,
    format: OutputFormat,
    settings: &EncodeSettings,
) -> TurntableResult<Vec<u8>> {
    frame
        .validate()
        .map_err(|e| TurntableError::encode(format!("{format}: {e}")))?;

    let mut out = Vec::new();
    let res = match format {
        OutputFormat::Avif => AvifEncoder::new_with_speed_quality(
            &mut out,
            settings.avif_speed,
            settings.avif_quality,
        )
        .write_image(&frame.data, frame.width, frame.height, ExtendedColorType::Rgba8),
        OutputFormat::Webp => WebPEncoder::new_lossless(&mut out).write_image(
            &frame.data,
            frame.width,
            frame.height,
            ExtendedColorType::Rgba8,
        ),
        OutputFormat::Png => PngEncoder::new_with_quality(
            &mut out,
            png_compression(settings.png_compression),
            png_filter(settings.png_adaptive_filtering),
        )
        .write_image(&frame.data, frame.width, frame.height, ExtendedColorType::Rgba8),
    };
    res.map_err(|e| TurntableError::encode(format!("{format}: {e}")))?;

    if out.is_empty() {
        return Err(TurntableError::encode(format!(
            "{format}: encoder produced no bytes"
        )));
    }
    Ok(out)
}

fn png_compression(c: PngCompression) -> CompressionType {
    match c {
        PngCompression::Fast => CompressionType::Fast,
        PngCompression::Default => CompressionType::Default,
        PngCompression::Best => CompressionType::Best,
    }
}

fn png_filter(adaptive: bool) -> FilterType {
    if adaptive {
        FilterType::Adaptive
    } else {
        FilterType::NoFilter
    }
}

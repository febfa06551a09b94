use std::{fs, path::PathBuf};

use image::{
	codecs::{
		png::{CompressionType, FilterType as PngFilter, PngEncoder},
		webp::WebPEncoder,
	},
	imageops::FilterType,
	DynamicImage,
};
use tracing::info;

use crate::{config::ImageOptions, persist, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
	WebP,
	Png,
}

impl Encoding {
	pub const ALL: [Encoding; 2] = [Encoding::WebP, Encoding::Png];

	#[must_use]
	pub fn extension(self) -> &'static str {
		match self {
			Encoding::WebP => "webp",
			Encoding::Png => "png",
		}
	}

	pub fn encode(self, image: &DynamicImage) -> Result<Vec<u8>> {
		let mut bytes = Vec::new();
		match self {
			// The pure-Rust WebP encoder is lossless-only and takes 8-bit RGB(A).
			Encoding::WebP => DynamicImage::ImageRgba8(image.to_rgba8())
				.write_with_encoder(WebPEncoder::new_lossless(&mut bytes))?,
			Encoding::Png => image.write_with_encoder(PngEncoder::new_with_quality(
				&mut bytes,
				CompressionType::Best,
				PngFilter::Adaptive,
			))?,
		}
		Ok(bytes)
	}
}

/// `{stem}-{size}w.{ext}`
#[must_use]
pub fn variant_name(stem: &str, size: u32, encoding: Encoding) -> String {
	format!("{stem}-{size}w.{}", encoding.extension())
}

/// Writes a square WebP and PNG of the source image for every configured
/// size. The source is scaled to cover the square and center-cropped.
pub fn generate(options: &ImageOptions) -> Result<Vec<PathBuf>> {
	info!(source = %options.source.display(), "generating image variants");
	let source = image::open(&options.source)?;
	fs::create_dir_all(&options.out_dir)?;

	let mut written = Vec::with_capacity(options.sizes.len() * Encoding::ALL.len());
	for &size in &options.sizes {
		let resized = source.resize_to_fill(size, size, FilterType::Lanczos3);
		for encoding in Encoding::ALL {
			let path = options.out_dir.join(variant_name(&options.stem, size, encoding));
			persist::write_atomic(&path, &encoding.encode(&resized)?)?;
			written.push(path);
		}
		info!("generated {size}x{size} images");
	}
	info!(count = written.len(), "image variants complete");
	Ok(written)
}

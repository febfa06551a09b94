use crate::{Error, Result};

/// The comment pair that delimits a managed region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
	pub start: String,
	pub end: String,
}

impl Markers {
	/// `<!-- {name}_START -->` / `<!-- {name}_END -->`
	#[must_use]
	pub fn named(name: &str) -> Self {
		Self {
			start: format!("<!-- {name}_START -->"),
			end: format!("<!-- {name}_END -->"),
		}
	}

	/// Byte range of the first start marker through the first end marker after it.
	fn locate(&self, document: &str) -> Option<(usize, usize)> {
		let start = document.find(&self.start)?;
		let after_start = start + self.start.len();
		let end = document[after_start..].find(&self.end)? + after_start + self.end.len();
		Some((start, end))
	}
}

/// Text between the first marker pair, if there is one.
pub fn managed_region<'a>(document: &'a str, markers: &Markers) -> Option<&'a str> {
	let (start, end) = markers.locate(document)?;
	Some(&document[start + markers.start.len()..end - markers.end.len()])
}

/// Replaces the first marker-delimited region (markers included) with the
/// markers around `fragments`. Everything outside the region is kept as is.
pub fn splice(document: &str, markers: &Markers, fragments: &str) -> Result<String> {
	let (start, end) = markers.locate(document).ok_or_else(|| Error::MarkerNotFound {
		start: markers.start.clone(),
		end: markers.end.clone(),
	})?;
	let mut spliced = String::with_capacity(document.len() + fragments.len());
	spliced.push_str(&document[..start]);
	spliced.push_str(&markers.start);
	spliced.push('\n');
	spliced.push_str(fragments);
	spliced.push_str("\n    ");
	spliced.push_str(&markers.end);
	spliced.push_str(&document[end..]);
	Ok(spliced)
}

//! Canonical text form: `[address?]k1=v1&k2=v2`.
//!
//! Keys, values and the address use `application/x-www-form-urlencoded`
//! escaping, so `?`, `&`, `=`, `%` and `+` never appear raw inside a
//! component. The first raw `?` therefore always separates the address from
//! the query, and an addressed envelope always carries one, even with no
//! parameters.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use url::form_urlencoded;

use crate::{Builder, Envelope, EnvelopeError, Result};

/// How strictly [`Envelope::parse_with`] treats foreign text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
	/// Reject malformed escapes, escapes that decode to invalid UTF-8, and
	/// reserved characters in the address.
	#[default]
	Strict,
	/// Keep malformed escapes literally and replace invalid UTF-8 lossily.
	Lenient,
}

impl fmt::Display for Envelope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if let Some(address) = self.address() {
			write_component(f, address)?;
			f.write_str("?")?;
		}
		for (i, (key, value)) in self.iter().enumerate() {
			if i > 0 {
				f.write_str("&")?;
			}
			write_component(f, key)?;
			f.write_str("=")?;
			write_component(f, value)?;
		}
		Ok(())
	}
}

fn write_component(f: &mut fmt::Formatter<'_>, raw: &str) -> fmt::Result {
	for chunk in form_urlencoded::byte_serialize(raw.as_bytes()) {
		f.write_str(chunk)?;
	}
	Ok(())
}

pub(crate) fn parse(text: &str, mode: ParseMode) -> Result<Envelope> {
	if mode == ParseMode::Strict {
		check_escapes(text)?;
	}

	let mut builder = Builder::new();
	let (query, query_offset) = match text.split_once('?') {
		Some((address, query)) => {
			if mode == ParseMode::Strict {
				check_address(address)?;
				check_utf8(address, 0)?;
			}
			builder.address(decode_address(address));
			(query, address.len() + 1)
		}
		None => (text, 0),
	};

	if mode == ParseMode::Strict {
		let mut offset = query_offset;
		for pair in query.split('&') {
			check_utf8(pair, offset)?;
			offset += pair.len() + 1;
		}
	}

	// Duplicate keys in foreign text resolve like repeated `add_param` calls.
	builder.extend_params(form_urlencoded::parse(query.as_bytes()));
	Ok(builder.build())
}

fn check_escapes(text: &str) -> Result<()> {
	let bytes = text.as_bytes();
	for (offset, &b) in bytes.iter().enumerate() {
		if b != b'%' {
			continue;
		}
		let valid = matches!(
			bytes.get(offset + 1..offset + 3),
			Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()
		);
		if !valid {
			return Err(EnvelopeError::MalformedEscape { offset });
		}
	}
	Ok(())
}

fn check_address(address: &str) -> Result<()> {
	match address.char_indices().find(|&(_, c)| c == '&' || c == '=') {
		Some((offset, ch)) => Err(EnvelopeError::ReservedInAddress { ch, offset }),
		None => Ok(()),
	}
}

/// Rejects a component whose escaped bytes do not decode to UTF-8.
///
/// `form_urlencoded` decodes lossily, so the bytes are unescaped here first.
/// Escapes are already known to be well formed.
fn check_utf8(raw: &str, offset: usize) -> Result<()> {
	let mut decoded = Vec::with_capacity(raw.len());
	let mut rest = raw.as_bytes();
	while let Some((&b, tail)) = rest.split_first() {
		let escaped = match (b, tail) {
			(b'%', [hi, lo, ..]) => hex_value(*hi).zip(hex_value(*lo)),
			_ => None,
		};
		match escaped {
			Some((hi, lo)) => {
				decoded.push((hi << 4) | lo);
				rest = &tail[2..];
			}
			None => {
				decoded.push(b);
				rest = tail;
			}
		}
	}

	match std::str::from_utf8(&decoded) {
		Ok(_) => Ok(()),
		Err(_) => Err(EnvelopeError::InvalidUtf8 { offset }),
	}
}

fn hex_value(b: u8) -> Option<u8> {
	(b as char).to_digit(16).map(|d| d as u8)
}

/// Decodes the address as a lone key.
///
/// Lenient input may carry a raw `&` or `=`; only the key of the first pair
/// survives then.
fn decode_address(raw: &str) -> String {
	// An escaped address holds no raw `&` or `=`, so it decodes as a lone key.
	form_urlencoded::parse(raw.as_bytes())
		.next()
		.map(|(key, _)| key.into_owned())
		.unwrap_or_default()
}

impl FromStr for Envelope {
	type Err = EnvelopeError;

	fn from_str(s: &str) -> Result<Self> {
		Envelope::parse(s)
	}
}

impl Serialize for Envelope {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for Envelope {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
		struct EnvelopeVisitor;

		impl Visitor<'_> for EnvelopeVisitor {
			type Value = Envelope;

			fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str("an envelope in canonical text form")
			}

			fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Envelope, E> {
				Envelope::parse(v).map_err(E::custom)
			}
		}

		deserializer.deserialize_str(EnvelopeVisitor)
	}
}

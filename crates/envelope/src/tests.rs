use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use super::{Builder, Envelope, EnvelopeError, ParseMode, Params};

fn pairs(envelope: &Envelope) -> Vec<(String, String)> {
	let mut out: Vec<_> = envelope
		.iter()
		.map(|(k, v)| (k.to_string(), v.to_string()))
		.collect();
	out.sort();
	out
}

#[test]
fn add_param_overwrites() {
	let envelope = Builder::new()
		.add_param("a", "1")
		.add_param("b", "2")
		.add_param("a", "3")
		.build();
	assert_eq!(envelope.get("a"), Some("3"));
	assert_eq!(envelope.get("b"), Some("2"));
	assert_eq!(envelope.len(), 2);
}

#[test]
fn overwrite_keeps_first_position() {
	let envelope = Builder::new()
		.add_param("a", "1")
		.add_param("b", "2")
		.add_param("a", "3")
		.build();
	assert_eq!(envelope.to_string(), "a=3&b=2");
}

#[test]
fn build_snapshots_are_isolated() {
	let mut builder = Builder::new();
	builder.add_param("a", "1");
	let first = builder.build();
	builder.add_param("b", "2");
	let second = builder.build();

	assert_eq!(first.len(), 1);
	assert!(!first.contains_key("b"));
	assert_eq!(second.get("b"), Some("2"));
	assert_ne!(first, second);
}

#[test]
fn to_builder_copies_entries() {
	let original = Builder::new()
		.address("app://home")
		.add_param("a", "1")
		.build();
	let extended = original.to_builder().with_param("b", "2").build();

	assert_eq!(original.len(), 1);
	assert_eq!(extended.address(), Some("app://home"));
	assert_eq!(extended.get("a"), Some("1"));
	assert_eq!(extended.get("b"), Some("2"));
}

#[test]
fn remove_param_drops_key() {
	let mut builder = Envelope::builder().with_param("a", "1").with_param("b", "2");
	assert_eq!(builder.remove_param("a"), Some("1".to_string()));
	assert_eq!(builder.remove_param("missing"), None);
	assert_eq!(builder.build().to_string(), "b=2");
}

#[test]
fn empty_value_is_legal() {
	let envelope = Builder::new().add_param("flag", "").build();
	assert_eq!(envelope.get("flag"), Some(""));
	assert_eq!(Envelope::parse(&envelope.to_string()).unwrap(), envelope);
}

#[test]
fn equality_ignores_order() {
	let a = Builder::new().add_param("x", "1").add_param("y", "2").build();
	let b = Builder::new().add_param("y", "2").add_param("x", "1").build();
	assert_eq!(a, b);
}

#[test]
fn merged_overrides_and_preserves() {
	let base = Builder::new().add_param("a", "1").add_param("c", "3").build();
	let merged = base.merged([("a", "2"), ("b", "4")]);

	assert_eq!(merged.get("a"), Some("2"));
	assert_eq!(merged.get("b"), Some("4"));
	assert_eq!(merged.get("c"), Some("3"));
	assert_eq!(base.get("a"), Some("1"));
}

#[test]
fn merged_with_nothing_is_identity() {
	let base = Builder::new().add_param("a", "1").build();
	assert_eq!(base.merged(Params::new()), base);
}

#[rstest]
#[case("value&with=delims")]
#[case("100% sure")]
#[case("a+b")]
#[case("what?")]
#[case("#fragment")]
#[case("")]
#[case("ünïcødé ☃")]
#[case("line\nbreak")]
fn value_survives_round_trip(#[case] value: &str) {
	let envelope = Builder::new().add_param("k", value).build();
	let text = envelope.to_string();
	assert_eq!(Envelope::parse(&text).unwrap().get("k"), Some(value));
}

#[rstest]
#[case("key&with=delims")]
#[case("")]
#[case("?")]
fn key_survives_round_trip(#[case] key: &str) {
	let envelope = Builder::new().add_param(key, "v").build();
	let parsed = Envelope::parse(&envelope.to_string()).unwrap();
	assert_eq!(parsed.get(key), Some("v"));
}

#[test]
fn delimiters_are_escaped() {
	let envelope = Builder::new().add_param("q", "value&with=delims").build();
	assert_eq!(envelope.to_string(), "q=value%26with%3Ddelims");
}

#[test]
fn plain_text_form() {
	let envelope = Builder::new()
		.add_param("status", "ok")
		.add_param("id", "42")
		.build();
	assert_eq!(envelope.to_string(), "status=ok&id=42");
}

#[test]
fn addressed_text_form() {
	let envelope = Builder::new()
		.address("app://user/profile")
		.add_param("id", "7")
		.build();
	let text = envelope.to_string();
	assert_eq!(text, "app%3A%2F%2Fuser%2Fprofile?id=7");
	assert_eq!(Envelope::parse(&text).unwrap(), envelope);
}

#[test]
fn address_without_params_keeps_separator() {
	let envelope = Builder::new().address("app://home").build();
	let text = envelope.to_string();
	assert!(text.ends_with('?'));
	let parsed = Envelope::parse(&text).unwrap();
	assert_eq!(parsed.address(), Some("app://home"));
	assert!(parsed.is_empty());
}

#[test]
fn empty_envelope_round_trip() {
	assert_eq!(Envelope::empty().to_string(), "");
	assert_eq!(Envelope::parse("").unwrap(), Envelope::empty());
}

#[test]
fn parse_pair_without_equals() {
	let parsed = Envelope::parse("flag&a=1").unwrap();
	assert_eq!(parsed.get("flag"), Some(""));
	assert_eq!(parsed.get("a"), Some("1"));
}

#[test]
fn parse_duplicate_keys_last_wins() {
	let parsed = Envelope::parse("a=1&a=2").unwrap();
	assert_eq!(parsed.get("a"), Some("2"));
	assert_eq!(parsed.len(), 1);
}

#[test]
fn parse_rejects_malformed_escape() {
	assert_eq!(
		Envelope::parse("a=%zz"),
		Err(EnvelopeError::MalformedEscape { offset: 2 })
	);
	assert_eq!(
		Envelope::parse("a=%4"),
		Err(EnvelopeError::MalformedEscape { offset: 2 })
	);
}

#[rstest]
#[case("a=%FF", 0)]
#[case("x=1&a=%C3", 4)]
#[case("%FF%FE=1", 0)]
#[case("%C3%28?k=v", 0)]
#[case("app?k=v&%80=1", 8)]
fn parse_rejects_invalid_utf8_escape(#[case] text: &str, #[case] offset: usize) {
	assert_eq!(
		Envelope::parse(text),
		Err(EnvelopeError::InvalidUtf8 { offset })
	);
}

#[test]
fn parse_accepts_escaped_multibyte() {
	let parsed = Envelope::parse("k=%E2%98%83&r=%EF%BF%BD").unwrap();
	assert_eq!(parsed.get("k"), Some("☃"));
	assert_eq!(parsed.get("r"), Some("\u{FFFD}"));
}

#[test]
fn lenient_replaces_invalid_utf8() {
	let parsed = Envelope::parse_with("a=%FF", ParseMode::Lenient).unwrap();
	assert_eq!(parsed.get("a"), Some("\u{FFFD}"));
}

#[rstest]
#[case("home&tab=2?k=v", "home")]
#[case("home=x?k=v", "home")]
fn lenient_address_keeps_first_key(#[case] text: &str, #[case] address: &str) {
	let parsed = Envelope::parse_with(text, ParseMode::Lenient).unwrap();
	assert_eq!(parsed.address(), Some(address));
	assert_eq!(parsed.get("k"), Some("v"));
	assert_eq!(parsed.len(), 1);
}

#[test]
fn builder_accessors_track_staged_state() {
	let mut builder = Builder::new();
	assert!(builder.is_empty());
	builder.address("app://home").add_param("a", "1").add_param("b", "2");
	assert_eq!(builder.get("a"), Some("1"));
	assert_eq!(builder.get("missing"), None);
	assert_eq!(builder.len(), 2);

	builder.clear_address();
	let envelope = builder.build();
	assert_eq!(envelope.address(), None);
	assert_eq!(envelope.to_string(), "a=1&b=2");
}

#[test]
fn parse_rejects_reserved_in_address() {
	assert_eq!(
		Envelope::parse("a=b?c=d"),
		Err(EnvelopeError::ReservedInAddress { ch: '=', offset: 1 })
	);
}

#[test]
fn lenient_keeps_malformed_escape() {
	let parsed = Envelope::parse_with("a=%zz", ParseMode::Lenient).unwrap();
	assert_eq!(parsed.get("a"), Some("%zz"));
}

#[test]
fn from_str_matches_parse() {
	let parsed: Envelope = "a=1&b=2".parse().unwrap();
	assert_eq!(parsed, Envelope::parse("a=1&b=2").unwrap());
}

#[test]
fn serde_uses_text_form() {
	let envelope = Builder::new()
		.add_param("q", "x&y")
		.add_param("n", "1")
		.build();
	let json = serde_json::to_string(&envelope).unwrap();
	assert_eq!(json, r#""q=x%26y&n=1""#);
	let back: Envelope = serde_json::from_str(&json).unwrap();
	assert_eq!(back, envelope);
}

#[test]
fn serde_rejects_malformed_text() {
	assert!(serde_json::from_str::<Envelope>(r#""a=%g1""#).is_err());
}

#[test]
fn parse_mode_deserializes_lowercase() {
	let mode: ParseMode = serde_json::from_str(r#""lenient""#).unwrap();
	assert_eq!(mode, ParseMode::Lenient);
}

proptest! {
	#[test]
	fn text_round_trip(
		address in proptest::option::of(any::<String>()),
		entries in proptest::collection::vec((any::<String>(), any::<String>()), 0..8),
	) {
		let mut builder = Builder::new();
		if let Some(address) = address {
			builder.address(address);
		}
		builder.extend_params(entries);
		let envelope = builder.build();

		let parsed = Envelope::parse(&envelope.to_string()).unwrap();
		prop_assert_eq!(pairs(&parsed), pairs(&envelope));
		prop_assert_eq!(parsed, envelope);
	}

	#[test]
	fn merge_is_last_writer_wins(
		base in proptest::collection::vec(("[a-d]", "[0-9]"), 0..6),
		update in proptest::collection::vec(("[a-d]", "[0-9]"), 0..6),
	) {
		let envelope = Builder::new().extend_params(base.clone()).build();
		let merged = envelope.merged(update.clone());

		let mut expected = Params::new();
		expected.extend(base);
		expected.extend(update);
		prop_assert_eq!(merged.params(), &expected);
	}
}

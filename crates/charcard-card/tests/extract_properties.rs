//! Behaviour of character extraction on whole containers.

use charcard_card::{
    embed_record, extract, import_bytes, CharacterRecord, Error, ExtractOptions, Extractor,
    PayloadEncoding, PayloadMode, ScanStrategy,
};
use charcard_png::{ChunkTag, PngWriter};
use proptest::prelude::*;
use serde_json::{json, Value};

fn base_png() -> Vec<u8> {
    PngWriter::new()
        .chunk(ChunkTag::IHDR, &[0, 0, 0, 4, 0, 0, 0, 4, 8, 6, 0, 0, 0])
        .unwrap()
        .chunk(ChunkTag::IDAT, &[0x78, 0x9C, 0x01, 0x02, 0x03])
        .unwrap()
        .chunk(ChunkTag::IEND, &[])
        .unwrap()
        .finish()
}

/// A PNG with a hand-written `tEXt` chunk holding `data` verbatim.
fn png_with_text(data: &[u8]) -> Vec<u8> {
    PngWriter::new()
        .chunk(ChunkTag::IHDR, &[0, 0, 0, 4, 0, 0, 0, 4, 8, 6, 0, 0, 0])
        .unwrap()
        .chunk(ChunkTag::TEXT, data)
        .unwrap()
        .chunk(ChunkTag::IEND, &[])
        .unwrap()
        .finish()
}

fn strategies() -> [Extractor; 2] {
    [
        Extractor::new(ExtractOptions::default().with_strategy(ScanStrategy::FirstMatch)),
        Extractor::new(ExtractOptions::default().with_strategy(ScanStrategy::Resilient)),
    ]
}

#[test]
fn container_without_tag_is_chunk_not_found() {
    for extractor in strategies() {
        assert!(matches!(
            extractor.extract(&base_png()),
            Err(Error::ChunkNotFound)
        ));
    }
}

#[test]
fn well_formed_chunk_yields_name() {
    let png = png_with_text(br#"{"name":"X"}"#);
    for extractor in strategies() {
        assert_eq!(extractor.extract(&png).unwrap().name(), "X");
    }
}

#[test]
fn overlong_declared_length_is_malformed() {
    let mut png = base_png();
    png.truncate(png.len() - 12); // drop IEND
    png.extend_from_slice(&u32::MAX.to_be_bytes());
    png.extend_from_slice(b"tEXt");
    png.extend_from_slice(br#"{"name":"X"}"#);

    for extractor in strategies() {
        assert!(matches!(
            extractor.extract(&png),
            Err(Error::MalformedContainer {
                declared: u32::MAX,
                ..
            })
        ));
    }
}

#[test]
fn invalid_utf8_is_decode_error() {
    let png = png_with_text(b"{\"name\":\"\xC0\xAF\"}");
    for extractor in strategies() {
        assert!(matches!(extractor.extract(&png), Err(Error::Decode(_))));
    }
}

#[test]
fn non_json_is_invalid_payload() {
    let png = png_with_text(b"Created with a paint program");
    for extractor in strategies() {
        assert!(matches!(
            extractor.extract(&png),
            Err(Error::InvalidPayload(_))
        ));
    }
}

#[test]
fn missing_or_empty_name_is_missing_required_field() {
    for payload in [&br#"{"avatar":"x"}"#[..], &br#"{"name":""}"#[..]] {
        let png = png_with_text(payload);
        for extractor in strategies() {
            assert!(matches!(
                extractor.extract(&png),
                Err(Error::MissingRequiredField("name"))
            ));
        }
    }
}

#[test]
fn round_trip_keeps_every_field() {
    let input = json!({"name": "A", "avatar": "😊", "description": "d"});
    let png = png_with_text(input.to_string().as_bytes());

    let record = extract(&png).unwrap();
    assert_eq!(record.name(), "A");
    assert_eq!(record.avatar(), "😊");
    assert_eq!(record.description(), "d");
    assert_eq!(Value::Object(record.into_document()), input);
}

#[test]
fn embedded_card_survives_import() {
    let card = json!({
        "spec": "chara_card_v2",
        "data": {"name": "Nyx", "personality": "sly", "first_mes": "Hello."}
    });
    let record = CharacterRecord::from_value_with(card, PayloadMode::Lenient).unwrap();
    let png = embed_record(&base_png(), &record, "chara", PayloadEncoding::Base64).unwrap();

    let options = ExtractOptions::default().with_mode(PayloadMode::Lenient);
    let imported = import_bytes(None, &png, &options).unwrap();
    assert_eq!(imported, record);
    assert_eq!(imported.description(), "sly");

    assert!(matches!(
        import_bytes(None, &png, &ExtractOptions::default()),
        Err(Error::InvalidPayload(_))
    ));
}

#[test]
fn nested_name_is_not_a_top_level_name() {
    let png = png_with_text(br#"{"data":{"name":"X"}}"#);
    for extractor in strategies() {
        assert!(matches!(
            extractor.extract(&png),
            Err(Error::MissingRequiredField("name"))
        ));
    }
}

#[test]
fn base64_text_is_not_json() {
    let png = png_with_text(b"eyJuYW1lIjoiWCJ9");
    for extractor in strategies() {
        assert!(matches!(
            extractor.extract(&png),
            Err(Error::InvalidPayload(_))
        ));
    }
}

#[test]
fn tag_at_start_of_buffer_is_not_a_chunk() {
    let data = br#"tEXt{"name":"X"}"#;
    for extractor in strategies() {
        assert!(matches!(extractor.extract(data), Err(Error::ChunkNotFound)));
    }
}

#[test]
fn failed_extraction_does_not_affect_later_calls() {
    let bad = png_with_text(b"garbage");
    let good = png_with_text(br#"{"name":"Ok"}"#);
    let extractor = Extractor::default();

    assert!(extractor.extract(&bad).is_err());
    assert_eq!(extractor.extract(&good).unwrap().name(), "Ok");
}

proptest! {
    #[test]
    fn extraction_never_panics(data in proptest::collection::vec(any::<u8>(), 0..512)) {
        let _ = extract(&data);
    }

    #[test]
    fn extraction_is_idempotent(prefix in proptest::collection::vec(any::<u8>(), 0..64),
                                name in "[a-zA-Z ]{1,16}") {
        let mut data = prefix;
        let payload = json!({ "name": name }).to_string();
        data.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        data.extend_from_slice(b"tEXt");
        data.extend_from_slice(payload.as_bytes());

        let first = extract(&data);
        let second = extract(&data);
        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(a), Err(b)) => prop_assert_eq!(a.to_string(), b.to_string()),
            _ => prop_assert!(false, "results differ between calls"),
        }
    }

    #[test]
    fn resilient_finds_card_after_random_prefix(prefix in proptest::collection::vec(any::<u8>(), 0..64),
                                                name in "[a-z]{1,12}") {
        let mut data = prefix;
        let payload = json!({ "name": name.clone() }).to_string();
        data.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        data.extend_from_slice(b"tEXt");
        data.extend_from_slice(payload.as_bytes());

        let card = extract(&data).unwrap();
        prop_assert_eq!(card.name(), name.as_str());
    }
}

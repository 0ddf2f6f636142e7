use super::*;
use crate::record::codec;
use crate::record::order::ByteOrder;

#[test]
fn extensions_round_trip() {
    for f in Format::ALL {
        assert_eq!(Format::from_extension(f.extension()), Some(f));
    }
    assert_eq!(Format::from_extension("PS"), Some(Format::PostScript));
    assert_eq!(Format::from_extension("svg"), None);
}

#[test]
fn escape_marks_special_characters() {
    assert_eq!(escape(r#"a"b[c]{d}\e"#), r#"a\"b\[c\]\{d\}\\e"#);
    assert_eq!(escape("plain"), "plain");
}

#[test]
fn every_format_rejects_a_truncated_log() {
    let mut bytes = Vec::new();
    codec::encode(&Record::header(10.0, 10.0), ByteOrder::native(), &mut bytes);
    codec::encode(&Record::Color(1), ByteOrder::native(), &mut bytes);
    bytes.pop();
    for f in Format::ALL {
        assert!(
            matches!(
                export(&bytes, &ImageTable::new(), f),
                Err(GbufError::Truncated { .. })
            ),
            "{f:?}"
        );
    }
}

#[test]
fn export_to_file_writes_nothing_on_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");
    assert!(export_to_file(&[0xee], &ImageTable::new(), Format::Json, &path).is_err());
    assert!(!path.exists());

    let mut bytes = Vec::new();
    codec::encode(&Record::header(10.0, 10.0), ByteOrder::native(), &mut bytes);
    export_to_file(&bytes, &ImageTable::new(), Format::Json, &path).unwrap();
    assert!(std::fs::read_to_string(&path).unwrap().starts_with('['));
}

#[test]
fn page_size_falls_back_without_header() {
    assert_eq!(page_size(&[]), FALLBACK_PAGE);
}

use std::io::Write;

use qieyun::{
    annotate, render_report, FileKind, PronunciationMap, QieyunError, TraditionalConverter,
};
use tempfile::NamedTempFile;

fn dict_file(contents: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents).unwrap();
    file
}

#[test]
fn test_load_dictionary_file() {
    let file = dict_file("{\n# header\n甲 ka\n甲 ka\n甲 kə\n\n乙 ʔˠiɪt\n}\n".as_bytes());
    let map = PronunciationMap::load(file.path()).unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get('甲'), ["ka".to_string(), "kə".to_string()]);
    assert_eq!(map.get('乙'), ["ʔˠiɪt".to_string()]);
}

#[test]
fn test_load_dictionary_with_bom() {
    let file = dict_file("\u{FEFF}甲 ka\n".as_bytes());
    let map = PronunciationMap::load(file.path()).unwrap();
    assert_eq!(map.get('甲'), ["ka".to_string()]);
}

#[test]
fn test_load_dictionary_with_bare_cr() {
    let file = dict_file("甲 ka\r乙 i\r".as_bytes());
    let map = PronunciationMap::load(file.path()).unwrap();
    assert_eq!(map.get('甲'), ["ka".to_string()]);
    assert_eq!(map.get('乙'), ["i".to_string()]);
}

#[test]
fn test_dictionary_encoding_offset_includes_bom() {
    let file = dict_file(b"\xEF\xBB\xBFab\xFF");
    let err = PronunciationMap::load(file.path()).unwrap_err();
    assert!(matches!(err, QieyunError::EncodingError { valid_up_to: 5, .. }));
}

#[test]
fn test_missing_dictionary() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dictionary.txt");
    match PronunciationMap::load(&path) {
        Err(QieyunError::FileNotFound { kind, path: p }) => {
            assert_eq!(kind, FileKind::Dictionary);
            assert_eq!(p, path);
        }
        other => panic!("expected FileNotFound, got {other:?}"),
    }
}

#[test]
fn test_dictionary_not_utf8() {
    let file = dict_file(b"\xE7\x94\xB2 ka\n\xB2\xBB kb\n");
    let err = PronunciationMap::load(file.path()).unwrap_err();
    assert!(matches!(
        err,
        QieyunError::EncodingError {
            kind: FileKind::Dictionary,
            valid_up_to: 7,
            ..
        }
    ));
}

#[test]
fn test_annotate_loaded_dictionary() {
    let file = dict_file("甲 ka\n乙 i\n丙 pɪŋ\n".as_bytes());
    let map = PronunciationMap::load(file.path()).unwrap();
    let first = annotate("甲乙,丙", &map, false);
    assert_eq!(first.ipa, "ka i,pɪŋ");
    assert_eq!(annotate("甲乙,丙", &map, false), first);
}

#[test]
fn test_convert_then_annotate() {
    let converter = TraditionalConverter::new().unwrap();
    let converted = converter.convert("简体字");
    assert_eq!(converted, "簡體字");

    let map: PronunciationMap = [('簡', "kˠɛnX"), ('體', "tʰeiX")].into_iter().collect();
    let out = annotate(&converted, &map, false);
    assert_eq!(out.ipa, "kˠɛnX tʰeiX ?");
}

#[test]
fn test_report_for_loaded_dictionary() {
    let file = dict_file("甲 ka\n乙 i\n".as_bytes());
    let map = PronunciationMap::load(file.path()).unwrap();
    let ann = annotate("甲乙。", &map, false);
    assert_eq!(
        render_report("甲乙。", "甲乙。", &ann, false),
        "繁体: 甲乙。\nIPA:  ka i。\n"
    );
}

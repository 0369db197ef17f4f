use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use ferrous_opencc::{config::BuiltinConfig, OpenCC};
use regex::Regex;
use tracing::{debug, info};
use unicode_properties::{GeneralCategory, UnicodeGeneralCategory};

mod error;
mod input;
mod report;

pub use error::{FileKind, QieyunError};
pub use input::InputSource;
pub use report::render_report;

/// Placeholder emitted for Han characters missing from the dictionary.
pub const UNKNOWN: &str = "?";

static DICT_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\S+)\s+(\S+)").unwrap());

/// Han character -> pronunciations, in first-seen order without duplicates.
#[derive(Debug, Default, Clone)]
pub struct PronunciationMap {
    entries: HashMap<char, Vec<String>>,
}

impl PronunciationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a dictionary file. The whole file must be valid UTF-8.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, QieyunError> {
        let path = path.as_ref();
        let text = read_utf8(path, FileKind::Dictionary)?;
        let map = parse_dictionary(&text);
        info!(path = %path.display(), chars = map.len(), "loaded dictionary");
        Ok(map)
    }

    /// Append `ipa` to the candidates of `han` unless already present.
    pub fn insert(&mut self, han: char, ipa: impl Into<String>) {
        let ipa = ipa.into();
        let list = self.entries.entry(han).or_default();
        if !list.contains(&ipa) {
            list.push(ipa);
        }
    }

    /// Candidates for `han`; empty when the character is unknown.
    pub fn get(&self, han: char) -> &[String] {
        self.entries.get(&han).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(char, S)> for PronunciationMap {
    fn from_iter<I: IntoIterator<Item = (char, S)>>(iter: I) -> Self {
        let mut map = PronunciationMap::new();
        for (han, ipa) in iter {
            map.insert(han, ipa);
        }
        map
    }
}

/// Parse dictionary text: one `<char> <ipa> [ignored...]` entry per line.
///
/// Blank lines, lone `{`/`}` lines and lines starting with `#` or `//` are
/// skipped, as is anything that does not have at least two tokens. Keys that
/// are not a single scalar value can never be looked up and are dropped.
pub fn parse_dictionary(text: &str) -> PronunciationMap {
    let mut map = PronunciationMap::new();

    for (lineno, raw) in normalize_newlines(text).lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line == "{" || line == "}" {
            continue;
        }
        let lead = raw.trim_start();
        if lead.starts_with('#') || lead.starts_with("//") {
            continue;
        }

        let Some(caps) = DICT_LINE.captures(line) else {
            continue;
        };
        let key = &caps[1];
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(han), None) => map.insert(han, &caps[2]),
            _ => debug!(line = lineno + 1, key, "skipping multi-character key"),
        }
    }

    map
}

/// Read a file as strict UTF-8, dropping a leading byte-order mark.
pub(crate) fn read_utf8(path: &Path, kind: FileKind) -> Result<String, QieyunError> {
    let bytes = fs::read(path).map_err(|e| QieyunError::from_io(kind, path.to_path_buf(), e))?;
    decode_strict(&bytes, kind, path)
}

/// Decode strict UTF-8 and fold `\r\n` and bare `\r` line endings into `\n`.
pub(crate) fn decode_strict(
    bytes: &[u8],
    kind: FileKind,
    path: &Path,
) -> Result<String, QieyunError> {
    match decode_utf8(bytes) {
        Some(text) => Ok(normalize_newlines(&text).into_owned()),
        None => {
            let body = strip_bom(bytes);
            let bom_len = bytes.len() - body.len();
            Err(QieyunError::EncodingError {
                kind,
                path: path.to_path_buf(),
                valid_up_to: bom_len + Encoding::utf8_valid_up_to(body),
            })
        }
    }
}

fn decode_utf8(bytes: &[u8]) -> Option<Cow<'_, str>> {
    UTF_8.decode_without_bom_handling_and_without_replacement(strip_bom(bytes))
}

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes)
}

pub(crate) fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// CJK unified and compatibility ideograph blocks, inclusive.
const HAN_RANGES: [(u32, u32); 10] = [
    (0x3400, 0x4DBF),   // Extension A
    (0x4E00, 0x9FFF),   // Unified Ideographs
    (0xF900, 0xFAFF),   // Compatibility Ideographs
    (0x20000, 0x2A6DF), // Extension B
    (0x2A700, 0x2B73F), // Extension C
    (0x2B740, 0x2B81F), // Extension D
    (0x2B820, 0x2CEAF), // Extension E
    (0x2CEB0, 0x2EBEF), // Extension F
    (0x2F800, 0x2FA1F), // Compatibility Supplement
    (0x30000, 0x3134F), // Extension G
];

pub fn is_han_char(ch: char) -> bool {
    let cp = ch as u32;
    HAN_RANGES.iter().any(|&(lo, hi)| (lo..=hi).contains(&cp))
}

/// Like [`is_han_char`], but for a string that must hold exactly one scalar.
pub fn is_han_str(s: &str) -> bool {
    let mut chars = s.chars();
    matches!((chars.next(), chars.next()), (Some(ch), None) if is_han_char(ch))
}

/// The general category abbreviation (`Po`, `Ps`, ...) of a punctuation mark.
pub fn punctuation_category(ch: char) -> Option<&'static str> {
    match ch.general_category() {
        GeneralCategory::ConnectorPunctuation => Some("Pc"),
        GeneralCategory::DashPunctuation => Some("Pd"),
        GeneralCategory::OpenPunctuation => Some("Ps"),
        GeneralCategory::ClosePunctuation => Some("Pe"),
        GeneralCategory::InitialPunctuation => Some("Pi"),
        GeneralCategory::FinalPunctuation => Some("Pf"),
        GeneralCategory::OtherPunctuation => Some("Po"),
        _ => None,
    }
}

/// Returns `(primary, display)` for a character's candidates.
///
/// With `show_all` and more than one candidate, the display lists every
/// candidate and marks the primary one as the default.
pub fn format_candidates(candidates: &[String], show_all: bool) -> (String, String) {
    let Some(primary) = candidates.first() else {
        return (UNKNOWN.to_string(), UNKNOWN.to_string());
    };
    if !show_all || candidates.len() == 1 {
        return (primary.clone(), primary.clone());
    }
    let display = format!("{} (默认: {})", candidates.join(" / "), primary);
    (primary.clone(), display)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharClass {
    Han { display: String },
    Punctuation,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationEntry {
    pub ch: char,
    pub class: CharClass,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub ipa: String,
    pub entries: Vec<AnnotationEntry>,
}

/// Replace every Han character of `text` with its primary pronunciation.
///
/// Consecutive Han readings are separated by a single space; every other
/// character is copied through and breaks the run.
pub fn annotate(text: &str, map: &PronunciationMap, show_all: bool) -> Annotation {
    let mut ipa = String::with_capacity(text.len() * 2);
    let mut entries = Vec::with_capacity(text.len());
    let mut prev_was_han = false;

    for ch in text.chars() {
        if !is_han_char(ch) {
            ipa.push(ch);
            let class = if punctuation_category(ch).is_some() {
                CharClass::Punctuation
            } else {
                CharClass::Other
            };
            entries.push(AnnotationEntry { ch, class });
            prev_was_han = false;
            continue;
        }

        let candidates = map.get(ch);
        if candidates.is_empty() {
            debug!(%ch, "no pronunciation");
        }
        let (primary, display) = format_candidates(candidates, show_all);
        if prev_was_han {
            ipa.push(' ');
        }
        ipa.push_str(&primary);
        prev_was_han = true;
        entries.push(AnnotationEntry {
            ch,
            class: CharClass::Han { display },
        });
    }

    Annotation { ipa, entries }
}

/// Simplified-to-traditional conversion backed by OpenCC's builtin `s2t`.
pub struct TraditionalConverter {
    cc: OpenCC,
}

impl TraditionalConverter {
    pub fn new() -> Result<Self, QieyunError> {
        let cc = OpenCC::from_config(BuiltinConfig::S2t)
            .map_err(|e| QieyunError::MissingDependency(e.to_string()))?;
        Ok(Self { cc })
    }

    pub fn convert(&self, text: &str) -> String {
        self.cc.convert(text)
    }
}

//! Charset handling for resource bytes.
//!
//! Resources are UTF-8 unless configured otherwise. A byte-order mark always
//! wins over the configured charset and is stripped from the decoded text.

use encoding_rs::{Encoding, UTF_8};

use crate::error::{ConfigError, ImportResult, ParseError};

/// How to turn resource bytes into text.
#[derive(Debug, Clone, Default)]
pub enum Charset {
    #[default]
    Utf8,
    /// A specific encoding.
    Encoding(&'static Encoding),
    /// A WHATWG label such as `"Shift_JIS"` or `"windows-1252"`, resolved at build time.
    Label(String),
    /// Guess the encoding from the bytes.
    Detect,
}

impl Charset {
    /// Resolve to a concrete encoding. `Detect` needs the bytes, so it
    /// resolves to `None` here.
    pub fn resolve(&self) -> Result<Option<&'static Encoding>, ConfigError> {
        match self {
            Charset::Utf8 => Ok(Some(UTF_8)),
            Charset::Encoding(encoding) => Ok(Some(*encoding)),
            Charset::Label(label) => Encoding::for_label(label.trim().as_bytes())
                .map(Some)
                .ok_or_else(|| ConfigError::UnknownCharset(label.clone())),
            Charset::Detect => Ok(None),
        }
    }

    /// Decode `bytes` to text.
    ///
    /// Malformed input is an error for a configured charset. A detected
    /// charset is only a guess, so there malformed sequences are replaced
    /// instead.
    pub fn decode(&self, bytes: &[u8]) -> ImportResult<String> {
        let (encoding, strict) = match self.resolve()? {
            Some(encoding) => (encoding, true),
            None => (detect_encoding(bytes), false),
        };

        let (text, used, had_errors) = encoding.decode(bytes);
        if had_errors && strict {
            return Err(ParseError::Decode {
                encoding: used.name().to_string(),
            }
            .into());
        }
        Ok(text.into_owned())
    }
}

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    let (charset, confidence, _) = chardet::detect(bytes);
    let encoding = match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => UTF_8,
        other => Encoding::for_label(other.as_bytes()).unwrap_or(UTF_8),
    };
    tracing::debug!(charset = %charset, confidence, encoding = encoding.name(), "detected charset");
    encoding
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImportError;
    use encoding_rs::{SHIFT_JIS, WINDOWS_1252};

    #[test]
    fn test_utf8_default_strips_bom() {
        let text = Charset::default().decode(b"\xEF\xBB\xBFa,b\n1,2\n").unwrap();
        assert_eq!(text, "a,b\n1,2\n");
    }

    #[test]
    fn test_invalid_utf8_is_error() {
        let err = Charset::Utf8.decode(b"a\n\xFF\n").unwrap_err();
        assert!(matches!(
            err,
            ImportError::Parse(ParseError::Decode { ref encoding }) if encoding == "UTF-8"
        ));
    }

    #[test]
    fn test_shift_jis_label() {
        let (bytes, _, _) = SHIFT_JIS.encode("g\n甲\n乙\n");
        let text = Charset::Label("Shift_JIS".into()).decode(&bytes).unwrap();
        assert_eq!(text, "g\n甲\n乙\n");
    }

    #[test]
    fn test_windows_1252_encoding() {
        let text = Charset::Encoding(WINDOWS_1252).decode(b"Soci\xE9t\xE9").unwrap();
        assert_eq!(text, "Société");
    }

    #[test]
    fn test_unknown_label() {
        let err = Charset::Label("klingon".into()).resolve().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownCharset(ref l) if l == "klingon"));
    }

    #[test]
    fn test_detect_ascii() {
        let text = Charset::Detect.decode(b"a,b\n10,100\n").unwrap();
        assert_eq!(text, "a,b\n10,100\n");
    }
}

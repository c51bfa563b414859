//! Encoding detection and decoding of raw document bytes.

use crate::error::IngestError;

const UTF8: &str = "utf-8";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to a string using the given encoding.
///
/// Invalid UTF-8 is an error rather than a lossy conversion: silently
/// replacing characters would alter field values. Unknown encodings are
/// looked up by label in `encoding_rs`.
pub fn decode_content(bytes: &[u8], encoding: &str) -> Result<String, IngestError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8(bytes.to_vec())
            .map_err(|e| IngestError::Encoding(format!("invalid UTF-8: {}", e))),
        "iso-8859-1" | "latin-1" | "latin1" => {
            Ok(encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned())
        }
        "windows-1252" | "cp1252" => Ok(encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()),
        label => {
            let encoding = encoding_rs::Encoding::for_label(label.as_bytes())
                .ok_or_else(|| IngestError::Encoding(format!("unsupported encoding '{}'", label)))?;
            let (text, _, had_errors) = encoding.decode(bytes);
            if had_errors {
                return Err(IngestError::Encoding(format!("malformed {} input", label)));
            }
            Ok(text.into_owned())
        }
    }
}

/// Decode bytes, returning `(text, encoding)`.
///
/// Input that is valid UTF-8 (BOM or not) is always taken as UTF-8;
/// chardet is only consulted for bytes that are not.
pub fn decode_auto(bytes: &[u8]) -> Result<(String, String), IngestError> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(body) {
        return Ok((text.to_string(), UTF8.to_string()));
    }

    let encoding = detect_encoding(bytes);
    let text = decode_content(bytes, &encoding)?;
    Ok((text, encoding))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_passthrough() {
        let text = decode_content("name,age\nZoë,30".as_bytes(), "utf-8").unwrap();
        assert_eq!(text, "name,age\nZoë,30");
    }

    #[test]
    fn test_bom_is_stripped() {
        let bytes = b"\xEF\xBB\xBFa,b\n1,2";
        assert_eq!(decode_content(bytes, "utf-8").unwrap(), "a,b\n1,2");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_invalid_utf8_is_error() {
        let result = decode_content(&[0x61, 0xFF, 0x62], "utf-8");
        assert!(matches!(result, Err(IngestError::Encoding(_))));
    }

    #[test]
    fn test_unknown_label_is_error() {
        let result = decode_content(b"abc", "not-a-charset");
        assert!(matches!(result, Err(IngestError::Encoding(_))));
    }

    #[test]
    fn test_detect_ascii_as_utf8() {
        assert_eq!(detect_encoding(b"name.firstName,name.lastName,age\nJohn,Doe,25\n"), "utf-8");
    }

    #[test]
    fn test_decode_auto() {
        let (text, encoding) = decode_auto(b"a,b\n1,2").unwrap();
        assert_eq!(text, "a,b\n1,2");
        assert_eq!(encoding, "utf-8");
    }

    #[test]
    fn test_decode_auto_keeps_valid_utf8() {
        let text = "name.firstName,name.lastName,age\nJohn,Doe,25\nAnn,Lee,22\nRenée,X,1\n";
        let (decoded, encoding) = decode_auto(text.as_bytes()).unwrap();
        assert_eq!(decoded, text);
        assert_eq!(encoding, "utf-8");

        let mut with_bom = b"\xEF\xBB\xBF".to_vec();
        with_bom.extend_from_slice("Zoë,1".as_bytes());
        assert_eq!(decode_auto(&with_bom).unwrap(), ("Zoë,1".to_string(), "utf-8".to_string()));
    }
}

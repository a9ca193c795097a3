//! PEM armor: base64 DER between BEGIN/END lines

use crate::error::{Result, ToolsError};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

pub use x509_parser::pem::Pem;

/// Label of X.509 certificate blocks
pub const CERTIFICATE_LABEL: &str = "CERTIFICATE";

const LINE_WIDTH: usize = 64;

/// Armor `der` as a single PEM block with `label`
pub fn encode(label: &str, der: &[u8]) -> String {
    let body = BASE64.encode(der);
    let mut out = format!("-----BEGIN {}-----\n", label);
    // base64 output is ASCII, so byte chunks are valid UTF-8
    for line in body.as_bytes().chunks(LINE_WIDTH) {
        out.push_str(&String::from_utf8_lossy(line));
        out.push('\n');
    }
    out.push_str(&format!("-----END {}-----\n", label));
    out
}

/// Concatenate certificates as `CERTIFICATE` blocks
pub fn encode_certificates<C: AsRef<[u8]>>(certificates: &[C]) -> String {
    certificates
        .iter()
        .map(|der| encode(CERTIFICATE_LABEL, der.as_ref()))
        .collect()
}

/// Decode every PEM block in `input`
///
/// Text outside BEGIN/END pairs is ignored. An unterminated block or a body
/// that is not base64 is an error.
pub fn parse_blocks(input: &str) -> Result<Vec<Pem>> {
    Pem::iter_from_buffer(input.as_bytes())
        .map(|block| {
            block.map_err(|e| ToolsError::Certificate(format!("Invalid PEM: {}", e)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_wraps_at_64_columns() {
        let der = vec![0xabu8; 100];
        let pem = encode(CERTIFICATE_LABEL, &der);
        let lines: Vec<&str> = pem.lines().collect();

        assert_eq!(lines.first(), Some(&"-----BEGIN CERTIFICATE-----"));
        assert_eq!(lines.last(), Some(&"-----END CERTIFICATE-----"));
        assert!(lines[1..lines.len() - 1].iter().all(|l| l.len() <= 64));
        assert_eq!(lines[1].len(), 64);
    }

    #[test]
    fn test_parse_ignores_surrounding_text() {
        let input = format!(
            "subject=CN = example\n{}trailing notes\n",
            encode("CERTIFICATE", b"der bytes")
        );

        let blocks = parse_blocks(&input).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].label, "CERTIFICATE");
        assert_eq!(blocks[0].contents, b"der bytes");
    }

    #[test]
    fn test_parse_multiple_blocks() {
        let input = encode_certificates(&[b"first".to_vec(), b"second".to_vec()]);
        let blocks = parse_blocks(&input).unwrap();

        let contents: Vec<&[u8]> = blocks.iter().map(|b| b.contents.as_slice()).collect();
        assert_eq!(contents, vec![&b"first"[..], &b"second"[..]]);
    }

    #[test]
    fn test_parse_rejects_unterminated_block() {
        let input = "-----BEGIN CERTIFICATE-----\nAAAA\n";
        assert!(matches!(
            parse_blocks(input),
            Err(ToolsError::Certificate(_))
        ));
    }

    #[test]
    fn test_parse_keeps_key_label() {
        let blocks = parse_blocks(&encode("PRIVATE KEY", b"key bytes")).unwrap();
        assert_eq!(blocks[0].label, "PRIVATE KEY");
        assert_eq!(blocks[0].contents, b"key bytes");
    }

    #[test]
    fn test_parse_rejects_bad_base64() {
        let input = "-----BEGIN CERTIFICATE-----\n!!!!\n-----END CERTIFICATE-----\n";
        assert!(parse_blocks(input).is_err());
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_blocks("").unwrap().is_empty());
    }
}

//! PEM containers.
//!
//! Plain documents follow the strict [RFC 7468] encoding and are handled by
//! `pem-rfc7468`. Traditional OpenSSL private key files may also carry
//! [RFC 1421] encapsulated headers (`Proc-Type`, `DEK-Info`) between the
//! pre-encapsulation boundary and the base64 body, which RFC 7468 forbids, so
//! blocks with headers are assembled and split here.
//!
//! [RFC 7468]: https://www.rfc-editor.org/rfc/rfc7468
//! [RFC 1421]: https://www.rfc-editor.org/rfc/rfc1421

use crate::Result;
use alloc::{string::String, vec::Vec};
use base64ct::{Base64, Encoding};
use pem_rfc7468::LineEnding;
use zeroize::Zeroizing;

/// Label of a SubjectPublicKeyInfo document
pub(crate) const PUBLIC_KEY: &str = "PUBLIC KEY";

/// Label of a PKCS#8 `PrivateKeyInfo` document
pub(crate) const PRIVATE_KEY: &str = "PRIVATE KEY";

/// Label of a PKCS#8 `EncryptedPrivateKeyInfo` document
pub(crate) const ENCRYPTED_PRIVATE_KEY: &str = "ENCRYPTED PRIVATE KEY";

/// Label of a traditional `DSAPrivateKey` document
pub(crate) const DSA_PRIVATE_KEY: &str = "DSA PRIVATE KEY";

/// Label of a legacy `DSAPublicKey` document
pub(crate) const DSA_PUBLIC_KEY: &str = "DSA PUBLIC KEY";

/// Label of a `Dss-Parms` document
pub(crate) const DSA_PARAMETERS: &str = "DSA PARAMETERS";

/// Line width of the base64 body
const LINE_WIDTH: usize = 64;

const BEGIN: &str = "-----BEGIN ";
const END: &str = "-----END ";
const BOUNDARY_END: &str = "-----";

/// A single decoded PEM block.
pub(crate) struct Block<'a> {
    pub(crate) label: &'a str,
    pub(crate) headers: Vec<(&'a str, &'a str)>,
    pub(crate) body: Zeroizing<Vec<u8>>,
}

impl<'a> Block<'a> {
    /// Look up an encapsulated header by name (case-insensitive).
    pub(crate) fn header(&self, name: &str) -> Option<&'a str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    }
}

/// Does `data` look like a PEM document?
pub(crate) fn is_pem(data: &[u8]) -> Option<&str> {
    let text = core::str::from_utf8(data).ok()?;
    text.contains(BEGIN).then_some(text)
}

/// Parse every PEM block in `text`, in order.
///
/// Text outside of blocks is ignored. Blocks which are not well-formed are
/// skipped, so one damaged block doesn't hide the others.
pub(crate) fn parse_all(text: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut offset = 0;
    let mut lines = text.split_inclusive('\n').map(|line| {
        let start = offset;
        offset += line.len();
        (start, line)
    });

    while let Some((start, line)) = lines.next() {
        let Some(label) = boundary(line.trim(), BEGIN) else {
            continue;
        };
        let start = start + (line.len() - line.trim_start().len());

        let mut headers = Vec::new();
        let mut body = Zeroizing::new(String::new());
        let mut in_headers = true;
        let mut end = None;

        for (line_start, raw) in lines.by_ref() {
            let line = raw.trim();

            if let Some(end_label) = boundary(line, END) {
                end = (end_label == label).then_some(line_start + raw.len());
                break;
            }

            if in_headers {
                if let Some((key, value)) = line.split_once(':') {
                    headers.push((key.trim(), value.trim()));
                    continue;
                }

                in_headers = false;
                if line.is_empty() {
                    continue;
                }
            }

            body.push_str(line);
        }

        let Some(end) = end else {
            tracing::trace!(label, "skipping unterminated PEM block");
            continue;
        };

        let decoded = if headers.is_empty() {
            pem_rfc7468::decode_vec(text[start..end].as_bytes())
                .map(|(_, der)| der)
                .ok()
        } else {
            Base64::decode_vec(&body).ok()
        };

        match decoded {
            Some(der) => blocks.push(Block {
                label,
                headers,
                body: Zeroizing::new(der),
            }),
            None => tracing::trace!(label, "skipping malformed PEM block"),
        }
    }

    blocks
}

/// Encode `der` as a PEM block with the given encapsulated headers.
pub(crate) fn encode(label: &str, headers: &[(&str, &str)], der: &[u8]) -> Result<String> {
    if headers.is_empty() {
        return Ok(pem_rfc7468::encode_string(label, LineEnding::LF, der)?);
    }

    let encoded = Zeroizing::new(Base64::encode_string(der));
    let mut pem = String::with_capacity(encoded.len() * 65 / 64 + 2 * label.len() + 64);

    pem.push_str(BEGIN);
    pem.push_str(label);
    pem.push_str(BOUNDARY_END);
    pem.push('\n');

    for (key, value) in headers {
        pem.push_str(key);
        pem.push_str(": ");
        pem.push_str(value);
        pem.push('\n');
    }
    pem.push('\n');

    for chunk in encoded.as_bytes().chunks(LINE_WIDTH) {
        pem.extend(chunk.iter().copied().map(char::from));
        pem.push('\n');
    }

    pem.push_str(END);
    pem.push_str(label);
    pem.push_str(BOUNDARY_END);
    pem.push('\n');
    Ok(pem)
}

/// Extract the label from an encapsulation boundary line.
fn boundary<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    line.strip_prefix(prefix)?.strip_suffix(BOUNDARY_END)
}

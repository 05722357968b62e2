//! Document load/save pass-through.

use crate::error::EditorError;
use crate::sequence::{CharSequence, NodeId};
use std::io::{Read, Write};
use tracing::info;

/// Read a whole document, folding `"\r\n"` pairs into a single newline node.
///
/// # Errors
/// Returns [`EditorError::Io`] when the reader fails or yields invalid UTF-8.
pub fn read_sequence<R: Read>(mut reader: R) -> Result<CharSequence, EditorError> {
    let mut raw = String::new();
    reader.read_to_string(&mut raw)?;

    let mut seq = CharSequence::new();
    let mut last = NodeId::SENTINEL;
    let mut folded = 0usize;
    for ch in raw.chars() {
        let after_cr = seq.node(last).content() == '\r' && !last.is_sentinel();
        last = seq.insert_after(last, ch);
        if ch == '\n' && after_cr {
            if let Some(cr) = seq.promote_boundary(last) {
                seq.discard(cr);
                folded += 1;
            }
        }
    }
    info!(chars = seq.len(), crlf_folded = folded, "document loaded");
    Ok(seq)
}

/// Write the document text in order, returning the character count.
///
/// # Errors
/// Returns [`EditorError::Io`] when the writer fails.
pub fn write_sequence<W: Write>(seq: &CharSequence, mut writer: W) -> Result<usize, EditorError> {
    let text = seq.text();
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    let chars = seq.len();
    info!(chars, "document saved");
    Ok(chars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_pairs_become_single_newlines() {
        let seq = read_sequence("one\r\ntwo\rthree\r\n".as_bytes()).expect("load");
        assert_eq!(seq.text(), "one\ntwo\rthree\n");
        assert_eq!(seq.allocated(), seq.len() + 1, "folded '\\r' slots are recycled");
    }

    #[test]
    fn save_writes_characters_in_order() {
        let seq = CharSequence::from_text("héllo\nworld");
        let mut out = Vec::new();
        assert_eq!(write_sequence(&seq, &mut out).expect("save"), 11);
        assert_eq!(String::from_utf8(out).expect("utf8"), "héllo\nworld");
    }

    #[test]
    fn invalid_utf8_is_an_io_error() {
        let err = read_sequence(&[0xff, 0xfe][..]).expect_err("bad bytes");
        assert!(matches!(err, EditorError::Io(_)));
    }
}

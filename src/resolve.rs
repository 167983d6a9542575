//! Cross-reference resolution.
//!
//! An `@Ref Identifier` marker inside a comment links to another declaration's
//! documentation. Markers are rewritten to RST references targeting the
//! `proto-<identifier>` anchor labels emitted by the renderer. The rewrite is
//! purely textual: whether the target exists is the rendering layer's problem,
//! not a parse error.

use std::fmt::Write;

const MARKER: &str = "@Ref";

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '.'
}

/// Replaces every `@Ref <dotted-or-bare identifier>` with
/// `` :ref:`identifier <proto-identifier>` ``.
///
/// A marker not followed by whitespace and an identifier (`@Reference`, a
/// trailing `@Ref`) is left untouched. Resolved output contains no marker, so
/// resolving already-resolved text is a no-op.
pub(crate) fn references(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(MARKER) {
        result.push_str(&rest[..pos]);
        let after = &rest[pos + MARKER.len()..];
        let trimmed = after.trim_start();
        let ident_len = trimmed
            .find(|ch: char| !is_ident_char(ch))
            .unwrap_or(trimmed.len());
        if trimmed.len() == after.len() || ident_len == 0 {
            result.push_str(MARKER);
            rest = after;
            continue;
        }
        let ident = &trimmed[..ident_len];
        let _ = write!(result, ":ref:`{ident} <proto-{ident}>`");
        rest = &trimmed[ident_len..];
    }
    result.push_str(rest);
    result
}

#[test]
fn resolves_bare_and_dotted_identifiers() {
    assert_eq!(
        references("See @Ref User and @Ref user.v1.Account"),
        "See :ref:`User <proto-User>` and :ref:`user.v1.Account <proto-user.v1.Account>`"
    );
}

#[test]
fn resolution_is_idempotent() {
    let once = references("Linked to @Ref CreateUserRequest here");
    let twice = references(&once);
    assert_eq!(once, "Linked to :ref:`CreateUserRequest <proto-CreateUserRequest>` here");
    assert_eq!(once, twice);
}

#[test]
fn non_matching_markers_are_untouched() {
    assert_eq!(references("@Reference manual"), "@Reference manual");
    assert_eq!(references("trailing @Ref"), "trailing @Ref");
    assert_eq!(references("@Ref !punct"), "@Ref !punct");
    assert_eq!(references("no markers at all"), "no markers at all");
}

#[test]
fn consecutive_markers() {
    assert_eq!(
        references("@Ref A @Ref B"),
        ":ref:`A <proto-A>` :ref:`B <proto-B>`"
    );
}

// SPDX-FileCopyrightText: 2026 Querylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Statement verb labels for the `operation` attribute.

use querylog_core::QueryEvent;

/// Longest label derived from query text.
const MAX_LABEL_LEN: usize = 16;

/// Label used when no verb can be derived.
pub const UNKNOWN_OPERATION: &str = "UNKNOWN";

/// The operation label for an event: the explicit label when one was set,
/// otherwise the verb derived from the query text.
pub fn resolve(event: &QueryEvent) -> String {
    match event.operation.as_deref().map(str::trim) {
        Some(op) if !op.is_empty() => op.to_string(),
        _ => operation_label(&event.query),
    }
}

/// Derive a short uppercase verb (`SELECT`, `INSERT`, `WITH`, ...) from query
/// text, skipping leading whitespace and SQL comments.
pub fn operation_label(query: &str) -> String {
    let body = skip_comments(query);
    let token: String = body
        .chars()
        .take_while(|c| !c.is_whitespace() && *c != '(' && *c != ';')
        .take(MAX_LABEL_LEN)
        .collect();

    if token.is_empty() {
        UNKNOWN_OPERATION.to_string()
    } else {
        token.to_ascii_uppercase()
    }
}

fn skip_comments(mut s: &str) -> &str {
    loop {
        s = s.trim_start();
        if let Some(rest) = s.strip_prefix("--") {
            s = rest.split_once('\n').map_or("", |(_, tail)| tail);
        } else if let Some(rest) = s.strip_prefix("/*") {
            s = rest.split_once("*/").map_or("", |(_, tail)| tail);
        } else {
            return s;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_keyword_is_uppercased() {
        assert_eq!(operation_label("select * from users"), "SELECT");
        assert_eq!(operation_label("  INSERT INTO t VALUES (1)"), "INSERT");
        assert_eq!(operation_label("update t set a = 1"), "UPDATE");
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(operation_label("-- fetch user\nSELECT 1"), "SELECT");
        assert_eq!(operation_label("/* hint */ /* more */ DELETE FROM t"), "DELETE");
        assert_eq!(operation_label("/* unterminated"), UNKNOWN_OPERATION);
    }

    #[test]
    fn token_stops_at_punctuation() {
        assert_eq!(operation_label("values(1)"), "VALUES");
        assert_eq!(operation_label("begin;"), "BEGIN");
    }

    #[test]
    fn long_tokens_are_capped() {
        let label = operation_label("abcdefghijklmnopqrstuvwxyz");
        assert_eq!(label, "ABCDEFGHIJKLMNOP");
    }

    #[test]
    fn empty_query_is_unknown() {
        assert_eq!(operation_label(""), UNKNOWN_OPERATION);
        assert_eq!(operation_label("   \n\t"), UNKNOWN_OPERATION);
    }

    #[test]
    fn explicit_operation_wins() {
        let event = QueryEvent::new("SELECT 1").with_operation("lookup_user");
        assert_eq!(resolve(&event), "lookup_user");

        let blank = QueryEvent::new("SELECT 1").with_operation("  ");
        assert_eq!(resolve(&blank), "SELECT");
    }
}

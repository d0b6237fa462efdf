//! Movetext tokenizer for PGN move histories.
//!
//! Only splits the text into SAN tokens and picks up a `FEN` tag; resolving
//! SAN against a position is left to the rules engine.

use super::error::LoadError;

/// Tokens extracted from a PGN document.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct MoveHistory {
    /// Starting position from a `[FEN "..."]` tag, if present
    pub fen: Option<String>,
    /// SAN moves of the main line, in order
    pub sans: Vec<String>,
}

const RESULT_TOKENS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

pub(crate) fn parse_move_history(pgn: &str) -> Result<MoveHistory, LoadError> {
    let mut history = MoveHistory::default();
    let mut chars = pgn.chars().peekable();
    let mut token = String::new();
    let mut variation_depth = 0usize;

    while let Some(c) = chars.next() {
        let delimiter = c.is_whitespace() || matches!(c, '[' | '{' | ';' | '(' | ')' | '$');
        if delimiter {
            flush_token(&mut token, variation_depth, &mut history.sans);
        }

        match c {
            '[' if variation_depth == 0 => {
                let mut tag = String::new();
                let mut closed = false;
                let mut in_quotes = false;
                for t in chars.by_ref() {
                    match t {
                        '"' => in_quotes = !in_quotes,
                        ']' if !in_quotes => {
                            closed = true;
                            break;
                        }
                        _ => {}
                    }
                    tag.push(t);
                }
                if !closed {
                    return Err(LoadError::Unterminated { what: "tag pair" });
                }
                if let Some(fen) = fen_tag_value(&tag) {
                    history.fen = Some(fen);
                }
            }
            '{' => {
                if !chars.by_ref().any(|t| t == '}') {
                    return Err(LoadError::Unterminated { what: "comment" });
                }
            }
            ';' => {
                for t in chars.by_ref() {
                    if t == '\n' {
                        break;
                    }
                }
            }
            '(' => variation_depth += 1,
            ')' => {
                variation_depth = variation_depth
                    .checked_sub(1)
                    .ok_or(LoadError::Unterminated { what: "variation" })?;
            }
            '$' => {
                while chars.peek().is_some_and(char::is_ascii_digit) {
                    chars.next();
                }
            }
            _ if delimiter => {}
            _ => token.push(c),
        }
    }

    flush_token(&mut token, variation_depth, &mut history.sans);
    if variation_depth != 0 {
        return Err(LoadError::Unterminated { what: "variation" });
    }
    Ok(history)
}

fn fen_tag_value(tag: &str) -> Option<String> {
    let (name, rest) = tag.trim().split_once(char::is_whitespace)?;
    if !name.eq_ignore_ascii_case("fen") {
        return None;
    }
    let value = rest.trim().trim_matches('"').trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn flush_token(token: &mut String, variation_depth: usize, sans: &mut Vec<String>) {
    if token.is_empty() {
        return;
    }
    if variation_depth == 0 {
        if let Some(san) = normalize_token(token) {
            sans.push(san);
        }
    }
    token.clear();
}

/// Strips move numbers, results and annotation glyphs from a raw token.
fn normalize_token(raw: &str) -> Option<String> {
    if RESULT_TOKENS.contains(&raw) {
        return None;
    }

    let mut text = raw;
    if text.starts_with(|c: char| c.is_ascii_digit()) {
        if let Some(idx) = text.rfind('.') {
            text = &text[idx + 1..];
        }
    }

    let text = text.trim_end_matches(['!', '?']);
    if text.is_empty() {
        return None;
    }

    let san = if text.starts_with("0-0-0") {
        text.replacen("0-0-0", "O-O-O", 1)
    } else if text.starts_with("0-0") {
        text.replacen("0-0", "O-O", 1)
    } else {
        text.to_string()
    };
    Some(san)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_movetext() {
        let history = parse_move_history("1. e4 e5 2. Nf3 Nc6 *").unwrap();
        assert_eq!(history.sans, vec!["e4", "e5", "Nf3", "Nc6"]);
        assert_eq!(history.fen, None);
    }

    #[test]
    fn test_tags_comments_and_variations() {
        let pgn = r#"[Event "Casual"]
[White "Someone"]

1.e4 {best by test} e5 (1...c5 2.Nf3) 2.Nf3!? $1 Nc6 ; trailing comment
3.Bb5 a6 1/2-1/2"#;
        let history = parse_move_history(pgn).unwrap();
        assert_eq!(history.sans, vec!["e4", "e5", "Nf3", "Nc6", "Bb5", "a6"]);
    }

    #[test]
    fn test_black_move_number_and_zero_castling() {
        let history = parse_move_history("5... O-O 6. 0-0-0+").unwrap();
        assert_eq!(history.sans, vec!["O-O", "O-O-O+"]);
    }

    #[test]
    fn test_fen_tag() {
        let pgn = "[SetUp \"1\"]\n[FEN \"4k3/8/8/8/8/8/4P3/4K3 w - - 0 1\"]\n\n1. e4 *";
        let history = parse_move_history(pgn).unwrap();
        assert_eq!(
            history.fen.as_deref(),
            Some("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1")
        );
        assert_eq!(history.sans, vec!["e4"]);
    }

    #[test]
    fn test_unterminated_comment() {
        assert_eq!(
            parse_move_history("1. e4 { never closed"),
            Err(LoadError::Unterminated { what: "comment" })
        );
    }

    #[test]
    fn test_unbalanced_variation() {
        assert!(parse_move_history("1. e4 (1. d4").is_err());
        assert!(parse_move_history("1. e4 )").is_err());
    }
}

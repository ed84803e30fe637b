use super::*;

use std::io::Read;

/// Reader that hands out at most `chunk` bytes per call, to exercise
/// refills at awkward boundaries.
struct Dribble {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
}

impl Dribble {
    fn new(data: &str, chunk: usize) -> Self {
        Self {
            data: data.as_bytes().to_vec(),
            pos: 0,
            chunk,
        }
    }
}

impl Read for Dribble {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.chunk.min(buf.len()).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

fn all_tokens(input: &str) -> Vec<String> {
    let mut tokenizer = JsonTokenizer::new(input.as_bytes());
    let mut tokens = Vec::new();
    while let Some((token, _, _)) = tokenizer.next().expect("tokenize") {
        tokens.push(render(token));
    }
    tokens
}

fn render(token: Token<'_>) -> String {
    match token {
        Token::ObjectBegin => "{".to_owned(),
        Token::ObjectEnd => "}".to_owned(),
        Token::ArrayBegin => "[".to_owned(),
        Token::ArrayEnd => "]".to_owned(),
        Token::Str { raw, escaped } => {
            let text = String::from_utf8_lossy(raw);
            if escaped {
                format!("str*({text})")
            } else {
                format!("str({text})")
            }
        },
        Token::Number(raw) => format!("num({})", String::from_utf8_lossy(raw)),
        Token::True => "true".to_owned(),
        Token::False => "false".to_owned(),
        Token::Null => "null".to_owned(),
    }
}

#[test]
fn tokenizes_all_event_kinds() {
    let tokens = all_tokens(r#"{"a": [1, -2.5e3, true, false, null, "x"]}"#);
    assert_eq!(
        tokens,
        vec!["{", "str(a)", "[", "num(1)", "num(-2.5e3)", "true", "false", "null", "str(x)", "]", "}"]
    );
}

#[test]
fn commas_and_colons_are_separators() {
    // The structural layer validates shape; stray separators are noise.
    assert_eq!(all_tokens("1,,2::3"), vec!["num(1)", "num(2)", "num(3)"]);
}

#[test]
fn escaped_strings_are_flagged_raw() {
    let tokens = all_tokens(r#""a\"b" "plain""#);
    assert_eq!(tokens, vec![r#"str*(a\"b)"#, "str(plain)"]);
}

#[test]
fn number_terminated_by_end_of_input() {
    assert_eq!(all_tokens("42"), vec!["num(42)"]);
}

#[test]
fn empty_input_yields_no_tokens() {
    assert!(all_tokens("").is_empty());
    assert!(all_tokens("  \n\t ").is_empty());
}

#[test]
fn tracks_line_and_column() {
    let mut tokenizer = JsonTokenizer::new("{\n  \"ab\": 7\n}".as_bytes());
    let (_, line, col) = tokenizer.next().expect("ok").expect("token");
    assert_eq!((line, col), (1, 1));
    let (_, line, col) = tokenizer.next().expect("ok").expect("token");
    assert_eq!((line, col), (2, 3));
    let (_, line, col) = tokenizer.next().expect("ok").expect("token");
    assert_eq!((line, col), (2, 9));
    let (_, line, col) = tokenizer.next().expect("ok").expect("token");
    assert_eq!((line, col), (3, 1));
}

#[test]
fn tokens_survive_window_relocation() {
    let input = r#"["aaaaaaaa", "bbbbbbbb", "cccccccc", "dddddddd"]"#;
    let mut tokenizer = JsonTokenizer::with_window(Dribble::new(input, 3), 16);
    let mut strings = Vec::new();
    while let Some((token, _, _)) = tokenizer.next().expect("tokenize") {
        if let Token::Str { raw, .. } = token {
            strings.push(String::from_utf8_lossy(raw).into_owned());
        }
    }
    assert_eq!(strings, vec!["aaaaaaaa", "bbbbbbbb", "cccccccc", "dddddddd"]);
}

#[test]
fn scalar_wider_than_window_is_value_too_long() {
    let long = format!("\"{}\"", "x".repeat(64));
    let mut tokenizer = JsonTokenizer::with_window(long.as_bytes(), 16);
    let error = tokenizer.next().expect_err("must not fit");
    assert!(matches!(error, ScanError::ValueTooLong { line: 1, col: 1 }), "got {error:?}");
}

#[test]
fn unterminated_string_is_unexpected_end() {
    let mut tokenizer = JsonTokenizer::new(&b"\"never closed"[..]);
    let error = tokenizer.next().expect_err("unterminated");
    assert!(matches!(error, ScanError::UnexpectedEndOfInput { .. }), "got {error:?}");
}

#[test]
fn truncated_literal_is_unexpected_end() {
    let mut tokenizer = JsonTokenizer::new(&b"tru"[..]);
    let error = tokenizer.next().expect_err("truncated");
    assert!(matches!(error, ScanError::UnexpectedEndOfInput { .. }), "got {error:?}");
}

#[test]
fn misspelled_literal_is_unexpected_byte() {
    let mut tokenizer = JsonTokenizer::new(&b"trye"[..]);
    let error = tokenizer.next().expect_err("misspelled");
    assert!(matches!(error, ScanError::UnexpectedByte { byte: b'y', .. }), "got {error:?}");
}

#[test]
fn invalid_escape_is_rejected() {
    let mut tokenizer = JsonTokenizer::new(&br#""bad \q escape""#[..]);
    let error = tokenizer.next().expect_err("invalid escape");
    assert!(matches!(error, ScanError::UnexpectedByte { byte: b'q', .. }), "got {error:?}");
}

#[test]
fn raw_control_byte_in_string_is_rejected() {
    let mut tokenizer = JsonTokenizer::new(&b"\"a\x01b\""[..]);
    let error = tokenizer.next().expect_err("control byte");
    assert!(matches!(error, ScanError::UnexpectedByte { byte: 0x01, .. }), "got {error:?}");
}

#[test]
fn junk_byte_is_unexpected() {
    let mut tokenizer = JsonTokenizer::new(&b"@"[..]);
    let error = tokenizer.next().expect_err("junk");
    assert!(matches!(error, ScanError::UnexpectedByte { byte: b'@', .. }), "got {error:?}");
}

#[test]
fn unescape_resolves_simple_escapes() {
    let mut out = String::new();
    append_unescaped(&mut out, br#"a\"b\\c\/d\te\n"#);
    assert_eq!(out, "a\"b\\c/d\te\n");
}

#[test]
fn unescape_resolves_unicode_escapes() {
    let mut out = String::new();
    append_unescaped(&mut out, b"caf\\u00e9");
    assert_eq!(out, "caf\u{e9}");

    let mut out = String::new();
    append_unescaped(&mut out, b"\\ud83d\\ude00");
    assert_eq!(out, "\u{1f600}");
}

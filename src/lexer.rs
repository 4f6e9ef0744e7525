use crate::error::{PolicyError, Position};

/// A lexical token of the policy dialect.
///
/// The lexer has no grammar knowledge: keyword strings such as `"Version"`
/// or `"Statement"` come out as ordinary [`Token::Str`] values and are
/// matched by content in the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Double-quoted string literal (content without quotes, escapes resolved)
    Str(String),
    /// Integer literal
    Int(i64),
    /// `true` or `false`
    Bool(bool),
    // Punctuation
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Colon,
    // End of input
    Eof,
}

impl Token {
    /// Human-readable description used in parse errors.
    pub fn describe(&self) -> String {
        match self {
            Token::Str(s) => format!("string \"{s}\""),
            Token::Int(n) => format!("integer {n}"),
            Token::Bool(b) => format!("'{b}'"),
            Token::LBrace => "'{'".to_string(),
            Token::RBrace => "'}'".to_string(),
            Token::LBracket => "'['".to_string(),
            Token::RBracket => "']'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Colon => "':'".to_string(),
            Token::Eof => "end of input".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Spanned {
    pub token: Token,
    pub position: Position,
}

/// Split raw policy text into a token stream.
///
/// Whitespace (including newlines) is insignificant and skipped.
/// Unterminated strings and unrecognized characters fail with
/// [`PolicyError::Lex`] carrying the offending position.
pub fn lex(src: &str) -> Result<Vec<Spanned>, PolicyError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = src.chars().collect();
    let mut pos = 0usize;
    let mut line: u32 = 1;
    let mut column: u32 = 1;

    while pos < chars.len() {
        let c = chars[pos];

        // Whitespace
        if c.is_whitespace() {
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
            pos += 1;
            continue;
        }

        let tok_pos = Position::new(line, column);

        // String literal
        if c == '"' {
            pos += 1;
            column += 1;
            let mut s = String::new();
            loop {
                if pos >= chars.len() {
                    return Err(PolicyError::lex(tok_pos, "unterminated string literal"));
                }
                let sc = chars[pos];
                if sc == '"' {
                    pos += 1;
                    column += 1;
                    break;
                }
                if sc == '\\' {
                    pos += 1;
                    column += 1;
                    if pos >= chars.len() {
                        return Err(PolicyError::lex(tok_pos, "unterminated escape in string"));
                    }
                    match chars[pos] {
                        '"' => s.push('"'),
                        '\\' => s.push('\\'),
                        'n' => s.push('\n'),
                        't' => s.push('\t'),
                        other => {
                            s.push('\\');
                            s.push(other);
                        }
                    }
                    pos += 1;
                    column += 1;
                    continue;
                }
                if sc == '\n' {
                    return Err(PolicyError::lex(tok_pos, "unterminated string literal"));
                }
                s.push(sc);
                pos += 1;
                column += 1;
            }
            tokens.push(Spanned {
                token: Token::Str(s),
                position: tok_pos,
            });
            continue;
        }

        // Integer literal
        if c.is_ascii_digit()
            || (c == '-' && pos + 1 < chars.len() && chars[pos + 1].is_ascii_digit())
        {
            let start = pos;
            if c == '-' {
                pos += 1;
            }
            while pos < chars.len() && chars[pos].is_ascii_digit() {
                pos += 1;
            }
            let s: String = chars[start..pos].iter().collect();
            let n: i64 = s
                .parse()
                .map_err(|_| PolicyError::lex(tok_pos, format!("invalid integer '{s}'")))?;
            column += (pos - start) as u32;
            tokens.push(Spanned {
                token: Token::Int(n),
                position: tok_pos,
            });
            continue;
        }

        // Punctuation
        let punct = match c {
            '{' => Some(Token::LBrace),
            '}' => Some(Token::RBrace),
            '[' => Some(Token::LBracket),
            ']' => Some(Token::RBracket),
            ',' => Some(Token::Comma),
            ':' => Some(Token::Colon),
            _ => None,
        };
        if let Some(token) = punct {
            tokens.push(Spanned {
                token,
                position: tok_pos,
            });
            pos += 1;
            column += 1;
            continue;
        }

        // Boolean keywords
        if c.is_ascii_alphabetic() {
            let start = pos;
            while pos < chars.len() && chars[pos].is_ascii_alphabetic() {
                pos += 1;
            }
            let word: String = chars[start..pos].iter().collect();
            let token = match word.as_str() {
                "true" => Token::Bool(true),
                "false" => Token::Bool(false),
                _ => {
                    return Err(PolicyError::lex(
                        tok_pos,
                        format!("unrecognized keyword '{word}'"),
                    ));
                }
            };
            column += (pos - start) as u32;
            tokens.push(Spanned {
                token,
                position: tok_pos,
            });
            continue;
        }

        return Err(PolicyError::lex(
            tok_pos,
            format!("unexpected character '{c}'"),
        ));
    }

    tokens.push(Spanned {
        token: Token::Eof,
        position: Position::new(line, column),
    });
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<Token> {
        lex(src).unwrap().into_iter().map(|s| s.token).collect()
    }

    #[test]
    fn lexes_punctuation_and_literals() {
        let tokens = kinds(r#"{ "Effect" : [ "Allow", 42, -7, true, false ] }"#);
        assert_eq!(
            tokens,
            vec![
                Token::LBrace,
                Token::Str("Effect".into()),
                Token::Colon,
                Token::LBracket,
                Token::Str("Allow".into()),
                Token::Comma,
                Token::Int(42),
                Token::Comma,
                Token::Int(-7),
                Token::Comma,
                Token::Bool(true),
                Token::Comma,
                Token::Bool(false),
                Token::RBracket,
                Token::RBrace,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn keyword_strings_are_plain_string_tokens() {
        // The lexer must not treat "Version" specially.
        let tokens = kinds(r#""Version""#);
        assert_eq!(tokens, vec![Token::Str("Version".into()), Token::Eof]);
    }

    #[test]
    fn resolves_escapes_inside_strings() {
        let tokens = kinds(r#""a\"b\\c""#);
        assert_eq!(tokens[0], Token::Str("a\"b\\c".into()));
    }

    #[test]
    fn tracks_line_and_column() {
        let spanned = lex("{\n  \"Sid\"").unwrap();
        assert_eq!(spanned[0].position, Position::new(1, 1));
        assert_eq!(spanned[1].position, Position::new(2, 3));
    }

    #[test]
    fn unterminated_string_is_a_lex_error() {
        let err = lex("\"never closed").unwrap_err();
        match err {
            PolicyError::Lex { position, message } => {
                assert_eq!(position, Position::new(1, 1));
                assert!(message.contains("unterminated"));
            }
            other => panic!("expected lex error, got {other:?}"),
        }
    }

    #[test]
    fn newline_inside_string_is_a_lex_error() {
        assert!(lex("\"split\nstring\"").is_err());
    }

    #[test]
    fn unexpected_character_is_a_lex_error() {
        let err = lex("{ @ }").unwrap_err();
        match err {
            PolicyError::Lex { position, message } => {
                assert_eq!(position, Position::new(1, 3));
                assert!(message.contains('@'));
            }
            other => panic!("expected lex error, got {other:?}"),
        }
    }

    #[test]
    fn bare_identifier_is_a_lex_error() {
        assert!(lex("maybe").is_err());
    }
}

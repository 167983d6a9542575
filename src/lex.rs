use logos::{Lexer, Logos};

/// Tokens of the proto structural grammar.
///
/// The token set is deliberately shallow: the scanners only need to recognise
/// declaration headers, element statements and comment spans, so numeric and
/// string literals are not decoded beyond what those patterns require. Comments
/// and string literals are single opaque tokens, which keeps keywords occurring
/// inside them from ever matching as structure.
#[derive(Debug, Clone, PartialEq, Eq, Logos)]
#[logos(skip r"[\t\v\f\r\n ]+")]
pub(crate) enum Token<'a> {
    #[regex("[A-Za-z_][A-Za-z0-9_]*")]
    Ident(&'a str),
    #[regex("[0-9]+", |lex| lex.slice().parse().ok())]
    IntLiteral(u64),
    #[regex(r#"'|""#, string)]
    StringLiteral(&'a str),
    #[token(".")]
    Dot,
    #[token("-")]
    Minus,
    #[token("+")]
    Plus,
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,
    #[token("<")]
    LeftAngleBracket,
    #[token(">")]
    RightAngleBracket,
    #[token(",")]
    Comma,
    #[token("=")]
    Equals,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token("/")]
    ForwardSlash,
    #[regex(r"//[^\n]*")]
    LineComment(&'a str),
    #[token("/*", block_comment)]
    BlockComment(&'a str),
}

impl Token<'_> {
    pub const MESSAGE: Token<'static> = Token::Ident("message");
    pub const ENUM: Token<'static> = Token::Ident("enum");
    pub const SERVICE: Token<'static> = Token::Ident("service");
}

/// Consumes a block comment up to and including the closing `*/`, or to end of
/// input if the comment is unterminated. The returned slice keeps the comment
/// markers; the normalizer strips them later.
fn block_comment<'a>(lex: &mut Lexer<'a, Token<'a>>) -> &'a str {
    match lex.remainder().find("*/") {
        Some(end) => lex.bump(end + 2),
        None => lex.bump(lex.remainder().len()),
    }
    lex.slice()
}

/// Consumes a string literal, returning the text between the quotes. Escape
/// sequences are skipped but not decoded; the only string value the scanners
/// read is the `syntax` literal, which contains none.
fn string<'a>(lex: &mut Lexer<'a, Token<'a>>) -> &'a str {
    let terminator = lex.slice().as_bytes()[0];
    let remainder = lex.remainder().as_bytes();
    let mut index = 0;
    while index < remainder.len() {
        match remainder[index] {
            b'\\' => index += 2,
            b'\n' => break,
            byte if byte == terminator => {
                lex.bump(index + 1);
                let slice = lex.slice();
                return &slice[1..slice.len() - 1];
            }
            _ => index += 1,
        }
    }
    lex.bump(index.min(remainder.len()));
    ""
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_tokens() {
        let source = "message Foo { string id = 1; }";
        let mut lexer = Token::lexer(source);

        assert_eq!(lexer.next().unwrap(), Ok(Token::MESSAGE));
        assert_eq!(lexer.next().unwrap(), Ok(Token::Ident("Foo")));
        assert_eq!(lexer.next().unwrap(), Ok(Token::LeftBrace));
        assert_eq!(lexer.next().unwrap(), Ok(Token::Ident("string")));
        assert_eq!(lexer.next().unwrap(), Ok(Token::Ident("id")));
        assert_eq!(lexer.next().unwrap(), Ok(Token::Equals));
        assert_eq!(lexer.next().unwrap(), Ok(Token::IntLiteral(1)));
        assert_eq!(lexer.next().unwrap(), Ok(Token::Semicolon));
        assert_eq!(lexer.next().unwrap(), Ok(Token::RightBrace));
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn comments_are_single_tokens() {
        let source = "// message NotReal {\n/* enum Hidden {\n * }\n */ service S";
        let mut lexer = Token::lexer(source);

        assert_eq!(
            lexer.next().unwrap(),
            Ok(Token::LineComment("// message NotReal {"))
        );
        assert_eq!(
            lexer.next().unwrap(),
            Ok(Token::BlockComment("/* enum Hidden {\n * }\n */"))
        );
        assert_eq!(lexer.next().unwrap(), Ok(Token::SERVICE));
        assert_eq!(lexer.next().unwrap(), Ok(Token::Ident("S")));
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn string_literals_are_opaque() {
        let source = r#"option note = "a { brace // and } more";"#;
        let mut lexer = Token::lexer(source);

        assert_eq!(lexer.next().unwrap(), Ok(Token::Ident("option")));
        assert_eq!(lexer.next().unwrap(), Ok(Token::Ident("note")));
        assert_eq!(lexer.next().unwrap(), Ok(Token::Equals));
        assert_eq!(
            lexer.next().unwrap(),
            Ok(Token::StringLiteral("a { brace // and } more"))
        );
        assert_eq!(lexer.next().unwrap(), Ok(Token::Semicolon));
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn escaped_quote_does_not_terminate() {
        let mut lexer = Token::lexer(r#""with \" quote" ;"#);

        assert_eq!(
            lexer.next().unwrap(),
            Ok(Token::StringLiteral(r#"with \" quote"#))
        );
        assert_eq!(lexer.next().unwrap(), Ok(Token::Semicolon));
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn unterminated_block_comment_runs_to_eof() {
        let mut lexer = Token::lexer("/* never closed\nmessage Foo {");

        assert_eq!(
            lexer.next().unwrap(),
            Ok(Token::BlockComment("/* never closed\nmessage Foo {"))
        );
        assert_eq!(lexer.next(), None);
    }
}

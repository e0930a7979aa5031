use pretty_assertions::assert_eq;

use super::prelude::{decode_hex_bytes, scan, Lexer, LexicalErrorType, Literal, Token, TokenKind};

fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
    tokens.iter().map(|token| token.kind).collect()
}

#[test]
fn test_single_chars() {
    let (tokens, errors) = scan("=+(){},;");

    assert!(errors.is_empty());
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::Assign,
            TokenKind::Plus,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::Comma,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );

    let lexemes = tokens.iter()
        .map(|token| token.lexeme.as_str())
        .collect::<Vec<&str>>();

    assert_eq!(lexemes, vec!["=", "+", "(", ")", "{", "}", ",", ";", ""]);
}

#[test]
fn test_two_char_operators() {
    let (tokens, errors) = scan("== != <= >= ++ -- = ! < > + - / *");

    assert!(errors.is_empty());
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::Equal,
            TokenKind::NotEqual,
            TokenKind::LessThanOrEqual,
            TokenKind::GreaterThanOrEqual,
            TokenKind::Increment,
            TokenKind::Decrement,
            TokenKind::Assign,
            TokenKind::Bang,
            TokenKind::LessThan,
            TokenKind::GreaterThan,
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Div,
            TokenKind::Mult,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_comments_and_lines() {
    let input = "a // ignored until the end of line\n/ b\n\n c";
    let (tokens, errors) = scan(input);

    assert!(errors.is_empty());
    assert_eq!(
        kinds(&tokens),
        vec![TokenKind::Ident, TokenKind::Div, TokenKind::Ident, TokenKind::Ident, TokenKind::Eof]
    );

    let lines = tokens.iter().map(|token| token.line).collect::<Vec<u32>>();
    assert_eq!(lines, vec![1, 2, 2, 4, 4]);
}

#[test]
fn test_keywords_and_identifiers() {
    let input = "var fun class super this nil or and if else true false for while return _under score9 print";
    let (tokens, errors) = scan(input);

    assert!(errors.is_empty());
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::Var,
            TokenKind::Fun,
            TokenKind::Class,
            TokenKind::Super,
            TokenKind::This,
            TokenKind::Nil,
            TokenKind::Or,
            TokenKind::And,
            TokenKind::If,
            TokenKind::Else,
            TokenKind::True,
            TokenKind::False,
            TokenKind::For,
            TokenKind::While,
            TokenKind::Return,
            TokenKind::Ident,
            TokenKind::Ident,
            TokenKind::Ident,
            TokenKind::Eof,
        ]
    );
    assert_eq!(tokens[15].lexeme, "_under");
    assert_eq!(tokens[16].lexeme, "score9");
}

#[test]
fn test_numbers() {
    let (tokens, errors) = scan("0 10 838383 0x1A 0xff 007");

    assert!(errors.is_empty());

    let literals = tokens.iter()
        .filter_map(|token| token.literal.clone())
        .collect::<Vec<Literal>>();

    assert_eq!(
        literals,
        vec![
            Literal::Int(0),
            Literal::Int(10),
            Literal::Int(838383),
            Literal::Int(26),
            Literal::Int(255),
            Literal::Int(7),
        ]
    );
    assert_eq!(tokens[3].lexeme, "0x1A");
}

#[test]
fn test_invalid_numbers() {
    let (tokens, errors) = scan("99999999999999999999 0x 0xFFFFFFFFFFFFFFFFFF 1");

    let fails = errors.iter()
        .map(|err| err.error.clone())
        .collect::<Vec<LexicalErrorType>>();

    assert_eq!(
        fails,
        vec![
            LexicalErrorType::NumberOutOfRange,
            LexicalErrorType::MissingHexDigits,
            LexicalErrorType::NumberOutOfRange,
        ]
    );
    assert_eq!(kinds(&tokens), vec![TokenKind::Number, TokenKind::Eof]);
}

#[test]
fn test_strings() {
    let (tokens, errors) = scan("\"hello\" \"multi\nline\" \"\"");

    assert!(errors.is_empty());
    assert_eq!(tokens[0].literal, Some(Literal::Str("hello".into())));
    assert_eq!(tokens[0].lexeme, "\"hello\"");
    assert_eq!(tokens[1].literal, Some(Literal::Str("multi\nline".into())));
    assert_eq!(tokens[1].line, 2);
    assert_eq!(tokens[2].literal, Some(Literal::Str("".into())));
}

#[test]
fn test_unterminated_string_keeps_scanning() {
    let (tokens, errors) = scan("a \"never closed\nstill string");

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].error, LexicalErrorType::UnterminatedString);
    assert_eq!(errors[0].line, 2);
    assert_eq!(kinds(&tokens), vec![TokenKind::Ident, TokenKind::Eof]);
}

#[test]
fn test_byte_strings() {
    let (tokens, errors) = scan("'DE AD BE EF' 'abc' ''");

    assert!(errors.is_empty());
    assert_eq!(tokens[0].kind, TokenKind::Bytes);
    assert_eq!(tokens[0].lexeme, "'DE AD BE EF'");
    assert_eq!(tokens[0].literal, Some(Literal::Bytes(vec![0xDE, 0xAD, 0xBE, 0xEF])));
    assert_eq!(tokens[1].literal, Some(Literal::Bytes(vec![0x0A, 0xBC])));
    assert_eq!(tokens[2].literal, Some(Literal::Bytes(vec![])));
}

#[test]
fn test_invalid_byte_strings() {
    let (_, errors) = scan("'XY' 'open");

    let fails = errors.iter()
        .map(|err| err.error.clone())
        .collect::<Vec<LexicalErrorType>>();

    assert_eq!(fails, vec![LexicalErrorType::InvalidBytes, LexicalErrorType::UnterminatedBytes]);
}

#[test]
fn test_decode_hex_bytes() {
    assert_eq!(decode_hex_bytes(" 1\t2 3 "), Some(vec![0x01, 0x23]));
    assert_eq!(decode_hex_bytes("ff"), Some(vec![0xFF]));
    assert_eq!(decode_hex_bytes("g0"), None);
}

#[test]
fn test_unexpected_character_continues() {
    let (tokens, errors) = scan("a @ b # c");

    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].error, LexicalErrorType::UnexpectedCharacter { ch: '@' });
    assert_eq!(errors[0].to_string(), "[line 1] Error: Unexpected character.");
    assert_eq!(errors[1].to_illegal_token().kind, TokenKind::Illegal);
    assert_eq!(errors[1].to_illegal_token().lexeme, "#");
    assert_eq!(
        kinds(&tokens),
        vec![TokenKind::Ident, TokenKind::Ident, TokenKind::Ident, TokenKind::Eof]
    );
}

#[test]
fn test_always_one_eof() {
    let inputs = ["", "   \n\t", "// only a comment", "\"open", "var x = 1;", "@@@", "'ab"];

    for input in inputs {
        let (tokens, _) = scan(input);
        let eofs = tokens.iter().filter(|token| token.is(TokenKind::Eof)).count();

        assert_eq!(eofs, 1, "input {input:?}");
        assert_eq!(tokens.last().map(|token| token.kind), Some(TokenKind::Eof), "input {input:?}");
    }
}

#[test]
fn test_iterator_stops_after_eof() {
    let mut lexer = Lexer::from_source("x");

    assert!(matches!(lexer.next(), Some(Ok(token)) if token.is(TokenKind::Ident)));
    assert!(matches!(lexer.next(), Some(Ok(token)) if token.is(TokenKind::Eof)));
    assert!(lexer.next().is_none());
}

#[test]
fn test_spans() {
    let (tokens, _) = scan("var név = 1;");

    // `név` is not an identifier: `é` is rejected, the rest still scans
    assert_eq!(tokens[0].span.start, 0);
    assert_eq!(tokens[0].span.end, 3);
    assert_eq!(tokens.last().map(|token| token.span.start), Some("var név = 1;".len() as u32));
}

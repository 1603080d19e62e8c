use std::collections::VecDeque;

use regcalc::lexer::{tokenize, LexerError, Scanner, TokenKind, TokenSource};
use regcalc::parser::{ExprKind, IncDecOp, Parser, ParserError, Statement, UnaryOp};

fn parser_for(src: &str) -> Parser<VecDeque<regcalc::lexer::Token>> {
    let tokens: VecDeque<_> = tokenize(src).expect("tokenizes").into();
    Parser::new(tokens)
}

fn prefix(src: &str) -> String {
    match parser_for(src).parse_statement().expect("parses") {
        Statement::Expression(expr) => expr.to_string(),
        other => panic!("expected an expression statement, got {other:?}"),
    }
}

fn parse_error(src: &str) -> ParserError {
    let mut parser = Parser::new(Scanner::new(src.as_bytes()));
    parser.parse_statement().expect_err("should not parse")
}

#[test]
fn tokenizes_operators_and_operands() {
    let kinds: Vec<TokenKind> = tokenize("a1 = ++_b - 42 * (c|d^e&f) / --g\n")
        .expect("tokenizes")
        .into_iter()
        .map(|token| token.kind)
        .collect();

    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier("a1".to_string()),
            TokenKind::Assign,
            TokenKind::Increment,
            TokenKind::Identifier("_b".to_string()),
            TokenKind::Minus,
            TokenKind::Integer(42),
            TokenKind::Asterisk,
            TokenKind::OpenParen,
            TokenKind::Identifier("c".to_string()),
            TokenKind::Pipe,
            TokenKind::Identifier("d".to_string()),
            TokenKind::Caret,
            TokenKind::Identifier("e".to_string()),
            TokenKind::Ampersand,
            TokenKind::Identifier("f".to_string()),
            TokenKind::CloseParen,
            TokenKind::Slash,
            TokenKind::Decrement,
            TokenKind::Identifier("g".to_string()),
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn tokens_carry_lexeme_and_position() {
    let tokens = tokenize("ab = 12\nc\n").expect("tokenizes");

    assert_eq!(tokens[0].lexeme, "ab");
    assert_eq!((tokens[0].pos.line, tokens[0].pos.column), (1, 1));
    assert_eq!(tokens[1].lexeme, "=");
    assert_eq!((tokens[1].pos.line, tokens[1].pos.column), (1, 4));
    assert_eq!(tokens[2].lexeme, "12");
    assert_eq!((tokens[2].pos.line, tokens[2].pos.column), (1, 6));
    assert_eq!((tokens[4].pos.line, tokens[4].pos.column), (2, 1));
}

#[test]
fn scanner_flags_unknown_characters() {
    let kinds: Vec<TokenKind> = tokenize("1 $ 2\r\n")
        .expect("tokenizes")
        .into_iter()
        .map(|token| token.kind)
        .collect();

    assert_eq!(
        kinds,
        vec![
            TokenKind::Integer(1),
            TokenKind::Unknown('$'),
            TokenKind::Integer(2),
            TokenKind::Unknown('\r'),
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn scanner_flags_invalid_utf8_as_unknown() {
    let mut scanner = Scanner::new(&b"x \xff= 1\n"[..]);
    let kinds: Vec<TokenKind> = scanner
        .scan_all()
        .expect("invalid bytes are not an error")
        .into_iter()
        .map(|token| token.kind)
        .collect();

    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier("x".to_string()),
            TokenKind::Unknown('\u{FFFD}'),
            TokenKind::Assign,
            TokenKind::Integer(1),
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn scanner_rejects_oversized_literal() {
    let err = tokenize("99999999999\n").expect_err("does not fit in 32 bits");
    assert!(matches!(err, LexerError::InvalidNumber(ref lexeme, _) if lexeme == "99999999999"));
}

#[test]
fn scanner_keeps_returning_eof() {
    let mut scanner = Scanner::new("".as_bytes());
    assert_eq!(scanner.next_token().expect("eof").kind, TokenKind::Eof);
    assert_eq!(scanner.next_token().expect("eof").kind, TokenKind::Eof);
}

#[test]
fn binary_operators_are_left_associative() {
    assert_eq!(prefix("1 - 2 - 3"), "- - 1 2 3");
    assert_eq!(prefix("8 / 4 / 2"), "/ / 8 4 2");
    assert_eq!(prefix("1 | 2 | 3"), "| | 1 2 3");
}

#[test]
fn precedence_levels_nest() {
    assert_eq!(prefix("1 + 2 * 3"), "+ 1 * 2 3");
    assert_eq!(prefix("1 | 2 ^ 3 & 4 + 5"), "| 1 ^ 2 & 3 + 4 5");
    assert_eq!(prefix("(1 | 2) * 3"), "* | 1 2 3");
}

#[test]
fn assignment_is_right_associative() {
    assert_eq!(prefix("a = b = 1 + 2"), "= a = b + 1 2");
}

#[test]
fn unary_sign_wraps_its_operand() {
    assert_eq!(prefix("-a * 2"), "* - a 2");
    assert_eq!(prefix("1 * - + 2"), "* 1 - + 2");

    let mut parser = parser_for("-5\n");
    let Statement::Expression(expr) = parser.parse_statement().expect("parses") else {
        panic!("expected an expression");
    };
    assert!(matches!(expr.kind, ExprKind::Unary { op: UnaryOp::Minus, .. }));
}

#[test]
fn prefix_increment_targets_identifier() {
    let mut parser = parser_for("--counter + 1\n");
    let Statement::Expression(expr) = parser.parse_statement().expect("parses") else {
        panic!("expected an expression");
    };
    let ExprKind::Binary { left, .. } = expr.kind else {
        panic!("expected an addition");
    };
    assert_eq!(
        left.kind,
        ExprKind::IncDec {
            op: IncDecOp::Decrement,
            name: "counter".to_string()
        }
    );
}

#[test]
fn statements_blank_lines_and_end_of_input() {
    let mut parser = parser_for("\n1\n\n");
    let statements = parser.parse_all().expect("parses");

    assert_eq!(statements.len(), 3);
    assert_eq!(statements[0], Statement::Empty);
    assert!(matches!(statements[1], Statement::Expression(_)));
    assert_eq!(statements[2], Statement::Empty);
    assert_eq!(parser.parse_statement().expect("eof"), Statement::EndOfInput);
}

#[test]
fn unknown_characters_are_skipped() {
    assert_eq!(prefix("1 $+ 2\n"), "+ 1 2");
}

#[test]
fn parser_exposes_current_lexeme() {
    let mut parser = parser_for("foo = 1\n");
    assert_eq!(parser.current_lexeme().expect("token"), "foo");
    assert!(parser.check(&TokenKind::Identifier(String::new())).expect("token"));
    parser.advance().expect("token");
    assert_eq!(parser.current_lexeme().expect("token"), "=");
}

#[test]
fn unclosed_parenthesis_is_an_error() {
    assert!(matches!(parse_error("(1 + 2\n"), ParserError::MismatchedParen(_)));
    assert!(matches!(parse_error("((1)\n"), ParserError::MismatchedParen(_)));
}

#[test]
fn missing_operand_is_an_error() {
    assert!(matches!(parse_error("1 +\n"), ParserError::ExpectedNumberOrIdentifier(..)));
    assert!(matches!(parse_error("* 2\n"), ParserError::ExpectedNumberOrIdentifier(..)));
    assert!(matches!(parse_error(")\n"), ParserError::ExpectedNumberOrIdentifier(..)));
}

#[test]
fn increment_needs_bare_identifier() {
    assert!(matches!(parse_error("++3\n"), ParserError::InvalidIncDecTarget(..)));
    assert!(matches!(parse_error("--(x)\n"), ParserError::InvalidIncDecTarget(..)));
    assert!(matches!(parse_error("++x++\n"), ParserError::ChainedIncDec(..)));
    assert!(matches!(parse_error("++x--\n"), ParserError::ChainedIncDec(..)));
}

#[test]
fn assignment_needs_bare_identifier() {
    assert!(matches!(parse_error("1 = 2\n"), ParserError::NotAnLvalue(_)));
    assert!(matches!(parse_error("(a) = 2\n"), ParserError::NotAnLvalue(_)));
    assert!(matches!(parse_error("a + b = 2\n"), ParserError::NotAnLvalue(_)));
    assert!(matches!(parse_error("++a = 2\n"), ParserError::NotAnLvalue(_)));
}

#[test]
fn trailing_tokens_are_an_error() {
    assert!(matches!(parse_error("1 2\n"), ParserError::UnexpectedToken(..)));
    assert!(matches!(parse_error("(1))\n"), ParserError::UnexpectedToken(..)));
}

#[test]
fn lexer_errors_surface_through_parser() {
    assert!(matches!(
        parse_error("1 + 123456789012\n"),
        ParserError::LexerError(LexerError::InvalidNumber(..))
    ));
}

#[test]
fn nesting_limit_applies_to_parens_signs_and_assignments() {
    let parse_with_limit = |src: &str| {
        let mut parser = Parser::with_max_nesting(Scanner::new(src.as_bytes()), 3);
        parser.parse_statement()
    };

    assert!(parse_with_limit("(((1)))\n").is_ok());
    assert!(matches!(parse_with_limit("((((1))))\n"), Err(ParserError::NestingTooDeep(3, _))));
    assert!(parse_with_limit("- - - 1\n").is_ok());
    assert!(matches!(parse_with_limit("- - - - 1\n"), Err(ParserError::NestingTooDeep(3, _))));
    assert!(parse_with_limit("a = b = c = 1\n").is_ok());
    assert!(matches!(parse_with_limit("a = b = c = d = 1\n"), Err(ParserError::NestingTooDeep(3, _))));
}

#[test]
fn nesting_depth_is_released_between_siblings() {
    let src = format!("{}1\n", "(1) + ".repeat(200));
    let mut parser = Parser::new(Scanner::new(src.as_bytes()));
    assert!(matches!(parser.parse_statement(), Ok(Statement::Expression(_))));
}

#[test]
fn default_nesting_limit_is_reachable() {
    let depth = regcalc::parser::DEFAULT_MAX_NESTING;
    let ok = format!("{}1{}\n", "(".repeat(depth), ")".repeat(depth));
    assert!(Parser::new(Scanner::new(ok.as_bytes())).parse_statement().is_ok());

    let deeper = format!("{}1{}\n", "(".repeat(depth + 1), ")".repeat(depth + 1));
    assert!(matches!(parse_error(&deeper), ParserError::NestingTooDeep(..)));
}

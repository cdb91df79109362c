//! Lexer behaviour: token boundaries, lookahead splits, and positions.

#[cfg(test)]
mod lexer_tests {
    use crate::utils::tokenize;
    use mood_ast::lexer::Lexer;
    use mood_ast::token::TokenKind;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn keywords_require_a_word_boundary() {
        assert_eq!(kinds("fn"), vec![TokenKind::Fn, TokenKind::Eof]);
        // `fnord` must fall through to identifier handling.
        assert_eq!(
            kinds("fnord"),
            vec![TokenKind::Identifier("fnord".to_string()), TokenKind::Eof]
        );
        assert_eq!(
            kinds("lettuce let"),
            vec![
                TokenKind::Identifier("lettuce".to_string()),
                TokenKind::Let,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn one_character_lookahead_splits_colons_and_equals() {
        assert_eq!(
            kinds(": :: = =="),
            vec![
                TokenKind::Colon,
                TokenKind::ColonColon,
                TokenKind::Assign,
                TokenKind::EqEq,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn numeric_suffix_lexes_as_three_tokens() {
        assert_eq!(
            kinds("1_i32"),
            vec![
                TokenKind::Number("1".to_string()),
                TokenKind::Underscore,
                TokenKind::Identifier("i32".to_string()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn line_comments_are_skipped() {
        assert_eq!(
            kinds("1 // a comment with fn and let\n2"),
            vec![
                TokenKind::Number("1".to_string()),
                TokenKind::Number("2".to_string()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn positions_are_monotonic() {
        let source = "struct Box { w: i32, h: i32 }\nfn area(b: Box): i32 { b.w * b.h }\n";
        let tokens = tokenize(source);
        let mut previous_end = 0;
        for token in &tokens {
            assert!(token.location.offset_end >= token.location.offset_start);
            assert!(token.location.offset_start >= previous_end);
            previous_end = token.location.offset_start;
        }
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn lines_and_columns_are_one_based() {
        let tokens = tokenize("fn\n  let");
        assert_eq!(tokens[0].location.start_line, 1);
        assert_eq!(tokens[0].location.start_column, 1);
        assert_eq!(tokens[1].location.start_line, 2);
        assert_eq!(tokens[1].location.start_column, 3);
    }

    #[test]
    fn a_tab_advances_the_column_by_one() {
        let tokens = tokenize("\tfn");
        assert_eq!(tokens[0].location.start_column, 2);
    }

    #[test]
    fn unexpected_characters_are_rejected_with_a_span() {
        let error = Lexer::new("let @").tokenize().unwrap_err();
        let location = error.location();
        assert_eq!(location.start_column, 5);
        assert_eq!(location.offset_start, 4);
    }
}

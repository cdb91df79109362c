//! Location arithmetic used by the parser and the diagnostics renderer.

#[cfg(test)]
mod location_tests {
    use mood_ast::nodes::Location;

    #[test]
    fn union_merges_ordered_spans() {
        let a = Location::new(0, 2, 1, 1, 1, 3);
        let b = Location::new(4, 6, 1, 5, 1, 7);
        let merged = Location::union(a, b);
        assert_eq!(merged.offset_start, 0);
        assert_eq!(merged.offset_end, 6);
        assert_eq!(merged.start_column, 1);
        assert_eq!(merged.end_column, 7);
    }

    #[test]
    fn union_is_order_independent() {
        let a = Location::new(0, 2, 1, 1, 1, 3);
        let b = Location::new(4, 6, 1, 5, 1, 7);
        assert_eq!(Location::union(a, b), Location::union(b, a));
    }

    #[test]
    fn last_char_spans_the_closing_character() {
        let block = Location::new(10, 20, 2, 1, 2, 11);
        let last = block.last_char();
        assert_eq!(last.offset_start, 19);
        assert_eq!(last.offset_end, 20);
        assert_eq!(last.start_column, 10);
        assert_eq!(last.end_column, 11);
    }
}

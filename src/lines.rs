#[derive(Debug, Clone)]
pub(crate) struct LineResolver {
    lines: Vec<usize>,
}

impl LineResolver {
    pub fn new(source: &str) -> Self {
        let lines = source
            .match_indices('\n')
            .map(|(index, _)| index + 1)
            .collect();
        LineResolver { lines }
    }

    /// Returns the zero-based line index containing the given byte offset.
    pub fn line_index(&self, offset: usize) -> usize {
        match self.lines.binary_search(&offset) {
            Ok(index) => index + 1,
            Err(index) => index,
        }
    }
}

#[test]
fn resolve_line_index() {
    let resolver = LineResolver::new("hello\nworld\nfoo");

    assert_eq!(resolver.line_index(0), 0);
    assert_eq!(resolver.line_index(4), 0);
    assert_eq!(resolver.line_index(5), 0);
    assert_eq!(resolver.line_index(6), 1);
    assert_eq!(resolver.line_index(11), 1);
    assert_eq!(resolver.line_index(12), 2);
    assert_eq!(resolver.line_index(14), 2);
}

/// Hands out citation ids for a single parse.
///
/// The parenthetical and numeric passes draw from one running in-text index,
/// so a document with two author-year mentions followed by `[1]` yields
/// `intext-0`, `intext-1`, `intext-num-2`. Reference ids are keyed by the
/// line's position among the non-empty lines of the reference region.
#[derive(Debug, Default)]
pub struct IdAllocator {
    in_text: usize,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for the next parenthetical author-year citation.
    pub fn next_in_text(&mut self) -> String {
        let id = format!("intext-{}", self.in_text);
        self.in_text += 1;
        id
    }

    /// Id for the next bracketed numeric citation.
    pub fn next_numeric(&mut self) -> String {
        let id = format!("intext-num-{}", self.in_text);
        self.in_text += 1;
        id
    }

    pub fn reference(line_index: usize) -> String {
        format!("ref-{}", line_index)
    }

    /// How many in-text ids have been issued so far.
    pub fn issued(&self) -> usize {
        self.in_text
    }
}

use crate::limits::DEFAULT_MAX_HEADER_DEPTH;

/// One open heading scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderFrame {
    pub level: usize,
    pub text: String,
}

/// Tracks the heading hierarchy enclosing the current parse position.
///
/// Frames are strictly increasing in level from bottom to top. Depth is
/// capped; headings past the cap still close shallower scopes but are not
/// themselves tracked.
#[derive(Debug, Clone)]
pub struct HeaderTracker {
    stack: Vec<HeaderFrame>,
    max_depth: usize,
}

impl Default for HeaderTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HEADER_DEPTH)
    }
}

impl HeaderTracker {
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self {
            stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Enter a heading: close every scope at this level or deeper, then
    /// open the new one if depth allows.
    ///
    /// Returns the ancestry enclosing the new heading (not including it).
    pub fn enter(&mut self, level: usize, text: &str) -> Vec<String> {
        while self.stack.last().is_some_and(|frame| frame.level >= level) {
            self.stack.pop();
        }
        let parents = self.ancestry();

        if self.stack.len() < self.max_depth {
            self.stack.push(HeaderFrame {
                level,
                text: text.to_string(),
            });
        }

        parents
    }

    /// Heading texts in scope, outermost first
    #[must_use]
    pub fn ancestry(&self) -> Vec<String> {
        self.stack.iter().map(|frame| frame.text.clone()).collect()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn frames(&self) -> &[HeaderFrame] {
        &self.stack
    }
}

//! Rendering options.

/// Default line width for [`Leader::Padded`].
pub const DEFAULT_PADDED_WIDTH: usize = 80;

/// How the heading is joined to its page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Leader {
    /// A fixed `" ...... "` separator
    #[default]
    Plain,
    /// Dots filling the line up to `width` characters
    Padded { width: usize },
}

impl Leader {
    /// Padded leader at the default width.
    pub fn padded() -> Self {
        Leader::Padded {
            width: DEFAULT_PADDED_WIDTH,
        }
    }
}

/// Options for rendering an outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Leader between heading and page
    pub leader: Leader,

    /// Spaces of indentation per level below the top
    pub indent_width: usize,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the leader style.
    pub fn with_leader(mut self, leader: Leader) -> Self {
        self.leader = leader;
        self
    }

    /// Set the indentation per level.
    pub fn with_indent(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            leader: Leader::Plain,
            indent_width: 4,
        }
    }
}

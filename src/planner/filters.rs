//! Filter graph expressions passed through `-filter_complex`

/// Two-branch palette chain: one branch builds a full-statistics palette, the
/// other is dithered against it
pub const HQ_GIF_PALETTE_FILTER: &str =
    "split=2[v1][v2];[v1]palettegen=stats_mode=full[palette];[v2][palette]paletteuse=dither=sierra2_4a";

/// Input pad every graph is attached to
const INPUT_LABEL: &str = "[0]";

/// Ordered list of filter chains joined with `;`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterGraph {
    filters: Vec<String>,
}

impl FilterGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, filter: impl Into<String>) {
        self.filters.push(filter.into());
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// `-filter_complex` value, or `None` when no filter is active
    pub fn to_expression(&self) -> Option<String> {
        if self.filters.is_empty() {
            None
        } else {
            Some(format!("{}{}", INPUT_LABEL, self.filters.join(";")))
        }
    }
}

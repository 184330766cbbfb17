use serde::Serialize;

/// Where a testimonial stands, derived from its `approved` and `featured`
/// flags. A featured but unapproved testimonial is still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Moderation {
    Pending,
    Approved,
    Featured,
}

impl Moderation {
    pub fn from_flags(approved: bool, featured: bool) -> Self {
        match (approved, featured) {
            (true, true) => Moderation::Featured,
            (true, false) => Moderation::Approved,
            (false, _) => Moderation::Pending,
        }
    }

    /// Only featured testimonials reach the public carousel.
    pub fn is_public(self) -> bool {
        self == Moderation::Featured
    }
}

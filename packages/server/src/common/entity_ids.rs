//! Typed ID definitions for all domain entities.

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for Member entities (platform users).
pub struct Member;

/// Marker type for canonical dictionary entries.
pub struct DictionaryEntry;

/// Marker type for staged user contributions.
pub struct Contribution;

/// Marker type for a member's saved word.
pub struct Favorite;

/// Marker type for user reports against a dictionary entry.
pub struct Report;

/// Marker type for a member's logged dictionary lookup.
pub struct SearchHistory;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

pub type MemberId = Id<Member>;

pub type DictionaryEntryId = Id<DictionaryEntry>;

pub type ContributionId = Id<Contribution>;

pub type FavoriteId = Id<Favorite>;

pub type ReportId = Id<Report>;

pub type SearchHistoryId = Id<SearchHistory>;

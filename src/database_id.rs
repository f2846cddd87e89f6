//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// The ID of an account in the chart of accounts.
pub type AccountId = DatabaseId;

/// The ID of a posting in the journal.
pub type PostingId = DatabaseId;

/// Authorization-scoped note filters
///
/// Every note read or write goes through a [`NoteFilter`] produced by
/// [`build_filter`]. The filter is a plain value: stores either evaluate it
/// in-process ([`NoteFilter::matches`]) or render it into SQL, so the scoping
/// rules live in exactly one place.
///
/// # Rules
///
/// - `List`, `Get` and `Update` exclude soft-deleted notes. `Delete` does not,
///   which makes deleting an already-deleted note succeed again.
/// - Non-admin callers are restricted to notes they own.
/// - A non-empty search term must appear, case-insensitively, in the title or
///   the content.
/// - A target id restricts the match to that single note.
///
/// # Example
///
/// ```
/// use notevault_shared::auth::middleware::AuthContext;
/// use notevault_shared::filter::{build_filter, NoteAction, NoteClause, Pagination};
/// use notevault_shared::models::user::Role;
/// use uuid::Uuid;
///
/// let caller = AuthContext::new(Uuid::new_v4(), Role::Owner);
/// let filter = build_filter(&caller, NoteAction::List, None, Some("meeting"));
///
/// assert!(filter.clauses().contains(&NoteClause::OwnerEquals(caller.user_id)));
/// assert!(filter.clauses().contains(&NoteClause::DeletedEquals(false)));
///
/// let page = Pagination::from_query(Some("2"), Some("5"));
/// assert_eq!((page.skip(), page.take()), (5, 5));
/// ```

use std::num::IntErrorKind;
use uuid::Uuid;

use crate::auth::middleware::AuthContext;
use crate::models::note::Note;

/// Page used when the query omits or garbles `page`
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the query omits or garbles `limit`
pub const DEFAULT_LIMIT: u32 = 10;

/// The note operation a filter is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteAction {
    /// Paginated listing, optionally searched
    List,

    /// Single note read
    Get,

    /// Content update of a single note
    Update,

    /// Soft delete of a single note
    Delete,
}

impl NoteAction {
    /// Whether soft-deleted notes are hidden from this action
    pub fn excludes_deleted(&self) -> bool {
        !matches!(self, NoteAction::Delete)
    }
}

/// One conjunct of a note predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteClause {
    /// `user_id` equals the given owner
    OwnerEquals(Uuid),

    /// `id` equals the given note
    IdEquals(Uuid),

    /// `is_deleted` equals the given flag
    DeletedEquals(bool),

    /// Term is a case-insensitive substring of the title OR the content
    TextSearch(String),
}

impl NoteClause {
    /// Evaluates this clause against a note
    pub fn matches(&self, note: &Note) -> bool {
        match self {
            NoteClause::OwnerEquals(owner) => note.user_id == *owner,
            NoteClause::IdEquals(id) => note.id == *id,
            NoteClause::DeletedEquals(flag) => note.is_deleted == *flag,
            NoteClause::TextSearch(term) => {
                let needle = term.to_lowercase();
                note.title.to_lowercase().contains(&needle)
                    || note.content.to_lowercase().contains(&needle)
            }
        }
    }
}

/// Conjunction of [`NoteClause`]s
///
/// An empty filter matches every note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    clauses: Vec<NoteClause>,
}

impl NoteFilter {
    /// Creates an empty (match-all) filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a clause
    pub fn and(mut self, clause: NoteClause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// Clauses in the order they were added
    pub fn clauses(&self) -> &[NoteClause] {
        &self.clauses
    }

    /// Whether the note satisfies every clause
    pub fn matches(&self, note: &Note) -> bool {
        self.clauses.iter().all(|clause| clause.matches(note))
    }
}

/// Builds the predicate a store must apply for `caller` performing `action`
///
/// Pure function: no I/O, no failure modes. An empty search term counts as
/// no search.
pub fn build_filter(
    caller: &AuthContext,
    action: NoteAction,
    target_id: Option<Uuid>,
    search: Option<&str>,
) -> NoteFilter {
    let mut filter = NoteFilter::new();

    if let Some(id) = target_id {
        filter = filter.and(NoteClause::IdEquals(id));
    }

    if action.excludes_deleted() {
        filter = filter.and(NoteClause::DeletedEquals(false));
    }

    if !caller.role.is_admin() {
        filter = filter.and(NoteClause::OwnerEquals(caller.user_id));
    }

    if let Some(term) = search.filter(|term| !term.is_empty()) {
        filter = filter.and(NoteClause::TextSearch(term.to_string()));
    }

    filter
}

/// Page/limit pair for listings
///
/// Both values are always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// Creates a pagination, replacing zero values with the defaults
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: if page == 0 { DEFAULT_PAGE } else { page },
            limit: if limit == 0 { DEFAULT_LIMIT } else { limit },
        }
    }

    /// Parses raw query-string values
    ///
    /// Anything that is not a positive integer falls back to the default
    /// instead of failing the request.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: parse_positive(page).unwrap_or(DEFAULT_PAGE),
            limit: parse_positive(limit).unwrap_or(DEFAULT_LIMIT),
        }
    }

    /// One-based page number
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Page size
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of matching notes to skip: `(page - 1) * limit`
    pub fn skip(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// Number of notes to return
    pub fn take(&self) -> u64 {
        u64::from(self.limit)
    }
}

/// Digit strings too large for `u32` clamp to `u32::MAX` so that an
/// oversized page still lands past the end of the listing.
fn parse_positive(raw: Option<&str>) -> Option<u32> {
    match raw?.trim().parse::<u32>() {
        Ok(0) => None,
        Ok(value) => Some(value),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(u32::MAX),
        Err(_) => None,
    }
}

// Internship postings: read-only listing plus lookups used by other modules.

pub mod handlers;
pub mod queries;

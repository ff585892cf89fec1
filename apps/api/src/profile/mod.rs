// User profiles: the skills/interests record the recommendation pipeline reads.

pub mod handlers;
pub mod queries;

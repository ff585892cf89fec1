// Dashboard summaries: application counts, profile completeness, quick matches.

pub mod handlers;

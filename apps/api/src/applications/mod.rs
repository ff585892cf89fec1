// Applications: a user applying to, listing, and withdrawing from postings.

pub mod handlers;
pub mod queries;

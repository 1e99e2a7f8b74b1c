pub mod page;
pub mod restaurant;
pub mod search_query;
pub mod user;

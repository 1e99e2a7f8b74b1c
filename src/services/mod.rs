pub mod restaurant_search;
pub mod restaurant_suggestions;
pub mod user_authentication;
pub mod user_registration;

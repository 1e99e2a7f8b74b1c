pub mod api_error;
pub mod distance;
pub mod handler_404;
pub mod query_params;

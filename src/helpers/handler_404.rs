use crate::helpers::api_error::ApiError;

pub async fn page_not_found_handler() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

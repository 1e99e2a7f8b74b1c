use std::sync::Arc;
use axum::{Extension, Json, Router};
use axum::extract::{Path, Query};
use axum::routing::get;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use crate::controller::AppState;
use crate::helpers::api_error::ApiError;
use crate::helpers::query_params::first_values;
use crate::models::page::PageResult;
use crate::models::restaurant::Restaurant;
use crate::models::search_query::{SearchQuery, SearchRestaurantParams};
use crate::services::restaurant_search::RestaurantSearchService;
use crate::services::restaurant_suggestions::RestaurantSuggestionService;

pub fn router(app_state: AppState) -> Router {
    let search_service = Arc::new(RestaurantSearchService::new(
        app_state.restaurant_repo.clone()
    ));
    let suggestion_service = Arc::new(RestaurantSuggestionService::new(
        app_state.restaurant_repo
    ));

    Router::new()
        .route("/", get(search_restaurants))
        .route("/suggestions", get(suggest_restaurants))
        .route("/cuisines", get(list_cuisines))
        .route("/:id", get(retrieve_restaurant))
        .route_layer(Extension(search_service))
        .route_layer(Extension(suggestion_service))
}

pub async fn search_restaurants(
    Extension(search_service): Extension<Arc<RestaurantSearchService>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<PageResult>, ApiError> {
    let params: SearchRestaurantParams = first_values(pairs)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let query = SearchQuery::from(&params);

    return match search_service.search(&query).await {
        Ok(page) => Ok(Json(page)),
        Err(e) => {
            warn!("Something went wrong searching for restaurants due to: {:#}", e);
            Err(ApiError::internal("Failed to fetch restaurants", e))
        }
    };
}

pub async fn retrieve_restaurant(
    Extension(search_service): Extension<Arc<RestaurantSearchService>>,
    Path(id): Path<String>,
) -> Result<Json<Restaurant>, ApiError> {
    let not_found = || ApiError::NotFound("Restaurant not found".to_string());

    // a non-numeric id can never match a record
    let Ok(id) = id.parse::<i32>() else {
        debug!("Rejecting non-numeric restaurant id: {}", id);
        return Err(not_found());
    };

    return match search_service.find_by_id(id).await {
        Ok(Some(restaurant)) => Ok(Json(restaurant)),
        Ok(None) => Err(not_found()),
        Err(e) => {
            warn!("Something went wrong retrieving restaurant {} due to: {:#}", id, e);
            Err(ApiError::internal("Failed to fetch restaurant", e))
        }
    };
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct SuggestionParam {
    pub query: Option<String>,
}

pub async fn suggest_restaurants(
    Extension(suggestion_service): Extension<Arc<RestaurantSuggestionService>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<String>>, ApiError> {
    let params: SuggestionParam = first_values(pairs)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let prefix = params.query.unwrap_or_default();

    return match suggestion_service.suggest(&prefix).await {
        Ok(suggestions) => Ok(Json(suggestions)),
        Err(e) => {
            warn!("Something went wrong fetching suggestions due to: {:#}", e);
            Err(ApiError::internal("Failed to fetch suggestions", e))
        }
    };
}

pub async fn list_cuisines(
    Extension(search_service): Extension<Arc<RestaurantSearchService>>,
) -> Result<Json<Vec<String>>, ApiError> {
    return match search_service.list_cuisines().await {
        Ok(cuisines) => Ok(Json(cuisines)),
        Err(e) => {
            warn!("Something went wrong fetching cuisines due to: {:#}", e);
            Err(ApiError::internal("Failed to fetch cuisines", e))
        }
    };
}

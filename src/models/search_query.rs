//! Search parameters as they arrive on the wire, and the typed query built from them.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use crate::helpers::distance::is_within_radius;
use crate::helpers::query_params::{non_blank, parse_number, parse_page, parse_range};
use crate::models::restaurant::{Location, Restaurant};

/// Raw query string of `GET /api/restaurants`. Everything stays a string so that a
/// malformed number degrades to "no constraint" instead of rejecting the request.
#[serde_as]
#[derive(Clone, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchRestaurantParams {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub price_range: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub city: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub search_term: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub distance: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub user_latitude: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub user_longitude: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub page: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn contains(&self, cost: f64) -> bool {
        cost >= self.min && cost <= self.max
    }
}

/// Field-level match conditions, all ANDed together. `search_term` is itself an
/// OR over city and name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RestaurantFilter {
    pub cuisine: Option<String>,
    pub price_range: Option<PriceRange>,
    pub city: Option<String>,
    pub search_term: Option<String>,
}

impl RestaurantFilter {
    pub fn matches(&self, restaurant: &Restaurant) -> bool {
        if let Some(cuisine) = &self.cuisine {
            if !contains_ignore_case(restaurant.cuisines.as_deref(), cuisine) {
                return false;
            }
        }

        if let Some(range) = &self.price_range {
            match restaurant.average_cost {
                Some(cost) if range.contains(cost) => {}
                _ => return false,
            }
        }

        if let Some(city) = &self.city {
            if !contains_ignore_case(restaurant.city.as_deref(), city) {
                return false;
            }
        }

        if let Some(term) = &self.search_term {
            let in_city = contains_ignore_case(restaurant.city.as_deref(), term);
            let in_name = contains_ignore_case(Some(restaurant.name.as_str()), term);
            if !in_city && !in_name {
                return false;
            }
        }

        true
    }
}

/// Case-insensitive substring match. A missing field never matches.
pub fn contains_ignore_case(haystack: Option<&str>, needle: &str) -> bool {
    haystack
        .map(|value| value.to_lowercase().contains(&needle.to_lowercase()))
        .unwrap_or(false)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceFilter {
    pub radius_km: f64,
    pub origin: Location,
}

impl DistanceFilter {
    /// Records without both coordinates are never within range.
    pub fn matches(&self, restaurant: &Restaurant) -> bool {
        restaurant
            .location()
            .map(|location| is_within_radius(location, self.origin, self.radius_km))
            .unwrap_or(false)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchQuery {
    pub filter: RestaurantFilter,
    pub distance: Option<DistanceFilter>,
    pub page: u32,
}

impl From<&SearchRestaurantParams> for SearchQuery {
    fn from(params: &SearchRestaurantParams) -> Self {
        let filter = RestaurantFilter {
            cuisine: non_blank(params.cuisine.as_deref()).map(str::to_string),
            price_range: parse_range(params.price_range.as_deref())
                .map(|(min, max)| PriceRange { min, max }),
            city: non_blank(params.city.as_deref()).map(str::to_string),
            search_term: non_blank(params.search_term.as_deref()).map(str::to_string),
        };

        // Distance filtering needs the radius and both reference coordinates.
        let distance = match (
            parse_number(params.distance.as_deref()),
            parse_number(params.user_latitude.as_deref()),
            parse_number(params.user_longitude.as_deref()),
        ) {
            (Some(radius_km), Some(lat), Some(lng)) => Some(DistanceFilter {
                radius_km,
                origin: Location { lat, lng },
            }),
            _ => None,
        };

        SearchQuery {
            filter,
            distance,
            page: parse_page(params.page.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(query: &str) -> SearchRestaurantParams {
        serde_urlencoded::from_str(query).unwrap()
    }

    fn restaurant() -> Restaurant {
        let mut restaurant = Restaurant::fixture(1, "Pizza Marzano");
        restaurant.city = Some("Jakarta".to_string());
        restaurant.cuisines = Some("Italian, Pizza".to_string());
        restaurant.average_cost = Some(200000.0);
        restaurant
    }

    #[test]
    fn empty_query_has_no_constraints() {
        let query = SearchQuery::from(&params(""));
        assert_eq!(query.filter, RestaurantFilter::default());
        assert_eq!(query.distance, None);
        assert_eq!(query.page, 1);
        assert!(query.filter.matches(&restaurant()));
    }

    #[test]
    fn empty_strings_are_absent() {
        let query = SearchQuery::from(&params("cuisine=&city=&searchTerm=&priceRange=&page="));
        assert_eq!(query.filter, RestaurantFilter::default());
        assert_eq!(query.page, 1);
    }

    #[test]
    fn cuisine_matches_case_insensitive_substring() {
        let query = SearchQuery::from(&params("cuisine=italian"));
        assert!(query.filter.matches(&restaurant()));

        let query = SearchQuery::from(&params("cuisine=Sunda"));
        assert!(!query.filter.matches(&restaurant()));
    }

    #[test]
    fn cuisine_filter_excludes_missing_cuisines() {
        let mut plain = restaurant();
        plain.cuisines = None;
        let query = SearchQuery::from(&params("cuisine=italian"));
        assert!(!query.filter.matches(&plain));
    }

    #[test]
    fn price_range_is_inclusive() {
        let query = SearchQuery::from(&params("priceRange=200000-300000"));
        assert_eq!(query.filter.price_range, Some(PriceRange { min: 200000.0, max: 300000.0 }));
        assert!(query.filter.matches(&restaurant()));

        let query = SearchQuery::from(&params("priceRange=100000-200000"));
        assert!(query.filter.matches(&restaurant()));

        let query = SearchQuery::from(&params("priceRange=0-199999"));
        assert!(!query.filter.matches(&restaurant()));
    }

    #[test]
    fn malformed_price_range_is_ignored() {
        let query = SearchQuery::from(&params("priceRange=cheap"));
        assert_eq!(query.filter.price_range, None);
        assert!(query.filter.matches(&restaurant()));
    }

    #[test]
    fn search_term_matches_city_or_name() {
        let by_city = SearchQuery::from(&params("searchTerm=jakar"));
        assert!(by_city.filter.matches(&restaurant()));

        let by_name = SearchQuery::from(&params("searchTerm=MARZANO"));
        assert!(by_name.filter.matches(&restaurant()));

        let neither = SearchQuery::from(&params("searchTerm=bandung"));
        assert!(!neither.filter.matches(&restaurant()));
    }

    #[test]
    fn search_term_is_anded_with_other_constraints() {
        let query = SearchQuery::from(&params("searchTerm=marzano&cuisine=sunda"));
        assert!(!query.filter.matches(&restaurant()));

        let query = SearchQuery::from(&params("searchTerm=marzano&city=bandung"));
        assert!(!query.filter.matches(&restaurant()));
    }

    #[test]
    fn distance_needs_radius_and_both_coordinates() {
        let full = SearchQuery::from(&params("distance=5&userLatitude=-6.2&userLongitude=106.816666"));
        assert_eq!(
            full.distance,
            Some(DistanceFilter {
                radius_km: 5.0,
                origin: Location { lat: -6.2, lng: 106.816666 },
            })
        );

        let missing_lng = SearchQuery::from(&params("distance=5&userLatitude=-6.2"));
        assert_eq!(missing_lng.distance, None);

        let malformed = SearchQuery::from(&params("distance=near&userLatitude=-6.2&userLongitude=106.8"));
        assert_eq!(malformed.distance, None);
    }

    #[test]
    fn distance_filter_excludes_records_without_coordinates() {
        let filter = DistanceFilter {
            radius_km: 20000.0,
            origin: Location { lat: -6.2, lng: 106.816666 },
        };

        let mut place = restaurant();
        assert!(!filter.matches(&place));

        place.latitude = Some(-6.9);
        assert!(!filter.matches(&place));

        place.longitude = Some(107.6);
        assert!(filter.matches(&place));
    }

    #[test]
    fn parses_page_number() {
        assert_eq!(SearchQuery::from(&params("page=4")).page, 4);
        assert_eq!(SearchQuery::from(&params("page=zero")).page, 1);
    }
}

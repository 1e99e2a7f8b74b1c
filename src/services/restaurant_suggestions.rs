use std::collections::HashSet;
use std::sync::Arc;
use crate::repositories::RestaurantRepository;

const NAME_SUGGESTIONS: usize = 5;
const CITY_SUGGESTIONS: usize = 5;
const MAX_SUGGESTIONS: usize = 10;

/// Typeahead over restaurant names and cities. Best effort, no ranking.
pub struct RestaurantSuggestionService {
    repo: Arc<dyn RestaurantRepository>,
}

impl RestaurantSuggestionService {
    pub fn new(repo: Arc<dyn RestaurantRepository>) -> Self {
        Self { repo }
    }

    pub async fn suggest(&self, prefix: &str) -> anyhow::Result<Vec<String>> {
        let fragment = prefix.trim().to_lowercase();
        if fragment.is_empty() {
            return Ok(Vec::new());
        }

        let (names, cities) = futures::try_join!(
            self.repo.names_containing(&fragment, NAME_SUGGESTIONS),
            self.repo.cities_containing(&fragment, CITY_SUGGESTIONS),
        )?;

        Ok(merge_suggestions(names, cities))
    }
}

/// Names first, then cities, keeping the first occurrence of each string.
fn merge_suggestions(names: Vec<String>, cities: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .chain(cities)
        .filter(|suggestion| seen.insert(suggestion.clone()))
        .take(MAX_SUGGESTIONS)
        .collect()
}

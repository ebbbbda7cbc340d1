use rand::seq::SliceRandom;

use super::repo::FoodRecord;

pub const MAX_RECOMMENDATIONS: usize = 3;

/// Filter criteria for a recommendation. Every field is optional; string
/// criteria match by equality, the price bound is less-or-equal on the tier.
#[derive(Debug, Default, Clone)]
pub struct Criteria {
    pub category: Option<String>,
    pub max_price: Option<i32>,
    pub cooking_type: Option<String>,
    pub spiciness: Option<String>,
}

/// Empty strings count as "no criterion given".
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

impl Criteria {
    pub fn matches(&self, food: &FoodRecord) -> bool {
        if let Some(category) = present(&self.category) {
            if food.category != category {
                return false;
            }
        }
        // A zero bound is treated as absent, like the empty string above.
        if let Some(max_price) = self.max_price.filter(|p| *p > 0) {
            if food.price_tier > max_price {
                return false;
            }
        }
        if let Some(cooking_type) = present(&self.cooking_type) {
            if food.cooking_type != cooking_type {
                return false;
            }
        }
        if let Some(spiciness) = present(&self.spiciness) {
            if food.spiciness != spiciness {
                return false;
            }
        }
        true
    }
}

/// Keeps the entries matching all given criteria, then samples down to
/// [`MAX_RECOMMENDATIONS`] uniformly without replacement. The sampled
/// result comes back in no particular order.
pub fn recommend(catalog: Vec<FoodRecord>, criteria: &Criteria) -> Vec<FoodRecord> {
    let matches: Vec<FoodRecord> = catalog
        .into_iter()
        .filter(|food| criteria.matches(food))
        .collect();

    if matches.len() <= MAX_RECOMMENDATIONS {
        return matches;
    }

    let mut rng = rand::thread_rng();
    matches
        .choose_multiple(&mut rng, MAX_RECOMMENDATIONS)
        .cloned()
        .collect()
}

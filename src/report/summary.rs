use crate::helpers::keywords::merge_keywords;
use crate::models::restaurant::RestaurantSummary;

pub const TABLE_ROW_LIMIT: usize = 10;
pub const REPORT_KEYWORD_LIMIT: usize = 8;
const NAME_CHAR_LIMIT: usize = 44;
// Roughly what fits in the 400pt analysis box at 10pt Helvetica.
const KEYWORD_LINE_CHAR_LIMIT: usize = 70;

#[derive(Clone, Debug, PartialEq)]
pub struct TableRow {
    pub name: String,
    pub rating: String,
    pub distance: String,
}

/// Figures drawn on the two report pages.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReportSummary {
    pub rows: Vec<TableRow>,
    pub restaurant_count: usize,
    pub positive_review_total: usize,
    pub negative_review_total: usize,
    pub average_rating: Option<f64>,
    pub top_keywords: Vec<String>,
}

impl ReportSummary {
    pub fn from_restaurants(restaurants: &[RestaurantSummary]) -> Self {
        let rows = restaurants
            .iter()
            .take(TABLE_ROW_LIMIT)
            .map(|restaurant| TableRow {
                name: truncate(restaurant.name.as_deref().unwrap_or("Unnamed"), NAME_CHAR_LIMIT),
                rating: restaurant
                    .rating
                    .map(|rating| format!("{:.1}", rating))
                    .unwrap_or_else(|| "N/A".to_string()),
                distance: format!("{} m", restaurant.distance_meters),
            })
            .collect();

        let ratings: Vec<f64> = restaurants.iter().filter_map(|r| r.rating).collect();
        let average_rating = if ratings.is_empty() {
            None
        } else {
            Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
        };

        Self {
            rows,
            restaurant_count: restaurants.len(),
            positive_review_total: restaurants.iter().map(|r| r.positive_reviews.count).sum(),
            negative_review_total: restaurants.iter().map(|r| r.negative_reviews.count).sum(),
            average_rating,
            top_keywords: merge_keywords(
                restaurants.iter().map(|r| r.common_keywords.as_slice()),
                REPORT_KEYWORD_LIMIT,
            ),
        }
    }

    pub fn keyword_line(&self) -> String {
        if self.top_keywords.is_empty() {
            return "No recurring keywords in reviews".to_string();
        }
        truncate(
            &format!("Frequent words: {}", self.top_keywords.join(", ")),
            KEYWORD_LINE_CHAR_LIMIT,
        )
    }

    pub fn average_rating_label(&self) -> String {
        match self.average_rating {
            Some(rating) => format!("{:.1} / 5", rating),
            None => "N/A".to_string(),
        }
    }
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(limit - 3).collect();
    truncated.push_str("...");
    truncated
}

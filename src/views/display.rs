//! Text rendering helpers for movies, ratings and pagination

use crate::api::models::{Movie, Page, Rating};

const STAR_SLOTS: u32 = 5;

/// Average as shown to users; "N/A" until the movie has ratings
pub fn average_label(movie: &Movie) -> String {
    match movie.average() {
        Some(avg) => format!("{:.1}", avg),
        None => "N/A".to_string(),
    }
}

pub fn count_label(movie: &Movie) -> String {
    match movie.ratings_count {
        1 => "1 rating".to_string(),
        n => format!("{} ratings", n),
    }
}

/// Five-slot star bar; slot `s` is filled when `s <= round(avg)`
pub fn star_bar(average: Option<f64>) -> String {
    let filled = average
        .map(|avg| avg.round().clamp(0.0, f64::from(STAR_SLOTS)) as u32)
        .unwrap_or(0);
    (1..=STAR_SLOTS)
        .map(|s| if s <= filled { '★' } else { '☆' })
        .collect()
}

pub fn page_label<T>(page: &Page<T>) -> String {
    if page.pages == 0 {
        "No results".to_string()
    } else {
        format!("Page {} of {} ({} total)", page.page, page.pages, page.total)
    }
}

/// One-line summary as in a list card
pub fn movie_card(movie: &Movie) -> String {
    format!(
        "#{} {} ({} • {})  {} {} ({})",
        movie.id,
        movie.title,
        if movie.genre.is_empty() { "Unknown genre" } else { movie.genre.as_str() },
        movie.release_year,
        star_bar(movie.average()),
        average_label(movie),
        movie.ratings_count,
    )
}

pub fn rating_line(rating: &Rating) -> String {
    let date = rating
        .created_at
        .as_deref()
        .map(short_date)
        .unwrap_or_default();
    let review = rating.review.as_deref().unwrap_or("(no review)");
    format!(
        "{} {} by {}{}: {}",
        star_bar(Some(rating.rating as f64)),
        rating.rating,
        rating.user.display_name(),
        if date.is_empty() { String::new() } else { format!(" on {}", date) },
        review
    )
}

/// `YYYY-MM-DD` for RFC 3339 timestamps, the raw text otherwise
fn short_date(timestamp: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}

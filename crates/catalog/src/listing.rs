//! Release selection and rendering for the agent tools.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use metalagent_config::ListingOrder;

use crate::record::ReleaseRecord;

/// Returned by [`recent_listing`] when nothing matches.
pub const NO_RECENT_RELEASES: &str = "No recent releases found for the specified genres.";

/// Render records one bullet per line.
pub fn render_listing<'a>(records: impl IntoIterator<Item = &'a ReleaseRecord>) -> String {
    records
        .into_iter()
        .map(ReleaseRecord::bullet)
        .collect::<Vec<_>>()
        .join("\n")
}

/// The newest `limit` releases, optionally narrowed to a genre.
///
/// A blank `genre` means every record. Undated records are kept. With
/// [`ListingOrder::ReleaseDate`] the records are stably sorted by date first
/// (undated ones first), so ties keep catalog order; with
/// [`ListingOrder::AsLoaded`] catalog order is assumed to be oldest-first.
pub fn menu_listing(
    releases: &[ReleaseRecord],
    genre: Option<&str>,
    limit: usize,
    order: ListingOrder,
) -> String {
    let needle = genre
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_lowercase);

    let mut selected: Vec<&ReleaseRecord> = releases
        .iter()
        .filter(|r| needle.as_deref().is_none_or(|n| r.genre_contains(n)))
        .collect();

    if order == ListingOrder::ReleaseDate {
        selected.sort_by_key(|r| r.date());
    }

    let skip = selected.len().saturating_sub(limit);
    render_listing(selected.into_iter().skip(skip))
}

/// The last second of `day`, for pinning the window end to a calendar date.
pub fn end_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_hms_opt(23, 59, 59)
        .unwrap_or_else(|| day.and_time(NaiveTime::MIN))
}

/// Releases from the trailing window in any of the comma-separated genres.
///
/// The window is `[now - window_days, now]`, inclusive on both ends, and a
/// release counts from midnight of its date. A release dated exactly
/// `window_days` ago is therefore out unless `now` is itself midnight.
/// Undated records never match. At most `limit` records are kept, in
/// catalog order; no match at all yields [`NO_RECENT_RELEASES`].
pub fn recent_listing(
    releases: &[ReleaseRecord],
    genres: &str,
    now: NaiveDateTime,
    window_days: u32,
    limit: usize,
) -> String {
    let needles = split_genres(genres);
    let start = now
        .checked_sub_days(Days::new(u64::from(window_days)))
        .unwrap_or(NaiveDateTime::MIN);

    let matching: Vec<&ReleaseRecord> = releases
        .iter()
        .filter(|r| needles.iter().any(|n| r.genre_contains(n)))
        .filter(|r| {
            r.date()
                .map(|d| d.and_time(NaiveTime::MIN))
                .is_some_and(|released| start <= released && released <= now)
        })
        .take(limit)
        .collect();

    if matching.is_empty() {
        return NO_RECENT_RELEASES.to_string();
    }
    render_listing(matching)
}

/// Lowercased, trimmed, non-empty genre entries from a comma-separated list.
pub fn split_genres(genres: &str) -> Vec<String> {
    genres
        .split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(band: &str, genre: &str, date: &str) -> ReleaseRecord {
        let mut r = ReleaseRecord::default();
        r.set("Band", band);
        r.set("Album", format!("{band} LP"));
        r.set("Genre", genre);
        r.set("Release Date", date);
        r
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, 15).unwrap()
    }

    fn now() -> NaiveDateTime {
        today().and_hms_opt(14, 30, 0).unwrap()
    }

    #[test]
    fn menu_keeps_last_hundred_in_input_order() {
        let releases: Vec<_> = (0..150)
            .map(|i| record(&format!("Band {i}"), "Black Metal", "TBA"))
            .collect();

        for order in [ListingOrder::AsLoaded, ListingOrder::ReleaseDate] {
            let listing = menu_listing(&releases, Some("black"), 100, order);
            let lines: Vec<_> = listing.lines().collect();
            assert_eq!(lines.len(), 100);
            assert_eq!(lines[0], "- Band 50 - Band 50 LP [Black Metal] (TBA)");
            assert_eq!(lines[99], "- Band 149 - Band 149 LP [Black Metal] (TBA)");
        }
    }

    #[test]
    fn menu_filters_genre_case_insensitively() {
        let releases = vec![
            record("Mgła", "Black Metal", "May 1st, 2024"),
            record("Pallbearer", "Doom Metal", "May 2nd, 2024"),
            record("Panopticon", "Atmospheric BLACK Metal", "May 3rd, 2024"),
        ];
        let listing = menu_listing(&releases, Some("Black"), 100, ListingOrder::AsLoaded);
        assert!(listing.contains("Mgła"));
        assert!(listing.contains("Panopticon"));
        assert!(!listing.contains("Pallbearer"));
    }

    #[test]
    fn blank_genre_lists_everything() {
        let releases = vec![
            record("Mgła", "Black Metal", "May 1st, 2024"),
            record("Pallbearer", "Doom Metal", "May 2nd, 2024"),
        ];
        let none = menu_listing(&releases, None, 100, ListingOrder::AsLoaded);
        let blank = menu_listing(&releases, Some("  "), 100, ListingOrder::AsLoaded);
        assert_eq!(none.lines().count(), 2);
        assert_eq!(none, blank);
    }

    #[test]
    fn release_date_order_takes_newest() {
        let releases = vec![
            record("Newest", "Doom Metal", "June 1st, 2024"),
            record("Undated", "Doom Metal", "someday"),
            record("Oldest", "Doom Metal", "January 1st, 2020"),
            record("Middle", "Doom Metal", "March 1st, 2022"),
        ];
        let listing = menu_listing(&releases, Some("doom"), 2, ListingOrder::ReleaseDate);
        let bands: Vec<_> = listing.lines().map(|l| l.split(" - ").next().unwrap()).collect();
        assert_eq!(bands, vec!["- Middle", "- Newest"]);

        let as_loaded = menu_listing(&releases, Some("doom"), 2, ListingOrder::AsLoaded);
        assert!(as_loaded.starts_with("- Oldest"));
    }

    #[test]
    fn menu_includes_undated_records() {
        let releases = vec![record("Undated", "Doom Metal", "someday")];
        let listing = menu_listing(&releases, Some("doom"), 100, ListingOrder::ReleaseDate);
        assert_eq!(listing, "- Undated - Undated LP [Doom Metal] (someday)");
    }

    #[test]
    fn recent_window_keeps_time_of_day() {
        let releases = vec![
            record("Edge Old", "Black Metal", "September 15th, 2024"),
            record("Inside", "Black Metal", "September 16th, 2024"),
            record("Today", "Black Metal", "October 15th, 2024"),
            record("Future", "Black Metal", "October 16th, 2024"),
        ];
        let listing = recent_listing(&releases, "black metal", now(), 30, 15);
        assert!(!listing.contains("Edge Old"));
        assert!(listing.contains("Inside"));
        assert!(listing.contains("Today"));
        assert!(!listing.contains("Future"));
    }

    #[test]
    fn release_exactly_window_days_ago_is_out() {
        let releases = vec![record("Edge", "Black Metal", "September 15th, 2024")];
        assert_eq!(
            recent_listing(&releases, "black", end_of_day(today()), 30, 15),
            NO_RECENT_RELEASES
        );
    }

    #[test]
    fn window_start_is_inclusive_at_midnight() {
        let releases = vec![record("Edge", "Black Metal", "September 15th, 2024")];
        let midnight = today().and_time(NaiveTime::MIN);
        let listing = recent_listing(&releases, "black", midnight, 30, 15);
        assert!(listing.starts_with("- Edge"));
    }

    #[test]
    fn end_of_day_is_last_second() {
        assert_eq!(end_of_day(today()), today().and_hms_opt(23, 59, 59).unwrap());
    }

    #[test]
    fn recent_matches_any_listed_genre() {
        let releases = vec![
            record("Mgła", "Black Metal", "October 1st, 2024"),
            record("Pallbearer", "Doom Metal", "October 2nd, 2024"),
            record("Gojira", "Groove Metal", "October 3rd, 2024"),
        ];
        let listing = recent_listing(&releases, "Doom, black ,", now(), 30, 15);
        assert_eq!(listing.lines().count(), 2);
        assert!(listing.starts_with("- Mgła"));
        assert!(!listing.contains("Gojira"));
    }

    #[test]
    fn recent_excludes_undated_and_truncates_in_catalog_order() {
        let mut releases = vec![record("Undated", "Thrash Metal", "soon")];
        releases.extend((1..=20).map(|i| record(&format!("Band {i}"), "Thrash Metal", "October 10th, 2024")));

        let listing = recent_listing(&releases, "thrash", now(), 30, 15);
        let lines: Vec<_> = listing.lines().collect();
        assert_eq!(lines.len(), 15);
        assert!(lines[0].starts_with("- Band 1 "));
        assert!(lines[14].starts_with("- Band 15 "));
        assert!(!listing.contains("Undated"));
    }

    #[test]
    fn recent_without_matches_returns_sentinel() {
        let releases = vec![record("Mgła", "Black Metal", "October 1st, 2024")];
        assert_eq!(recent_listing(&releases, "polka", now(), 30, 15), NO_RECENT_RELEASES);
        assert_eq!(recent_listing(&[], "black", now(), 30, 15), NO_RECENT_RELEASES);
        assert_eq!(recent_listing(&releases, " , ", now(), 30, 15), NO_RECENT_RELEASES);
    }

    #[test]
    fn split_genres_drops_blanks() {
        assert_eq!(split_genres("Black Metal, ,Doom"), vec!["black metal", "doom"]);
        assert!(split_genres("").is_empty());
    }
}

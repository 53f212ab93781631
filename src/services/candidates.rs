use crate::models::{Candidate, MediaKind, RawResult};

/// Canonical prefix every IMDb-style identifier carries
pub const ID_PREFIX: &str = "tt";

/// Poster value providers use to say "no image"
pub const NO_POSTER: &str = "N/A";

/// Checks a raw record against the eligibility rules: a real poster and a
/// canonical identifier.
pub fn is_eligible(raw: &RawResult) -> bool {
    let has_poster = raw
        .poster
        .as_deref()
        .map(str::trim)
        .is_some_and(|poster| !poster.is_empty() && poster != NO_POSTER);

    let has_id = raw
        .external_id
        .as_deref()
        .is_some_and(|id| id.starts_with(ID_PREFIX));

    has_poster && has_id
}

/// Turns a provider result list into playable candidates.
///
/// Keeps provider order. Ineligible records are dropped; nothing is
/// deduplicated.
pub fn filter_candidates(results: Vec<RawResult>) -> Vec<Candidate> {
    let total = results.len();

    let candidates: Vec<Candidate> = results
        .into_iter()
        .filter(is_eligible)
        .filter_map(into_candidate)
        .collect();

    if candidates.len() < total {
        tracing::debug!(
            received = total,
            eligible = candidates.len(),
            "Dropped ineligible search results"
        );
    }

    candidates
}

fn into_candidate(raw: RawResult) -> Option<Candidate> {
    Some(Candidate {
        external_id: raw.external_id?,
        title: raw.title.unwrap_or_default(),
        poster_url: raw.poster?.trim().to_string(),
        year: raw.year.unwrap_or_default(),
        media_kind: MediaKind::from_provider_tag(raw.kind.as_deref()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: Option<&str>, poster: Option<&str>, kind: &str) -> RawResult {
        RawResult {
            external_id: id.map(str::to_string),
            title: Some("Some Title".to_string()),
            poster: poster.map(str::to_string),
            year: Some("1999".to_string()),
            kind: Some(kind.to_string()),
        }
    }

    #[test]
    fn test_matrix_scenario_keeps_only_valid_poster() {
        let results = vec![
            raw(Some("tt0000001"), Some("N/A"), "movie"),
            raw(Some("tt0133093"), Some("https://img.example/matrix.jpg"), "movie"),
        ];

        let candidates = filter_candidates(results);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].external_id, "tt0133093");
        assert_eq!(candidates[0].media_kind, MediaKind::Movie);
        assert_eq!(candidates[0].year, "1999");
    }

    #[test]
    fn test_drops_missing_or_malformed_ids() {
        let results = vec![
            raw(None, Some("https://img.example/a.jpg"), "movie"),
            raw(Some("133093"), Some("https://img.example/b.jpg"), "movie"),
            raw(Some(""), Some("https://img.example/c.jpg"), "movie"),
        ];
        assert!(filter_candidates(results).is_empty());
    }

    #[test]
    fn test_drops_missing_or_blank_posters() {
        let results = vec![
            raw(Some("tt1"), None, "movie"),
            raw(Some("tt2"), Some(""), "movie"),
            raw(Some("tt3"), Some("  "), "movie"),
        ];
        assert!(filter_candidates(results).is_empty());
    }

    #[test]
    fn test_preserves_order_and_duplicate_titles() {
        let mut first = raw(Some("tt3"), Some("https://img.example/3.jpg"), "series");
        first.title = Some("Same".to_string());
        let mut second = raw(Some("tt1"), Some("https://img.example/1.jpg"), "movie");
        second.title = Some("Same".to_string());
        let third = raw(Some("tt2"), Some("https://img.example/2.jpg"), "episode");

        let candidates = filter_candidates(vec![first, second, third]);
        let ids: Vec<_> = candidates.iter().map(|c| c.external_id.as_str()).collect();
        assert_eq!(ids, vec!["tt3", "tt1", "tt2"]);
        assert_eq!(candidates[0].media_kind, MediaKind::Series);
        assert_eq!(candidates[2].media_kind, MediaKind::Episode);
    }

    #[test]
    fn test_every_emitted_candidate_is_eligible() {
        let ids = [None, Some("tt9"), Some("9"), Some("TT9"), Some("tt")];
        let posters = [None, Some("N/A"), Some(""), Some("https://img.example/p.jpg")];

        let mut results = Vec::new();
        for id in ids {
            for poster in posters {
                results.push(raw(id, poster, "movie"));
            }
        }

        for candidate in filter_candidates(results) {
            assert!(candidate.external_id.starts_with(ID_PREFIX));
            assert!(!candidate.poster_url.is_empty());
            assert_ne!(candidate.poster_url, NO_POSTER);
        }
    }

    #[test]
    fn test_missing_title_and_year_become_empty() {
        let record = RawResult {
            external_id: Some("tt42".to_string()),
            poster: Some("https://img.example/42.jpg".to_string()),
            ..Default::default()
        };
        let candidates = filter_candidates(vec![record]);
        assert_eq!(candidates[0].title, "");
        assert_eq!(candidates[0].year, "");
    }
}

use crate::{
    models::{Candidate, MediaKind},
    services::{
        candidates::ID_PREFIX,
        servers::{ServerTemplate, ID_TOKEN, TYPE_TOKEN},
    },
};

/// Path segment used for series
pub const SERIES_SEGMENT: &str = "tv";

/// Path segment used for movies and single episodes
pub const MOVIE_SEGMENT: &str = "movie";

/// Servers that only play a series when told which episode to open
pub const EPISODE_SUFFIX_SERVERS: &[&str] = &["Primary Server", "Server 3 (su)"];

/// No season/episode picker exists, so series always open at S1E1
pub const EPISODE_SUFFIX: &str = "&season=1&episode=1";

/// Prepends the canonical prefix when the identifier lacks it
pub fn normalize_id(external_id: &str) -> String {
    if external_id.starts_with(ID_PREFIX) {
        external_id.to_string()
    } else {
        format!("{}{}", ID_PREFIX, external_id)
    }
}

pub fn media_segment(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Series => SERIES_SEGMENT,
        MediaKind::Movie | MediaKind::Episode => MOVIE_SEGMENT,
    }
}

/// Builds the playable URL for `candidate` on `server`.
///
/// Each placeholder is replaced at most once and substituted values are never
/// rescanned, so an identifier that happens to contain `{type}` stays intact.
/// A missing `{type}` placeholder leaves the pattern's own path in place.
pub fn resolve(candidate: &Candidate, server: &ServerTemplate) -> String {
    let id = normalize_id(&candidate.external_id);
    let segment = media_segment(candidate.media_kind);

    let mut url = substitute(
        &server.url_pattern,
        &[(TYPE_TOKEN, segment), (ID_TOKEN, id.as_str())],
    );

    if candidate.media_kind == MediaKind::Series
        && EPISODE_SUFFIX_SERVERS.contains(&server.name.as_str())
    {
        url.push_str(EPISODE_SUFFIX);
    }

    url
}

/// Single left-to-right pass replacing the first occurrence of each token
fn substitute(pattern: &str, tokens: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(pattern.len() + 16);
    let mut used = vec![false; tokens.len()];
    let mut rest = pattern;

    'scan: while !rest.is_empty() {
        for (i, (token, value)) in tokens.iter().enumerate() {
            if !used[i] && rest.starts_with(token) {
                out.push_str(value);
                rest = &rest[token.len()..];
                used[i] = true;
                continue 'scan;
            }
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }

    out
}

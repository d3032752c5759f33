//! HTTP span helpers.

use uuid::Uuid;

use tq_app::domain::access_links::{records::LinkChannel, token::AccessToken};

#[derive(Debug, Clone)]
pub(super) struct RequestSpanName {
    pub(super) route: String,
    pub(super) span_name: String,
}

pub(super) fn request_span_name(method: &str, path: &str) -> RequestSpanName {
    let route = normalise_path(path);
    let span_name = format!("{method} {route}");

    RequestSpanName { route, span_name }
}

/// Collapse identifiers so paths are safe to log and cheap to label.
///
/// The segment after `/pq` or `/lp` is always treated as an access token,
/// even when malformed.
pub(super) fn normalise_path(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let mut normalised = String::from("/");
    let mut previous: Option<&str> = None;

    for (index, segment) in path.trim_start_matches('/').split('/').enumerate() {
        if index > 0 {
            normalised.push('/');
        }

        let follows_public_prefix = index == 1 && previous.is_some_and(is_public_prefix);

        if follows_public_prefix || AccessToken::parse(segment).is_ok() {
            normalised.push_str("{token}");
        } else if Uuid::parse_str(segment).is_ok() {
            normalised.push_str("{uuid}");
        } else {
            normalised.push_str(segment);
        }

        previous = Some(segment);
    }

    normalised
}

fn is_public_prefix(segment: &str) -> bool {
    [LinkChannel::PublicQuote, LinkChannel::LandingPage]
        .iter()
        .any(|channel| channel.path_segment() == segment)
}

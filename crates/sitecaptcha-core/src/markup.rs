//! Minimal `action="..."` attribute scanner.

use percent_encoding::percent_decode_str;
use url::{ParseError, Url};

const ACTION_ATTR: &str = "action=\"";

/// Value of the first `action="..."` attribute in `body`.
///
/// A match at offset zero is ignored, as is an attribute without a closing
/// quote.
pub fn scan_action(body: &str) -> Option<&str> {
    let pos = body.find(ACTION_ATTR).filter(|p| *p > 0)?;
    let rest = &body[pos + ACTION_ATTR.len()..];
    let end = rest.find('"')?;
    Some(&rest[..end])
}

/// Decoded path component of a URL reference (`/a%20b?x#y` -> `/a b`,
/// `https://host/a` -> `/a`). Unparseable references are returned as-is.
pub fn action_path(reference: &str) -> String {
    let parsed = if reference.starts_with("//") {
        Url::parse(&format!("http:{reference}"))
    } else if reference.starts_with('/') {
        Url::parse(&format!("http://dummy{reference}"))
    } else {
        match Url::parse(reference) {
            // Relative path: resolve under a dummy root, then drop the root.
            Err(ParseError::RelativeUrlWithoutBase) => {
                return match Url::parse(&format!("http://dummy/{reference}")) {
                    Ok(u) => decode(u.path().trim_start_matches('/')),
                    Err(_) => reference.to_string(),
                };
            }
            other => other,
        }
    };

    match parsed {
        Ok(u) if u.cannot_be_a_base() => String::new(),
        // Special schemes always serialize an empty path as `/`.
        Ok(u) if u.path() == "/" && !has_explicit_path(reference) => String::new(),
        Ok(u) => decode(u.path()),
        Err(_) => reference.to_string(),
    }
}

fn decode(path: &str) -> String {
    percent_decode_str(path).decode_utf8_lossy().into_owned()
}

fn has_explicit_path(reference: &str) -> bool {
    let rest = match reference.split_once("//") {
        Some((_, rest)) => rest,
        None => reference,
    };
    rest.split(['?', '#']).next().is_some_and(|r| r.contains('/'))
}

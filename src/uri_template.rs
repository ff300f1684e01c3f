use indexmap::IndexMap;
use matchit::{InsertError, Router};
use percent_encoding::percent_decode_str;

/// Checks that `template` can be matched against concrete paths.
///
/// Fails for templates the router cannot express, such as two variables in
/// one segment (`/a/{x}-{y}`).
pub fn check(template: &str) -> Result<(), InsertError> {
    Router::new().insert(template, ())
}

/// Extracts the variables of `template` from a concrete `path`.
///
/// Returns `None` when the path does not match the template. A template
/// without variables that matches yields an empty map.
pub fn extract(template: &str, path: &str) -> Option<IndexMap<String, String>> {
    let mut router = Router::new();
    if let Err(e) = router.insert(template, ()) {
        log::debug!("Path template {} is not routable: {}", template, e);
        return None;
    }

    let matched = router.at(path).ok()?;
    Some(
        matched
            .params
            .iter()
            .map(|(name, value)| {
                let decoded = percent_decode_str(value).decode_utf8_lossy().into_owned();
                (name.to_string(), decoded)
            })
            .collect(),
    )
}

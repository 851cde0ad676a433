//! Deep links into an external document system.

/// Token replaced by the encoded reference.
pub const REF_TOKEN: &str = "{ref}";

/// Builds a link to `reference` from a user-configured template.
///
/// Every `{ref}` is replaced by the URL-encoded reference. A template without
/// the token gets `?ref=` (or `&ref=` when it already has a query) appended.
/// Returns `None` when either input is blank.
#[must_use]
pub fn build_link(reference: &str, template: &str) -> Option<String> {
    let reference = reference.trim();
    let template = template.trim();
    if reference.is_empty() || template.is_empty() {
        return None;
    }

    let encoded = urlencoding::encode(reference);
    if template.contains(REF_TOKEN) {
        return Some(template.replace(REF_TOKEN, &encoded));
    }
    let separator = if template.contains('?') { '&' } else { '?' };
    Some(format!("{template}{separator}ref={encoded}"))
}

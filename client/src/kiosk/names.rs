/// Normalize a channel name for comparison.
///
/// Kiosk focus names arrive from page configuration (possibly
/// percent-encoded) while store state carries protocol names with
/// their sigil; both sides are funneled through this before matching.
///
/// Steps: percent-decode (a failed decode leaves the name unchanged),
/// trim, lowercase, strip a single leading sigil (`#`, `&`, `+`).
///
/// `"#General"`, `"%23general"`, and `"  general "` all normalize to
/// `"general"`.
pub fn normalize_channel_name(name: &str) -> String {
    let decoded = match urlencoding::decode(name) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => name.to_string(),
    };

    let trimmed = decoded.trim().to_lowercase();
    match trimmed.strip_prefix(['#', '&', '+']) {
        Some(stripped) => stripped.to_string(),
        None => trimmed,
    }
}

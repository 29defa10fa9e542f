use crate::core::clean::{clean, clean_str, clean_string, is_valid_uri};
use crate::domain::model::Profile;
use serde_json::{Map, Value};

pub const GITHUB_NETWORK: &str = "GitHub";

/// Builds a profile from one input entry: every value is cleaned, blank
/// values are dropped and a `url` that is not a valid URI is removed.
pub fn clean_profile(entry: &Map<String, Value>) -> Option<Profile> {
    let cleaned: Map<String, Value> = entry
        .iter()
        .filter_map(|(key, value)| clean(value).map(|v| (key.clone(), v)))
        .filter(|(key, value)| key != "url" || value.as_str().is_some_and(is_valid_uri))
        .collect();

    let profile = Profile(cleaned);
    (!profile.is_empty()).then_some(profile)
}

/// 由 `github` 欄位產生的 GitHub 個人檔案
pub fn github_profile(github: &str) -> Option<Profile> {
    let github = clean_str(github)?;
    let username = github.trim_end_matches('/').rsplit('/').next().unwrap_or_default();

    let mut fields = Map::new();
    fields.insert("network".to_string(), Value::from(GITHUB_NETWORK));
    fields.insert("username".to_string(), Value::from(username));
    if is_valid_uri(github) {
        fields.insert("url".to_string(), Value::from(github));
    }
    Some(Profile(fields))
}

/// Two profiles match when their networks are equal ignoring case, or when
/// both carry a URL and the URLs are equal once trailing slashes are removed.
pub fn same_profile(left: &Profile, right: &Profile) -> bool {
    let left_network = left.network().unwrap_or_default().to_lowercase();
    let right_network = right.network().unwrap_or_default().to_lowercase();
    if !left_network.is_empty() && left_network == right_network {
        return true;
    }

    match (
        clean_string(left.0.get("url")),
        clean_string(right.0.get("url")),
    ) {
        (Some(l), Some(r)) => l.trim_end_matches('/') == r.trim_end_matches('/'),
        _ => false,
    }
}

/// Appends `candidate` unless one of `profiles` already matches it.
pub fn push_unique(profiles: &mut Vec<Profile>, candidate: Profile) -> bool {
    if profiles.iter().any(|existing| same_profile(existing, &candidate)) {
        tracing::debug!("Skipping duplicate profile {:?}", candidate.network());
        return false;
    }
    profiles.push(candidate);
    true
}

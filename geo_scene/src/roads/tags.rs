//! Typed accessors over OSM style key/value tags.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

static WIDTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([0-9]+(?:\.[0-9]+)?|\.[0-9]+)\s*(?:m)?\s*$").expect("valid width pattern")
});

/// Surface assumed for roads without a `surface` tag.
pub const DEFAULT_SURFACE: &str = "asphalt";

/// Set of string tags attached to a node or way.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Adds or replaces a tag, returning `self` for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    pub fn highway(&self) -> Option<&str> {
        self.get("highway")
    }

    /// Non-empty `name` tag.
    pub fn name(&self) -> Option<&str> {
        self.get("name").map(str::trim).filter(|n| !n.is_empty())
    }

    /// Width in meters from a bare (`"7.5"`) or meter-suffixed (`"7.5 m"`)
    /// `width` tag.
    pub fn width_meters(&self) -> Option<f64> {
        let raw = self.get("width")?;
        let caps = WIDTH_RE.captures(raw)?;
        caps.get(1)?.as_str().parse::<f64>().ok()
    }

    /// Lane count from the `lanes` tag.
    pub fn lane_count(&self) -> Option<u32> {
        self.get("lanes")?.trim().parse::<u32>().ok()
    }

    /// Surface material, `"asphalt"` when untagged.
    pub fn surface(&self) -> &str {
        self.get("surface").unwrap_or(DEFAULT_SURFACE)
    }

    pub fn is_bridge(&self) -> bool {
        self.is_set("bridge")
    }

    pub fn is_tunnel(&self) -> bool {
        self.is_set("tunnel")
    }

    /// `oneway` set to `yes`, `true`, `1` or the reversed `-1`.
    pub fn is_oneway(&self) -> bool {
        matches!(self.get("oneway"), Some("yes" | "true" | "1" | "-1"))
    }

    // present and not explicitly "no"
    fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| v != "no")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, String>> for Tags {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_parsing() {
        let t = |w: &str| Tags::new().with("width", w).width_meters();
        assert_eq!(t("7"), Some(7.0));
        assert_eq!(t("7.5m"), Some(7.5));
        assert_eq!(t(" 12 m "), Some(12.0));
        assert_eq!(t("wide"), None);
        assert_eq!(t("3 ft"), None);
        assert_eq!(Tags::new().width_meters(), None);
    }

    #[test]
    fn lanes_and_surface() {
        let tags = Tags::new().with("lanes", "3").with("surface", "gravel");
        assert_eq!(tags.lane_count(), Some(3));
        assert_eq!(tags.surface(), "gravel");
        let tags = Tags::new().with("lanes", "2;3");
        assert_eq!(tags.lane_count(), None);
        assert_eq!(tags.surface(), DEFAULT_SURFACE);
    }

    #[test]
    fn flags() {
        let tags: Tags = [("bridge", "viaduct"), ("tunnel", "no"), ("oneway", "-1")]
            .into_iter()
            .collect();
        assert!(tags.is_bridge());
        assert!(!tags.is_tunnel());
        assert!(tags.is_oneway());
        assert!(!Tags::new().with("oneway", "no").is_oneway());
    }

    #[test]
    fn blank_name_is_none() {
        assert_eq!(Tags::new().with("name", "  ").name(), None);
        assert_eq!(Tags::new().with("name", "Trade St").name(), Some("Trade St"));
    }
}

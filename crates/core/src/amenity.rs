//! Amenity label normalization and the static alias table.
//!
//! Owners enter amenities as free text (UI chips plus a free field), so the
//! same amenity arrives as "Wi-Fi", "wifi" or "Connexion Internet".
//! Resolution against the catalogue runs in three passes: case-insensitive
//! code match, case-insensitive name match, then this alias table. A label
//! that resolves nowhere is skipped by the caller, never fatal.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Alias → canonical catalogue code. Keys are stored in normalized form
/// (lowercase, single-spaced); [`alias_code`] normalizes its input before
/// the lookup.
pub const ALIASES: &[(&str, &str)] = &[
    // Connectivity
    ("wi-fi", "wifi_house"),
    ("wifi", "wifi_house"),
    ("internet", "wifi_house"),
    ("connexion internet", "wifi_house"),
    // Cooling
    ("clim", "climatisation"),
    ("air conditionné", "climatisation"),
    ("air conditioning", "climatisation"),
    // Power and water
    ("groupe électrogène", "generator"),
    ("générateur", "generator"),
    ("generateur", "generator"),
    ("eau courante", "running_water"),
    ("forage", "running_water"),
    ("château d'eau", "water_tank"),
    // Outdoors
    ("piscine", "pool"),
    ("swimming pool", "pool"),
    ("jardin", "garden"),
    // Parking and security
    ("garage", "parking"),
    ("stationnement", "parking"),
    ("gardien", "security"),
    ("gardiennage", "security"),
    ("sécurité", "security"),
    ("vidéosurveillance", "cctv"),
    // Interior
    ("cuisine équipée", "kitchen"),
    ("cuisine", "kitchen"),
    ("machine à laver", "washing_machine"),
    ("lave-linge", "washing_machine"),
    ("télévision", "tv"),
    ("télé", "tv"),
    ("chauffe-eau", "water_heater"),
    ("meublé", "furnished"),
];

/// Normalize a free-text amenity label: trim, lowercase, collapse runs of
/// whitespace to single spaces.
pub fn normalize_label(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    WHITESPACE_RE.replace_all(&lowered, " ").into_owned()
}

/// Canonical catalogue code for a free-text label, via the alias table.
pub fn alias_code(label: &str) -> Option<&'static str> {
    let normalized = normalize_label(label);
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map(|(_, code)| *code)
}

/// Whether an amenity name marks the listing as having Wi-Fi. Catalogue
/// names are French ("Wi-Fi (maison)"), hence substring matching rather
/// than code comparison.
pub fn name_indicates_wifi(name: &str) -> bool {
    let n = name.to_lowercase();
    n.contains("wifi") || n.contains("wi-fi")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn normalize_trims_lowercases_collapses() {
        assert_eq!(normalize_label("  Wi-Fi  "), "wi-fi");
        assert_eq!(normalize_label("Groupe   Électrogène"), "groupe électrogène");
        assert_eq!(normalize_label("CUISINE ÉQUIPÉE"), "cuisine équipée");
    }

    #[test]
    fn alias_resolves_common_spellings() {
        assert_eq!(alias_code("Wi-Fi"), Some("wifi_house"));
        assert_eq!(alias_code("WIFI"), Some("wifi_house"));
        assert_eq!(alias_code("GARAGE"), Some("parking"));
        assert_eq!(alias_code("Groupe  Électrogène"), Some("generator"));
        assert_eq!(alias_code("lave-linge"), Some("washing_machine"));
    }

    #[test]
    fn alias_miss_returns_none() {
        assert_eq!(alias_code("héliport"), None);
        assert_eq!(alias_code(""), None);
    }

    #[test]
    fn alias_keys_are_already_normalized() {
        for (alias, _) in ALIASES {
            assert_eq!(
                normalize_label(alias),
                *alias,
                "alias key '{alias}' is not in normalized form"
            );
        }
    }

    #[test]
    fn alias_keys_are_unique() {
        let mut seen = HashSet::new();
        for (alias, _) in ALIASES {
            assert!(seen.insert(alias), "duplicate alias key '{alias}'");
        }
    }

    #[test]
    fn wifi_detection_matches_catalogue_names() {
        assert!(name_indicates_wifi("Wi-Fi (maison)"));
        assert!(name_indicates_wifi("WIFI bureau"));
        assert!(!name_indicates_wifi("Climatisation"));
    }
}

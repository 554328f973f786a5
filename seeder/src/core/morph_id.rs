//! Heuristics for joining morph records from different sources.
//!
//! Scraped morph ids and names carry trailing metadata that the wiki renders
//! next to the name (inheritance, availability, year first produced), e.g.
//! `lilly-white-incomplete-dominant-common-2010`. These helpers cut that tail so
//! records can be matched against hand-written catalog ids.

/// Id parts that start the metadata tail of a scraped morph id.
const ID_STOP_WORDS: &[&str] = &[
    "recessive",
    "dominant",
    "polygenic",
    "incomplete",
    "other",
    "physical",
    "common",
    "average",
    "lower",
    "higher",
    "rarest",
    "availability",
    "first",
    "produced",
    "at",
    "least",
    "in",
];

/// Name words that start the metadata tail of a scraped morph name (case-sensitive).
const NAME_STOP_WORDS: &[&str] = &[
    "Recessive",
    "Dominant",
    "Incomplete",
    "Polygenic",
    "Other",
    "Physical",
    "Common",
    "Average",
    "Higher",
    "Lower",
    "Rarest",
    "Availability",
    "First",
    "produced",
    "in",
    "At",
    "least",
];

/// Reduce a scraped id to its leading name parts.
///
/// Parts are kept until the first stop word or all-digit part. If the very
/// first part is a stop word the first part is returned as-is.
pub fn normalize_id(morph_id: &str) -> String {
    let lower = morph_id.to_lowercase();
    let parts: Vec<&str> = lower.split('-').collect();
    let kept: Vec<&str> = parts
        .iter()
        .take_while(|part| !ID_STOP_WORDS.contains(*part) && !is_all_digits(part))
        .copied()
        .collect();
    if kept.is_empty() {
        parts.first().copied().unwrap_or_default().to_string()
    } else {
        kept.join("-")
    }
}

/// Classify the inheritance type mentioned in an English morph name.
///
/// Returns an empty string when no known type is mentioned.
pub fn extract_inheritance(name_en: &str) -> &'static str {
    let lower = name_en.to_lowercase();
    if lower.contains("incomplete dominant") {
        "Incomplete Dominant"
    } else if lower.contains("recessive") {
        "Recessive"
    } else if lower.contains("dominant") {
        "Dominant"
    } else if lower.contains("polygenic") {
        "Polygenic"
    } else if lower.contains("physical") {
        "Physical"
    } else if lower.contains("other") {
        "Other"
    } else {
        ""
    }
}

/// Strip the metadata tail from a scraped English morph name.
pub fn clean_morph_name(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    let kept: Vec<&str> = words
        .iter()
        .take_while(|word| !NAME_STOP_WORDS.contains(*word) && !is_year(word))
        .copied()
        .collect();
    if kept.is_empty() {
        words.first().copied().unwrap_or(name).to_string()
    } else {
        kept.join(" ")
    }
}

fn is_all_digits(part: &str) -> bool {
    !part.is_empty() && part.chars().all(|c| c.is_ascii_digit())
}

fn is_year(word: &str) -> bool {
    word.len() == 4 && is_all_digits(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_id_cuts_metadata_tail() {
        assert_eq!(
            normalize_id("lilly-white-incomplete-dominant-common-2010"),
            "lilly-white"
        );
        assert_eq!(normalize_id("Axanthic-Recessive"), "axanthic");
        assert_eq!(normalize_id("red-base-first-produced-in-2001"), "red-base");
    }

    #[test]
    fn normalize_id_stops_at_digits() {
        assert_eq!(normalize_id("cappuccino-2020-rare"), "cappuccino");
    }

    #[test]
    fn normalize_id_keeps_first_part_when_everything_is_tail() {
        assert_eq!(normalize_id("other-physical"), "other");
        assert_eq!(normalize_id("2010"), "2010");
    }

    #[test]
    fn normalize_id_without_tail_is_identity() {
        assert_eq!(normalize_id("super-dalmatian"), "super-dalmatian");
    }

    #[test]
    fn extract_inheritance_prefers_incomplete_dominant() {
        assert_eq!(
            extract_inheritance("Lilly White Incomplete Dominant Common"),
            "Incomplete Dominant"
        );
        assert_eq!(extract_inheritance("Pinstripe Dominant"), "Dominant");
        assert_eq!(extract_inheritance("Axanthic recessive"), "Recessive");
        assert_eq!(extract_inheritance("Harlequin Polygenic"), "Polygenic");
        assert_eq!(extract_inheritance("Soft Scale Physical"), "Physical");
        assert_eq!(extract_inheritance("Normal Other"), "Other");
        assert_eq!(extract_inheritance("Harlequin"), "");
    }

    #[test]
    fn clean_morph_name_cuts_at_stop_word_or_year() {
        assert_eq!(
            clean_morph_name("Lilly White Incomplete Dominant Common"),
            "Lilly White"
        );
        assert_eq!(clean_morph_name("Cappuccino 2020 produced"), "Cappuccino");
        assert_eq!(clean_morph_name("Red Base"), "Red Base");
    }

    #[test]
    fn clean_morph_name_falls_back_to_first_word() {
        assert_eq!(clean_morph_name("Recessive Axanthic"), "Recessive");
    }
}

use serde::{Deserialize, Serialize};

/// Coarse condition bucket derived from seller wording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionClass {
    Original,
    Restored,
    Modified,
    Unknown,
}

const RESTORED_SIGNALS: &[&str] = &[
    "restored",
    "restoration",
    "concours restoration",
    "bare-metal respray",
    "full repaint",
    "rebuilt engine",
    "refurbished",
    "professionally restored",
    "rotisserie restoration",
    "frame-off",
];

const ORIGINAL_SIGNALS: &[&str] = &[
    "original paint",
    "numbers matching",
    "matching numbers",
    "all original",
    "unrestored",
    "survivor",
    "time capsule",
    "barn find",
    "never restored",
    "original condition",
];

const MODIFIED_SIGNALS: &[&str] = &[
    "modified",
    "custom",
    "swapped",
    "aftermarket",
    "turbo conversion",
    "engine swap",
    "widebody",
    "tuned",
    "built motor",
    "caged",
];

/// Classify a description by counting signal phrases per bucket.
///
/// Matching is substring-based: "unrestored" also scores one restored
/// point via its "restored" suffix and the original bucket still wins
/// on count. Ties resolve original over restored over modified.
pub fn classify_condition(description: Option<&str>) -> ConditionClass {
    let Some(description) = description else {
        return ConditionClass::Unknown;
    };
    if description.is_empty() {
        return ConditionClass::Unknown;
    }

    let lower = description.to_lowercase();
    let score = |signals: &[&str]| signals.iter().filter(|signal| lower.contains(*signal)).count();

    let restored = score(RESTORED_SIGNALS);
    let original = score(ORIGINAL_SIGNALS);
    let modified = score(MODIFIED_SIGNALS);

    if restored.max(original).max(modified) == 0 {
        return ConditionClass::Unknown;
    }
    if original >= restored && original >= modified {
        ConditionClass::Original
    } else if restored >= modified {
        ConditionClass::Restored
    } else {
        ConditionClass::Modified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn original_paint_and_matching_numbers_score_original() {
        assert_eq!(
            classify_condition(Some(
                "This car retains its original paint and matching numbers throughout."
            )),
            ConditionClass::Original
        );
    }

    #[test]
    fn unrestored_survivor_scores_original_despite_restored_substring() {
        assert_eq!(
            classify_condition(Some("A true barn find survivor, completely unrestored.")),
            ConditionClass::Original
        );
    }

    #[test]
    fn rotisserie_restoration_scores_restored() {
        assert_eq!(
            classify_condition(Some(
                "Full rotisserie restoration completed in 2020 by marque specialists."
            )),
            ConditionClass::Restored
        );
    }

    #[test]
    fn frame_off_with_rebuilt_engine_scores_restored() {
        assert_eq!(
            classify_condition(Some("Frame-off restoration with rebuilt engine and new paint.")),
            ConditionClass::Restored
        );
    }

    #[test]
    fn engine_swap_and_turbo_conversion_score_modified() {
        assert_eq!(
            classify_condition(Some(
                "LS3 engine swap with custom turbo conversion and widebody kit."
            )),
            ConditionClass::Modified
        );
    }

    #[test]
    fn aftermarket_tuning_scores_modified() {
        assert_eq!(
            classify_condition(Some(
                "Extensively modified with aftermarket exhaust, tuned ECU, and custom intake."
            )),
            ConditionClass::Modified
        );
    }

    #[test]
    fn missing_or_empty_description_is_unknown() {
        assert_eq!(classify_condition(None), ConditionClass::Unknown);
        assert_eq!(classify_condition(Some("")), ConditionClass::Unknown);
    }

    #[test]
    fn descriptions_without_signals_are_unknown() {
        assert_eq!(
            classify_condition(Some(
                "A nice car in good condition. Well maintained by previous owner."
            )),
            ConditionClass::Unknown
        );
    }

    #[test]
    fn mixed_signals_resolve_by_highest_count() {
        // one original signal against two restored signals
        assert_eq!(
            classify_condition(Some(
                "Matching numbers car with frame-off restoration completed professionally."
            )),
            ConditionClass::Restored
        );
    }
}

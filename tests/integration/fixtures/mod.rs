// Test fixtures with known abstracts, grounding maps and expected outputs
// WHY: Golden-file testing requires deterministic input/output pairs for validation
#![allow(dead_code)]

use longform::{GroundingMap, RecognizerConfig};

/// Longforms seen for the ambiguous shortform "ER"
pub const ER_GROUNDINGS: &[(&str, &str)] = &[
    ("estrogen receptor", "HGNC:3467"),
    ("estrogen receptor alpha", "HGNC:3467"),
    ("endoplasmic reticulum", "GO:0005783"),
    ("emergency room", "ungrounded"),
];

/// Abstract defining ER once as the estrogen receptor
pub const ER_RECEPTOR_TEXT: &str = "Breast tumors expressing the estrogen receptor (ER) respond to \
tamoxifen. ER status was assessed by immunohistochemistry.";

/// Expected strip output for ER_RECEPTOR_TEXT
pub const ER_RECEPTOR_STRIPPED: &str = "Breast tumors expressing the ER respond to \
tamoxifen. ER status was assessed by immunohistochemistry.";

/// Abstract defining ER twice with different meanings
pub const ER_MIXED_TEXT: &str = "Misfolded proteins accumulate in the endoplasmic reticulum (ER).
Patients were admitted to the emergency room (ER) within six hours.";

/// Expected strip output for ER_MIXED_TEXT
/// WHY: the shortform is padded with spaces, so a following period stays detached
pub const ER_MIXED_STRIPPED: &str = "Misfolded proteins accumulate in the ER . \
Patients were admitted to the ER within six hours.";

/// Abstract whose defining pattern uses a longform missing from the map
pub const ER_UNKNOWN_TEXT: &str = "Ethanol-related (ER) injury was common.";

/// Abstract mentioning ER without any defining pattern
pub const ER_NO_PATTERN_TEXT: &str = "ER expression was lost in 30% of samples (n = 12).";

pub fn grounding_map(pairs: &[(&str, &str)]) -> GroundingMap {
    pairs
        .iter()
        .map(|(longform, grounding)| (longform.to_string(), grounding.to_string()))
        .collect()
}

pub fn er_config() -> RecognizerConfig {
    RecognizerConfig::new("ER", grounding_map(ER_GROUNDINGS))
}

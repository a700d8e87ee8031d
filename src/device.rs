//! Static facts about the machine, queried once.

use std::process::Command;
use std::sync::OnceLock;

/// Mac model identifiers whose built-in display has a camera notch.
const NOTCHED_MODELS: &[&str] = &[
    // MacBook Air 13" (M2-M4)
    "Mac14,2",
    "Mac15,12",
    "Mac16,12",
    // MacBook Air 15" (M2-M4)
    "Mac14,15",
    "Mac15,13",
    "Mac16,13",
    // MacBook Pro 14" (M1-M5)
    "MacBookPro18,3",
    "MacBookPro18,4",
    "Mac14,5",
    "Mac14,9",
    "Mac15,3",
    "Mac15,6",
    "Mac15,8",
    "Mac15,10",
    "Mac16,1",
    "Mac16,6",
    "Mac16,8",
    "Mac17,2",
    // MacBook Pro 16" (M1-M4)
    "MacBookPro18,1",
    "MacBookPro18,2",
    "Mac14,6",
    "Mac14,10",
    "Mac15,7",
    "Mac15,9",
    "Mac15,11",
    "Mac16,5",
    "Mac16,7",
];

static MODEL_IDENTIFIER: OnceLock<Option<String>> = OnceLock::new();

/// The hardware model, e.g. "MacBookPro18,1", from `sysctl -n hw.model`.
pub fn model_identifier() -> Option<&'static str> {
    MODEL_IDENTIFIER
        .get_or_init(|| {
            let output = match Command::new("/usr/sbin/sysctl")
                .args(["-n", "hw.model"])
                .output()
            {
                Ok(output) => output,
                Err(e) => {
                    log::warn!("Failed to query hardware model: {}", e);
                    return None;
                }
            };
            let model = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if model.is_empty() {
                None
            } else {
                log::info!("Hardware model: {}", model);
                Some(model)
            }
        })
        .as_deref()
}

pub fn is_notched_model(model: &str) -> bool {
    NOTCHED_MODELS.contains(&model)
}

pub fn has_notch() -> bool {
    model_identifier().map(is_notched_model).unwrap_or(false)
}

use web_sys::Window;

pub const DARKMODE_KEY: &str = "darkmode";

/// Older page revisions stored "on"/"off"; current pages write
/// "true"/"false". Anything else, including a missing key, means off.
pub fn darkmode_from_stored(stored: Option<&str>) -> bool {
    matches!(stored, Some("true") | Some("on"))
}

pub fn darkmode_stored_value(active: bool) -> &'static str {
    if active {
        "true"
    } else {
        "false"
    }
}

pub fn load_darkmode(window: &Window) -> bool {
    let stored = window
        .local_storage()
        .ok()
        .flatten()
        .and_then(|storage| storage.get_item(DARKMODE_KEY).ok().flatten());
    darkmode_from_stored(stored.as_deref())
}

pub fn store_darkmode(window: &Window, active: bool) {
    if let Ok(Some(storage)) = window.local_storage() {
        let _ = storage.set_item(DARKMODE_KEY, darkmode_stored_value(active));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_values_parse() {
        assert!(darkmode_from_stored(Some("true")));
        assert!(!darkmode_from_stored(Some("false")));
    }

    #[test]
    fn legacy_values_parse() {
        assert!(darkmode_from_stored(Some("on")));
        assert!(!darkmode_from_stored(Some("off")));
    }

    #[test]
    fn missing_or_garbage_means_off() {
        assert!(!darkmode_from_stored(None));
        assert!(!darkmode_from_stored(Some("TRUE")));
        assert!(!darkmode_from_stored(Some("1")));
    }

    #[test]
    fn stored_values_are_canonical_and_round_trip() {
        for active in [true, false] {
            let stored = darkmode_stored_value(active);
            assert!(matches!(stored, "true" | "false"));
            assert_eq!(darkmode_from_stored(Some(stored)), active);
        }
    }

    #[test]
    fn two_toggles_return_to_the_original_value() {
        let start = darkmode_from_stored(Some("true"));
        let flipped = !start;
        let back = !flipped;
        assert_eq!(darkmode_from_stored(Some(darkmode_stored_value(back))), start);
    }
}

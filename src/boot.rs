//! Session-bootstrap integration with a host application.

use serde_json::{Map, Value};

use crate::preferences::{PreferenceStore, Preferences};

/// Key under which the preference context is attached to a boot payload.
pub const BOOT_KEY: &str = "jalali_calendar";

/// Attaches the resolved preference context (for the ambient session) to a
/// mutable boot payload under [`BOOT_KEY`].
///
/// An existing entry under that key is left untouched. Returns `true` when
/// the context was inserted.
///
/// # Errors
/// Propagates serialization failures from the JSON layer.
pub fn attach_boot_context<S: PreferenceStore>(
    preferences: &Preferences<S>,
    bootinfo: &mut Map<String, Value>,
) -> Result<bool, serde_json::Error> {
    if bootinfo.contains_key(BOOT_KEY) {
        return Ok(false);
    }
    let context = serde_json::to_value(preferences.preference_context(None))?;
    bootinfo.insert(BOOT_KEY.to_owned(), context);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::MemoryStore;
    use serde_json::json;

    #[test]
    fn test_attaches_context_under_namespaced_key() {
        let prefs = Preferences::new(MemoryStore::new());
        prefs.set_system_calendar("gregorian").unwrap();

        let mut bootinfo = Map::new();
        assert!(attach_boot_context(&prefs, &mut bootinfo).unwrap());

        let context = &bootinfo[BOOT_KEY];
        assert_eq!(context["active_calendar"], "gregorian");
        assert_eq!(context["source"], "system");
        assert_eq!(context["is_jalali_enabled"], false);
    }

    #[test]
    fn test_does_not_overwrite_existing_key() {
        let prefs = Preferences::new(MemoryStore::new());
        let mut bootinfo = Map::new();
        bootinfo.insert(BOOT_KEY.to_owned(), json!({"sentinel": true}));

        assert!(!attach_boot_context(&prefs, &mut bootinfo).unwrap());
        assert_eq!(bootinfo[BOOT_KEY], json!({"sentinel": true}));
    }

    #[test]
    fn test_other_keys_are_preserved() {
        let prefs = Preferences::new(MemoryStore::new());
        let mut bootinfo = Map::new();
        bootinfo.insert("sysdefaults".to_owned(), json!({}));

        attach_boot_context(&prefs, &mut bootinfo).unwrap();
        assert!(bootinfo.contains_key("sysdefaults"));
        assert!(bootinfo.contains_key(BOOT_KEY));
    }
}

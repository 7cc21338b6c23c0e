//! Snapshot encoding and slot key derivation

use crate::consts::NAMESPACE;
use crate::error::StoreError;
use crate::state::GameState;

/// Storage key for a slot.
///
/// Slot names are caller-supplied; the only requirement is that they are
/// non-empty, which keeps `between_` itself from ever being a slot key.
pub fn slot_key(slot: &str) -> Result<String, StoreError> {
    if slot.is_empty() {
        return Err(StoreError::InvalidSlot(slot.to_string()));
    }
    Ok(format!("{}_{}", NAMESPACE, slot))
}

/// Inverse of [`slot_key`]; None for keys outside the namespace
pub fn slot_name(key: &str) -> Option<&str> {
    key.strip_prefix(NAMESPACE)?
        .strip_prefix('_')
        .filter(|slot| !slot.is_empty())
}

pub fn encode(state: &GameState) -> Result<String, StoreError> {
    serde_json::to_string(state).map_err(StoreError::Encode)
}

pub fn decode(slot: &str, json: &str) -> Result<GameState, StoreError> {
    serde_json::from_str(json).map_err(|source| StoreError::Corrupt {
        slot: slot.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_slot_key() {
        assert_eq!(slot_key("autosave").unwrap(), "between_autosave");
        assert_eq!(slot_key("save1").unwrap(), "between_save1");
        assert!(matches!(slot_key(""), Err(StoreError::InvalidSlot(_))));
    }

    #[test]
    fn test_slot_name() {
        assert_eq!(slot_name("between_save1"), Some("save1"));
        assert_eq!(slot_name("between_a_b"), Some("a_b"));
        assert_eq!(slot_name("between_"), None);
        assert_eq!(slot_name("between:settings"), None);
        assert_eq!(slot_name("other_game_save"), None);
    }

    #[test]
    fn test_decode_accepts_reference_snapshot() {
        let json = r#"{"trust":75,"romance":3,"suspicion":10,"currentPassage":"Cafe","unlockedGallery":["beach"]}"#;
        let state = decode("autosave", json).unwrap();
        assert_eq!(state.trust, 75);
        assert_eq!(state.current_passage, "Cafe");
        assert_eq!(state.unlocked_gallery, ["beach"]);
    }

    #[test]
    fn test_decode_rejects_partial_snapshot() {
        let json = r#"{"trust":75,"romance":3}"#;
        let err = decode("save1", json).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { ref slot, .. } if slot == "save1"));
    }

    #[test]
    fn test_decode_rejects_garbage_and_extra_fields() {
        assert!(decode("s", "not json").is_err());
        assert!(decode("s", "").is_err());
        let extra = r#"{"trust":1,"romance":2,"suspicion":3,"currentPassage":"x","unlockedGallery":[],"gold":9}"#;
        assert!(decode("s", extra).is_err());
        let wrong_type = r#"{"trust":"high","romance":2,"suspicion":3,"currentPassage":"x","unlockedGallery":[]}"#;
        assert!(decode("s", wrong_type).is_err());
    }

    fn arb_state() -> impl Strategy<Value = GameState> {
        (
            any::<i64>(),
            any::<i64>(),
            any::<i64>(),
            ".*",
            prop::collection::vec(".*", 0..8),
        )
            .prop_map(|(trust, romance, suspicion, current_passage, unlocked_gallery)| {
                GameState {
                    trust,
                    romance,
                    suspicion,
                    current_passage,
                    unlocked_gallery,
                }
            })
    }

    proptest! {
        #[test]
        fn prop_snapshot_round_trip(state in arb_state()) {
            let json = encode(&state).unwrap();
            prop_assert_eq!(decode("slot", &json).unwrap(), state);
        }

        #[test]
        fn prop_slot_keys_distinct(a in "[a-z0-9_]{1,12}", b in "[a-z0-9_]{1,12}") {
            prop_assume!(a != b);
            prop_assert_ne!(slot_key(&a).unwrap(), slot_key(&b).unwrap());
            let key = slot_key(&a).unwrap();
            prop_assert_eq!(slot_name(&key), Some(a.as_str()));
        }
    }
}

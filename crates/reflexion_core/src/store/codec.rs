//! Blob encoding for the entry collection.
//!
//! The blob is a JSON array of entries. There is no version envelope, so
//! any change to the entry shape is a breaking change for stored data.

use crate::model::entry::JournalEntry;

/// Encodes the collection in the given order.
pub fn encode_entries(entries: &[JournalEntry]) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(entries)
}

/// Decodes a blob in stored order.
pub fn decode_entries(bytes: &[u8]) -> serde_json::Result<Vec<JournalEntry>> {
    serde_json::from_slice(bytes)
}

/// Sorts newest first. Stable, so equal dates keep stored order.
pub fn sort_newest_first(entries: &mut [JournalEntry]) {
    entries.sort_by(|a, b| b.date.cmp(&a.date));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entry::EntryType;
    use crate::model::mood;
    use chrono::{TimeZone, Utc};

    #[test]
    fn decode_reverses_encode_for_mixed_collection() {
        let date = Utc.with_ymd_and_hms(2025, 2, 14, 9, 30, 0).unwrap();
        let entries = vec![
            JournalEntry::new(EntryType::Text, "", date),
            JournalEntry::new(EntryType::Audio, "transcript", date)
                .with_file_url("rec/1.m4a")
                .with_emotion_tag(mood::CALM),
            JournalEntry::new(EntryType::Ocr, "scanned ✍️ text\nline two", date)
                .with_emotion_tag(mood::SAD),
        ];

        let decoded = decode_entries(&encode_entries(&entries).unwrap()).unwrap();
        assert_eq!(decoded, entries);
    }

    #[test]
    fn decode_rejects_non_collection_blob() {
        assert!(decode_entries(b"{\"id\":1}").is_err());
        assert!(decode_entries(b"\xff\xfe").is_err());
        assert!(decode_entries(b"[{\"type\":\"hologram\"}]").is_err());
    }

    #[test]
    fn sort_orders_newest_first_and_keeps_ties_stable() {
        let older = Utc.timestamp_opt(100, 0).unwrap();
        let newer = Utc.timestamp_opt(200, 0).unwrap();
        let a = JournalEntry::new(EntryType::Text, "a", older);
        let b = JournalEntry::new(EntryType::Text, "b", newer);
        let c = JournalEntry::new(EntryType::Text, "c", older);

        let mut entries = vec![a.clone(), b.clone(), c.clone()];
        sort_newest_first(&mut entries);
        let ids: Vec<_> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![b.id, a.id, c.id]);
    }
}

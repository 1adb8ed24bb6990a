use uuid::Uuid;

/// Fresh primary key for a forecast record: a random (v4) UUID in its
/// canonical lowercase hyphenated form.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use uuid::Version;

    #[test]
    fn ids_are_canonical_v4_uuids() {
        let id = new_record_id();
        let parsed = Uuid::parse_str(&id).unwrap();

        assert_eq!(parsed.get_version(), Some(Version::Random));
        assert_eq!(id.len(), 36);
        assert_eq!(id, parsed.hyphenated().to_string());
        assert_eq!(id, id.to_lowercase());
    }

    #[test]
    fn ten_thousand_ids_are_distinct() {
        let ids: HashSet<String> = (0..10_000).map(|_| new_record_id()).collect();
        assert_eq!(ids.len(), 10_000);
    }
}

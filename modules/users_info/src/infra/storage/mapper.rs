use chrono::{DateTime, Utc};
use tracing::debug;

use crate::contract::model::{Timestamp, User};
use crate::infra::storage::document::{parse_timestamp, UserDocument};

/// Stored text -> timestamp. Text that is not a readable date is kept as is.
fn read_timestamp(user_id: &str, field: &'static str, raw: &str) -> Timestamp {
    match parse_timestamp(raw) {
        Some(ts) => Timestamp::At(ts),
        None => {
            debug!(user_id = %user_id, field, value = %raw, "Keeping unreadable timestamp verbatim");
            Timestamp::Raw(raw.to_string())
        }
    }
}

/// Document -> contract. A missing `created_at` becomes `stamp`, which the
/// caller must derive from the document so repeated loads agree; a missing
/// `img_path` becomes the default image.
pub fn to_user(doc: UserDocument, default_image: &str, stamp: DateTime<Utc>) -> User {
    let created_at = match doc.created_at.as_deref().filter(|raw| !raw.trim().is_empty()) {
        Some(raw) => read_timestamp(&doc.user_id, "created_at", raw),
        None => {
            debug!(user_id = %doc.user_id, "Record without created_at, stamping from document");
            Timestamp::At(stamp)
        }
    };

    let updated_at = doc
        .updated_at
        .iter()
        .map(|raw| read_timestamp(&doc.user_id, "updated_at", raw))
        .collect();

    let image_path = doc
        .img_path
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| default_image.to_string());

    User {
        id: doc.user_id,
        name: doc.name,
        age: doc.age,
        city: doc.city,
        image_path,
        created_at,
        updated_at,
    }
}

/// Contract -> document.
pub fn to_document(user: &User) -> UserDocument {
    UserDocument {
        user_id: user.id.clone(),
        name: user.name.clone(),
        age: user.age.clone(),
        city: user.city.clone(),
        img_path: Some(user.image_path.clone()),
        created_at: Some(user.created_at.to_string()),
        updated_at: user.updated_at.iter().map(ToString::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn doc() -> UserDocument {
        UserDocument {
            user_id: "abc".into(),
            name: "Ana".into(),
            age: "30".into(),
            city: "Lima".into(),
            img_path: None,
            created_at: None,
            updated_at: vec![],
        }
    }

    #[test]
    fn fills_defaults_for_sparse_record() {
        let stamp = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let user = to_user(doc(), "default-image.jpg", stamp);
        assert_eq!(user.image_path, "default-image.jpg");
        assert_eq!(user.created_at, Timestamp::At(stamp));
        assert!(user.updated_at.is_empty());
    }

    #[test]
    fn unreadable_update_entries_are_kept_verbatim() {
        let d = UserDocument {
            updated_at: vec![
                "2026-01-01T00:00:00.000Z".into(),
                "31/05/2024, 15:10:00".into(),
                "01/02/2026, 10:00:00 AM".into(),
            ],
            ..doc()
        };
        let user = to_user(d, "default-image.jpg", Utc::now());
        assert_eq!(user.updated_at.len(), 3);
        assert_eq!(user.updated_at[1], Timestamp::Raw("31/05/2024, 15:10:00".into()));

        let back = to_document(&user);
        assert_eq!(back.updated_at[1], "31/05/2024, 15:10:00");
        assert_eq!(back.updated_at[2], "2026-01-02T10:00:00.000Z");
    }

    #[test]
    fn unreadable_created_at_is_kept_verbatim() {
        let d = UserDocument {
            created_at: Some("31/05/2024, 15:08:37".into()),
            ..doc()
        };
        let user = to_user(d, "default-image.jpg", Utc::now());
        assert_eq!(user.created_at, Timestamp::Raw("31/05/2024, 15:08:37".into()));
        assert_eq!(
            to_document(&user).created_at.as_deref(),
            Some("31/05/2024, 15:08:37")
        );
    }

    #[test]
    fn document_carries_every_field() {
        let created = Utc.with_ymd_and_hms(2026, 10, 15, 8, 30, 0).unwrap();
        let user = User {
            id: "abc".into(),
            name: "Ana".into(),
            age: "30".into(),
            city: "Lima".into(),
            image_path: "f00.png".into(),
            created_at: created.into(),
            updated_at: vec![created.into()],
        };
        let d = to_document(&user);
        assert_eq!(d.img_path.as_deref(), Some("f00.png"));
        assert_eq!(d.created_at.as_deref(), Some("2026-10-15T08:30:00.000Z"));
        assert_eq!(d.updated_at, vec!["2026-10-15T08:30:00.000Z".to_string()]);
        assert_eq!(to_user(d, "default-image.jpg", Utc::now()), user);
    }
}

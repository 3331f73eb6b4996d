use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crate::shared::{ItemId, error::EntityValidationError};

use super::models::{CatalogUpsert, ItemRow, PriceObservationRow};

fn item_id(id: i64) -> ItemId {
    ItemId::try_from(id).unwrap()
}

mod catalog_upsert {
    use super::*;

    #[test]
    fn valid_entry_succeeds() {
        let refreshed = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

        let entry = CatalogUpsert::new(
            item_id(4151),
            "Abyssal whip",
            "A weapon from the abyss.",
            true,
            Some(refreshed),
        )
        .unwrap();

        assert_eq!(entry.id(), item_id(4151));
        assert_eq!(entry.name(), "Abyssal whip");
        assert_eq!(entry.description(), "A weapon from the abyss.");
        assert!(entry.members());
        assert_eq!(entry.last_detail_update(), Some(refreshed));
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(matches!(
            CatalogUpsert::new(item_id(4151), "", "A weapon.", false, None),
            Err(EntityValidationError::EmptyName)
        ));
    }

    #[test]
    fn whitespace_only_name_is_rejected() {
        assert!(matches!(
            CatalogUpsert::new(item_id(4151), "   ", "A weapon.", false, None),
            Err(EntityValidationError::EmptyName)
        ));
    }
}

mod row_display {
    use super::*;

    #[test]
    fn item_row_lists_id_name_and_last_update() {
        let refreshed = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

        let row = ItemRow {
            id: item_id(4151),
            name: "Abyssal whip".to_string(),
            description: "A weapon from the abyss.".to_string(),
            members: true,
            last_detail_update: Some(refreshed),
            created_at: refreshed,
            updated_at: refreshed,
        };

        let data_str = row.as_data_str();
        assert!(data_str.contains("id: 4151"));
        assert!(data_str.contains("name: Abyssal whip"));
        assert!(data_str.contains("members: true"));
        assert!(data_str.contains(&refreshed.to_rfc3339()));

        let display = row.to_string();
        assert!(display.starts_with("Item Row:"));
        assert!(display.contains("name: Abyssal whip"));
    }

    #[test]
    fn item_row_never_refreshed_reads_never() {
        let created_at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

        let row = ItemRow {
            id: item_id(2),
            name: "Cannonball".to_string(),
            description: "A heavy metal ball.".to_string(),
            members: false,
            last_detail_update: None,
            created_at,
            updated_at: created_at,
        };

        assert!(row.as_data_str().contains("last_detail_update: never"));
    }

    #[test]
    fn observation_row_lists_id_item_and_price() {
        let recorded_at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let id = Uuid::from_u128(7);

        let row = PriceObservationRow::with_id(id, item_id(4151), 120_000, recorded_at);

        let data_str = row.as_data_str();
        assert!(data_str.contains(&format!("id: {id}")));
        assert!(data_str.contains("item_id: 4151"));
        assert!(data_str.contains("price: 120000"));
        assert!(data_str.contains(&recorded_at.to_rfc3339()));

        let display = row.to_string();
        assert!(display.starts_with("Price Observation Row:"));
        assert!(display.contains("price: 120000"));
    }
}

//! Entity kinds handled by the cleaning pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// The tag that selects which fixed rule set applies to a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Customer records from the legacy users table.
    User,
    /// Payment card details extracted from a PDF.
    Card,
    /// Store details from the stores API.
    Store,
    /// Product catalogue from object storage.
    Product,
    /// Orders fact table.
    Order,
    /// Sale date/time events from object storage.
    DateTime,
}

impl EntityKind {
    /// All entity kinds in load order (dimensions first, then the fact table).
    pub const ALL: [EntityKind; 6] = [
        EntityKind::User,
        EntityKind::Card,
        EntityKind::Store,
        EntityKind::Product,
        EntityKind::DateTime,
        EntityKind::Order,
    ];

    /// Stable snake_case name used on the command line and in config files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Card => "card",
            Self::Store => "store",
            Self::Product => "product",
            Self::Order => "order",
            Self::DateTime => "date_time",
        }
    }

    /// Default warehouse table for cleaned batches of this kind.
    pub fn table_name(self) -> &'static str {
        match self {
            Self::User => "dim_users",
            Self::Card => "dim_card_details",
            Self::Store => "dim_store_details",
            Self::Product => "dim_products",
            Self::Order => "orders_table",
            Self::DateTime => "dim_date_times",
        }
    }

    /// Human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            Self::User => "Customer records",
            Self::Card => "Payment card details",
            Self::Store => "Store details",
            Self::Product => "Product catalogue",
            Self::Order => "Orders (fact table)",
            Self::DateTime => "Sale date/time events",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = ModelError;

    /// Accepts the snake_case name (case-insensitive, `-` for `_`) or the
    /// default table name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == key || kind.table_name() == key)
            .ok_or_else(|| ModelError::UnknownEntity(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_tables() {
        assert_eq!("product".parse::<EntityKind>().unwrap(), EntityKind::Product);
        assert_eq!("Date-Time".parse::<EntityKind>().unwrap(), EntityKind::DateTime);
        assert_eq!("dim_card_details".parse::<EntityKind>().unwrap(), EntityKind::Card);
        assert!(matches!(
            "invoice".parse::<EntityKind>(),
            Err(ModelError::UnknownEntity(_))
        ));
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&EntityKind::DateTime).unwrap();
        assert_eq!(json, "\"date_time\"");
        let kind: EntityKind = serde_json::from_str("\"order\"").unwrap();
        assert_eq!(kind, EntityKind::Order);
    }

    #[test]
    fn every_kind_has_a_distinct_table() {
        let mut tables: Vec<&str> = EntityKind::ALL.iter().map(|k| k.table_name()).collect();
        tables.sort_unstable();
        tables.dedup();
        assert_eq!(tables.len(), EntityKind::ALL.len());
    }
}

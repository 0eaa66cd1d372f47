//! Per-entity cleaning rules.
//!
//! Each [`EntityKind`] has one fixed, declarative [`EntityRules`] table. The
//! orchestrator evaluates the table stage by stage; nothing here touches a
//! batch except through [`Correction::apply`].

use std::sync::LazyLock;

use rdc_model::{EntityKind, FieldValue, RecordBatch};
use regex::Regex;
use tracing::debug;

use crate::coerce::ColumnCoercion;
use crate::filter::Predicate;

/// Continent names with a run of stray `e`s in front (`eeEurope`, `Eeurope`).
static CONTINENT_TYPO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^e*(europe|america|asia|africa|oceania|antarctica|australia)$")
        .expect("continent regex")
});

/// A fixed edit applied to a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correction {
    /// Replace every occurrence of `from` with `to` in a text column.
    ReplaceText {
        column: &'static str,
        from: &'static str,
        to: &'static str,
    },
    /// Strip stray leading `e`s from a known continent name.
    ContinentFix { column: &'static str },
    /// Rename a column, unless the target name is taken.
    Rename {
        from: &'static str,
        to: &'static str,
    },
    /// Remove a column.
    DropColumn(&'static str),
}

impl Correction {
    /// The column this correction reads.
    pub fn column(&self) -> &'static str {
        match *self {
            Self::ReplaceText { column, .. } | Self::ContinentFix { column } => column,
            Self::Rename { from, .. } => from,
            Self::DropColumn(column) => column,
        }
    }

    /// Apply the correction. Absent columns are skipped.
    #[must_use]
    pub fn apply(&self, batch: RecordBatch) -> RecordBatch {
        if !batch.has_column(self.column()) {
            debug!(column = self.column(), "correction column absent, skipping");
            return batch;
        }
        match *self {
            Self::ReplaceText { column, from, to } => batch.map_column(column, |value| match value {
                FieldValue::Text(text) if text.contains(from) => FieldValue::Text(text.replace(from, to)),
                other => other,
            }),
            Self::ContinentFix { column } => batch.map_column(column, |value| match value {
                FieldValue::Text(text) => FieldValue::Text(fix_continent(&text)),
                other => other,
            }),
            Self::Rename { from, to } => batch.rename_column(from, to),
            Self::DropColumn(column) => batch.drop_column(column),
        }
    }
}

/// Canonical continent name for a typo'd one; anything else is unchanged.
///
/// ```
/// use rdc_normalize::rules::fix_continent;
///
/// assert_eq!(fix_continent("eeEurope"), "Europe");
/// assert_eq!(fix_continent("Eeurope"), "Europe");
/// assert_eq!(fix_continent("Greece"), "Greece");
/// ```
pub fn fix_continent(value: &str) -> String {
    let Some(caps) = CONTINENT_TYPO.captures(value.trim()) else {
        return value.to_string();
    };
    let name = caps[1].to_ascii_lowercase();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => value.to_string(),
    }
}

/// The declarative cleaning table for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRules {
    pub entity: EntityKind,
    /// Substitutions a predicate depends on, applied before filtering.
    pub repairs: &'static [Correction],
    pub predicates: &'static [Predicate],
    /// Edits applied to the surviving rows.
    pub corrections: &'static [Correction],
    pub coercions: &'static [(&'static str, ColumnCoercion)],
    /// Column to run through the weight normalizer.
    pub weight_column: Option<&'static str>,
}

/// Columns the coercer may turn into nulls; the null check only exempts
/// them once they hold coerced values.
const USER_NULLABLE: &[&str] = &["date_of_birth", "join_date"];
const CARD_NULLABLE: &[&str] = &["date_payment_confirmed"];

static USER_RULES: EntityRules = EntityRules {
    entity: EntityKind::User,
    repairs: &[],
    predicates: &[
        Predicate::OneOf {
            column: "country",
            allowed: &["Germany", "United Kingdom", "United States"],
        },
        Predicate::OneOf {
            column: "country_code",
            allowed: &["DE", "GB", "US", "GGB"],
        },
        Predicate::NoNulls {
            nullable: USER_NULLABLE,
        },
    ],
    corrections: &[Correction::ReplaceText {
        column: "country_code",
        from: "GGB",
        to: "GB",
    }],
    coercions: &[
        ("date_of_birth", ColumnCoercion::Timestamp),
        ("join_date", ColumnCoercion::Timestamp),
    ],
    weight_column: None,
};

static CARD_RULES: EntityRules = EntityRules {
    entity: EntityKind::Card,
    repairs: &[],
    predicates: &[
        Predicate::Contains {
            column: "expiry_date",
            needle: "/",
        },
        Predicate::NoNulls {
            nullable: CARD_NULLABLE,
        },
    ],
    corrections: &[],
    coercions: &[
        ("card_number", ColumnCoercion::Text { strip: &["?"] }),
        ("date_payment_confirmed", ColumnCoercion::Timestamp),
    ],
    weight_column: None,
};

static STORE_RULES: EntityRules = EntityRules {
    entity: EntityKind::Store,
    repairs: &[],
    predicates: &[Predicate::OneOf {
        column: "country_code",
        allowed: &["DE", "GB", "US"],
    }],
    corrections: &[Correction::ContinentFix {
        column: "continent",
    }],
    coercions: &[
        ("opening_date", ColumnCoercion::Timestamp),
        ("staff_numbers", ColumnCoercion::DigitsOnly),
    ],
    weight_column: None,
};

static PRODUCT_RULES: EntityRules = EntityRules {
    entity: EntityKind::Product,
    repairs: &[Correction::ReplaceText {
        column: "removed",
        from: "Still_avaliable",
        to: "Still_available",
    }],
    predicates: &[Predicate::OneOf {
        column: "removed",
        allowed: &["Still_available", "Removed"],
    }],
    corrections: &[Correction::Rename {
        from: "EAN",
        to: "ean",
    }],
    coercions: &[
        ("product_price", ColumnCoercion::Float { strip: &["£"] }),
        ("date_added", ColumnCoercion::Timestamp),
    ],
    weight_column: Some("weight"),
};

static ORDER_RULES: EntityRules = EntityRules {
    entity: EntityKind::Order,
    repairs: &[],
    predicates: &[],
    corrections: &[
        Correction::DropColumn("1"),
        Correction::DropColumn("first_name"),
        Correction::DropColumn("last_name"),
    ],
    coercions: &[("card_number", ColumnCoercion::Text { strip: &[] })],
    weight_column: None,
};

static DATE_TIME_RULES: EntityRules = EntityRules {
    entity: EntityKind::DateTime,
    repairs: &[],
    predicates: &[Predicate::OneOf {
        column: "time_period",
        allowed: &["Evening", "Morning", "Midday", "Late_Hours"],
    }],
    corrections: &[],
    coercions: &[],
    weight_column: None,
};

impl EntityRules {
    /// The rule table for `entity`.
    pub fn for_entity(entity: EntityKind) -> &'static EntityRules {
        match entity {
            EntityKind::User => &USER_RULES,
            EntityKind::Card => &CARD_RULES,
            EntityKind::Store => &STORE_RULES,
            EntityKind::Product => &PRODUCT_RULES,
            EntityKind::Order => &ORDER_RULES,
            EntityKind::DateTime => &DATE_TIME_RULES,
        }
    }

    /// Columns the raw batch must contain for these rules to run.
    pub fn required_columns(&self) -> Vec<&'static str> {
        let mut columns: Vec<&'static str> = Vec::new();
        let named = self.predicates.iter().filter_map(Predicate::column);
        for column in named.chain(self.weight_column) {
            if !columns.contains(&column) {
                columns.push(column);
            }
        }
        columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continent_fix_only_touches_known_names() {
        assert_eq!(fix_continent("Europe"), "Europe");
        assert_eq!(fix_continent("eeEurope"), "Europe");
        assert_eq!(fix_continent("eeAmerica"), "America");
        assert_eq!(fix_continent("Eeurope"), "Europe");
        assert_eq!(fix_continent("QMAVR5H3LD"), "QMAVR5H3LD");
        assert_eq!(fix_continent("Greece"), "Greece");
    }

    #[test]
    fn replace_text_is_idempotent() {
        let fix = Correction::ReplaceText {
            column: "country_code",
            from: "GGB",
            to: "GB",
        };
        let batch =
            RecordBatch::from_rows(vec!["country_code".into()], vec![vec!["GGB".into()], vec!["GB".into()]]).unwrap();
        let once = fix.apply(batch);
        assert_eq!(once.get(0, "country_code"), Some(&FieldValue::from("GB")));
        assert_eq!(fix.apply(once.clone()), once);
    }

    #[test]
    fn corrections_skip_absent_columns() {
        let batch = RecordBatch::from_rows(vec!["date_uuid".into()], vec![vec!["x".into()]]).unwrap();
        let same = ORDER_RULES
            .corrections
            .iter()
            .fold(batch.clone(), |batch, correction| correction.apply(batch));
        assert_eq!(same, batch);
    }

    #[test]
    fn every_entity_has_a_table() {
        for entity in EntityKind::ALL {
            assert_eq!(EntityRules::for_entity(entity).entity, entity);
        }
    }

    #[test]
    fn required_columns_cover_predicates_and_weight() {
        assert_eq!(
            EntityRules::for_entity(EntityKind::Product).required_columns(),
            vec!["removed", "weight"]
        );
        assert_eq!(
            EntityRules::for_entity(EntityKind::User).required_columns(),
            vec!["country", "country_code"]
        );
        assert!(EntityRules::for_entity(EntityKind::Order).required_columns().is_empty());
    }

    #[test]
    fn required_columns_are_listed_once() {
        static REPEATED: EntityRules = EntityRules {
            entity: EntityKind::Product,
            repairs: &[],
            predicates: &[
                Predicate::OneOf {
                    column: "removed",
                    allowed: &["Removed"],
                },
                Predicate::Contains {
                    column: "weight",
                    needle: "kg",
                },
                Predicate::OneOf {
                    column: "removed",
                    allowed: &["Still_available"],
                },
            ],
            corrections: &[],
            coercions: &[],
            weight_column: Some("weight"),
        };
        assert_eq!(REPEATED.required_columns(), vec!["removed", "weight"]);
    }
}

//! Rendering of [`Predicate`] trees to `SQLite` `WHERE` clauses.
//!
//! Values are always bound; only column names (static strings) and
//! operators are written into the SQL text.

use sqlx::{QueryBuilder, Sqlite};

use cafe_map_core::Predicate;

/// Append `predicate` to `builder` as a boolean SQL expression.
pub fn push_predicate(builder: &mut QueryBuilder<'_, Sqlite>, predicate: &Predicate) {
    match predicate {
        Predicate::HasAmenity(amenity) => {
            builder.push(amenity.column()).push(" = ").push_bind(true);
        }
        Predicate::LatBetween { min, max } => {
            builder
                .push("(lat > ")
                .push_bind(*min)
                .push(" AND lat < ")
                .push_bind(*max)
                .push(")");
        }
        Predicate::LonBetween { min, max } => {
            builder
                .push("(lon > ")
                .push_bind(*min)
                .push(" AND lon < ")
                .push_bind(*max)
                .push(")");
        }
        Predicate::LocationContains(text) => {
            // lower() folds ASCII only, as does Predicate::matches
            builder
                .push("instr(lower(location), lower(")
                .push_bind(text.clone())
                .push(")) > 0");
        }
        Predicate::LocationEquals(text) => {
            builder.push("location = ").push_bind(text.clone());
        }
        Predicate::And(terms) => push_joined(builder, terms, " AND ", "1 = 1"),
        Predicate::Or(terms) => push_joined(builder, terms, " OR ", "1 = 0"),
    }
}

fn push_joined(
    builder: &mut QueryBuilder<'_, Sqlite>,
    terms: &[Predicate],
    separator: &str,
    empty: &str,
) {
    if terms.is_empty() {
        builder.push(empty);
        return;
    }

    builder.push("(");
    for (index, term) in terms.iter().enumerate() {
        if index > 0 {
            builder.push(separator);
        }
        push_predicate(builder, term);
    }
    builder.push(")");
}

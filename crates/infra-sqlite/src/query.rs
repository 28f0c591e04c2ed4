// Filter -> SQL helpers shared by the stores

use sqlx::{QueryBuilder, Sqlite};

/// Appends `AND <column> = ?` when the filter field is set
pub(crate) fn push_eq<'a>(qb: &mut QueryBuilder<'a, Sqlite>, column: &str, value: &Option<String>) {
    if let Some(value) = value {
        qb.push(format!(" AND {} = ", column));
        qb.push_bind(value.clone());
    }
}

/// Appends `AND status IN (...)`; an empty list matches nothing
pub(crate) fn push_statuses<'a>(qb: &mut QueryBuilder<'a, Sqlite>, statuses: Option<Vec<&'static str>>) {
    let Some(statuses) = statuses else {
        return;
    };
    if statuses.is_empty() {
        qb.push(" AND 0");
        return;
    }
    qb.push(" AND status IN (");
    let mut separated = qb.separated(", ");
    for status in statuses {
        separated.push_bind(status);
    }
    separated.push_unseparated(")");
}

use std::cmp::Ordering;

use rescomp_core::{canonicalize_key, FieldPath, KeyValue, Warning, WarningCode};
use rescomp_index::RawRow;
use rescomp_manifest::{Direction, OrderBy};

/// Sorts sibling rows into a strict total order.
///
/// With no declared ordering, rows keep their source order. With a declared
/// ordering, each row's key is computed via the order field path and the
/// canonicalizer; rows lacking a usable key warn (`OrderByFieldMissing`) and
/// sort after all keyed rows. Keyed rows compare by `(kind, value)`
/// ordinally, flipped as a whole for descending order. The final tie-break
/// for every row is the source row index, ascending.
pub fn sort_rows<'a>(
    rows: Vec<&'a RawRow>,
    order_by: Option<&OrderBy>,
    entity: &str,
    warnings: &mut Vec<Warning>,
) -> Vec<&'a RawRow> {
    let Some(order_by) = order_by else {
        let mut rows = rows;
        rows.sort_by_key(|row| row.row_index);
        return rows;
    };

    let field = FieldPath::parse(order_by.field.as_str());
    let descending = order_by.direction == Some(Direction::Desc);

    let mut keyed: Vec<(Option<KeyValue>, &RawRow)> = Vec::with_capacity(rows.len());
    for row in rows {
        let key = field.resolve(&row.value).and_then(|v| canonicalize_key(v).ok());
        if key.is_none() {
            warnings.push(
                Warning::warning(
                    WarningCode::OrderByFieldMissing,
                    format!(
                        "row {} of '{}' has no usable order key at '{}'",
                        row.row_index, entity, order_by.field
                    ),
                )
                .with_entity(entity.to_string())
                .with_path(format!("[{}].{}", row.row_index, order_by.field)),
            );
        }
        keyed.push((key, row));
    }

    keyed.sort_by(|(a_key, a_row), (b_key, b_row)| {
        let by_key = match (a_key, b_key) {
            (Some(a), Some(b)) => {
                let cmp = a.cmp(b);
                if descending {
                    cmp.reverse()
                } else {
                    cmp
                }
            }
            // Unkeyed rows sort after all keyed rows regardless of direction.
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_key.then_with(|| a_row.row_index.cmp(&b_row.row_index))
    });

    keyed.into_iter().map(|(_, row)| row).collect()
}

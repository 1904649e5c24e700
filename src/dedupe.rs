// Deduplication - select one "current" record per natural key.
// The survivor is the record with the maximum timestamp for its key.

use std::collections::HashMap;
use std::hash::Hash;

/// Keep exactly one record per natural key: the one with the maximum
/// timestamp. Records with a null natural key are dropped before
/// deduplication.
///
/// Tie-break: when two records share both the key and the maximum
/// timestamp, the record earliest in input (bronze scan) order wins.
/// A null timestamp ranks below every present timestamp, so a record
/// with a timestamp always beats one without.
///
/// Output preserves input order of the surviving records, which keeps
/// repeated runs over the same bronze snapshot deterministic.
pub fn latest_per_key<T, K, S, FK, FS>(rows: Vec<T>, key_of: FK, stamp_of: FS) -> Vec<T>
where
    K: Eq + Hash,
    S: Ord,
    FK: Fn(&T) -> Option<K>,
    FS: Fn(&T) -> Option<S>,
{
    // key -> (input position of kept row, its timestamp, the row)
    let mut kept: HashMap<K, (usize, Option<S>, T)> = HashMap::new();

    for (position, row) in rows.into_iter().enumerate() {
        let key = match key_of(&row) {
            Some(k) => k,
            None => continue,
        };
        let stamp = stamp_of(&row);

        // Strictly newer replaces; equal keeps the earlier position
        let replace = match kept.get(&key) {
            Some((_, kept_stamp, _)) => stamp > *kept_stamp,
            None => true,
        };
        if replace {
            kept.insert(key, (position, stamp, row));
        }
    }

    let mut survivors: Vec<(usize, T)> = kept
        .into_values()
        .map(|(position, _, row)| (position, row))
        .collect();
    survivors.sort_by_key(|(position, _)| *position);
    survivors.into_iter().map(|(_, row)| row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[derive(Debug, Clone, PartialEq)]
    struct Record {
        id: Option<i64>,
        created: Option<NaiveDate>,
        tag: &'static str,
    }

    fn rec(id: Option<i64>, created: Option<&str>, tag: &'static str) -> Record {
        Record {
            id,
            created: created.map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()),
            tag,
        }
    }

    fn dedup(rows: Vec<Record>) -> Vec<Record> {
        latest_per_key(rows, |r| r.id, |r| r.created)
    }

    #[test]
    fn test_keeps_max_timestamp_per_key() {
        let rows = vec![
            rec(Some(7), Some("2021-01-01"), "old"),
            rec(Some(7), Some("2022-06-01"), "new"),
            rec(Some(8), Some("2020-03-15"), "only"),
        ];
        let out = dedup(rows);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].tag, "new");
        assert_eq!(out[1].tag, "only");
    }

    #[test]
    fn test_drops_null_keys() {
        let rows = vec![
            rec(None, Some("2022-01-01"), "no_key"),
            rec(Some(1), Some("2021-01-01"), "keyed"),
        ];
        let out = dedup(rows);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].tag, "keyed");
    }

    #[test]
    fn test_tie_break_first_in_input_order() {
        let rows = vec![
            rec(Some(5), Some("2022-06-01"), "first"),
            rec(Some(5), Some("2022-06-01"), "second"),
        ];
        let out = dedup(rows);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].tag, "first");
    }

    #[test]
    fn test_null_timestamp_ranks_lowest() {
        let rows = vec![
            rec(Some(3), None, "undated"),
            rec(Some(3), Some("2019-01-01"), "dated"),
        ];
        let out = dedup(rows);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].tag, "dated");

        // Both undated: first in input order wins
        let rows = vec![rec(Some(4), None, "a"), rec(Some(4), None, "b")];
        let out = dedup(rows);
        assert_eq!(out[0].tag, "a");
    }

    #[test]
    fn test_output_preserves_input_order() {
        let rows = vec![
            rec(Some(9), Some("2020-01-01"), "nine"),
            rec(Some(2), Some("2020-01-01"), "two"),
            rec(Some(6), Some("2020-01-01"), "six"),
        ];
        let out = dedup(rows);

        let tags: Vec<_> = out.iter().map(|r| r.tag).collect();
        assert_eq!(tags, vec!["nine", "two", "six"]);
    }
}

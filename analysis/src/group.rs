use std::collections::{BTreeSet, HashMap};

/// Number of rows per key, rows without a key are skipped.
pub(crate) fn tally<'r, R, I, K>(rows: I, key: K) -> HashMap<String, usize>
where
    R: 'r,
    I: IntoIterator<Item = &'r R>,
    K: Fn(&'r R) -> Option<&'r str>,
{
    let mut counts = HashMap::new();
    for row in rows {
        if let Some(k) = key(row) {
            *counts.entry(k.to_owned()).or_default() += 1;
        }
    }
    counts
}

pub(crate) fn sum_by<'r, R, I, K, V>(rows: I, key: K, value: V) -> HashMap<String, f64>
where
    R: 'r,
    I: IntoIterator<Item = &'r R>,
    K: Fn(&'r R) -> Option<&'r str>,
    V: Fn(&'r R) -> f64,
{
    let mut sums = HashMap::new();
    for row in rows {
        if let Some(k) = key(row) {
            *sums.entry(k.to_owned()).or_default() += value(row);
        }
    }
    sums
}

/// Sorted union of the keys of several groupings.
pub(crate) fn names<'m, I, V>(maps: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'m HashMap<String, V>>,
    V: 'm,
{
    maps.into_iter().flat_map(|m| m.keys().cloned()).collect()
}

pub(crate) fn get(map: &HashMap<String, usize>, name: &str) -> usize {
    map.get(name).copied().unwrap_or(0)
}

pub(crate) fn getf(map: &HashMap<String, f64>, name: &str) -> f64 {
    map.get(name).copied().unwrap_or(0.0)
}

pub(crate) fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

pub(crate) fn percent(num: f64, den: f64) -> f64 {
    ratio(num, den) * 100.0
}

/// Sorts descending by `key`, ties keep the (name) order the rows arrived in.
pub(crate) fn sort_desc<T, K>(rows: &mut [T], key: K)
where
    K: Fn(&T) -> f64,
{
    rows.sort_by(|a, b| key(b).total_cmp(&key(a)));
}

/// Different teams. A missing team never equals anything, not even another missing team.
pub(crate) fn opponents(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a != b,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_teams_are_opponents() {
        assert!(opponents(Some("Alpha"), Some("Bravo")));
        assert!(!opponents(Some("Alpha"), Some("Alpha")));
        assert!(opponents(None, Some("Alpha")));
        assert!(opponents(None, None));
    }
}

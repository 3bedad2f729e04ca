pub mod actions;
pub mod dashboard;
pub mod gantt;
pub mod health;

/// Raw query string pairs, in order, with repeated keys preserved.
pub(crate) type Pairs = [(String, String)];

/// Collect every value given for `key`. Several values are selected by
/// repeating the parameter (`?status=Done&status=Blocked`); each value is
/// taken whole, commas included. An absent parameter selects everything; a
/// present but empty one selects nothing.
pub(crate) fn selection(pairs: &Pairs, key: &str) -> Option<Vec<String>> {
    let mut values: Option<Vec<String>> = None;
    for (_, value) in pairs.iter().filter(|(k, _)| k == key) {
        let list = values.get_or_insert_with(Vec::new);
        let value = value.trim();
        if !value.is_empty() {
            list.push(value.to_string());
        }
    }
    values
}

/// The last value given for a single-valued parameter.
pub(crate) fn single<'a>(pairs: &'a Pairs, key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .rev()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
pub(crate) fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
    raw.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

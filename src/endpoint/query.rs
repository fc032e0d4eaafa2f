use url::Url;

/// Sets a query parameter, replacing any existing values for `key`
///
/// Other parameters keep their relative order. An empty `value` leaves the URL
/// untouched, so optional parameters can be passed through unconditionally.
pub fn add_query(url: &mut Url, key: &str, value: &str) {
    if value.is_empty() {
        return;
    }

    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != key)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut pairs = url.query_pairs_mut();
    pairs.clear();
    for (k, v) in &retained {
        pairs.append_pair(k, v);
    }
    pairs.append_pair(key, value);
}

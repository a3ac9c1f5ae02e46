//! Query string handling.

use url::Url;

use crate::route::Params;

/// Set query parameters on a url.
///
/// Each given key replaces the first existing pair with that key and drops any later duplicates,
/// or is appended when absent. Pairs already in the url with other keys are kept in place.
pub fn set_query<I, K, V>(url: &mut Url, params: I)
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

    for (key, value) in params {
        set(&mut pairs, key.into(), value.into());
    }

    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(&pairs);
    }
}

fn set(pairs: &mut Vec<(String, String)>, key: String, value: String) {
    match pairs.iter().position(|(k, _)| *k == key) {
        Some(first) => {
            let mut index = 0;
            pairs.retain(|(k, _)| {
                let keep = index <= first || *k != key;
                index += 1;
                keep
            });
            pairs[first].1 = value;
        }
        None => pairs.push((key, value)),
    }
}

/// The decoded query parameters of a url. A repeated key keeps its last value.
pub fn query_params(url: &Url) -> Params {
    url.query_pairs().into_owned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(text: &str) -> Url {
        Url::parse(text).unwrap()
    }

    #[test]
    fn sets_on_empty_query() {
        let mut target = url("http://localhost/search");
        set_query(&mut target, vec![("q", "hello")]);
        assert_eq!(target.query(), Some("q=hello"));
    }

    #[test]
    fn explicit_keys_win_and_others_stay() {
        let mut target = url("http://localhost/search?q=old&page=2");
        set_query(&mut target, vec![("q", "new")]);
        assert_eq!(target.query(), Some("q=new&page=2"));
    }

    #[test]
    fn duplicates_collapse() {
        let mut target = url("http://localhost/?a=1&b=2&a=3");
        set_query(&mut target, vec![("a", "x")]);
        assert_eq!(target.query(), Some("a=x&b=2"));
    }

    #[test]
    fn nothing_to_set_leaves_no_query() {
        let mut target = url("http://localhost/");
        set_query(&mut target, Vec::<(String, String)>::new());
        assert_eq!(target.query(), None);
    }

    #[test]
    fn values_are_encoded_and_decoded() {
        let mut target = url("http://localhost/");
        set_query(&mut target, vec![("q", "a b&c")]);
        assert_eq!(target.query(), Some("q=a+b%26c"));
        assert_eq!(query_params(&target).get("q").map(String::as_str), Some("a b&c"));
    }

    #[test]
    fn last_duplicate_wins_when_reading() {
        let params = query_params(&url("http://localhost/?a=1&a=2"));
        assert_eq!(params.get("a").map(String::as_str), Some("2"));
    }
}

use crate::value::Value;

/// Value at `path` under `root`, or `None` once a key is missing, an index is
/// out of range, or an intermediate value is not a container.
pub fn resolve<'v, K: AsRef<str>>(path: &[K], root: &'v Value) -> Option<&'v Value> {
    let Some((head, rest)) = path.split_first() else {
        return Some(root);
    };
    let head = segment(head);
    let child = match root {
        Value::Object(map) => map.get(head)?,
        Value::Array(xs) => xs.get(array_index(head)?)?,
        _ => return None,
    };
    resolve(rest, child)
}

/// Only canonical decimal indices: `"0"`, or digits without a leading zero.
fn array_index(key: &str) -> Option<usize> {
    let digits = !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit());
    if !digits || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    key.parse().ok()
}

pub(crate) fn segment<K: AsRef<str>>(key: &K) -> &str {
    key.as_ref()
}

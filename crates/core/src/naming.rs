/// Convert a `PascalCase` identifier to `snake_case`.
///
/// The first character is lowercased; every later uppercase character becomes
/// `_` followed by its lowercase form. Runs of capitals are not grouped:
/// `HTTPProxy` becomes `h_t_t_p_proxy`.
pub fn to_snake_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    let mut chars = name.chars();
    if let Some(first) = chars.next() {
        result.extend(first.to_lowercase());
    }
    for ch in chars {
        if ch.is_uppercase() {
            result.push('_');
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}

//! `$name` token substitution shared by mixin parameters and variables.

/// Replace every `$name` token that `lookup` knows with its replacement.
///
/// A token is `$` followed by letters, digits, `_` or `-`, so `$w` never
/// matches inside `$width`. Replacements are not rescanned.
pub fn substitute<'a, F>(text: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<&'a str>,
{
    if !text.contains('$') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('$') {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];
        let end = candidate[1..]
            .find(|c: char| !is_token_char(c))
            .map_or(candidate.len(), |idx| idx + 1);
        let token = &candidate[..end];
        match (end > 1).then(|| lookup(token)).flatten() {
            Some(replacement) => out.push_str(replacement),
            None => out.push_str(token),
        }
        rest = &candidate[end..];
    }
    out.push_str(rest);
    out
}

fn is_token_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

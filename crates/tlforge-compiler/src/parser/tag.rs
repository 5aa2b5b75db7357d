//! Tag inference for entries written without `#tag`.
//!
//! The tag is the CRC32 of the entry text after normalization: `bytes`
//! counts as `string`, type brackets are dropped, `name:flags.N?true`
//! parameters are removed, and whitespace collapses to single spaces.

pub fn infer_tag(definition: &str) -> u32 {
    let text = definition.replace('<', " ").replace(['>', '{', '}'], "");
    let normalized = text
        .split_whitespace()
        .filter(|token| !is_true_flag(token))
        .map(|token| {
            if let Some(prefix) = token.strip_suffix(":bytes") {
                format!("{prefix}:string")
            } else if let Some(prefix) = token.strip_suffix("?bytes") {
                format!("{prefix}?string")
            } else {
                token.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    crc32fast::hash(normalized.as_bytes())
}

/// `name:flagsK.N?true`
fn is_true_flag(token: &str) -> bool {
    let Some((_, ty)) = token.split_once(':') else {
        return false;
    };
    let Some(condition) = ty.strip_suffix("?true") else {
        return false;
    };
    let Some((word, bit)) = condition.split_once('.') else {
        return false;
    };
    let Some(suffix) = word.strip_prefix("flags") else {
        return false;
    };

    suffix.bytes().all(|b| b.is_ascii_digit())
        && !bit.is_empty()
        && bit.bytes().all(|b| b.is_ascii_digit())
}

// Field lexing helpers
// Shared by the instrument and trajectory grammar parsers. Reasons are
// plain strings; the callers wrap them into ParseError with line context.

use std::str::SplitWhitespace;

use glam::DVec3;

/// One numeric field
pub(crate) fn take_f64(fields: &mut SplitWhitespace, what: &str) -> Result<f64, String> {
    let raw = fields.next().ok_or_else(|| format!("missing {what}"))?;
    raw.parse::<f64>()
        .map_err(|_| format!("non-numeric {what} `{raw}`"))
}

/// Three consecutive numeric fields
pub(crate) fn take_vec3(fields: &mut SplitWhitespace, what: &str) -> Result<DVec3, String> {
    Ok(DVec3::new(
        take_f64(fields, what)?,
        take_f64(fields, what)?,
        take_f64(fields, what)?,
    ))
}

/// Fixed arity means exactly fixed: trailing fields are an error
pub(crate) fn ensure_done(fields: &mut SplitWhitespace) -> Result<(), String> {
    match fields.next() {
        Some(extra) => Err(format!("unexpected trailing field `{extra}`")),
        None => Ok(()),
    }
}

use crate::error::AppError;

/// Validates the raw `fid` query value before anything goes upstream.
pub fn parse_fid(raw: Option<&str>) -> Result<u64, AppError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty()).ok_or(AppError::MissingFid)?;

    match raw.parse::<u64>() {
        Ok(fid) if fid > 0 => Ok(fid),
        _ => Err(AppError::InvalidFid),
    }
}

//! Sample parsing for stdin input

/// Parse one input line.
///
/// Blank lines yield `None`. Anything else must be a finite number.
pub fn parse_sample(line: &str) -> Option<Result<f64, String>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(match line.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(value) => Err(format!("non-finite sample {}", value)),
        Err(e) => Err(format!("invalid sample {:?}: {}", line, e)),
    })
}

use crate::error::ExtractionError;

/// Returns the trimmed text between the first `start` marker and the next
/// `end` marker after it.
pub fn extract_between(
    data: &str,
    start: &str,
    end: &str,
    context: &str,
) -> Result<String, ExtractionError> {
    let begin = data
        .find(start)
        .map(|idx| idx + start.len())
        .ok_or_else(|| missing(start, context))?;
    let len = data[begin..].find(end).ok_or_else(|| missing(end, context))?;
    Ok(data[begin..begin + len].trim().to_string())
}

fn missing(marker: &str, context: &str) -> ExtractionError {
    ExtractionError::MissingMarker {
        marker: marker.to_string(),
        context: context.to_string(),
    }
}

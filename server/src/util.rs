//! Shared utility functions

use uuid::Uuid;
use validator::ValidationErrors;

/// Format file size in human-readable units
///
/// # Examples
///
/// ```
/// use vivah_server::util::format_file_size;
///
/// assert_eq!(format_file_size(512), "512 bytes");
/// assert_eq!(format_file_size(2048), "2KB");
/// assert_eq!(format_file_size(5 * 1024 * 1024), "5.0MB");
/// ```
pub fn format_file_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{bytes} bytes")
    } else if bytes < 1024 * 1024 {
        format!("{}KB", bytes / 1024)
    } else {
        format!("{:.1}MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Parse a user id taken from a path segment.
///
/// Path ids are extracted as strings so a malformed id gets the JSON error
/// envelope instead of the framework's plain-text rejection.
pub fn parse_user_id(raw: &str) -> Option<Uuid> {
    raw.trim().parse().ok()
}

/// First human-readable message out of a set of validation errors.
///
/// Falls back to the field name when a rule carries no message.
pub fn first_validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .find_map(|(field, errs)| {
            errs.first().map(|e| {
                e.message
                    .as_ref()
                    .map_or_else(|| format!("Invalid value for {field}."), ToString::to_string)
            })
        })
        .unwrap_or_else(|| "Invalid request.".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 3, message = "Too short."))]
        name: String,
        #[validate(range(min = 1))]
        step: i32,
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 bytes");
        assert_eq!(format_file_size(1023), "1023 bytes");
        assert_eq!(format_file_size(1024), "1KB");
        assert_eq!(format_file_size(1024 * 1024), "1.0MB");
        assert_eq!(format_file_size(50 * 1024 * 1024), "50.0MB");
    }

    #[test]
    fn test_parse_user_id() {
        let id = Uuid::now_v7();
        assert_eq!(parse_user_id(&id.to_string()), Some(id));
        assert_eq!(parse_user_id(&format!(" {id} ")), Some(id));
        assert_eq!(parse_user_id("64b7f0c2e4b0a1a2b3c4d5e6"), None);
    }

    #[test]
    fn test_first_validation_message() {
        let err = Sample { name: "ab".into(), step: 5 }.validate().unwrap_err();
        assert_eq!(first_validation_message(&err), "Too short.");

        let err = Sample { name: "abc".into(), step: 0 }.validate().unwrap_err();
        assert_eq!(first_validation_message(&err), "Invalid value for step.");
    }
}

pub mod config;
pub mod logger;

use validator::ValidationErrors;

/// Flatten `validator` errors into a single `field: message; ...` string
/// suitable for surfacing to a caller that must re-prompt.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match e.message.as_ref() {
                Some(m) => format!("{field}: {m}"),
                None => format!("{field}: invalid value"),
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

//! Expectation checks used between journey steps.
//!
//! Each check returns the failure message on mismatch; the scenario attaches
//! the step and journey state before aborting.

use crate::model::ItemSnapshot;

pub type Expectation = std::result::Result<(), String>;

/// Current URL must equal `expected` exactly
pub fn url_equals(current: &str, expected: &str) -> Expectation {
    if current == expected {
        Ok(())
    } else {
        Err(format!(
            "User should be redirected to: {} (current URL: {})",
            expected, current
        ))
    }
}

/// Current URL must contain `fragment`
pub fn url_contains(current: &str, fragment: &str) -> Expectation {
    if current.contains(fragment) {
        Ok(())
    } else {
        Err(format!(
            "URL should contain {} (current URL: {})",
            fragment, current
        ))
    }
}

/// A condition that must hold, failing with `message`
pub fn holds(condition: bool, message: &str) -> Expectation {
    if condition {
        Ok(())
    } else {
        Err(message.to_string())
    }
}

/// Text read from the page must be present and non-empty
pub fn non_empty(text: Option<&str>, message: &str) -> Expectation {
    match text {
        Some(text) if !text.is_empty() => Ok(()),
        _ => Err(message.to_string()),
    }
}

/// Text read from the page must equal a previously captured value
pub fn text_equals(field: &str, actual: &str, expected: &str) -> Expectation {
    if actual == expected {
        Ok(())
    } else {
        Err(format!(
            "Item {} should be '{}' but page shows '{}'",
            field, expected, actual
        ))
    }
}

/// Every field re-read on a later page must equal the captured snapshot
pub fn snapshot_matches(page: &str, captured: &ItemSnapshot, shown: &ItemSnapshot) -> Expectation {
    let fields = captured.mismatched_fields(shown);
    if fields.is_empty() {
        return Ok(());
    }

    let details = fields
        .iter()
        .map(|field| {
            let (expected, actual) = match *field {
                "name" => (&captured.name, &shown.name),
                "description" => (&captured.description, &shown.description),
                _ => (&captured.price, &shown.price),
            };
            format!("{}: expected '{}', found '{}'", field, expected, actual)
        })
        .collect::<Vec<_>>()
        .join("; ");

    Err(format!("Item on {} differs from product page ({})", page, details))
}

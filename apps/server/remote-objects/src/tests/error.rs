// Unit tests for error module

use crate::error::AppError;

use common::ErrorLocation;

use std::panic::Location;

/// **VALUE**: Tests that errors render their kind, message and location.
///
/// **WHY THIS MATTERS**: The binary returns these from `main`; the rendered text
/// is all an operator sees.
///
/// **BUG THIS CATCHES**: Would catch a variant losing its message or location in
/// the `#[error]` format.
#[test]
fn given_app_error_when_displayed_then_contains_message_and_location() {
    // GIVEN: A config error
    let err = AppError::Config {
        message: String::from("Test"),
        location: ErrorLocation::from(Location::caller()),
    };

    // WHEN: Rendering it
    let rendered = err.to_string();

    // THEN: Kind, message and file are present
    assert!(rendered.starts_with("Config Error: Test"), "got {rendered}");
    assert!(rendered.contains("error.rs"), "location should name the file");
}

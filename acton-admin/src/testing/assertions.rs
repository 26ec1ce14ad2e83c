//! Header assertions for admin responses

use axum_test::TestResponse;

/// Assert that the response carries an HX-Trigger header naming `expected_event`
///
/// # Panics
///
/// Panics if the header is missing or doesn't contain the event
pub fn assert_hx_trigger(response: &TestResponse, expected_event: &str) {
    let header = response
        .headers()
        .get("HX-Trigger")
        .expect("HX-Trigger header not found");
    let actual = header.to_str().expect("Invalid HX-Trigger header value");
    assert!(
        actual.contains(expected_event),
        "Expected HX-Trigger to contain '{expected_event}', got '{actual}'"
    );
}

/// Assert that the response has no HX-Trigger header
///
/// # Panics
///
/// Panics if the header is present
pub fn assert_no_hx_trigger(response: &TestResponse) {
    assert!(
        response.headers().get("HX-Trigger").is_none(),
        "Unexpected HX-Trigger header"
    );
}

/// Assert the three headers that keep the admin page out of caches
///
/// # Panics
///
/// Panics if any header is missing or different
pub fn assert_no_cache(response: &TestResponse) {
    let headers = response.headers();
    for (name, expected) in [
        ("Cache-Control", "no-cache, no-store, must-revalidate"),
        ("Pragma", "no-cache"),
        ("Expires", "0"),
    ] {
        let actual = headers
            .get(name)
            .unwrap_or_else(|| panic!("{name} header not found"));
        assert_eq!(actual, expected, "Unexpected {name} header");
    }
}

//! Response body for the counter route.

/// Render the plain-text greeting for a post-increment count.
///
/// The output is byte-exact, trailing newline included.
pub fn render(count: i64) -> String {
    format!("Hello Anil! I've been seen {count} times.\n")
}

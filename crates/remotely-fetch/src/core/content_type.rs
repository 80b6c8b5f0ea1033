/// The only media type treated as a JSON body.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Media type of a `Content-Type` header value, without parameters.
///
/// # Examples
///
/// ```
/// use remotely_fetch::media_type;
///
/// assert_eq!(media_type("application/json; charset=utf-8"), "application/json");
/// assert_eq!(media_type(" text/html "), "text/html");
/// ```
pub fn media_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
}

/// Returns `true` if the declared content type is `application/json`.
///
/// A missing header is not JSON.
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type
        .map(media_type)
        .is_some_and(|media_type| media_type.eq_ignore_ascii_case(JSON_MEDIA_TYPE))
}

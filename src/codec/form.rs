//! `application/x-www-form-urlencoded` bodies

use bytes::Bytes;
use url::form_urlencoded;

/// Content type of form-encoded request bodies
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Encode name/value pairs as a form body, keeping their order
pub fn encode_form<'a, I>(pairs: I) -> Bytes
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let encoded = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    Bytes::from(encoded)
}

/// Decode a form body back into pairs
pub fn decode_form(body: &[u8]) -> Vec<(String, String)> {
    form_urlencoded::parse(body).into_owned().collect()
}

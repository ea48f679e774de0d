/// API middleware
///
/// - `envelope`: Stamps the request path onto error envelopes and
///   normalizes raw framework rejections into the same shape
/// - `security`: Security headers on every response

pub mod envelope;
pub mod security;

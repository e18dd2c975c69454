use thiserror::Error;
use url::Url;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
  #[error("Please enter a URL")]
  Empty,

  #[error("Please enter a valid URL (e.g., example.com or https://example.com)")]
  Invalid,
}

/// Trim, default the scheme to https, and accept only http(s) URLs.
///
/// Returns the normalized form that the generator is keyed on. The input is
/// otherwise kept as typed so `example.com/` and `example.com` stay distinct.
/// An explicit non-http scheme such as `ftp://` is rejected rather than
/// prefixed.
pub fn validate_url(input: &str) -> Result<String, ValidationError> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return Err(ValidationError::Empty);
  }
  if has_other_scheme(trimmed) {
    return Err(ValidationError::Invalid);
  }

  let normalized = if has_http_scheme(trimmed) {
    trimmed.to_string()
  } else {
    format!("https://{trimmed}")
  };

  let parsed = Url::parse(&normalized).map_err(|_| ValidationError::Invalid)?;
  match parsed.scheme() {
    "http" | "https" if parsed.host_str().is_some() => Ok(normalized),
    _ => Err(ValidationError::Invalid),
  }
}

fn has_http_scheme(url: &str) -> bool {
  url.starts_with("http://") || url.starts_with("https://")
}

/// `<scheme>://` with a scheme other than http(s)
fn has_other_scheme(url: &str) -> bool {
  match url.split_once("://") {
    Some((scheme, _)) => {
      let mut chars = scheme.chars();
      let well_formed = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
      well_formed && !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https")
    }
    None => false,
  }
}

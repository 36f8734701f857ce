//! Input checks performed before any lookup

use crate::utils::error::FetchError;

pub const EMPTY_URL_MESSAGE: &str = "Please enter a TikTok URL";
pub const FOREIGN_URL_MESSAGE: &str = "Please enter a valid TikTok URL";

/// Accept `raw` if it is non-empty and mentions `domain`.
///
/// This is a containment check, not a URL parse. Returns the trimmed input.
pub fn validate_source_url<'a>(raw: &'a str, domain: &str) -> Result<&'a str, FetchError> {
    let url = raw.trim();
    if url.is_empty() {
        return Err(FetchError::Validation(EMPTY_URL_MESSAGE.to_string()));
    }
    if !url.contains(domain) {
        return Err(FetchError::Validation(FOREIGN_URL_MESSAGE.to_string()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_rejected() {
        let err = validate_source_url("   ", "tiktok.com").unwrap_err();
        assert_eq!(err, FetchError::Validation(EMPTY_URL_MESSAGE.to_string()));
    }

    #[test]
    fn test_foreign_input_rejected() {
        let err = validate_source_url("https://youtu.be/abc", "tiktok.com").unwrap_err();
        assert_eq!(err.reason(), FOREIGN_URL_MESSAGE);
    }

    #[test]
    fn test_containment_is_enough() {
        assert_eq!(
            validate_source_url(" https://vt.tiktok.com/ZS8abc/ ", "tiktok.com").unwrap(),
            "https://vt.tiktok.com/ZS8abc/"
        );
        // Not a URL parse: any text carrying the domain passes
        assert!(validate_source_url("tiktok.com", "tiktok.com").is_ok());
    }
}

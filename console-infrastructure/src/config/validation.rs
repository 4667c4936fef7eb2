use anyhow::{anyhow, Result};
use url::Url;

pub fn validate_base_url(value: &str) -> Result<()> {
    let url = Url::parse(value.trim()).map_err(|err| anyhow!("invalid api_base_url: {}", err))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow!("api_base_url must be http or https"));
    }
    if url.host_str().is_none() {
        return Err(anyhow!("api_base_url has no host"));
    }
    Ok(())
}

pub fn validate_api_prefix(value: &str) -> Result<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    if !trimmed.starts_with('/') {
        return Err(anyhow!("api_prefix must start with '/'"));
    }
    if trimmed.contains('?') || trimmed.contains('#') {
        return Err(anyhow!("api_prefix must be a plain path"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_must_be_http() {
        assert!(validate_base_url("http://localhost:3000").is_ok());
        assert!(validate_base_url("ftp://files.test").is_err());
        assert!(validate_base_url("localhost:3000/api").is_err());
    }

    #[test]
    fn prefix_must_be_absolute_path() {
        assert!(validate_api_prefix("/api/v1").is_ok());
        assert!(validate_api_prefix("").is_ok());
        assert!(validate_api_prefix("api/v1").is_err());
    }
}

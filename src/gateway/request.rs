//! Login request URL

use std::fmt;

const LOGIN_PATH: &str = "/eportal/?c=Portal&a=login&login_method=1";

/// Immutable login request, built once at startup and reused for every attempt
#[derive(Clone, PartialEq, Eq)]
pub struct LoginRequest {
    url: String,
    redacted_url: String,
}

impl LoginRequest {
    /// Build the request for `account_id@operator_tag` against `gateway_host`
    ///
    /// Values are substituted verbatim; the gateway expects them unencoded.
    pub fn new(gateway_host: &str, account_id: &str, operator_tag: &str, password: &str) -> Self {
        let build = |password: &str| {
            format!(
                "http://{}{}&user_account={}%40{}&user_password={}",
                gateway_host, LOGIN_PATH, account_id, operator_tag, password
            )
        };

        Self {
            url: build(password),
            redacted_url: build("******"),
        }
    }

    /// Full login URL including the password
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Login URL with the password masked, for logs
    pub fn redacted_url(&self) -> &str {
        &self.redacted_url
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("url", &self.redacted_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_url_shape() {
        let request = LoginRequest::new("10.2.5.251:801", "08201234", "telecom", "s3cret");
        assert_eq!(
            request.url(),
            "http://10.2.5.251:801/eportal/?c=Portal&a=login&login_method=1\
             &user_account=08201234%40telecom&user_password=s3cret"
        );
    }

    #[test]
    fn test_password_is_masked() {
        let request = LoginRequest::new("gw", "acc", "unicom", "hunter2");
        assert!(!request.redacted_url().contains("hunter2"));
        assert!(request.redacted_url().ends_with("user_password=******"));
        assert!(!format!("{:?}", request).contains("hunter2"));
    }
}

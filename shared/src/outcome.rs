//! Classification of decoded gateway results into loggable outcomes

use crate::codec::DecodedResult;
use crate::error_table::ErrorTable;
use std::fmt;
use thiserror::Error;

/// Fixed message for a successful login
pub const SUCCESS_MESSAGE: &str = "CUMT校园网登录成功(￣▽￣)~*";

/// Prefix of every failure message
pub const FAILURE_PREFIX: &str = "状态：登录失败 ";

const NO_MATCH_ZH: &str = "未知错误（没有找到对应的错误信息）";
const NO_MATCH_EN: &str = "Unknown Error(No known information matched)";

/// Errors that can occur while resolving a result
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Unclassified result flag: {result:?}")]
    UnclassifiedResult { result: String },
}

/// Gateway return codes for failed logins
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnCode {
    /// Wrong account or password; details come from the error table
    BadCredentials,
    AlreadyOnline,
    SystemBusy,
    UnknownError,
    ChallengeFailed,
    ChallengeTimeout,
    AuthenticationFailed,
    AuthenticationTimeout,
    OfflineFailed,
    OfflineTimeout,
    OtherError,
    /// Anything outside 1..=11, including an empty code
    Unrecognized(String),
}

impl ReturnCode {
    /// Parse the gateway's string code
    pub fn from_code(code: &str) -> Self {
        match code {
            "1" => ReturnCode::BadCredentials,
            "2" => ReturnCode::AlreadyOnline,
            "3" => ReturnCode::SystemBusy,
            "4" => ReturnCode::UnknownError,
            "5" => ReturnCode::ChallengeFailed,
            "6" => ReturnCode::ChallengeTimeout,
            "7" => ReturnCode::AuthenticationFailed,
            "8" => ReturnCode::AuthenticationTimeout,
            "9" => ReturnCode::OfflineFailed,
            "10" => ReturnCode::OfflineTimeout,
            "11" => ReturnCode::OtherError,
            other => ReturnCode::Unrecognized(other.to_string()),
        }
    }

    /// Fixed (localized, english) message pair, or `None` when the message
    /// must be looked up in the error table
    pub fn template(&self) -> Option<(&'static str, &'static str)> {
        let pair = match self {
            ReturnCode::BadCredentials => return None,
            ReturnCode::AlreadyOnline => ("您已登录校园网(～￣▽￣)～", "IP already online"),
            ReturnCode::SystemBusy => ("系统繁忙，请稍后再试", "System busy, please try again later"),
            ReturnCode::UnknownError => ("未知错误", "Unknown Error"),
            ReturnCode::ChallengeFailed => ("REQ_CHALLENGE失败", "REQ_CHALLENGE failed"),
            ReturnCode::ChallengeTimeout => ("REQ_CHALLENGE超时", "REQ_CHALLENGE timeout"),
            ReturnCode::AuthenticationFailed => ("认证失败", "Authentication failed"),
            ReturnCode::AuthenticationTimeout => ("认证超时", "Authentication timeout"),
            ReturnCode::OfflineFailed => ("下线失败", "Offline failed"),
            ReturnCode::OfflineTimeout => ("下线超时", "Offline timeout"),
            ReturnCode::OtherError => ("其他错误", "Other error"),
            ReturnCode::Unrecognized(_) => ("未知错误", "Unknown Error"),
        };
        Some(pair)
    }
}

/// Final classification of one login attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub success: bool,
    pub message: String,
}

impl Outcome {
    fn success() -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
        }
    }

    fn failure(localized: &str, english: &str) -> Self {
        Self {
            success: false,
            message: format!("{}信息：{} MSG_EN: {}", FAILURE_PREFIX, localized, english),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Resolve a decoded result against the error table
pub fn resolve(result: &DecodedResult, table: &ErrorTable) -> Result<Outcome, ResolveError> {
    match result.result_flag.as_str() {
        "1" => Ok(Outcome::success()),
        "0" => {
            let code = ReturnCode::from_code(&result.return_code);
            let outcome = match code.template() {
                Some((localized, english)) => Outcome::failure(localized, english),
                None => match table.lookup(&result.message) {
                    Some(entry) => Outcome::failure(&entry.localized_message, &entry.english_message),
                    None => Outcome::failure(NO_MATCH_ZH, NO_MATCH_EN),
                },
            };
            Ok(outcome)
        }
        other => Err(ResolveError::UnclassifiedResult {
            result: other.to_string(),
        }),
    }
}

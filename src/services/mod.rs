pub mod catalog;
pub mod emit;
pub mod enricher;
pub mod resolver;
pub mod stars;
pub mod synopsis;

#[cfg(test)]
pub(crate) mod testing;

use crate::domain::ports::FetchResponse;
use crate::utils::error::{EtlError, Result};

/// 將 HTTP 狀態轉換為錯誤類型：404 → NotFound，其他非 2xx → UnexpectedStatus
pub(crate) fn response_body(url: &str, response: FetchResponse) -> Result<String> {
    if response.is_success() {
        Ok(response.body)
    } else if response.is_not_found() {
        Err(EtlError::NotFound {
            url: url.to_string(),
        })
    } else {
        Err(EtlError::UnexpectedStatus {
            url: url.to_string(),
            status: response.status,
        })
    }
}

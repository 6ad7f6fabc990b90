//! Status code conversion for FFI.

use super::raw::{RtcStatus, RTC_ERR_ALREADY_RELEASED, RTC_ERR_INVALID_HANDLE, RTC_OK};
use crate::error::Error;
use crate::handle::HandleKind;

/// Convert a destroy-path status code to a Result.
pub fn check_status(code: RtcStatus, kind: HandleKind, raw: u64) -> crate::Result<()> {
    match code {
        RTC_OK => Ok(()),
        RTC_ERR_INVALID_HANDLE => Err(Error::InvalidHandle(kind)),
        RTC_ERR_ALREADY_RELEASED => Err(Error::AlreadyReleased { kind, raw }),
        other => Err(Error::Unknown(format!(
            "releasing {} handle {:#x} failed with status {}",
            kind, raw, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(check_status(RTC_OK, HandleKind::VideoDecoder, 1).is_ok());
        assert!(check_status(RTC_ERR_INVALID_HANDLE, HandleKind::VideoDecoder, 0)
            .unwrap_err()
            .is_invalid_handle());
        assert!(check_status(RTC_ERR_ALREADY_RELEASED, HandleKind::NetEqFactory, 7)
            .unwrap_err()
            .is_already_released());
        assert!(matches!(
            check_status(42, HandleKind::NetworkMonitor, 7),
            Err(Error::Unknown(_))
        ));
    }
}

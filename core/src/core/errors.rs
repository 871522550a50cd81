use std::{
    error::Error as StdError,
    fmt::Display,
    io::{Error, ErrorKind},
};

use crate::prelude::{RequestId, RspInfoField};

/// The transport refused to queue a request and returned a non zero code.
///
/// The code is vendor defined and kept as is. Only the commonly documented values pick a more specific [ErrorKind].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRejected {
    pub request_id: RequestId,
    pub code: i32,
}
impl SubmitRejected {
    pub fn kind(&self) -> ErrorKind {
        match self.code {
            -1 => ErrorKind::NotConnected,
            -2 | -3 => ErrorKind::WouldBlock,
            _ => ErrorKind::Other,
        }
    }
    /// Turns a transport return code into a [Result], zero means the request was queued.
    pub fn check(request_id: RequestId, code: i32) -> Result<(), Error> {
        match code {
            0 => Ok(()),
            code => Err(Self { request_id, code }.into()),
        }
    }
    pub fn find(e: &Error) -> Option<&Self> {
        e.get_ref().and_then(|inner| inner.downcast_ref::<Self>())
    }
}
impl Display for SubmitRejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self.code {
            -1 => "network connection failed",
            -2 => "too many requests pending",
            -3 => "request rate exceeded",
            _ => "rejected by transport",
        };
        write!(f, "request_id: {} {}, code: {}", self.request_id, text, self.code)
    }
}
impl StdError for SubmitRejected {}
impl From<SubmitRejected> for Error {
    fn from(e: SubmitRejected) -> Self {
        Error::new(e.kind(), e)
    }
}

/// Business level rejection reported by the front in a response to `request_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct RspError {
    pub request_id: RequestId,
    pub info: RspInfoField,
}
impl RspError {
    pub fn find(e: &Error) -> Option<&Self> {
        e.get_ref().and_then(|inner| inner.downcast_ref::<Self>())
    }
}
impl Display for RspError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "request_id: {} {}", self.request_id, self.info)
    }
}
impl StdError for RspError {}
impl From<RspError> for Error {
    fn from(e: RspError) -> Self {
        Error::new(ErrorKind::Other, e)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::unittest::setup;
    use log::info;

    #[test]
    fn test_submit_rejected() {
        setup::log::configure();
        assert!(SubmitRejected::check(0, 0).is_ok());

        let e = SubmitRejected::check(4, -2).unwrap_err();
        info!("e: {}", e);
        assert_eq!(e.kind(), ErrorKind::WouldBlock);
        assert_eq!(SubmitRejected::find(&e), Some(&SubmitRejected { request_id: 4, code: -2 }));

        assert_eq!(SubmitRejected::check(5, -1).unwrap_err().kind(), ErrorKind::NotConnected);
        let e = SubmitRejected::check(6, -77).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Other);
        assert_eq!(SubmitRejected::find(&e).map(|r| r.code), Some(-77));
        assert!(RspError::find(&e).is_none());
    }

    #[test]
    fn test_rsp_error() {
        setup::log::configure();
        let e: Error = RspError { request_id: 2, info: RspInfoField::rejected(3, "bad password") }.into();
        info!("e: {}", e);
        let found = RspError::find(&e).unwrap();
        assert_eq!(found.request_id, 2);
        assert_eq!(found.info.error_id, 3);
    }
}

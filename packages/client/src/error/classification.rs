use super::helpers::SessionClosed;
use super::types::{Error, Kind};
use crate::engine::TransferCode;

impl Error {
    /// Returns true if the engine handle could not be created.
    #[must_use]
    pub fn is_init(&self) -> bool {
        matches!(self.inner.kind, Kind::Init)
    }

    /// Returns true if the operation was attempted on a closed session.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        if matches!(self.inner.kind, Kind::Closed) {
            return true;
        }
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            if err.is::<SessionClosed>() {
                return true;
            }
            source = err.source();
        }
        false
    }

    /// Returns true if the engine rejected an option.
    #[must_use]
    pub fn is_option(&self) -> bool {
        matches!(self.inner.kind, Kind::Option)
    }

    /// Returns true if an info query failed.
    #[must_use]
    pub fn is_info(&self) -> bool {
        matches!(self.inner.kind, Kind::Info)
    }

    /// Returns true if the error is from a type Builder.
    #[must_use]
    pub fn is_builder(&self) -> bool {
        matches!(self.inner.kind, Kind::Builder)
    }

    /// Returns true if the error is related to the request body
    #[must_use]
    pub fn is_body(&self) -> bool {
        matches!(self.inner.kind, Kind::Body)
    }

    /// Returns true if the error is related to decoding the response's body
    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self.inner.kind, Kind::Decode)
    }

    /// Returns true if the error is from `Response::error_for_status`.
    #[must_use]
    pub fn is_status(&self) -> bool {
        matches!(self.inner.kind, Kind::Status(_))
    }

    /// Returns true if the transfer itself failed.
    #[must_use]
    pub fn is_transfer(&self) -> bool {
        matches!(self.inner.kind, Kind::Transfer(_))
    }

    /// Returns true if the engine reported a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self.inner.kind, Kind::Transfer(code) if code == TransferCode::OPERATION_TIMEDOUT)
    }

    /// Returns true if the engine could not resolve or reach the host.
    #[must_use]
    pub fn is_connect(&self) -> bool {
        matches!(
            self.inner.kind,
            Kind::Transfer(code)
                if code == TransferCode::COULDNT_RESOLVE_HOST
                    || code == TransferCode::COULDNT_CONNECT
        )
    }

    /// Returns the transfer code, if the error came from a failed transfer.
    #[must_use]
    pub fn transfer_code(&self) -> Option<TransferCode> {
        match self.inner.kind {
            Kind::Transfer(code) => Some(code),
            _ => None,
        }
    }

    /// Returns the status code, if the error was generated from a response.
    #[must_use]
    pub fn status(&self) -> Option<http::StatusCode> {
        match self.inner.kind {
            Kind::Status(code) => Some(code),
            _ => None,
        }
    }
}

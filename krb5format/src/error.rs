mod krb5_error;

pub type ErrorCode = i32;

#[derive(Debug, PartialEq, Eq)]
pub struct Error {
    pub code: ErrorCode,
    pub message: &'static str,
}

impl Error {
    /// Returns the library error carried by `err`, if any.
    pub fn find(err: &anyhow::Error) -> Option<&'static Error> {
        err.downcast_ref::<&'static Error>().copied()
    }

    pub fn is(err: &anyhow::Error, expected: &Error) -> bool {
        Self::find(err).is_some_and(|e| e.code == expected.code)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

macro_rules! error {
    ($error:ident, $code:expr, $message:expr) => {
        pub const $error: &'static Error = &Error {
            code: $code,
            message: $message,
        };
    };
}

pub(self) use error;

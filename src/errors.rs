//! Errors reported by the context and the resource handles.
//!
//! Only recoverable conditions show up here. Misuse of a handle (wrong thread,
//! a context that is not current) is a contract breach and panics instead.

use failure::Fail;

/// Errors raised by the native API, as reported by `glGetError`.
///
/// These are never polled implicitly. They stay latched in the driver until
/// `Context::error` or `Context::check` pulls them out.
#[derive(Debug, Fail, Copy, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[fail(display = "[GL] An unacceptable value is specified for an enumerated argument.")]
    InvalidEnum,
    #[fail(display = "[GL] A numeric argument is out of range.")]
    InvalidValue,
    #[fail(display = "[GL] The specified operation is not allowed in the current state.")]
    InvalidOperation,
    #[fail(
        display = "[GL] The command is trying to render to or read from the framebuffer while the \
                   currently bound framebuffer is not framebuffer complete."
    )]
    InvalidFramebufferOperation,
    #[fail(display = "[GL] There is not enough memory left to execute the command.")]
    OutOfMemory,
    #[fail(display = "[GL] Oops, Unknown OpenGL error {:#x}.", _0)]
    Unknown(u32),
}

#[derive(Debug, Fail, Clone, PartialEq)]
pub enum Error {
    #[fail(display = "Failed to create {}: {}.", kind, reason)]
    ResourceCreation { kind: &'static str, reason: String },
    #[fail(display = "Invalid blit geometry: {}.", _0)]
    InvalidBlitGeometry(String),
    #[fail(
        display = "Output buffer holds {} bytes but {} bytes are required.",
        actual, required
    )]
    BufferOverflow { required: usize, actual: usize },
    #[fail(display = "OpenGL implementation doesn't support {}.", _0)]
    Requirement(String),
    #[fail(display = "[GL] String of {} is malformed: {:?}", _0, _1)]
    MalformedString(&'static str, String),
    #[fail(display = "{}", _0)]
    Driver(#[fail(cause)] DriverError),
    #[fail(display = "Invalid context params: {}", _0)]
    Params(String),
}

pub type Result<T> = ::std::result::Result<T, Error>;

impl Error {
    pub(crate) fn creation<T: Into<String>>(kind: &'static str, reason: T) -> Self {
        Error::ResourceCreation {
            kind,
            reason: reason.into(),
        }
    }
}

impl From<DriverError> for Error {
    fn from(err: DriverError) -> Error {
        Error::Driver(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Params(format!("{}", err))
    }
}

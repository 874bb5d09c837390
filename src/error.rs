use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to allocate a list node")]
    AllocationFailure,

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("invalid testcase: {0}")]
    Parse(String),

    #[error("invalid arguments: {0}")]
    Config(String),

    #[error("cpu affinity: {0}")]
    Affinity(String),

    #[error("benchmark thread panicked")]
    ThreadPanicked,
}

// 调度相关的系统调用失败统一归到 Affinity
impl From<nix::errno::Errno> for Error {
    fn from(value: nix::errno::Errno) -> Self {
        Error::Affinity(value.to_string())
    }
}

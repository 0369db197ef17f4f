use std::fmt;
use std::io;
use std::path::PathBuf;

/// Which file a read failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Dictionary,
    Input,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Dictionary => write!(f, "字典文件"),
            FileKind::Input => write!(f, "输入文件"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QieyunError {
    #[error("{kind}不存在: {}", .path.display())]
    FileNotFound { kind: FileKind, path: PathBuf },

    #[error(
        "{kind}编码错误(需要 UTF-8): {} (invalid UTF-8 after byte {valid_up_to})",
        .path.display()
    )]
    EncodingError {
        kind: FileKind,
        path: PathBuf,
        valid_up_to: usize,
    },

    #[error("读取{kind}失败: {}: {source}", .path.display())]
    Io {
        kind: FileKind,
        path: PathBuf,
        source: io::Error,
    },

    #[error("缺少依赖: 无法加载 OpenCC s2t 转换配置 ({0}); 请以默认特性重新构建 ferrous-opencc")]
    MissingDependency(String),

    #[error("不能同时使用 -t/--text 和 -f/--file")]
    InputConflict,

    #[error("需要输入: 使用 -t/--text, -f/--file, 或管道输入")]
    MissingInput,
}

impl QieyunError {
    /// Argument misuse, reported before any processing starts.
    pub fn is_usage(&self) -> bool {
        matches!(self, QieyunError::InputConflict | QieyunError::MissingInput)
    }

    /// Process exit status: 2 for argument misuse and unreadable input files,
    /// 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            QieyunError::FileNotFound { kind, .. }
            | QieyunError::EncodingError { kind, .. }
            | QieyunError::Io { kind, .. } => match kind {
                FileKind::Input => 2,
                FileKind::Dictionary => 1,
            },
            _ if self.is_usage() => 2,
            _ => 1,
        }
    }

    pub(crate) fn from_io(kind: FileKind, path: PathBuf, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            QieyunError::FileNotFound { kind, path }
        } else {
            QieyunError::Io {
                kind,
                path,
                source: err,
            }
        }
    }
}

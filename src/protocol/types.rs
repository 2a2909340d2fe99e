//! Reply Types
//!
//! Every reply is a single `\n`-terminated line:
//!
//! | Reply            | Wire bytes        |
//! |------------------|-------------------|
//! | acknowledgement  | `OK\n`            |
//! | value            | `$<value>\n`      |
//! | missing value    | `$-1\n`           |
//! | integer          | `<int>\n`         |
//! | error            | `-ERR ...\n`      |
//!
//! Errors from `SET` are the exception: they are written as `ERR ...\n`
//! without the leading `-` (see [`CommandError::is_set_error`]).

use crate::protocol::CommandError;
use std::fmt;

/// A reply to one request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `OK`
    Ok,
    /// `$<value>`
    Value(String),
    /// `$-1`
    Nil,
    /// Plain integer, used by TTL
    Integer(i64),
    /// An error line
    Error(CommandError),
}

impl Reply {
    /// Serializes the reply to its exact wire bytes, terminator included.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.serialize_into(&mut buf);
        buf
    }

    /// Serializes the reply into an existing buffer.
    pub fn serialize_into(&self, buf: &mut Vec<u8>) {
        match self {
            Reply::Ok => buf.extend_from_slice(b"OK"),
            Reply::Value(value) => {
                buf.push(b'$');
                buf.extend_from_slice(value.as_bytes());
            }
            Reply::Nil => buf.extend_from_slice(b"$-1"),
            Reply::Integer(n) => buf.extend_from_slice(n.to_string().as_bytes()),
            Reply::Error(err) => {
                if !err.is_set_error() {
                    buf.push(b'-');
                }
                buf.extend_from_slice(err.to_string().as_bytes());
            }
        }
        buf.push(b'\n');
    }

    /// Returns true if this reply is an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }
}

impl From<CommandError> for Reply {
    fn from(err: CommandError) -> Self {
        Reply::Error(err)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok => write!(f, "OK"),
            Reply::Value(v) => write!(f, "\"{}\"", v),
            Reply::Nil => write!(f, "(nil)"),
            Reply::Integer(n) => write!(f, "(integer) {}", n),
            Reply::Error(e) => write!(f, "(error) {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(reply: Reply) -> String {
        String::from_utf8(reply.serialize()).unwrap()
    }

    #[test]
    fn test_serialize_success_replies() {
        assert_eq!(wire(Reply::Ok), "OK\n");
        assert_eq!(wire(Reply::Value("bar".to_string())), "$bar\n");
        assert_eq!(wire(Reply::Nil), "$-1\n");
        assert_eq!(wire(Reply::Integer(-1)), "-1\n");
        assert_eq!(wire(Reply::Integer(-2)), "-2\n");
        assert_eq!(wire(Reply::Integer(42)), "42\n");
    }

    #[test]
    fn test_serialize_error_prefixes() {
        assert_eq!(
            wire(CommandError::WrongArity("SET").into()),
            "ERR wrong number of arguments for 'SET' command\n"
        );
        assert_eq!(
            wire(CommandError::InvalidExpireTime.into()),
            "ERR invalid expire time\n"
        );
        assert_eq!(
            wire(CommandError::WrongArity("GET").into()),
            "-ERR wrong number of arguments for 'GET' command\n"
        );
        assert_eq!(
            wire(CommandError::WrongArity("DEL").into()),
            "-ERR wrong number of arguments for 'DEL' command\n"
        );
        assert_eq!(
            wire(CommandError::WrongArity("TTL").into()),
            "-ERR wrong number of arguments for 'TTL' command\n"
        );
        assert_eq!(
            wire(CommandError::UnknownCommand.into()),
            "-ERR unknown command\n"
        );
    }

    #[test]
    fn test_serialize_into_appends() {
        let mut buf = Vec::new();
        Reply::Ok.serialize_into(&mut buf);
        Reply::Nil.serialize_into(&mut buf);
        assert_eq!(buf, b"OK\n$-1\n");
    }

    #[test]
    fn test_display() {
        assert_eq!(Reply::Nil.to_string(), "(nil)");
        assert_eq!(Reply::Integer(5).to_string(), "(integer) 5");
        assert!(Reply::from(CommandError::UnknownCommand).is_error());
    }
}

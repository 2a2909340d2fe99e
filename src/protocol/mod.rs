//! Line Protocol
//!
//! Plain text over a stream connection: one command per line, whitespace
//! separated fields, one reply line per request.
//!
//! ## Modules
//!
//! - `parser`: line framing and command validation
//! - `types`: the `Reply` enum and its wire serialization
//!
//! ## Example
//!
//! ```
//! use medis::protocol::{next_line, parse_line, Command, Reply};
//!
//! let data = b"GET name\r\n";
//! let (line, consumed) = next_line(data).unwrap();
//! assert_eq!(consumed, data.len());
//!
//! let cmd = parse_line(std::str::from_utf8(line).unwrap()).unwrap();
//! assert_eq!(cmd, Command::Get { key: "name".to_string() });
//!
//! assert_eq!(Reply::Nil.serialize(), b"$-1\n");
//! ```

pub mod parser;
pub mod types;

pub use parser::{next_line, parse_line, Command, CommandError, MAX_EXPIRE_SECS};
pub use types::Reply;

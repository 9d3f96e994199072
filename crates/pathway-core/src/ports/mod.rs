//! Ports - 外部との境界
//!
//! core が外部に求めるのは患者レコードの読み込みだけです。
//! 可視化や保存は外側の責務で、ここには置きません。

pub mod source;

pub use self::source::{InMemorySource, PatientSource, SourceError, decode_records};

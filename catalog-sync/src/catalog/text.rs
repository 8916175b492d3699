//! Payload text as stored in the sheet and posted to the APIs
//!
//! Members are separated by `", "` and keys from values by `": "`. Non-ASCII
//! text is written as-is.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;

/// JSON formatter with a space after `,` and `:`
#[derive(Debug, Clone, Copy, Default)]
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Serialize `value` into payload text
pub fn to_payload_text<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    value
        .serialize(&mut serializer)
        .context("Failed to serialize payload")?;
    String::from_utf8(buf).context("Payload text is not valid UTF-8")
}

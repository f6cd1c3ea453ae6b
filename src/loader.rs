/// Program loader: turns LS-8 text into bytes in memory.
///
/// Each line is blank, a comment (`#` to end of line), or eight `0`/`1`
/// characters giving one byte. Bytes land sequentially from address 0.
use crate::error::{LoadError, Ls8Error};
use crate::memory::Memory;
use std::io;

/// parse program text into the bytes it encodes
pub fn parse_program(text: &str) -> Result<Vec<u8>, LoadError> {
    let mut bytes = Vec::new();
    for (n, raw) in text.lines().enumerate() {
        let code = match raw.find('#') {
            Some(i) => &raw[..i],
            None => raw,
        };
        let code: String = code.chars().filter(|c| !c.is_whitespace()).collect();
        if code.is_empty() {
            continue;
        }
        if code.len() != 8 || !code.bytes().all(|b| b == b'0' || b == b'1') {
            return Err(LoadError::Malformed {
                line: n + 1,
                text: raw.to_string(),
            });
        }
        // eight binary digits always fit
        let value = u8::from_str_radix(&code, 2).map_err(|_| LoadError::Malformed {
            line: n + 1,
            text: raw.to_string(),
        })?;
        bytes.push(value);
    }
    Ok(bytes)
}

/// parse `text` and write it into `memory` from address 0; returns the byte count
pub fn load_program(memory: &mut impl Memory, text: &str) -> Result<usize, Ls8Error> {
    let bytes = parse_program(text)?;
    if bytes.len() > memory.capacity() {
        return Err(LoadError::TooLarge {
            len: bytes.len(),
            capacity: memory.capacity(),
        }
        .into());
    }
    memory.load(&bytes, 0)?;
    Ok(bytes.len())
}

/// read all program text from `reader` (a file or STDIN)
pub fn read_source(reader: &mut impl io::Read) -> Result<String, io::Error> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(text)
}

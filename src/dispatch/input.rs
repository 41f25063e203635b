//! Line reading for the interactive loops

use std::io::{self, BufRead};

/// Read one line, without its trailing `\n` or `\r\n`.
///
/// Returns `Ok(None)` at end of input. A line that is not valid UTF-8 is
/// consumed and reported as `ErrorKind::InvalidData`, so the caller can skip
/// it and keep reading.
pub fn read_line(input: &mut impl BufRead, buf: &mut Vec<u8>) -> io::Result<Option<String>> {
	buf.clear();
	if input.read_until(b'\n', buf)? == 0 {
		return Ok(None);
	}

	if buf.last() == Some(&b'\n') {
		buf.pop();
		if buf.last() == Some(&b'\r') {
			buf.pop();
		}
	}

	match std::str::from_utf8(buf) {
		Ok(line) => Ok(Some(line.to_string())),
		Err(e) => Err(io::Error::new(io::ErrorKind::InvalidData, e)),
	}
}

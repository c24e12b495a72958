use std::io::{BufRead, Write};
use std::num::{IntErrorKind, ParseIntError};

use anyhow::Result;
use thiserror::Error;

use super::list::PortDescriptor;

pub const PROMPT: &str = "Select the COM port number: ";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectError {
    #[error("invalid port number: {0:?}")]
    Parse(String),

    #[error("port number {index} out of range ({count} port(s) available)")]
    OutOfRange { index: String, count: usize },
}

/// Maps raw operator input to a position in a list of `count` ports.
pub fn parse_index(input: &str, count: usize) -> Result<usize, SelectError> {
    let s = input.trim();
    let out_of_range = || SelectError::OutOfRange {
        index: s.to_string(),
        count,
    };
    let index: i64 = s.parse().map_err(|e: ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => out_of_range(),
        _ => SelectError::Parse(s.to_string()),
    })?;
    usize::try_from(index)
        .ok()
        .filter(|&i| i < count)
        .ok_or_else(out_of_range)
}

/// Prompts once and returns the chosen port. There is no re-prompt.
pub fn select_port<'a, R, W>(
    input: &mut R,
    output: &mut W,
    ports: &'a [PortDescriptor],
) -> Result<&'a PortDescriptor>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{}", PROMPT)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let index = parse_index(&line, ports.len())?;
    debug!("selected index {} -> {}", index, ports[index].device);
    Ok(&ports[index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn ports(n: usize) -> Vec<PortDescriptor> {
        (0..n)
            .map(|i| PortDescriptor::new(format!("COM{}", i + 1), "USB Serial Device"))
            .collect()
    }

    #[test]
    fn test_parse_index() {
        assert_eq!(parse_index("0\n", 3), Ok(0));
        assert_eq!(parse_index("  2 \r\n", 3), Ok(2));
        assert_eq!(
            parse_index("3", 3),
            Err(SelectError::OutOfRange {
                index: "3".into(),
                count: 3
            })
        );
        assert_eq!(
            parse_index("-1", 3),
            Err(SelectError::OutOfRange {
                index: "-1".into(),
                count: 3
            })
        );
        assert_eq!(
            parse_index("99999999999999999999", 3),
            Err(SelectError::OutOfRange {
                index: "99999999999999999999".into(),
                count: 3
            })
        );
        assert_eq!(
            parse_index("-99999999999999999999", 3),
            Err(SelectError::OutOfRange {
                index: "-99999999999999999999".into(),
                count: 3
            })
        );
        assert_eq!(parse_index("abc", 3), Err(SelectError::Parse("abc".into())));
        assert_eq!(parse_index("", 3), Err(SelectError::Parse(String::new())));
    }

    #[test]
    fn test_no_ports_rejects_everything() {
        for input in ["0", "1", "-1", "x"] {
            assert!(parse_index(input, 0).is_err());
        }
    }

    #[test]
    fn test_select_first_port() {
        let ports = ports(3);
        let mut input = Cursor::new("0\n");
        let mut output = Vec::new();

        let port = select_port(&mut input, &mut output, &ports).unwrap();
        assert_eq!(port.device, "COM1");
        assert_eq!(String::from_utf8(output).unwrap(), PROMPT);
    }

    #[test]
    fn test_select_eof_is_parse_error() {
        let ports = ports(1);
        let mut input = Cursor::new("");
        let err = select_port(&mut input, &mut Vec::new(), &ports).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SelectError>(),
            Some(SelectError::Parse(_))
        ));
    }
}

use std::io::{self, Write};

const HEX_LINE: usize = 16;

/// How a read range is written to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// The bytes as they are
    Raw,
    /// Offset, hex and printable columns, 16 bytes per line
    Hex,
}

impl Format {
    /// Writes `data`, which starts at `offset` in the source.
    pub fn write<W: Write>(
        &self,
        out: &mut W,
        offset: u64,
        data: &[u8],
    ) -> io::Result<()> {
        match self {
            Format::Raw => out.write_all(data),
            Format::Hex => write_hex(out, offset, data),
        }
    }
}

fn write_hex<W: Write>(
    out: &mut W,
    offset: u64,
    data: &[u8],
) -> io::Result<()> {
    for (n, line) in data.chunks(HEX_LINE).enumerate() {
        let hex = line
            .iter()
            .map(|byte| format!("{:02x}", byte))
            .collect::<Vec<_>>()
            .join(" ");
        let text: String = line
            .iter()
            .map(|&byte| {
                if byte.is_ascii_graphic() || byte == b' ' {
                    byte as char
                } else {
                    '.'
                }
            })
            .collect();

        writeln!(
            out,
            "{:08x}  {:<width$}  |{}|",
            offset + (n * HEX_LINE) as u64,
            hex,
            text,
            width = HEX_LINE * 3 - 1
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(format: Format, offset: u64, data: &[u8]) -> String {
        let mut out = Vec::new();
        format.write(&mut out, offset, data).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_raw_format() {
        assert_eq!(render(Format::Raw, 7, b"CDEFG"), "CDEFG");
    }

    #[test]
    fn test_hex_format() {
        let output = render(Format::Hex, 0x20, b"Hello, chunks!\n\x00\x01");
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "00000020  48 65 6c 6c 6f 2c 20 63 68 75 6e 6b 73 21 0a 00  \
             |Hello, chunks!..|"
        );
        assert!(lines[1].starts_with("00000030  01 "));
        assert!(lines[1].ends_with("  |.|"));
    }

    #[test]
    fn test_hex_format_empty() {
        assert_eq!(render(Format::Hex, 0, b""), "");
    }
}

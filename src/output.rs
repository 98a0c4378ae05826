//! FASTA-style writer for back-translated records.
//!
//! Each record is written as a `>identifier` line followed by the gapped
//! nucleotides, on a single line unless a line width is given.

use std::io::{self, Write};

use crate::model::Sequence;

/// Writes records in order. `line_width` wraps sequence lines when set (0 disables wrapping).
pub fn write_records<'a, W, I>(writer: &mut W, records: I, line_width: Option<usize>) -> io::Result<()>
where
    W: Write + ?Sized,
    I: IntoIterator<Item = &'a Sequence>,
{
    for seq in records {
        writeln!(writer, ">{}", seq.id)?;
        match line_width.filter(|&w| w > 0) {
            Some(width) => {
                for chunk in seq.as_bytes().chunks(width) {
                    writer.write_all(chunk)?;
                    writer.write_all(b"\n")?;
                }
            }
            None => {
                writer.write_all(seq.as_bytes())?;
                writer.write_all(b"\n")?;
            }
        }
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(records: &[Sequence], line_width: Option<usize>) -> String {
        let mut buffer = Vec::new();
        write_records(&mut buffer, records, line_width).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_single_line_records() {
        let records = vec![
            Sequence::new("a", "ATG---AAA"),
            Sequence::new("b", "ATGCCCAAA"),
        ];
        assert_eq!(render(&records, None), ">a\nATG---AAA\n>b\nATGCCCAAA\n");
    }

    #[test]
    fn test_wrapped_records() {
        let records = vec![Sequence::new("a", "ATG---AAA")];
        assert_eq!(render(&records, Some(6)), ">a\nATG---\nAAA\n");
        assert_eq!(render(&records, Some(0)), ">a\nATG---AAA\n");
    }

    #[test]
    fn test_empty_sequence() {
        let records = vec![Sequence::new("a", "")];
        assert_eq!(render(&records, Some(60)), ">a\n");
    }
}

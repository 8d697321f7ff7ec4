//! DIMACS CNF reading, gzip-transparent, and result/model writing (spec
//! §6). Grounded on the teacher's `sat::dimacs` char-stream parser,
//! adapted from the teacher's `Subst`-mediated "parse directly into a
//! live solver" design to this spec's Reader/Engine split: the reader
//! here only yields `(n, clauses)`, leaving literal encoding and
//! variable creation to the engine (spec §6's "Reader -> Engine"
//! collaborator contract).

use std::{fs, io, path};
use flate2::read::GzDecoder;

/// The parsed problem: declared variable count and the clause list, each
/// clause a sequence of nonzero signed DIMACS integers.
pub struct Cnf {
    pub num_vars: u32,
    pub num_clauses_declared: usize,
    pub clauses: Vec<Vec<i32>>,
}

pub fn parse_file<P: AsRef<path::Path>>(path: &P) -> io::Result<Cnf> {
    let open = || fs::File::open(path).map(io::BufReader::new);
    match GzDecoder::new(open()?) {
        Ok(mut gz) => parse(&mut gz),
        Err(_) => parse(&mut open()?),
    }
}

pub fn parse<R: io::Read>(stream: &mut R) -> io::Result<Cnf> {
    let mut buf = String::new();
    stream.read_to_string(&mut buf)?;
    let mut p = DimacsParser::new(&buf);
    p.parse_all()
}

/// Writes a satisfying assignment, one `var value` pair per line in
/// ascending variable order (spec §6: "a stable serialization format").
pub fn write_model<W: io::Write>(out: &mut W, model: &[bool]) -> io::Result<()> {
    for (i, &value) in model.iter().enumerate() {
        writeln!(out, "{} {}", i + 1, value)?;
    }
    Ok(())
}

struct DimacsParser<'a> {
    chars: std::str::Chars<'a>,
    cur: Option<char>,
}

impl<'a> DimacsParser<'a> {
    fn new(text: &'a str) -> Self {
        let mut chars = text.chars();
        let cur = chars.next();
        DimacsParser { chars, cur }
    }

    fn advance(&mut self) {
        self.cur = self.chars.next();
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.cur, Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    fn skip_line(&mut self) {
        while !matches!(self.cur, None | Some('\n')) {
            self.advance();
        }
        self.advance();
    }

    fn consume(&mut self, target: &str) -> io::Result<()> {
        for tc in target.chars() {
            match self.cur {
                Some(c) if c == tc => self.advance(),
                _ => return Err(parse_error(format!("expected '{}'", target))),
            }
        }
        Ok(())
    }

    fn next_int(&mut self) -> io::Result<i32> {
        self.skip_whitespace();
        let sign = match self.cur {
            Some('+') => {
                self.advance();
                1
            }
            Some('-') => {
                self.advance();
                -1
            }
            _ => 1,
        };

        let mut len = 0usize;
        let mut value: i64 = 0;
        loop {
            match self.cur.and_then(|c| c.to_digit(10)) {
                Some(d) => {
                    value = value * 10 + d as i64;
                    len += 1;
                    self.advance();
                }
                None if len > 0 => return Ok(sign * value as i32),
                None => return Err(parse_error("integer expected".to_string())),
            }
        }
    }

    fn next_uint(&mut self) -> io::Result<usize> {
        let v = self.next_int()?;
        if v < 0 {
            return Err(parse_error("expected a non-negative integer".to_string()));
        }
        Ok(v as usize)
    }

    fn parse_all(&mut self) -> io::Result<Cnf> {
        let (num_vars, num_clauses_declared) = self.parse_header()?;

        let mut clauses = Vec::with_capacity(num_clauses_declared);
        loop {
            self.skip_whitespace();
            match self.cur {
                Some('c') => self.skip_line(),
                None => break,
                _ => clauses.push(self.parse_clause(num_vars)?),
            }
        }

        Ok(Cnf { num_vars, num_clauses_declared, clauses })
    }

    fn parse_header(&mut self) -> io::Result<(u32, usize)> {
        loop {
            self.skip_whitespace();
            match self.cur {
                Some('c') => self.skip_line(),
                _ => {
                    self.consume("p cnf")?;
                    let n = self.next_uint()? as u32;
                    let m = self.next_uint()?;
                    return Ok((n, m));
                }
            }
        }
    }

    fn parse_clause(&mut self, num_vars: u32) -> io::Result<Vec<i32>> {
        let mut lits = Vec::new();
        loop {
            let lit = self.next_int()?;
            if lit == 0 {
                return Ok(lits);
            }
            if lit.unsigned_abs() > num_vars {
                return Err(parse_error(format!(
                    "literal {} exceeds declared variable count {}",
                    lit, num_vars
                )));
            }
            lits.push(lit);
        }
    }
}

fn parse_error(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, format!("PARSE ERROR! {}", msg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_header_and_clauses() {
        let text = "c a comment\np cnf 3 2\n1 -2 0\n2 3 0\n";
        let cnf = parse(&mut Cursor::new(text)).unwrap();
        assert_eq!(cnf.num_vars, 3);
        assert_eq!(cnf.num_clauses_declared, 2);
        assert_eq!(cnf.clauses, vec![vec![1, -2], vec![2, 3]]);
    }

    #[test]
    fn rejects_a_literal_beyond_the_declared_variable_count() {
        let text = "p cnf 2 1\n3 0\n";
        assert!(parse(&mut Cursor::new(text)).is_err());
    }

    #[test]
    fn write_model_emits_one_line_per_variable() {
        let mut out = Vec::new();
        write_model(&mut out, &[true, false, true]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1 true\n2 false\n3 true\n");
    }
}

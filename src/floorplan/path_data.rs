//! SVG path-data scanning.
//!
//! Section rings come from move/line commands only: M/m, L/l, H/h, V/v and
//! the closing Z/z. Parameters of curve commands are consumed and ignored;
//! a shape that scans to fewer than 3 distinct vertices is skipped by the
//! parser, never an error.

use crate::core::PlanPoint;

/// One lexed token of a `d` attribute.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Token {
    Command(char),
    Number(f64),
}

/// Scanned result of a `d` attribute: vertices plus whether the path was
/// explicitly closed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathScan {
    pub vertices: Vec<PlanPoint>,
    pub closed: bool,
}

/// Scan a path `d` attribute for move/line vertices.
///
/// When the path is explicitly closed and the final vertex duplicates the
/// first, the duplicate is dropped so the ring stays open (closure is
/// re-applied by [`crate::core::Polygon`]).
pub fn scan_path(d: &str) -> PathScan {
    let tokens = lex(d);
    let mut scan = PathScan::default();
    let mut cursor = PlanPoint::ZERO;
    let mut command = ' ';
    let mut pending: Vec<f64> = Vec::new();

    for token in tokens {
        match token {
            Token::Command(c) => {
                command = c;
                pending.clear();
                if c == 'Z' || c == 'z' {
                    scan.closed = true;
                }
            }
            Token::Number(n) => {
                pending.push(n);
                match command {
                    'M' | 'L' => {
                        if pending.len() == 2 {
                            cursor = PlanPoint::new(pending[0], pending[1]);
                            scan.vertices.push(cursor);
                            pending.clear();
                            // implicit lineto after a moveto pair
                            if command == 'M' {
                                command = 'L';
                            }
                        }
                    }
                    'm' | 'l' => {
                        if pending.len() == 2 {
                            cursor = PlanPoint::new(cursor.x + pending[0], cursor.y + pending[1]);
                            scan.vertices.push(cursor);
                            pending.clear();
                            if command == 'm' {
                                command = 'l';
                            }
                        }
                    }
                    'H' => {
                        cursor = PlanPoint::new(pending[0], cursor.y);
                        scan.vertices.push(cursor);
                        pending.clear();
                    }
                    'h' => {
                        cursor = PlanPoint::new(cursor.x + pending[0], cursor.y);
                        scan.vertices.push(cursor);
                        pending.clear();
                    }
                    'V' => {
                        cursor = PlanPoint::new(cursor.x, pending[0]);
                        scan.vertices.push(cursor);
                        pending.clear();
                    }
                    'v' => {
                        cursor = PlanPoint::new(cursor.x, cursor.y + pending[0]);
                        scan.vertices.push(cursor);
                        pending.clear();
                    }
                    // curve parameters are not sampled
                    _ => pending.clear(),
                }
            }
        }
    }

    if scan.closed && scan.vertices.len() > 1 && scan.vertices.first() == scan.vertices.last() {
        scan.vertices.pop();
    }
    scan
}

fn lex(d: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut number = String::new();
    for c in d.chars() {
        if c.is_ascii_alphabetic() && c != 'e' && c != 'E' {
            flush_number(&mut number, &mut tokens);
            tokens.push(Token::Command(c));
        } else if c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' {
            number.push(c);
        } else if c == '-' || c == '+' {
            // sign starts a new number unless it follows an exponent marker
            if number.ends_with('e') || number.ends_with('E') {
                number.push(c);
            } else {
                flush_number(&mut number, &mut tokens);
                number.push(c);
            }
        } else {
            flush_number(&mut number, &mut tokens);
        }
    }
    flush_number(&mut number, &mut tokens);
    tokens
}

fn flush_number(buf: &mut String, tokens: &mut Vec<Token>) {
    if buf.is_empty() {
        return;
    }
    if let Ok(n) = buf.parse::<f64>() {
        tokens.push(Token::Number(n));
    }
    buf.clear();
}

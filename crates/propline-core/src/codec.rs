//! Line codec for properties files
//!
//! Reading decodes bytes as ISO-8859-1 and then resolves backslash escape
//! sequences once per line. Writing escapes every record so it stays on one
//! physical line and within 7-bit ASCII; the escaped text is then written as
//! UTF-8.

/// Decode bytes with the ISO-8859-1 (Latin-1) read charset.
///
/// Every byte maps to the code point of the same value, so decoding never
/// fails.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Decode a whole file body into unescaped logical lines.
///
/// Lines end at `\n`; a trailing `\r` is stripped. A final newline does not
/// produce an extra empty line.
pub fn decode_lines(bytes: &[u8]) -> Vec<String> {
    let mut lines: Vec<String> = bytes
        .split(|&b| b == b'\n')
        .map(decode_line)
        .collect();
    if bytes.is_empty() || bytes.ends_with(b"\n") {
        lines.pop();
    }
    lines
}

/// Decode one raw line without its `\n`: strip `\r`, read as Latin-1, unescape
pub fn decode_line(raw: &[u8]) -> String {
    unescape(&decode_latin1(strip_cr(raw)))
}

/// Strip one trailing carriage return from a raw line.
pub fn strip_cr(raw: &[u8]) -> &[u8] {
    raw.strip_suffix(b"\r").unwrap_or(raw)
}

/// Resolve backslash escapes in one line.
///
/// Handles `\\ \" \' \b \t \n \f \r`, octal escapes up to `\377`, and
/// `\uXXXX` (any number of `u`, optional `+`). Surrogate pairs written as two
/// `\u` escapes are recombined. A backslash before any other character is
/// dropped. An incomplete `\u` escape is kept as literal text.
pub fn unescape(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_string();
    }

    let chars: Vec<char> = raw.chars().collect();
    let mut units: Vec<u16> = Vec::with_capacity(chars.len());
    let mut buf = [0u16; 2];
    let mut push = |units: &mut Vec<u16>, c: char| {
        units.extend_from_slice(c.encode_utf16(&mut buf));
    };

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c != '\\' || i + 1 == chars.len() {
            // lone trailing backslash is dropped, like any unknown escape
            if c != '\\' {
                push(&mut units, c);
            }
            i += 1;
            continue;
        }

        let next = chars[i + 1];
        match next {
            'u' => match parse_unicode(&chars, i + 1) {
                Some((unit, consumed)) => {
                    units.push(unit);
                    i += 1 + consumed;
                }
                None => {
                    push(&mut units, '\\');
                    i += 1;
                }
            },
            '0'..='7' => {
                let (value, consumed) = parse_octal(&chars, i + 1);
                units.push(value);
                i += 1 + consumed;
            }
            'b' => {
                units.push(0x08);
                i += 2;
            }
            't' => {
                push(&mut units, '\t');
                i += 2;
            }
            'n' => {
                push(&mut units, '\n');
                i += 2;
            }
            'f' => {
                units.push(0x0c);
                i += 2;
            }
            'r' => {
                push(&mut units, '\r');
                i += 2;
            }
            other => {
                // covers \\ \" \' and drops the backslash of unknown escapes
                push(&mut units, other);
                i += 2;
            }
        }
    }

    String::from_utf16_lossy(&units)
}

/// Parse `u+[+]XXXX` starting at `start` (which points at the first `u`).
/// Returns the code unit and the number of chars consumed.
fn parse_unicode(chars: &[char], start: usize) -> Option<(u16, usize)> {
    let mut j = start;
    while j < chars.len() && chars[j] == 'u' {
        j += 1;
    }
    if j < chars.len() && chars[j] == '+' {
        j += 1;
    }
    let hex: String = chars.get(j..j + 4)?.iter().collect();
    let unit = u16::from_str_radix(&hex, 16).ok()?;
    Some((unit, j + 4 - start))
}

/// Parse up to three octal digits (at most `\377`) starting at `start`.
fn parse_octal(chars: &[char], start: usize) -> (u16, usize) {
    let max_len = if chars[start] <= '3' { 3 } else { 2 };
    let digits: String = chars[start..]
        .iter()
        .take(max_len)
        .take_while(|c| ('0'..='7').contains(*c))
        .collect();
    // digits are all octal and at most 3 long, so this cannot overflow u16
    let value = u16::from_str_radix(&digits, 8).unwrap_or(0);
    (value, digits.len())
}

/// Escape one record for writing.
///
/// Code units at or above 128 become `\uXXXX` (uppercase hex), `\n` becomes
/// `\u000a` and `\r` becomes `\u000d`; everything else is unchanged.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for unit in text.encode_utf16() {
        match unit {
            0x0a => out.push_str("\\u000a"),
            0x0d => out.push_str("\\u000d"),
            u if u >= 128 => out.push_str(&format!("\\u{:04X}", u)),
            // below 128 every unit is an ASCII char
            u => out.push(char::from(u as u8)),
        }
    }
    out
}

/// Frequency of a key number. Key 9 is A0 (27.5 Hz), key 57 is A4 (440 Hz).
#[inline]
pub fn key_freq(key: i32) -> f64 {
    27.5 * 2.0_f64.powf((key as f64 - 9.0) / 12.0)
}

/// Letter offset within an octave for a note name such as `C`, `F#` or `Bb`.
fn letter(name: &str) -> Option<(i32, &str)> {
    let mut chars = name.chars();
    let base = match chars.next()?.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };

    let rest = chars.as_str();
    match rest.chars().next() {
        Some('#') => Some((base + 1, &rest[1..])),
        Some('b') => Some((base - 1, &rest[1..])),
        _ => Some((base, rest)),
    }
}

/// Parse a note name with octave (`C4`, `F#2`, `Bb-1`) into a key number.
pub fn parse_key(name: &str) -> Option<i32> {
    let (letter, rest) = letter(name)?;
    let octave: i32 = rest.parse().ok()?;
    Some(octave * 12 + letter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_is_440() {
        let a4 = parse_key("A4");
        assert_eq!(a4, Some(57));
        assert!((key_freq(57) - 440.0).abs() < 1e-9);
    }

    #[test]
    fn accidentals_shift_by_semitone() {
        assert_eq!(parse_key("C#4"), Some(49));
        assert_eq!(parse_key("Db4"), Some(49));
        assert_eq!(parse_key("Cb4"), Some(47));
        assert_eq!(parse_key("B#3"), Some(48));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_key("H2"), None);
        assert_eq!(parse_key("C"), None);
        assert_eq!(parse_key(""), None);
    }

    #[test]
    fn octave_doubles_frequency() {
        let c3 = key_freq(36);
        let c4 = key_freq(48);
        assert!((c4 / c3 - 2.0).abs() < 1e-12);
    }
}

//! National identification code checksum

/// Check a 10-digit national code with the weighted mod-11 checksum.
///
/// The first nine digits are weighted 10 down to 2; with `r` the weighted sum
/// modulo 11, the tenth digit must equal `r` when `r < 2` and `11 - r`
/// otherwise.
///
/// ```
/// use rulebook_validation::is_valid_national_code;
///
/// assert!(is_valid_national_code("0499370899"));
/// assert!(!is_valid_national_code("0499370898"));
/// ```
pub fn is_valid_national_code(input: &str) -> bool {
    let bytes = input.as_bytes();
    if bytes.len() != 10 || !bytes.iter().all(u8::is_ascii_digit) {
        return false;
    }

    let digit = |i: usize| u32::from(bytes[i] - b'0');
    let check = digit(9);
    let sum = (0..9).map(|i| digit(i) * (10 - i as u32)).sum::<u32>() % 11;

    (sum < 2 && check == sum) || (sum >= 2 && check + sum == 11)
}

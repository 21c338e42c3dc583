use chrono::{Datelike, NaiveDate};

const NRIC_WEIGHTS: [u32; 7] = [2, 7, 6, 5, 4, 3, 2];
const ST_CHECKSUM: &[u8] = b"JZIHGFEDCBA";
const FG_CHECKSUM: &[u8] = b"XWUTRQPNMLK";
const M_CHECKSUM: &[u8] = b"XWUTRQPNJLK";

/// NRIC/FIN checksum validation for the S/T/F/G/M series.
pub(crate) fn is_nric_valid(value: &str) -> bool {
    let value = value.trim().to_uppercase();
    let bytes = value.as_bytes();
    if bytes.len() != 9 {
        return false;
    }
    let prefix = bytes[0];
    if !matches!(prefix, b'S' | b'T' | b'F' | b'G' | b'M') {
        return false;
    }
    if !bytes[1..8].iter().all(u8::is_ascii_digit) {
        return false;
    }
    let check = bytes[8];
    if !check.is_ascii_uppercase() {
        return false;
    }

    let mut sum: u32 = bytes[1..8]
        .iter()
        .zip(NRIC_WEIGHTS)
        .map(|(digit, weight)| u32::from(digit - b'0') * weight)
        .sum();
    sum += match prefix {
        b'T' | b'G' => 4,
        b'M' => 3,
        _ => 0,
    };
    let table = match prefix {
        b'S' | b'T' => ST_CHECKSUM,
        b'F' | b'G' => FG_CHECKSUM,
        _ => M_CHECKSUM,
    };
    table[(sum % 11) as usize] == check
}

/// UEN validation across the three issued formats: business (ROB, 9 chars),
/// local company (ROC, 10 chars), and other entity types (10 chars).
pub(crate) fn is_uen_valid(value: &str, today: NaiveDate) -> bool {
    let value = value.trim().to_uppercase();
    match value.len() {
        9 => valid_business_uen(value.as_bytes()),
        10 => {
            if value.as_bytes()[0].is_ascii_digit() {
                valid_local_company_uen(value.as_bytes(), today)
            } else {
                valid_other_entity_uen(value.as_bytes(), today)
            }
        }
        _ => false,
    }
}

fn valid_business_uen(bytes: &[u8]) -> bool {
    if !bytes[..8].iter().all(u8::is_ascii_digit) {
        return false;
    }
    const WEIGHTS: [u32; 8] = [10, 4, 9, 3, 8, 2, 7, 1];
    const ALPHA: &[u8] = b"XMKECAWLJDB";
    let sum: u32 = bytes[..8]
        .iter()
        .zip(WEIGHTS)
        .map(|(digit, weight)| u32::from(digit - b'0') * weight)
        .sum();
    ALPHA[(sum % 11) as usize] == bytes[8]
}

fn valid_local_company_uen(bytes: &[u8], today: NaiveDate) -> bool {
    if !bytes[..9].iter().all(u8::is_ascii_digit) {
        return false;
    }
    let year: i32 = std::str::from_utf8(&bytes[..4])
        .ok()
        .and_then(|year| year.parse().ok())
        .unwrap_or(i32::MAX);
    if year > today.year() {
        return false;
    }
    const WEIGHTS: [u32; 9] = [10, 8, 6, 4, 9, 7, 5, 3, 1];
    const ALPHA: &[u8] = b"ZKCMDNERGWH";
    let sum: u32 = bytes[..9]
        .iter()
        .zip(WEIGHTS)
        .map(|(digit, weight)| u32::from(digit - b'0') * weight)
        .sum();
    ALPHA[(sum % 11) as usize] == bytes[9]
}

/// Entity-type indicators issued by the various agencies, per the UEN
/// registry specification.
const ENTITY_TYPE_INDICATORS: &[&str] = &[
    "BN", "LP", "LL", "LC", "FC", "PF", "VC", "RF", "MQ", "MM", "NB", "CC", "CS", "MB", "FM",
    "GS", "EC", "DP", "CP", "NR", "CM", "CD", "MD", "HS", "VH", "CH", "MH", "CL", "XL", "CX",
    "HC", "RP", "TU", "TC", "FB", "FN", "FS", "PA", "PB", "SS", "MC", "SM", "GA", "GB", "UF",
];

fn valid_other_entity_uen(bytes: &[u8], today: NaiveDate) -> bool {
    const WEIGHTS: [u32; 9] = [4, 3, 5, 3, 10, 2, 2, 5, 7];
    const ALPHA: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWX0123456789";

    let prefix = bytes[0];
    if !matches!(prefix, b'R' | b'S' | b'T') {
        return false;
    }
    if !bytes[1..3].iter().all(u8::is_ascii_digit) {
        return false;
    }
    let issue_year = u32::from(bytes[1] - b'0') * 10 + u32::from(bytes[2] - b'0');
    if prefix == b'T' && issue_year > (today.year() as u32) % 100 {
        return false;
    }
    let indicator = match std::str::from_utf8(&bytes[3..5]) {
        Ok(indicator) => indicator,
        Err(_) => return false,
    };
    if !ENTITY_TYPE_INDICATORS.contains(&indicator) {
        return false;
    }
    if !bytes[5..9].iter().all(u8::is_ascii_digit) {
        return false;
    }

    let mut sum: u32 = 0;
    for (byte, weight) in bytes[..9].iter().zip(WEIGHTS) {
        let Some(index) = ALPHA.iter().position(|c| c == byte) else {
            return false;
        };
        sum += index as u32 * weight;
    }
    // (sum - 5) mod 11, kept non-negative.
    ALPHA[((sum + 6) % 11) as usize] == bytes[9]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid date")
    }

    #[test]
    fn accepts_valid_nrics_across_series() {
        for nric in ["S9912345A", "T1394524H", "F0477844T", "G9592927W", "M5043078W"] {
            assert!(is_nric_valid(nric), "{nric} should be valid");
        }
    }

    #[test]
    fn rejects_bad_nric_checksums() {
        for nric in ["S9912345B", "T1394524I", "F0477844U", "G9592927X"] {
            assert!(!is_nric_valid(nric), "{nric} should be invalid");
        }
    }

    #[test]
    fn rejects_malformed_nrics() {
        assert!(!is_nric_valid("A9912345A"));
        assert!(!is_nric_valid("S991234A"));
        assert!(!is_nric_valid("S99123456"));
    }

    #[test]
    fn nric_is_case_insensitive() {
        assert!(is_nric_valid("s9912345a"));
    }

    #[test]
    fn accepts_valid_uens() {
        assert!(is_uen_valid("12345678M", today()));
        assert!(is_uen_valid("201912345R", today()));
        assert!(is_uen_valid("T09LL0001D", today()));
    }

    #[test]
    fn rejects_bad_uen_checksums() {
        assert!(!is_uen_valid("12345678X", today()));
        assert!(!is_uen_valid("201912345Z", today()));
        assert!(!is_uen_valid("T09LL0001B", today()));
    }

    #[test]
    fn rejects_future_issue_years() {
        // Local company registered after "today".
        assert!(!is_uen_valid("209912345H", today()));
        // T-prefixed entity with an issue year beyond today's.
        assert!(!is_uen_valid("T99LL0001D", today()));
    }

    #[test]
    fn rejects_unknown_entity_indicator() {
        assert!(!is_uen_valid("T09ZZ0001D", today()));
    }
}

//! Parser for the legacy spreadsheet export: a wide CSV where each month owns
//! a group of columns (Meteran / Penggunaan / Tagihan, sometimes Foto) under a
//! month-name header row, and each resident is one row keyed by name.
//!
//! Layout example:
//!
//! ```text
//! ,,Januari,,,Februari,,
//! No,Nama,Meteran,Penggunaan,Tagihan,Meteran,Penggunaan,Tagihan
//! 1,Budi,100,10,"Rp 20.000",115,15,"Rp 20.000"
//! ```
//!
//! The month cell appears once per group; the blank cells to its right belong
//! to the same month.

use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("sub-header row (Meteran,Penggunaan,Tagihan) not found")]
    MissingSubHeader,
    #[error("no month header row above the sub-header")]
    MissingMonthHeader,
    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),
}

/// One month's worth of data for a resident, as recorded in the sheet.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SheetReading {
    pub month: String,
    pub meter: Option<i64>,
    pub usage: Option<i64>,
    pub billed_rp: Option<i64>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SheetUser {
    pub name: String,
    pub readings: Vec<SheetReading>,
}

/// JS-style parseInt: leading integer digits, ignoring what follows.
fn parse_leading_int(s: &str) -> Option<i64> {
    let t = s.trim();
    let digits: String = t.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// "Rp 65.000" -> 65000; anything non-digit is stripped first.
fn parse_amount(s: &str) -> Option<i64> {
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn cell<'a>(record: &'a StringRecord, idx: usize) -> &'a str {
    record.get(idx).unwrap_or("").trim()
}

fn is_sub_header(record: &StringRecord) -> bool {
    let cells: Vec<String> = record.iter().map(|c| c.trim().to_lowercase()).collect();
    cells
        .windows(3)
        .any(|w| w[0] == "meteran" && w[1] == "penggunaan" && w[2] == "tagihan")
}

pub fn parse_sheet(text: &str) -> Result<Vec<SheetUser>, SheetError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows: Vec<StringRecord> = Vec::new();
    for record in rdr.records() {
        rows.push(record?);
    }

    let sub_idx = rows
        .iter()
        .position(is_sub_header)
        .ok_or(SheetError::MissingSubHeader)?;
    if sub_idx == 0 {
        return Err(SheetError::MissingMonthHeader);
    }
    let sub_header = rows[sub_idx].clone();
    let month_header = rows[sub_idx - 1].clone();

    let mut users: Vec<SheetUser> = Vec::new();

    for row in rows.iter().skip(sub_idx + 1) {
        // data rows start with a row number and carry a name
        if parse_leading_int(cell(row, 0)).is_none() {
            continue;
        }
        let name = cell(row, 1);
        if name.is_empty() {
            continue;
        }

        let user_idx = match users.iter().position(|u| u.name == name) {
            Some(i) => i,
            None => {
                users.push(SheetUser {
                    name: name.to_string(),
                    readings: Vec::new(),
                });
                users.len() - 1
            }
        };

        let mut current_month = String::new();
        for i in 2..sub_header.len() {
            let month_cell = cell(&month_header, i);
            if !month_cell.is_empty() {
                current_month = month_cell.to_string();
            }
            if current_month.is_empty() {
                continue;
            }
            let value = cell(row, i);
            if value.is_empty() {
                continue;
            }

            let user = &mut users[user_idx];
            let pos = match user.readings.iter().position(|r| r.month == current_month) {
                Some(p) => p,
                None => {
                    user.readings.push(SheetReading {
                        month: current_month.clone(),
                        meter: None,
                        usage: None,
                        billed_rp: None,
                        photo_url: None,
                    });
                    user.readings.len() - 1
                }
            };
            let reading = &mut user.readings[pos];

            let column = cell(&sub_header, i).to_lowercase();
            match column.as_str() {
                "meteran" => reading.meter = parse_leading_int(value),
                "penggunaan" => reading.usage = parse_leading_int(value),
                "tagihan" => reading.billed_rp = parse_amount(value),
                c if c.contains("foto") || c.contains("image") => {
                    reading.photo_url = Some(value.to_string())
                }
                _ => {}
            }
        }
    }

    // a reading without a meter value is a half-filled cell group, drop it
    for user in &mut users {
        user.readings.retain(|r| r.meter.is_some());
    }
    users.retain(|u| !u.readings.is_empty());

    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Data Meteran Air Warga,,,,,,,,
,,Januari,,,,Februari,,
No,Nama,Meteran,Penggunaan,Tagihan,Foto,Meteran,Penggunaan,Tagihan
1,Budi,100,10,\"Rp 20.000\",https://drive.example/abc,115,15,\"Rp 20.000\"
2,Siti,200,25,\"Rp 35.000\",,,,
catatan,,,,,,,,
";

    #[test]
    fn parses_users_and_months() {
        let users = parse_sheet(SAMPLE).unwrap();
        assert_eq!(users.len(), 2);

        let budi = &users[0];
        assert_eq!(budi.name, "Budi");
        assert_eq!(budi.readings.len(), 2);
        assert_eq!(budi.readings[0].month, "Januari");
        assert_eq!(budi.readings[0].meter, Some(100));
        assert_eq!(budi.readings[0].usage, Some(10));
        assert_eq!(budi.readings[0].billed_rp, Some(20_000));
        assert_eq!(
            budi.readings[0].photo_url.as_deref(),
            Some("https://drive.example/abc")
        );
        assert_eq!(budi.readings[1].month, "Februari");
        assert_eq!(budi.readings[1].meter, Some(115));

        let siti = &users[1];
        assert_eq!(siti.readings.len(), 1, "empty Februari group is dropped");
        assert_eq!(siti.readings[0].billed_rp, Some(35_000));
    }

    #[test]
    fn quoted_commas_stay_in_one_cell() {
        let csv = "\
,,Maret,,
No,Nama,Meteran,Penggunaan,Tagihan
1,\"Sari, Dewi\",50,5,\"Rp 20.000\"
";
        let users = parse_sheet(csv).unwrap();
        assert_eq!(users[0].name, "Sari, Dewi");
        assert_eq!(users[0].readings[0].billed_rp, Some(20_000));
    }

    #[test]
    fn rows_without_row_number_are_skipped() {
        let csv = "\
,,April,,
No,Nama,Meteran,Penggunaan,Tagihan
total,Semua,999,99,\"Rp 999.999\"
3,Wati,70,7,\"Rp 20.000\"
";
        let users = parse_sheet(csv).unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Wati");
    }

    #[test]
    fn duplicate_name_rows_merge() {
        let csv = "\
,,Mei,,,Juni,,
No,Nama,Meteran,Penggunaan,Tagihan,Meteran,Penggunaan,Tagihan
1,Agus,10,1,\"Rp 20.000\",,,
2,Agus,,,,22,2,\"Rp 20.000\"
";
        let users = parse_sheet(csv).unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].readings.len(), 2);
    }

    #[test]
    fn missing_sub_header_is_an_error() {
        let err = parse_sheet("a,b,c\n1,2,3\n").unwrap_err();
        assert!(matches!(err, SheetError::MissingSubHeader));
    }

    #[test]
    fn amount_parsing_strips_currency_noise() {
        assert_eq!(parse_amount("Rp 65.000"), Some(65_000));
        assert_eq!(parse_amount("20000"), Some(20_000));
        assert_eq!(parse_amount("-"), None);
        assert_eq!(parse_leading_int(" 115 m3"), Some(115));
        assert_eq!(parse_leading_int("abc"), None);
    }
}

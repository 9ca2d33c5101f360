//! Load purchase lots from CSV (`Shares,Price Per Share`)

use csv::Reader;
use std::io::Read;
use std::path::Path;

use super::lots::CostBasisLot;
use crate::error::ExportError;

/// Raw CSV row matching the lot table columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Shares")]
    shares: f64,
    #[serde(rename = "Price Per Share")]
    price_per_share: f64,
}

/// Load all lots from a CSV file
pub fn load_lots<P: AsRef<Path>>(path: P) -> Result<Vec<CostBasisLot>, ExportError> {
    let reader = Reader::from_path(path)?;
    collect_lots(reader)
}

/// Load lots from any reader (e.g., stdin, string buffer)
pub fn load_lots_from_reader<R: Read>(reader: R) -> Result<Vec<CostBasisLot>, ExportError> {
    collect_lots(Reader::from_reader(reader))
}

fn collect_lots<R: Read>(mut reader: Reader<R>) -> Result<Vec<CostBasisLot>, ExportError> {
    let mut lots = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        lots.push(CostBasisLot::new(row.shares, row.price_per_share));
    }
    Ok(lots)
}

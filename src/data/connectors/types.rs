use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Columns understood by the universe loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetColumn {
    Rate,
    Term,
    Category,
    Issuer,
    Rating,
}

impl AssetColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rate => "rate",
            Self::Term => "term",
            Self::Category => "category",
            Self::Issuer => "issuer",
            Self::Rating => "rating",
        }
    }

    pub fn required() -> Vec<Self> {
        vec![Self::Rate, Self::Term, Self::Category]
    }

    pub fn optional() -> Vec<Self> {
        vec![Self::Issuer, Self::Rating]
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Rate | Self::Term)
    }

    /// Common alternative column names, including the Portuguese headers
    /// of broker CDB exports (Banco, Rentabilidade, Prazo, Liquidez, Rating)
    pub fn aliases(&self) -> Vec<&'static str> {
        match self {
            Self::Rate => vec!["rate", "Rate", "yield", "Yield", "Rentabilidade", "rentabilidade"],
            Self::Term => vec!["term", "Term", "days", "Prazo", "prazo"],
            Self::Category => vec!["category", "Category", "type", "Type", "Tipo", "tipo", "Liquidez", "liquidez"],
            Self::Issuer => vec!["issuer", "Issuer", "bank", "Bank", "Banco", "banco"],
            Self::Rating => vec!["rating", "Rating", "RATING"],
        }
    }
}

/// Summary of a loaded universe file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniverseMetadata {
    pub file_path: String,
    pub rows_read: usize,
    pub rows_skipped: usize,   // Missing required values
    pub duplicates_dropped: usize,
    pub rows_filtered: usize,  // Rejected by quality filters
    pub num_assets: usize,
    pub rate_range: (f64, f64), // (min, max)
    pub term_range: (u32, u32), // (min, max)
    pub loaded_at: DateTime<Utc>,
}

//! Labeled corpus reader
//!
//! A corpus is a delimited table with a header row. Two columns are required,
//! a free-text message and a sentiment label; any others are ignored.

use crate::config::CorpusColumns;
use nudge_core::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Reader over the rows of a labeled corpus
pub struct CorpusReader<R> {
    reader: csv::Reader<R>,
    message_idx: usize,
    label_idx: usize,
}

impl CorpusReader<File> {
    /// Open a corpus file
    pub fn open(path: impl AsRef<Path>, columns: &CorpusColumns) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            Error::corpus(format!("cannot open corpus {}: {}", path.display(), e))
        })?;
        Self::from_reader(file, columns)
    }
}

impl<R: Read> CorpusReader<R> {
    /// Wrap an already-open source. Fails if either required column is absent.
    pub fn from_reader(source: R, columns: &CorpusColumns) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(source);

        let headers = reader
            .headers()
            .map_err(|e| Error::corpus(format!("cannot read corpus header: {}", e)))?
            .clone();

        let position = |name: &str| {
            headers.iter().position(|h| h == name).ok_or_else(|| {
                Error::corpus(format!(
                    "corpus must contain '{}' and '{}' columns (missing '{}')",
                    columns.message, columns.label, name
                ))
            })
        };

        let message_idx = position(&columns.message)?;
        let label_idx = position(&columns.label)?;

        Ok(Self {
            reader,
            message_idx,
            label_idx,
        })
    }

    /// Iterate over data rows. Malformed rows surface as individual errors.
    pub fn records(&mut self) -> impl Iterator<Item = std::result::Result<CorpusRecord, csv::Error>> + '_ {
        let message_idx = self.message_idx;
        let label_idx = self.label_idx;

        self.reader.records().map(move |record| {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            let cell = |idx: usize| {
                record
                    .get(idx)
                    .filter(|value| !value.is_empty())
                    .map(str::to_owned)
            };

            Ok(CorpusRecord {
                line,
                message: cell(message_idx),
                label: cell(label_idx),
            })
        })
    }
}

/// One data row, reduced to the two columns the trainer needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusRecord {
    /// 1-based line number in the source
    pub line: u64,

    /// Message cell, `None` when missing or empty
    pub message: Option<String>,

    /// Label cell, `None` when missing or empty
    pub label: Option<String>,
}

impl CorpusRecord {
    /// Message and label, if both are present
    pub fn labeled(&self) -> Option<(&str, &str)> {
        Some((self.message.as_deref()?, self.label.as_deref()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(data: &str) -> Result<CorpusReader<&[u8]>> {
        CorpusReader::from_reader(data.as_bytes(), &CorpusColumns::default())
    }

    #[test]
    fn test_reads_required_columns_in_any_order() {
        let data = "id,sentiment,message\n1,positive,hello there friend\n";
        let mut corpus = reader(data).unwrap();
        let rows: Vec<_> = corpus.records().collect::<std::result::Result<_, _>>().unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].labeled(), Some(("hello there friend", "positive")));
        assert_eq!(rows[0].line, 2);
    }

    #[test]
    fn test_missing_column_is_corpus_error() {
        let err = reader("message,mood\nhi,pos\n").err().unwrap();
        assert!(matches!(err, Error::Corpus(_)));
        assert!(err.to_string().contains("sentiment"));
    }

    #[test]
    fn test_empty_source_is_corpus_error() {
        assert!(matches!(reader("").err().unwrap(), Error::Corpus(_)));
    }

    #[test]
    fn test_empty_and_short_rows_have_missing_cells() {
        let data = "message,sentiment\n,positive\nonly message\n\"quoted, text\",neg\n";
        let mut corpus = reader(data).unwrap();
        let rows: Vec<_> = corpus.records().collect::<std::result::Result<_, _>>().unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].message, None);
        assert_eq!(rows[1].label, None);
        assert!(rows[1].labeled().is_none());
        assert_eq!(rows[2].labeled(), Some(("quoted, text", "neg")));
    }

    #[test]
    fn test_custom_column_names() {
        let columns = CorpusColumns {
            message: "text".to_string(),
            label: "mood".to_string(),
        };
        let mut corpus =
            CorpusReader::from_reader("mood,text\nneg,so tired today\n".as_bytes(), &columns).unwrap();
        let row = corpus.records().next().unwrap().unwrap();
        assert_eq!(row.labeled(), Some(("so tired today", "neg")));
    }

    #[test]
    fn test_open_missing_file() {
        let err = CorpusReader::open("/definitely/not/here.csv", &CorpusColumns::default())
            .err()
            .unwrap();
        assert!(matches!(err, Error::Corpus(_)));
    }
}
